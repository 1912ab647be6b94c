#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub gemini_api_key: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:feedback.db?mode=rwc".to_string());

        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| "GEMINI_API_KEY must be set")?;

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .unwrap_or(8000);

        Ok(Self {
            database_url,
            gemini_api_key,
            host,
            port,
        })
    }
}
