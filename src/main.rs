mod agents;
mod config;
mod db;
mod routes;
mod state;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "echofeed=info,tower_http=info".into()),
        )
        .init();

    let config = config::Config::from_env()?;

    let pool = db::create_pool(&config.database_url).await?;
    db::init_schema(pool.as_ref()).await?;

    let agent = agents::GeminiAgent::new(config.gemini_api_key.clone());

    let state = Arc::new(state::AppState { pool, agent });

    let app = Router::new()
        .route("/", get(routes::root))
        .route(
            "/api/feedback",
            post(routes::submit_feedback).get(routes::get_feedback),
        )
        .route(
            "/api/feedback/:feedback_id",
            delete(routes::remove_feedback).put(routes::approve_feedback),
        )
        .route("/api/stats", get(routes::get_stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Echofeed listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
