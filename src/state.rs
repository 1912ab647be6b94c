use crate::agents::GeminiAgent;
use crate::db::DbPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub agent: GeminiAgent,
}
