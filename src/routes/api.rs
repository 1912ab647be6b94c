use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::db::{self, FeedbackFilter};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FeedbackCreate {
    pub original_text: String,
    #[serde(default)]
    pub product: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackUpdate {
    pub translated_text: String,
    pub sentiment: String,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub product: Option<String>,
    pub sentiment: Option<String>,
    pub original_language: Option<String>,
    #[serde(default)]
    pub show_all: bool,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    5
}

pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "Feedback service is running" }))
}

pub async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    Json(body): Json<FeedbackCreate>,
) -> impl IntoResponse {
    if body.original_text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "detail": "original_text must not be empty" })),
        )
            .into_response();
    }

    let analysis = state.agent.analyze(&body.original_text).await;

    match db::insert_feedback(
        state.pool.as_ref(),
        &body.original_text,
        body.product.as_deref(),
        &analysis,
    )
    .await
    {
        Ok(record) => Json(record).into_response(),
        Err(e) => internal_error(e),
    }
}

pub async fn get_feedback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    let filter = FeedbackFilter {
        product: params.product,
        sentiment: params.sentiment,
        original_language: params.original_language,
        show_all: params.show_all,
    };
    let page = params.page.max(1);
    let page_size = params.page_size.max(1);

    match db::list_feedback(state.pool.as_ref(), &filter, page, page_size).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => internal_error(e),
    }
}

pub async fn get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match db::sentiment_stats(state.pool.as_ref()).await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => internal_error(e),
    }
}

pub async fn remove_feedback(
    State(state): State<Arc<AppState>>,
    Path(feedback_id): Path<i64>,
) -> impl IntoResponse {
    // Deleting a missing id is a silent no-op.
    match db::delete_feedback(state.pool.as_ref(), feedback_id).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => internal_error(e),
    }
}

pub async fn approve_feedback(
    State(state): State<Arc<AppState>>,
    Path(feedback_id): Path<i64>,
    Json(body): Json<FeedbackUpdate>,
) -> impl IntoResponse {
    match db::moderate_feedback(
        state.pool.as_ref(),
        feedback_id,
        &body.translated_text,
        &body.sentiment,
    )
    .await
    {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "detail": "Feedback not found" })),
        )
            .into_response(),
        Err(e) => internal_error(e),
    }
}

fn internal_error(e: sqlx::Error) -> axum::response::Response {
    tracing::error!("Database error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "detail": "Internal server error" })),
    )
        .into_response()
}
