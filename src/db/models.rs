use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const STATUS_PUBLISHED: &str = "published";
pub const STATUS_REVIEW: &str = "review";

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    pub product: Option<String>,
    pub original_text: String,
    pub original_language: String,
    pub translated_text: String,
    pub sentiment: String,
    pub status: String,
    pub was_reviewed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackPage {
    pub total_count: i64,
    pub items: Vec<Feedback>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SentimentStats {
    pub positive_count: i64,
    pub negative_count: i64,
    pub neutral_count: i64,
    pub total_count: i64,
    pub positive_percentage: f64,
    pub negative_percentage: f64,
    pub neutral_percentage: f64,
}

/// Optional listing predicates, AND-combined by `list_feedback`.
#[derive(Debug, Default, Clone)]
pub struct FeedbackFilter {
    pub product: Option<String>,
    pub sentiment: Option<String>,
    pub original_language: Option<String>,
    pub show_all: bool,
}
