mod models;

pub use models::*;

use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::sync::Arc;

use crate::agents::{Analysis, REVIEW_LANGUAGE, UNKNOWN_LANGUAGE};

pub type DbPool = Arc<SqlitePool>;

/// Language codes the dashboard offers as explicit filter choices. The
/// "Others" filter value matches everything outside this set.
const KNOWN_LANGUAGE_CODES: &[&str] = &[
    "en", "fr", "es", "de", "ja", "zh", "ru", "ar", "pt", "it",
];

const OTHERS_FILTER: &str = "Others";

pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(Arc::new(pool))
}

pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS feedback (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            product TEXT,
            original_text TEXT NOT NULL,
            original_language TEXT NOT NULL,
            translated_text TEXT NOT NULL,
            sentiment TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'published',
            was_reviewed BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Persist a classified submission.
///
/// A "review" language marks the record as unpublished until a moderator
/// approves it; `was_reviewed` permanently records that it was flagged at
/// creation time.
pub async fn insert_feedback(
    pool: &SqlitePool,
    original_text: &str,
    product: Option<&str>,
    analysis: &Analysis,
) -> Result<Feedback, sqlx::Error> {
    let status = if analysis.language == REVIEW_LANGUAGE {
        STATUS_REVIEW
    } else {
        STATUS_PUBLISHED
    };
    let was_reviewed = status == STATUS_REVIEW;

    sqlx::query_as::<_, Feedback>(
        r#"
        INSERT INTO feedback (product, original_text, original_language, translated_text, sentiment, status, was_reviewed, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(product)
    .bind(original_text)
    .bind(&analysis.language)
    .bind(&analysis.translated_text)
    .bind(&analysis.sentiment)
    .bind(status)
    .bind(was_reviewed)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

fn push_filters<'args>(qb: &mut QueryBuilder<'args, Sqlite>, filter: &'args FeedbackFilter) {
    if !filter.show_all {
        qb.push(" AND status = ").push_bind(STATUS_PUBLISHED);
    }
    if let Some(ref product) = filter.product {
        qb.push(" AND product = ").push_bind(product);
    }
    if let Some(ref sentiment) = filter.sentiment {
        qb.push(" AND sentiment = ").push_bind(sentiment);
    }
    if let Some(ref language) = filter.original_language {
        if language == OTHERS_FILTER {
            qb.push(" AND original_language NOT IN (");
            let mut codes = qb.separated(", ");
            for code in KNOWN_LANGUAGE_CODES {
                codes.push_bind(*code);
            }
            codes.push_bind(REVIEW_LANGUAGE);
            qb.push(")");
        } else {
            qb.push(" AND original_language = ").push_bind(language);
        }
    }
}

/// Filtered, paginated listing. `total_count` is computed over the filtered
/// set before pagination, so it is invariant across pages.
pub async fn list_feedback(
    pool: &SqlitePool,
    filter: &FeedbackFilter,
    page: u32,
    page_size: u32,
) -> Result<FeedbackPage, sqlx::Error> {
    let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM feedback WHERE 1=1");
    push_filters(&mut count_query, filter);
    let total_count: i64 = count_query.build_query_scalar().fetch_one(pool).await?;

    let offset = i64::from(page.saturating_sub(1)) * i64::from(page_size);
    let mut page_query = QueryBuilder::<Sqlite>::new("SELECT * FROM feedback WHERE 1=1");
    push_filters(&mut page_query, filter);
    page_query
        .push(" ORDER BY created_at DESC, id DESC LIMIT ")
        .push_bind(i64::from(page_size))
        .push(" OFFSET ")
        .push_bind(offset);
    let items = page_query
        .build_query_as::<Feedback>()
        .fetch_all(pool)
        .await?;

    Ok(FeedbackPage { total_count, items })
}

/// Sentiment counts across every record, review-status rows included.
pub async fn sentiment_stats(pool: &SqlitePool) -> Result<SentimentStats, sqlx::Error> {
    let rows: Vec<(String, i64)> =
        sqlx::query_as("SELECT sentiment, COUNT(id) FROM feedback GROUP BY sentiment")
            .fetch_all(pool)
            .await?;

    let mut positive_count = 0;
    let mut negative_count = 0;
    let mut neutral_count = 0;
    for (sentiment, count) in rows {
        match sentiment.as_str() {
            "positive" => positive_count = count,
            "negative" => negative_count = count,
            "neutral" => neutral_count = count,
            _ => {}
        }
    }

    let total_count = positive_count + negative_count + neutral_count;
    let percentage = |count: i64| {
        if total_count > 0 {
            count as f64 / total_count as f64 * 100.0
        } else {
            0.0
        }
    };

    Ok(SentimentStats {
        positive_count,
        negative_count,
        neutral_count,
        total_count,
        positive_percentage: percentage(positive_count),
        negative_percentage: percentage(negative_count),
        neutral_percentage: percentage(neutral_count),
    })
}

pub async fn get_feedback(pool: &SqlitePool, id: i64) -> Result<Option<Feedback>, sqlx::Error> {
    sqlx::query_as::<_, Feedback>("SELECT * FROM feedback WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Remove a record, returning its prior state. Missing ids are a no-op.
pub async fn delete_feedback(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<Feedback>, sqlx::Error> {
    let existing = get_feedback(pool, id).await?;
    if existing.is_some() {
        sqlx::query("DELETE FROM feedback WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
    }
    Ok(existing)
}

/// Apply a moderator's correction and publish the record. The detected
/// language is discarded in favor of the unknown code; `was_reviewed`
/// stays as recorded at creation.
pub async fn moderate_feedback(
    pool: &SqlitePool,
    id: i64,
    translated_text: &str,
    sentiment: &str,
) -> Result<Option<Feedback>, sqlx::Error> {
    sqlx::query_as::<_, Feedback>(
        r#"
        UPDATE feedback
        SET translated_text = ?, sentiment = ?, status = ?, original_language = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(translated_text)
    .bind(sentiment)
    .bind(STATUS_PUBLISHED)
    .bind(UNKNOWN_LANGUAGE)
    .bind(id)
    .fetch_optional(pool)
    .await
}
