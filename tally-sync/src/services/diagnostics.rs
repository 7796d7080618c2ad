//! Best-effort diagnostics sink
//!
//! Data-quality signals (unmatched employees, malformed timestamps,
//! rejected writes) and run summaries go here rather than into the
//! business code's control flow. Messages are bounded, emitted as
//! structured tracing events, and appended to the `sync_log` table;
//! recording never fails and never blocks the pass.

use sqlx::SqlitePool;

/// Longest message persisted to the log
const MAX_MESSAGE_LEN: usize = 1000;

/// Longest category/title persisted to the log
const MAX_CATEGORY_LEN: usize = 140;

/// Diagnostics sink writing to tracing and the sync_log table
#[derive(Clone)]
pub struct DiagnosticsSink {
    db: SqlitePool,
}

impl DiagnosticsSink {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Record one diagnostic. Best-effort: a failed append is noted at
    /// debug level and otherwise swallowed.
    pub async fn record(&self, message: &str, category: &str) {
        let message = bound(message, MAX_MESSAGE_LEN);
        let category = bound(category, MAX_CATEGORY_LEN);

        tracing::info!(category = %category, "{}", message);

        let result = sqlx::query("INSERT INTO sync_log (category, message) VALUES (?, ?)")
            .bind(&category)
            .bind(&message)
            .execute(&self.db)
            .await;

        if let Err(e) = result {
            tracing::debug!("sync_log append failed: {}", e);
        }
    }
}

/// Truncate to `max` characters, marking the cut with `...`
fn bound(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::Row;

    #[test]
    fn test_bound_short_text_unchanged() {
        assert_eq!(bound("hello", 10), "hello");
        assert_eq!(bound("exactly10!", 10), "exactly10!");
    }

    #[test]
    fn test_bound_long_text_truncated() {
        let long = "x".repeat(1200);
        let bounded = bound(&long, MAX_MESSAGE_LEN);
        assert_eq!(bounded.chars().count(), MAX_MESSAGE_LEN);
        assert!(bounded.ends_with("..."));
    }

    #[test]
    fn test_bound_counts_chars_not_bytes() {
        // Multibyte input must not split a character
        let long = "é".repeat(200);
        let bounded = bound(&long, MAX_CATEGORY_LEN);
        assert_eq!(bounded.chars().count(), MAX_CATEGORY_LEN);
    }

    #[tokio::test]
    async fn test_record_appends_row() {
        let pool = SqlitePoolOptions::new().connect(":memory:").await.unwrap();
        tally_common::db::init_tables(&pool).await.unwrap();

        let sink = DiagnosticsSink::new(pool.clone());
        sink.record("something happened", "Test Category").await;

        let row = sqlx::query("SELECT category, message FROM sync_log")
            .fetch_one(&pool)
            .await
            .unwrap();
        let category: String = row.get("category");
        let message: String = row.get("message");
        assert_eq!(category, "Test Category");
        assert_eq!(message, "something happened");
    }

    #[tokio::test]
    async fn test_record_never_fails_without_table() {
        // No schema at all: the append fails internally, record still returns
        let pool = SqlitePoolOptions::new().connect(":memory:").await.unwrap();
        let sink = DiagnosticsSink::new(pool);
        sink.record("lost message", "No Table").await;
    }
}
