//! Database pool creation and schema initialization

use crate::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Connects to tally.db in the root folder, creating the file and any
/// missing tables on first run.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Initialize all Tally tables (idempotent)
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    create_employees_table(pool).await?;
    create_checkins_table(pool).await?;
    create_settings_table(pool).await?;
    create_sync_log_table(pool).await?;

    tracing::info!("Database tables initialized (employees, checkins, settings, sync_log)");

    Ok(())
}

/// Employee directory snapshot consumed by identity resolution
pub async fn create_employees_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            internal_id TEXT PRIMARY KEY,
            login_email TEXT,
            display_name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Persisted attendance records.
///
/// The UNIQUE index on (employee_id, time, log_type) is the dedup triple;
/// it makes accidental concurrent runs conflict-free at the storage layer.
pub async fn create_checkins_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS checkins (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id TEXT NOT NULL,
            time TEXT NOT NULL,
            log_type TEXT NOT NULL,
            working_hours REAL NOT NULL DEFAULT 0.0,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            employee_email TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_checkins_dedup
        ON checkins (employee_id, time, log_type)
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Key-value settings (provider credentials etc.)
pub async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Best-effort diagnostics log written by the sync pass
pub async fn create_sync_log_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sync_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category TEXT NOT NULL,
            message TEXT NOT NULL,
            logged_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    #[tokio::test]
    async fn test_init_tables_idempotent() {
        let pool = SqlitePoolOptions::new().connect(":memory:").await.unwrap();
        init_tables(&pool).await.unwrap();
        // Second pass must not fail
        init_tables(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_checkins_dedup_index_enforced() {
        let pool = SqlitePoolOptions::new().connect(":memory:").await.unwrap();
        init_tables(&pool).await.unwrap();

        let insert = r#"
            INSERT INTO checkins (employee_id, time, log_type, working_hours, latitude, longitude)
            VALUES ('EMP1', '2024-01-01 10:00:00', 'IN', 0.0, 0.0, 0.0)
        "#;
        sqlx::query(insert).execute(&pool).await.unwrap();
        assert!(sqlx::query(insert).execute(&pool).await.is_err());
    }
}
