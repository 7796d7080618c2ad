//! Settings table accessors (key-value)

use anyhow::Result;
use sqlx::{Row, SqlitePool};

const KEY_CLIENT_ID: &str = "provider_client_id";
const KEY_CLIENT_SECRET: &str = "provider_client_secret";

/// Read one setting value
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let row = sqlx::query("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.get("value")))
}

/// Write one setting value (insert or replace)
pub async fn set_setting(pool: &SqlitePool, key: &str, value: String) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value) VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_client_id(pool: &SqlitePool) -> Result<Option<String>> {
    get_setting(pool, KEY_CLIENT_ID).await
}

pub async fn set_client_id(pool: &SqlitePool, value: String) -> Result<()> {
    set_setting(pool, KEY_CLIENT_ID, value).await
}

pub async fn get_client_secret(pool: &SqlitePool) -> Result<Option<String>> {
    get_setting(pool, KEY_CLIENT_SECRET).await
}

pub async fn set_client_secret(pool: &SqlitePool, value: String) -> Result<()> {
    set_setting(pool, KEY_CLIENT_SECRET, value).await
}
