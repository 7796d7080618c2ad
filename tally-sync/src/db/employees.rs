//! Employee directory access
//!
//! The directory is a point-in-time snapshot read fresh each run; the sync
//! pass never mutates it. `save_employee` exists for seeding and for
//! whatever upstream process maintains the table.

use anyhow::Result;
use sqlx::{Row, SqlitePool};

/// One employee directory record
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    /// Internal employee id (record key in the HR system)
    pub internal_id: String,

    /// Login email, if the employee has a user account
    pub login_email: Option<String>,

    /// Display name as entered in the directory
    pub display_name: String,
}

/// Load the full directory snapshot
pub async fn list_employees(pool: &SqlitePool) -> Result<Vec<DirectoryEntry>> {
    let rows = sqlx::query(
        r#"
        SELECT internal_id, login_email, display_name
        FROM employees
        ORDER BY internal_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| DirectoryEntry {
            internal_id: row.get("internal_id"),
            login_email: row.get("login_email"),
            display_name: row.get("display_name"),
        })
        .collect())
}

/// Insert or update a directory record
pub async fn save_employee(pool: &SqlitePool, entry: &DirectoryEntry) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO employees (internal_id, login_email, display_name)
        VALUES (?, ?, ?)
        ON CONFLICT(internal_id) DO UPDATE SET
            login_email = excluded.login_email,
            display_name = excluded.display_name
        "#,
    )
    .bind(&entry.internal_id)
    .bind(&entry.login_email)
    .bind(&entry.display_name)
    .execute(pool)
    .await?;

    Ok(())
}
