//! Attendance record persistence
//!
//! Writes are keyed by the dedup triple (employee_id, time, log_type).
//! `exists` is checked before every insert; the UNIQUE index backs the
//! same invariant at the storage layer for accidental concurrent runs.

use crate::models::AttendanceRecord;
use anyhow::Result;
use sqlx::{Row, SqlitePool};

/// Check whether a record with this dedup key already exists
pub async fn exists(
    pool: &SqlitePool,
    employee_id: &str,
    time: &str,
    log_type: &str,
) -> Result<bool> {
    let row = sqlx::query(
        r#"
        SELECT 1 FROM checkins
        WHERE employee_id = ? AND time = ? AND log_type = ?
        LIMIT 1
        "#,
    )
    .bind(employee_id)
    .bind(time)
    .bind(log_type)
    .fetch_optional(pool)
    .await?;

    Ok(row.is_some())
}

/// Insert one attendance record.
///
/// Plain insert, all-or-nothing per record; callers treat a failure as
/// skip-this-record and continue with the next event.
pub async fn insert(pool: &SqlitePool, record: &AttendanceRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO checkins
            (employee_id, time, log_type, working_hours, latitude, longitude, employee_email)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.employee_id)
    .bind(record.time_string())
    .bind(record.log_type.as_str())
    .bind(record.working_hours)
    .bind(record.latitude)
    .bind(record.longitude)
    .bind(&record.employee_email)
    .execute(pool)
    .await?;

    Ok(())
}

/// Total persisted records (test and reporting helper)
pub async fn count_all(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS n FROM checkins")
        .fetch_one(pool)
        .await?;
    Ok(row.get("n"))
}

/// Working hours stored for a specific dedup key (test helper)
pub async fn working_hours_for(
    pool: &SqlitePool,
    employee_id: &str,
    time: &str,
    log_type: &str,
) -> Result<Option<f64>> {
    let row = sqlx::query(
        r#"
        SELECT working_hours FROM checkins
        WHERE employee_id = ? AND time = ? AND log_type = ?
        "#,
    )
    .bind(employee_id)
    .bind(time)
    .bind(log_type)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.get("working_hours")))
}
