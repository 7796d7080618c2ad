//! Checkin materialization
//!
//! Turns a resolved, paired event into a persisted attendance record,
//! enforcing the dedup triple (employee, local time, log type) against
//! prior runs before writing. Records are independent: a rejected write
//! is reported and the pass continues.

use crate::db::checkins;
use crate::models::{AttendanceRecord, Coordinates, ExternalEvent, LogType};
use crate::services::diagnostics::DiagnosticsSink;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use sqlx::SqlitePool;
use tally_common::time::to_local;

/// What happened to one candidate record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterializeOutcome {
    /// Written this pass
    Inserted,

    /// A record with the same dedup key already exists; skipped
    Duplicate,

    /// The store rejected the write; reported, pass continues
    WriteFailed,
}

/// Materializes attendance records for one deployment's zone and
/// default location
pub struct CheckinMaterializer {
    db: SqlitePool,
    tz: Tz,
    default_location: Coordinates,
}

impl CheckinMaterializer {
    pub fn new(db: SqlitePool, tz: Tz, default_location: Coordinates) -> Self {
        Self {
            db,
            tz,
            default_location,
        }
    }

    /// Persist one resolved, paired event.
    ///
    /// The instant is the event's already-parsed UTC time; `working_hours`
    /// comes from the session pairer. Coordinates fall back to the
    /// configured default when the event carries none; the record email
    /// prefers the provider-resolved one, then the directory login email.
    pub async fn materialize(
        &self,
        event: &ExternalEvent,
        employee_id: &str,
        log_type: LogType,
        instant: DateTime<Utc>,
        working_hours: f64,
        fallback_email: Option<&str>,
        diagnostics: &DiagnosticsSink,
    ) -> MaterializeOutcome {
        let local_time = to_local(instant, self.tz);
        let location = event.coordinates.unwrap_or(self.default_location);

        let record = AttendanceRecord {
            employee_id: employee_id.to_string(),
            local_time,
            log_type,
            working_hours,
            latitude: location.latitude,
            longitude: location.longitude,
            employee_email: event
                .resolved_email
                .clone()
                .or_else(|| fallback_email.map(str::to_string)),
        };

        let time_string = record.time_string();

        match checkins::exists(&self.db, employee_id, &time_string, log_type.as_str()).await {
            Ok(true) => {
                tracing::debug!(
                    employee_id = %employee_id,
                    time = %time_string,
                    log_type = %log_type.as_str(),
                    "Checkin already persisted, skipping"
                );
                return MaterializeOutcome::Duplicate;
            }
            Ok(false) => {}
            Err(e) => {
                diagnostics
                    .record(
                        &format!(
                            "Existence check failed for {} {} {}: {}",
                            employee_id, time_string, log_type.as_str(), e
                        ),
                        "Checkin Write Error",
                    )
                    .await;
                return MaterializeOutcome::WriteFailed;
            }
        }

        match checkins::insert(&self.db, &record).await {
            Ok(()) => {
                tracing::debug!(
                    employee_id = %employee_id,
                    time = %time_string,
                    log_type = %log_type.as_str(),
                    working_hours,
                    "Checkin persisted"
                );
                MaterializeOutcome::Inserted
            }
            Err(e) => {
                diagnostics
                    .record(
                        &format!(
                            "Insert failed for {} {} {}: {}",
                            employee_id, time_string, log_type.as_str(), e
                        ),
                        "Checkin Write Error",
                    )
                    .await;
                MaterializeOutcome::WriteFailed
            }
        }
    }
}
