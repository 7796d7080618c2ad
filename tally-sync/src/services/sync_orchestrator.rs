//! Sync orchestrator
//!
//! Drives one full reconciliation pass for a single calendar day:
//! authenticate → fetch → resolve → pair → materialize → report.
//!
//! Phase progression: Authenticating → Fetching → Resolving → Pairing →
//! Materializing → Completed, with Failed exits from
//! Authenticating (no token) and Fetching (transport error). Only those
//! two failures are run-fatal; every per-event error is isolated, logged
//! through the diagnostics sink, and never aborts the remaining pass.

use crate::db::employees;
use crate::models::{
    Coordinates, EventKind, ExternalEvent, LogType, RunPhase, SyncOutcome, SyncReport,
};
use crate::services::diagnostics::DiagnosticsSink;
use crate::services::identity_resolver::{IdentityTables, Resolution};
use crate::services::materializer::{CheckinMaterializer, MaterializeOutcome};
use crate::services::session_pairer::SessionPairer;
use crate::services::timeclock_client::TimeclockClient;
use chrono::NaiveDate;
use chrono_tz::Tz;
use sqlx::SqlitePool;
use tally_common::time::parse_provider_timestamp;

/// One-day sync pass driver
pub struct SyncOrchestrator {
    db: SqlitePool,
    client: TimeclockClient,
    materializer: CheckinMaterializer,
    diagnostics: DiagnosticsSink,
}

impl SyncOrchestrator {
    pub fn new(
        db: SqlitePool,
        client: TimeclockClient,
        tz: Tz,
        default_location: Coordinates,
    ) -> Self {
        let materializer = CheckinMaterializer::new(db.clone(), tz, default_location);
        let diagnostics = DiagnosticsSink::new(db.clone());
        Self {
            db,
            client,
            materializer,
            diagnostics,
        }
    }

    /// Execute one full pass for the given day.
    ///
    /// Always returns a terminal report; no error propagates past this
    /// entry point.
    pub async fn run(&self, date: NaiveDate) -> SyncReport {
        tracing::info!(date = %date, phase = %RunPhase::Authenticating, "Starting attendance sync");

        let token = match self.client.get_access_token().await {
            Ok(token) => token,
            Err(e) => {
                self.diagnostics
                    .record(&format!("Failed to get access token: {}", e), "Auth Error")
                    .await;
                return SyncReport::terminal(SyncOutcome::AuthFailure, RunPhase::Failed);
            }
        };

        tracing::info!(date = %date, phase = %RunPhase::Fetching, "Authenticated, fetching provider data");

        let events = match self.client.fetch_day_events(date, &token).await {
            Ok(events) => events,
            Err(e) => {
                self.diagnostics
                    .record(
                        &format!("Failed to fetch provider data: {}", e),
                        "Provider API Error",
                    )
                    .await;
                return SyncReport::terminal(SyncOutcome::ZeroEntries, RunPhase::Failed);
            }
        };

        self.process_events(events).await
    }

    /// Resolve, pair and materialize an already-fetched, time-ordered
    /// event list. Public so the pipeline can be driven without the
    /// provider transport.
    pub async fn process_events(&self, events: Vec<ExternalEvent>) -> SyncReport {
        if events.is_empty() {
            // Nothing to reconcile; the directory is not even loaded
            self.diagnostics
                .record("No entries fetched from provider.", "Fetched 0 entries")
                .await;
            return SyncReport::terminal(SyncOutcome::ZeroEntries, RunPhase::Completed);
        }

        tracing::info!(events = events.len(), phase = %RunPhase::Resolving, "Building identity tables");

        let directory = match employees::list_employees(&self.db).await {
            Ok(directory) => directory,
            Err(e) => {
                self.diagnostics
                    .record(
                        &format!("Failed to load employee directory: {}", e),
                        "Directory Error",
                    )
                    .await;
                return SyncReport::terminal(SyncOutcome::ZeroEntries, RunPhase::Failed);
            }
        };

        let tables = IdentityTables::build(&directory);

        // Pairing state lives only for this pass
        let mut pairer = SessionPairer::new();
        let mut report = SyncReport::terminal(SyncOutcome::Success, RunPhase::Materializing);
        report.fetched = events.len();

        tracing::info!(phase = %RunPhase::Pairing, "Processing events in time order");

        for event in &events {
            let employee_id = match tables.resolve(event) {
                Resolution::Matched(id) => id,
                Resolution::Ambiguous(name) => {
                    report.ambiguous += 1;
                    self.diagnostics
                        .record(
                            &format!(
                                "Name '{}' matches multiple directory entries, skipping event",
                                name
                            ),
                            "Ambiguous Employee",
                        )
                        .await;
                    continue;
                }
                Resolution::NoMatch => {
                    report.unresolved += 1;
                    self.diagnostics
                        .record(
                            &format!(
                                "No employee match for: Email={}, Name={}",
                                event.resolved_email.as_deref().unwrap_or("<none>"),
                                event.fallback_name.as_deref().unwrap_or("<none>")
                            ),
                            "Missing Employee",
                        )
                        .await;
                    continue;
                }
            };
            report.resolved += 1;

            let log_type = match &event.kind {
                EventKind::In => LogType::In,
                EventKind::Out => LogType::Out,
                EventKind::Other(raw) => {
                    report.skipped_kind += 1;
                    self.diagnostics
                        .record(
                            &format!(
                                "Skipping unsupported entry type '{}' for {}",
                                raw, employee_id
                            ),
                            "Unsupported Entry Type",
                        )
                        .await;
                    continue;
                }
            };

            let instant = match parse_provider_timestamp(&event.time) {
                Ok(instant) => instant,
                Err(e) => {
                    report.skipped_parse += 1;
                    self.diagnostics
                        .record(
                            &format!("Timestamp error: {} | {}", event.time, e),
                            "Timestamp Error",
                        )
                        .await;
                    continue;
                }
            };

            let working_hours = pairer.observe(&event.person_id, &event.kind, instant);

            let outcome = self
                .materializer
                .materialize(
                    event,
                    &employee_id,
                    log_type,
                    instant,
                    working_hours,
                    tables.fallback_email(&employee_id),
                    &self.diagnostics,
                )
                .await;

            match outcome {
                MaterializeOutcome::Inserted => report.inserted += 1,
                MaterializeOutcome::Duplicate => report.duplicates += 1,
                MaterializeOutcome::WriteFailed => report.write_failures += 1,
            }
        }

        if pairer.open_count() > 0 {
            tracing::debug!(
                open_sessions = pairer.open_count(),
                "Check-ins left open at end of day"
            );
        }

        report.phase = RunPhase::Completed;
        report.outcome = SyncOutcome::Success;

        self.diagnostics
            .record("Attendance sync completed successfully", "Success")
            .await;
        tracing::info!(phase = %report.phase, "{}", report.summary());

        report
    }
}
