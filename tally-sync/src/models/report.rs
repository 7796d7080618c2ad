//! Sync run outcome reporting

/// Terminal outcome of one orchestration run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Events were processed and the pass completed
    Success,

    /// No events to process (empty day, or fetch failure; see `phase`)
    ZeroEntries,

    /// No access token could be obtained; nothing was processed
    AuthFailure,
}

/// Orchestration state machine.
///
/// Progression: Authenticating → Fetching → Resolving → Pairing →
/// Materializing → Completed, with Failed exits from Authenticating and
/// Fetching. Once a fetch step fails no events are processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Authenticating,
    Fetching,
    Resolving,
    Pairing,
    Materializing,
    Completed,
    Failed,
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RunPhase::Authenticating => "authenticating",
            RunPhase::Fetching => "fetching",
            RunPhase::Resolving => "resolving",
            RunPhase::Pairing => "pairing",
            RunPhase::Materializing => "materializing",
            RunPhase::Completed => "completed",
            RunPhase::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Summary of one full sync pass.
///
/// The orchestrator's public entry always returns a report; per-event
/// failures are isolated into the counters and never abort the pass.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub outcome: SyncOutcome,
    pub phase: RunPhase,

    /// Events fetched from the provider
    pub fetched: usize,

    /// Events matched to an internal employee
    pub resolved: usize,

    /// Events with no directory match (dropped)
    pub unresolved: usize,

    /// Events whose fallback name matched multiple directory entries (dropped)
    pub ambiguous: usize,

    /// Non-clock event kinds skipped before pairing
    pub skipped_kind: usize,

    /// Events with malformed timestamps (dropped)
    pub skipped_parse: usize,

    /// Records written this pass
    pub inserted: usize,

    /// Records already present from a prior pass
    pub duplicates: usize,

    /// Insert attempts rejected by the store
    pub write_failures: usize,
}

impl SyncReport {
    pub fn terminal(outcome: SyncOutcome, phase: RunPhase) -> Self {
        Self {
            outcome,
            phase,
            fetched: 0,
            resolved: 0,
            unresolved: 0,
            ambiguous: 0,
            skipped_kind: 0,
            skipped_parse: 0,
            inserted: 0,
            duplicates: 0,
            write_failures: 0,
        }
    }

    /// One-line summary for the diagnostics log
    pub fn summary(&self) -> String {
        format!(
            "outcome={:?} phase={} fetched={} resolved={} unresolved={} ambiguous={} inserted={} duplicates={} write_failures={}",
            self.outcome,
            self.phase,
            self.fetched,
            self.resolved,
            self.unresolved,
            self.ambiguous,
            self.inserted,
            self.duplicates,
            self.write_failures
        )
    }
}
