//! Service modules for the attendance sync pass

pub mod diagnostics;
pub mod identity_resolver;
pub mod materializer;
pub mod session_pairer;
pub mod sync_orchestrator;
pub mod timeclock_client;

pub use diagnostics::DiagnosticsSink;
pub use identity_resolver::{IdentityTables, Resolution};
pub use materializer::{CheckinMaterializer, MaterializeOutcome};
pub use session_pairer::SessionPairer;
pub use sync_orchestrator::SyncOrchestrator;
pub use timeclock_client::{ProviderError, TimeclockClient};
