//! Data model for the attendance sync pipeline

pub mod checkin;
pub mod event;
pub mod report;

pub use checkin::{AttendanceRecord, LogType};
pub use event::{Coordinates, EventKind, ExternalEvent};
pub use report::{RunPhase, SyncOutcome, SyncReport};
