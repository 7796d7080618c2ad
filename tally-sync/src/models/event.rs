//! External time-tracking events as fetched from the provider

use serde::{Deserialize, Serialize};

/// Kind of a time-tracking event
///
/// The provider reports free-form type strings; only "In" and "Out"
/// participate in pairing and materialization. Everything else (break
/// types etc.) is carried through as `Other` so it can be counted and
/// logged before being skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    In,
    Out,
    Other(String),
}

impl EventKind {
    /// Parse the provider's type string
    pub fn parse(raw: &str) -> Self {
        match raw {
            "In" => EventKind::In,
            "Out" => EventKind::Out,
            other => EventKind::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::In => write!(f, "In"),
            EventKind::Out => write!(f, "Out"),
            EventKind::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// GPS coordinates attached to an event
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One external time-tracking event, enriched with the provider-side
/// identity of its person (email and normalized display name).
///
/// Immutable once fetched; enrichment happens at fetch assembly, before
/// the pipeline sees the event.
#[derive(Debug, Clone)]
pub struct ExternalEvent {
    /// Provider-side person id
    pub person_id: String,

    /// Event kind (In / Out / other provider types)
    pub kind: EventKind,

    /// Raw provider timestamp string (parsed by the orchestrator)
    pub time: String,

    /// GPS coordinates, if the provider captured any
    pub coordinates: Option<Coordinates>,

    /// Email resolved from the provider's people directory
    pub resolved_email: Option<String>,

    /// Lowercase-trimmed display name, for fallback identity matching
    pub fallback_name: Option<String>,
}
