//! In/Out session pairing
//!
//! Consumes one person's time-ordered events for a single day and pairs
//! each "In" with the next "Out" to compute a working-hours duration.
//! State lives only for the duration of one orchestration pass; cross-day
//! pairing is out of scope.

use crate::models::EventKind;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tally_common::time::working_hours_between;

/// Per-person open-session state for one sync pass
#[derive(Debug, Default)]
pub struct SessionPairer {
    /// person id -> open "In" instant
    open: HashMap<String, DateTime<Utc>>,
}

impl SessionPairer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe one event (events must arrive in ascending time order) and
    /// return the working-hours value for the record it will produce.
    ///
    /// - `In`: records (or overwrites, last-in-wins) the open instant and
    ///   yields 0.0 (the IN record itself carries no duration).
    /// - `Out` with an open `In`: yields the elapsed hours and clears the
    ///   open slot.
    /// - `Out` with no open `In`: yields 0.0; the half-event is still a
    ///   valid standalone record.
    /// - Other kinds: yield 0.0 and leave state untouched.
    pub fn observe(&mut self, person_id: &str, kind: &EventKind, instant: DateTime<Utc>) -> f64 {
        match kind {
            EventKind::In => {
                if let Some(previous) = self.open.insert(person_id.to_string(), instant) {
                    tracing::debug!(
                        person_id = %person_id,
                        previous = %previous,
                        replacement = %instant,
                        "Open check-in replaced without an intervening check-out"
                    );
                }
                0.0
            }
            EventKind::Out => match self.open.remove(person_id) {
                Some(opened) => working_hours_between(opened, instant),
                None => 0.0,
            },
            EventKind::Other(_) => 0.0,
        }
    }

    /// Sessions still open (check-ins with no matching check-out)
    pub fn open_count(&self) -> usize {
        self.open.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_common::time::parse_provider_timestamp;

    fn at(ts: &str) -> DateTime<Utc> {
        parse_provider_timestamp(ts).unwrap()
    }

    #[test]
    fn test_in_then_out_computes_hours() {
        let mut pairer = SessionPairer::new();
        assert_eq!(
            pairer.observe("p1", &EventKind::In, at("2024-01-01T08:00:00Z")),
            0.0
        );
        let hours = pairer.observe("p1", &EventKind::Out, at("2024-01-01T16:30:00Z"));
        assert!((hours - 8.5).abs() < 1e-9);
        assert_eq!(pairer.open_count(), 0);
    }

    #[test]
    fn test_out_without_in_yields_zero() {
        let mut pairer = SessionPairer::new();
        assert_eq!(
            pairer.observe("p1", &EventKind::Out, at("2024-01-01T16:00:00Z")),
            0.0
        );
    }

    #[test]
    fn test_double_in_last_wins() {
        let mut pairer = SessionPairer::new();
        pairer.observe("p1", &EventKind::In, at("2024-01-01T08:00:00Z"));
        pairer.observe("p1", &EventKind::In, at("2024-01-01T09:00:00Z"));
        let hours = pairer.observe("p1", &EventKind::Out, at("2024-01-01T17:00:00Z"));
        assert!((hours - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_clears_open_slot() {
        let mut pairer = SessionPairer::new();
        pairer.observe("p1", &EventKind::In, at("2024-01-01T08:00:00Z"));
        pairer.observe("p1", &EventKind::Out, at("2024-01-01T12:00:00Z"));
        // Second Out pairs with nothing
        assert_eq!(
            pairer.observe("p1", &EventKind::Out, at("2024-01-01T13:00:00Z")),
            0.0
        );
    }

    #[test]
    fn test_people_are_independent() {
        let mut pairer = SessionPairer::new();
        pairer.observe("p1", &EventKind::In, at("2024-01-01T08:00:00Z"));
        pairer.observe("p2", &EventKind::In, at("2024-01-01T09:00:00Z"));

        let p2 = pairer.observe("p2", &EventKind::Out, at("2024-01-01T12:00:00Z"));
        assert!((p2 - 3.0).abs() < 1e-9);
        assert_eq!(pairer.open_count(), 1);

        let p1 = pairer.observe("p1", &EventKind::Out, at("2024-01-01T16:00:00Z"));
        assert!((p1 - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_other_kind_does_not_touch_state() {
        let mut pairer = SessionPairer::new();
        pairer.observe("p1", &EventKind::In, at("2024-01-01T08:00:00Z"));
        pairer.observe(
            "p1",
            &EventKind::Other("Break".to_string()),
            at("2024-01-01T10:00:00Z"),
        );
        let hours = pairer.observe("p1", &EventKind::Out, at("2024-01-01T16:00:00Z"));
        assert!((hours - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_hours_match_direct_float_difference() {
        let mut pairer = SessionPairer::new();
        let t_in = at("2024-01-01T09:17:23Z");
        let t_out = at("2024-01-01T18:02:41Z");
        pairer.observe("p1", &EventKind::In, t_in);
        let hours = pairer.observe("p1", &EventKind::Out, t_out);
        let expected = (t_out.timestamp() - t_in.timestamp()) as f64 / 3600.0;
        assert!((hours - expected).abs() < 1e-9);
    }
}
