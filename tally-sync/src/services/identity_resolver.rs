//! Identity resolution
//!
//! Maps an external event's provider-side identity (email, display name)
//! to at most one internal employee id. Lookup tables are built fresh from
//! a point-in-time directory snapshot at the start of each run; nothing is
//! cached across runs.

use crate::db::employees::DirectoryEntry;
use crate::models::ExternalEvent;
use std::collections::{HashMap, HashSet};

/// Result of resolving one event's identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Exactly one directory match
    Matched(String),

    /// The fallback name matches more than one directory entry; the event
    /// is skipped rather than silently resolved to one of them
    Ambiguous(String),

    /// Neither email nor name matched anything
    NoMatch,
}

/// Lookup tables derived from the employee directory
#[derive(Debug, Default)]
pub struct IdentityTables {
    /// login email -> internal id
    email_to_id: HashMap<String, String>,

    /// normalized (lowercase, trimmed) display name -> internal id
    name_to_id: HashMap<String, String>,

    /// internal id -> login email, for record email fallback
    id_to_email: HashMap<String, String>,

    /// Normalized names shared by more than one directory entry.
    /// Source data quality issue; such names never resolve.
    ambiguous_names: HashSet<String>,
}

impl IdentityTables {
    /// Build the lookup tables from a directory snapshot.
    ///
    /// Map content is deterministic (last entry wins) but a name claimed
    /// by multiple distinct employees lands in `ambiguous_names` and is
    /// never consulted for matching.
    pub fn build(entries: &[DirectoryEntry]) -> Self {
        let mut tables = IdentityTables::default();

        for entry in entries {
            if let Some(email) = &entry.login_email {
                tables
                    .email_to_id
                    .insert(email.clone(), entry.internal_id.clone());
                tables
                    .id_to_email
                    .insert(entry.internal_id.clone(), email.clone());
            }

            let name = normalize_name(&entry.display_name);
            if name.is_empty() {
                continue;
            }
            if let Some(existing) = tables.name_to_id.get(&name) {
                if existing != &entry.internal_id {
                    tables.ambiguous_names.insert(name.clone());
                }
            }
            tables.name_to_id.insert(name, entry.internal_id.clone());
        }

        tracing::debug!(
            emails = tables.email_to_id.len(),
            names = tables.name_to_id.len(),
            ambiguous = tables.ambiguous_names.len(),
            "Identity tables built"
        );

        tables
    }

    /// Resolve one event to an internal employee id.
    ///
    /// Email match always takes priority over name match, since names are
    /// not guaranteed unique.
    pub fn resolve(&self, event: &ExternalEvent) -> Resolution {
        if let Some(email) = &event.resolved_email {
            if let Some(id) = self.email_to_id.get(email) {
                return Resolution::Matched(id.clone());
            }
        }

        if let Some(name) = &event.fallback_name {
            let key = normalize_name(name);
            if self.ambiguous_names.contains(&key) {
                return Resolution::Ambiguous(key);
            }
            if let Some(id) = self.name_to_id.get(&key) {
                return Resolution::Matched(id.clone());
            }
        }

        Resolution::NoMatch
    }

    /// Directory login email for an employee (record email fallback)
    pub fn fallback_email(&self, employee_id: &str) -> Option<&str> {
        self.id_to_email.get(employee_id).map(String::as_str)
    }
}

/// Normalization applied to display names on both sides of the match
fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventKind;

    fn entry(id: &str, email: Option<&str>, name: &str) -> DirectoryEntry {
        DirectoryEntry {
            internal_id: id.to_string(),
            login_email: email.map(str::to_string),
            display_name: name.to_string(),
        }
    }

    fn event(email: Option<&str>, name: Option<&str>) -> ExternalEvent {
        ExternalEvent {
            person_id: "p1".to_string(),
            kind: EventKind::In,
            time: "2024-01-01T08:00:00Z".to_string(),
            coordinates: None,
            resolved_email: email.map(str::to_string),
            fallback_name: name.map(str::to_string),
        }
    }

    #[test]
    fn test_email_match() {
        let tables = IdentityTables::build(&[entry("EMP1", Some("a@x.com"), "Alice Ahmed")]);
        assert_eq!(
            tables.resolve(&event(Some("a@x.com"), None)),
            Resolution::Matched("EMP1".to_string())
        );
    }

    #[test]
    fn test_name_fallback_on_email_miss() {
        let tables = IdentityTables::build(&[entry("EMP1", Some("a@x.com"), "Alice Ahmed")]);
        assert_eq!(
            tables.resolve(&event(Some("other@x.com"), Some("alice ahmed"))),
            Resolution::Matched("EMP1".to_string())
        );
    }

    #[test]
    fn test_name_normalization() {
        let tables = IdentityTables::build(&[entry("EMP1", None, "  Alice Ahmed  ")]);
        assert_eq!(
            tables.resolve(&event(None, Some("ALICE AHMED"))),
            Resolution::Matched("EMP1".to_string())
        );
    }

    #[test]
    fn test_email_priority_over_name() {
        let tables = IdentityTables::build(&[
            entry("EMP1", Some("a@x.com"), "Same Name"),
            entry("EMP2", Some("b@x.com"), "Other Name"),
        ]);
        // Email points at EMP2 even though the name points at EMP1
        assert_eq!(
            tables.resolve(&event(Some("b@x.com"), Some("same name"))),
            Resolution::Matched("EMP2".to_string())
        );
    }

    #[test]
    fn test_no_match() {
        let tables = IdentityTables::build(&[entry("EMP1", Some("a@x.com"), "Alice Ahmed")]);
        assert_eq!(
            tables.resolve(&event(Some("nobody@x.com"), Some("nobody"))),
            Resolution::NoMatch
        );
        assert_eq!(tables.resolve(&event(None, None)), Resolution::NoMatch);
    }

    #[test]
    fn test_duplicate_names_are_ambiguous() {
        let tables = IdentityTables::build(&[
            entry("EMP1", None, "Mohamed Ali"),
            entry("EMP2", None, "mohamed ali"),
        ]);
        assert_eq!(
            tables.resolve(&event(None, Some("Mohamed Ali"))),
            Resolution::Ambiguous("mohamed ali".to_string())
        );
    }

    #[test]
    fn test_same_employee_listed_twice_is_not_ambiguous() {
        let tables = IdentityTables::build(&[
            entry("EMP1", None, "Alice Ahmed"),
            entry("EMP1", Some("a@x.com"), "Alice Ahmed"),
        ]);
        assert_eq!(
            tables.resolve(&event(None, Some("alice ahmed"))),
            Resolution::Matched("EMP1".to_string())
        );
    }

    #[test]
    fn test_ambiguous_name_still_resolves_by_email() {
        let tables = IdentityTables::build(&[
            entry("EMP1", Some("a@x.com"), "Mohamed Ali"),
            entry("EMP2", Some("b@x.com"), "Mohamed Ali"),
        ]);
        assert_eq!(
            tables.resolve(&event(Some("a@x.com"), Some("mohamed ali"))),
            Resolution::Matched("EMP1".to_string())
        );
    }

    #[test]
    fn test_fallback_email() {
        let tables = IdentityTables::build(&[entry("EMP1", Some("a@x.com"), "Alice Ahmed")]);
        assert_eq!(tables.fallback_email("EMP1"), Some("a@x.com"));
        assert_eq!(tables.fallback_email("EMP2"), None);
    }
}
