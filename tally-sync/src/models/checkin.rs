//! Persisted attendance records

use chrono::NaiveDateTime;
use tally_common::time::local_time_string;

/// Direction of a persisted attendance record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogType {
    In,
    Out,
}

impl LogType {
    /// Storage representation (uppercase, part of the dedup key)
    pub fn as_str(&self) -> &'static str {
        match self {
            LogType::In => "IN",
            LogType::Out => "OUT",
        }
    }

}

/// The durable output of a sync pass.
///
/// At most one record exists per (employee_id, local time, log_type);
/// once written a record is never updated (idempotency = skip, not upsert).
#[derive(Debug, Clone)]
pub struct AttendanceRecord {
    /// Internal employee id from the directory
    pub employee_id: String,

    /// Local wall-clock time, second precision
    pub local_time: NaiveDateTime,

    /// IN or OUT
    pub log_type: LogType,

    /// Elapsed working hours (0 for IN records and unpaired OUTs)
    pub working_hours: f64,

    pub latitude: f64,
    pub longitude: f64,

    /// Provider-resolved email, falling back to the directory login email
    pub employee_email: Option<String>,
}

impl AttendanceRecord {
    /// Storage/dedup-key representation of the local timestamp
    pub fn time_string(&self) -> String {
        local_time_string(self.local_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_log_type_storage_form() {
        assert_eq!(LogType::In.as_str(), "IN");
        assert_eq!(LogType::Out.as_str(), "OUT");
    }

    #[test]
    fn test_time_string_second_precision() {
        let record = AttendanceRecord {
            employee_id: "EMP1".to_string(),
            local_time: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            log_type: LogType::In,
            working_hours: 0.0,
            latitude: 0.0,
            longitude: 0.0,
            employee_email: None,
        };
        assert_eq!(record.time_string(), "2024-01-01 10:00:00");
    }
}
