/// Records are keyed by human-readable codes (`CUST-00-0001`, `APPT-7`, ...).
pub type RecordId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
