//! Timestamp and quota-period utilities

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Derive the quota period key (`YYYY-MM`) for a timestamp.
///
/// Quota records are keyed by calendar month; periods do not roll over
/// automatically. A new month simply has no record until one is seeded.
pub fn month_key(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m").to_string()
}

/// Period key for the current wall-clock month
pub fn current_month_key() -> String {
    month_key(now())
}
