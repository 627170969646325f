use chrono::Utc;

/// Local wall-clock time as UNIX epoch milliseconds.
/// Token expiry is always computed relative to this clock, never taken
/// from the provider as an absolute timestamp.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
