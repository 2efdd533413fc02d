//! Timestamp helpers.

use chrono::{Local, TimeZone, Utc};

use crate::error::{Error, Result};

/// ANSI SQL timestamp literal for a unix timestamp, rendered in the local
/// timezone: `(TIMESTAMP'2013-05-02 10:57:08')`.
pub fn ansi_sql_timestamp(unix_timestamp: i64) -> Result<String> {
    let datetime = Local
        .timestamp_opt(unix_timestamp, 0)
        .single()
        .ok_or_else(|| {
            Error::validation_invalid_argument(
                "unixTimestamp",
                format!("{} is not a representable timestamp", unix_timestamp),
                None,
                None,
            )
        })?;

    Ok(format!("(TIMESTAMP'{}')", datetime.format("%Y-%m-%d %H:%M:%S")))
}

/// Current unix time in milliseconds.
pub fn in_millis() -> i64 {
    Utc::now().timestamp_millis()
}
