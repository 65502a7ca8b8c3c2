//! Utility functions for identifiers and timestamps

use chrono::{NaiveDateTime, Utc};

use crate::ID_LENGTH;

/// Timestamp layout PostgreSQL uses when rendering `timestamp` columns as JSON
pub const PSQL_DATE_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Generate a new aggregate identifier
///
/// The identifier is the lowercase hex encoding of 12 random bytes, so it is
/// always [`ID_LENGTH`] characters long. Collisions are not checked.
///
/// # Examples
///
/// ```
/// use portal_db_common::{ID_LENGTH, generate_id};
///
/// let id = generate_id();
/// assert_eq!(id.len(), ID_LENGTH);
/// assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
/// ```
pub fn generate_id() -> String {
    let bytes: [u8; ID_LENGTH / 2] = rand::random();
    const_hex::encode(bytes)
}

/// Current wall-clock time as stored in `timestamp without time zone` columns
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Parse a timestamp rendered by PostgreSQL's `row_to_json`
///
/// Empty or unparseable input yields `None`. A trailing UTC offset is
/// tolerated so `timestamptz` columns decode too.
pub fn parse_psql_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    NaiveDateTime::parse_from_str(raw, PSQL_DATE_LAYOUT)
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_utc())
        })
        .or_else(|| {
            chrono::DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%#z")
                .ok()
                .map(|dt| dt.naive_utc())
        })
}
