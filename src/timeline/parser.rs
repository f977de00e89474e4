//! Decoding of raw timeline payloads into domain entities.
//!
//! Records are decoded into permissive DTOs first (every field optional) and
//! then converted, so a missing field never fails the whole payload. Only a
//! malformed top-level structure is an error.

use chrono::DateTime;
use serde::Deserialize;

use crate::timeline::types::{Entry, ParseError, User};

/// Remote date format, e.g. `Wed Jan 01 00:00:00 +0000 2020`.
pub const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Raw user record as sent by the remote service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserRecord {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub screen_name: Option<String>,
}

/// Raw post record as sent by the remote service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EntryRecord {
    pub id: Option<i64>,
    pub text: Option<String>,
    pub created_at: Option<String>,
    pub user: Option<UserRecord>,
}

/// Build a `User` from a raw record. Missing fields stay unset.
pub fn parse_user(record: &UserRecord) -> User {
    User {
        id: record.id,
        name: record.name.clone(),
        screen_name: record.screen_name.clone().unwrap_or_default(),
    }
}

/// Build an `Entry` from a raw record.
///
/// An absent or malformed `created_at` yields `timestamp = None`.
pub fn parse_entry(record: &EntryRecord) -> Entry {
    let user = record
        .user
        .as_ref()
        .map(parse_user)
        .unwrap_or_else(|| parse_user(&UserRecord::default()));

    Entry {
        id: record.id,
        text: record.text.clone().unwrap_or_default(),
        user,
        timestamp: record.created_at.as_deref().and_then(parse_created_at),
    }
}

/// Convert a remote date string to seconds since the epoch.
pub fn parse_created_at(raw: &str) -> Option<i64> {
    match DateTime::parse_from_str(raw.trim(), CREATED_AT_FORMAT) {
        Ok(dt) => Some(dt.timestamp()),
        Err(e) => {
            tracing::debug!(created_at = %raw, error = %e, "Unparseable entry date");
            None
        }
    }
}

/// Decode a JSON array of post records.
///
/// A zero-length (or whitespace-only) body is an empty timeline.
pub fn parse_timeline(raw: &[u8]) -> Result<Vec<Entry>, ParseError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let records: Vec<EntryRecord> =
        serde_json::from_slice(raw).map_err(|e| ParseError(e.to_string()))?;

    Ok(records.iter().map(parse_entry).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMELINE: &str = r#"[
        {
            "id": 11,
            "text": "first post",
            "created_at": "Wed Jan 01 00:00:00 +0000 2020",
            "user": {"id": 7, "name": "Matsuo Basho", "screen_name": "basho"}
        },
        {
            "id": 12,
            "text": "second post",
            "created_at": "yesterday-ish",
            "user": {"screen_name": "basho"}
        }
    ]"#;

    #[test]
    fn test_parse_timeline() {
        let entries = parse_timeline(TIMELINE.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].id, Some(11));
        assert_eq!(entries[0].text, "first post");
        assert_eq!(entries[0].timestamp, Some(1_577_836_800));
        assert_eq!(entries[0].user.id, Some(7));
        assert_eq!(entries[0].user.name.as_deref(), Some("Matsuo Basho"));
        assert_eq!(entries[0].user.screen_name, "basho");

        // Bad date is a field-level null, not a failure
        assert_eq!(entries[1].timestamp, None);
        assert_eq!(entries[1].user.id, None);
        assert_eq!(entries[1].user.name, None);
    }

    #[test]
    fn test_parse_created_at_with_offset() {
        // 09:00 at +0900 is midnight UTC
        assert_eq!(
            parse_created_at("Wed Jan 01 09:00:00 +0900 2020"),
            Some(1_577_836_800)
        );
        assert_eq!(parse_created_at(""), None);
    }

    #[test]
    fn test_missing_fields() {
        let entries = parse_timeline(br#"[{}]"#).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, None);
        assert_eq!(entries[0].text, "");
        assert_eq!(entries[0].user.screen_name, "");
        assert_eq!(entries[0].timestamp, None);
    }

    #[test]
    fn test_empty_payloads() {
        assert!(parse_timeline(b"[]").unwrap().is_empty());
        assert!(parse_timeline(b"").unwrap().is_empty());
        assert!(parse_timeline(b"  \n").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_payloads() {
        assert!(parse_timeline(b"{\"error\": \"not found\"}").is_err());
        assert!(parse_timeline(b"[{\"id\": 1,").is_err());
        assert!(parse_timeline(b"<html>").is_err());
    }
}
