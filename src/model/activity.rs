// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Wirework-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirework and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Externally supplied usage data and recent-contact records.
//!
//! Both shapes arrive as JSON from the surrounding editor; parsing happens
//! once at the boundary so the rest of the engine only sees typed keys.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use super::edge::EdgeKey;
use super::ids::ContactId;

/// Per-edge usage counts, keyed by `source:target` in the raw payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityData {
    segments: BTreeMap<EdgeKey, u64>,
}

impl ActivityData {
    pub fn new(segments: BTreeMap<EdgeKey, u64>) -> Self {
        Self { segments }
    }

    /// Parses the editor's activity payload: `{"segments": {"exit:target": n}}`.
    ///
    /// Keys that do not parse as an edge key are skipped rather than rejected;
    /// the payload routinely contains segments for elements this engine never
    /// registered.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ActivityDataError> {
        let raw = RawActivity::deserialize(value).map_err(ActivityDataError::shape)?;
        let mut segments = BTreeMap::new();
        for (key, count) in raw.segments {
            if let Ok(key) = key.parse::<EdgeKey>() {
                segments.insert(key, count);
            }
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &BTreeMap<EdgeKey, u64> {
        &self.segments
    }

    pub fn count(&self, key: &EdgeKey) -> u64 {
        self.segments.get(key).copied().unwrap_or(0)
    }
}

#[derive(Debug, Deserialize)]
struct RawActivity {
    #[serde(default)]
    segments: BTreeMap<String, u64>,
}

/// One visitor that recently traversed an edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactVisit {
    contact: ContactId,
    name: Option<String>,
    operand: Option<String>,
    time_ms: Option<i64>,
}

impl ContactVisit {
    pub fn new(
        contact: ContactId,
        name: Option<String>,
        operand: Option<String>,
        time_ms: Option<i64>,
    ) -> Self {
        Self { contact, name, operand, time_ms }
    }

    pub fn contact(&self) -> &ContactId {
        &self.contact
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn operand(&self) -> Option<&str> {
        self.operand.as_deref()
    }

    pub fn time_ms(&self) -> Option<i64> {
        self.time_ms
    }
}

/// Parses a recent-contacts response body.
///
/// The endpoint historically returned a bare array and later moved to a
/// paginated `{"results": [...]}` envelope; both are accepted. Records whose
/// contact identity fails id validation are dropped.
pub fn parse_recent_contacts(body: &str) -> Result<Vec<ContactVisit>, ActivityDataError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|err| ActivityDataError::Json(err.to_string()))?;
    let rows = match &value {
        serde_json::Value::Array(_) => Vec::<RawVisit>::deserialize(&value),
        _ => RawResults::deserialize(&value).map(|r| r.results),
    }
    .map_err(ActivityDataError::shape)?;

    let mut visits = Vec::with_capacity(rows.len());
    for row in rows {
        let Ok(contact) = ContactId::new(row.contact.uuid) else {
            continue;
        };
        visits.push(ContactVisit {
            contact,
            name: row.contact.name,
            operand: row.operand,
            time_ms: row.time,
        });
    }
    Ok(visits)
}

#[derive(Debug, Deserialize)]
struct RawResults {
    #[serde(default)]
    results: Vec<RawVisit>,
}

#[derive(Debug, Deserialize)]
struct RawVisit {
    contact: RawContact,
    #[serde(default)]
    operand: Option<String>,
    #[serde(default)]
    time: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawContact {
    uuid: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityDataError {
    Json(String),
    Shape(String),
}

impl ActivityDataError {
    fn shape(err: impl fmt::Display) -> Self {
        Self::Shape(err.to_string())
    }
}

impl fmt::Display for ActivityDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "activity payload is not valid JSON: {msg}"),
            Self::Shape(msg) => write!(f, "activity payload has unexpected shape: {msg}"),
        }
    }
}

impl std::error::Error for ActivityDataError {}

#[cfg(test)]
mod tests {
    use super::{parse_recent_contacts, ActivityData};

    #[test]
    fn activity_data_skips_malformed_segment_keys() {
        let value = serde_json::json!({
            "segments": {
                "exit-1:node-2": 12,
                "not-an-edge-key": 3,
                "too:many:colons": 4,
            }
        });
        let data = ActivityData::from_json(&value).expect("activity");
        assert_eq!(data.segments().len(), 1);
        let key = "exit-1:node-2".parse().expect("key");
        assert_eq!(data.count(&key), 12);
    }

    #[test]
    fn activity_data_defaults_missing_segments() {
        let data = ActivityData::from_json(&serde_json::json!({})).expect("activity");
        assert!(data.segments().is_empty());
    }

    #[test]
    fn recent_contacts_accepts_bare_array() {
        let body = r#"[{"contact": {"uuid": "c1", "name": "Ann"}, "operand": "yes", "time": 5}]"#;
        let visits = parse_recent_contacts(body).expect("visits");
        assert_eq!(visits.len(), 1);
        assert_eq!(visits[0].contact().as_str(), "c1");
        assert_eq!(visits[0].name(), Some("Ann"));
        assert_eq!(visits[0].operand(), Some("yes"));
        assert_eq!(visits[0].time_ms(), Some(5));
    }

    #[test]
    fn recent_contacts_accepts_results_envelope() {
        let body = r#"{"results": [{"contact": {"uuid": "c2"}}]}"#;
        let visits = parse_recent_contacts(body).expect("visits");
        assert_eq!(visits.len(), 1);
        assert_eq!(visits[0].contact().as_str(), "c2");
        assert_eq!(visits[0].name(), None);
    }

    #[test]
    fn recent_contacts_drops_invalid_contact_ids() {
        let body = r#"[{"contact": {"uuid": "has space"}}, {"contact": {"uuid": "ok"}}]"#;
        let visits = parse_recent_contacts(body).expect("visits");
        assert_eq!(visits.len(), 1);
        assert_eq!(visits[0].contact().as_str(), "ok");
    }
}
