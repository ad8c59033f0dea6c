//! Analysis record model

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// A stored vehicle-listing analysis
///
/// Only the columns the service filters or sorts on are typed; every other
/// column is kept in `fields` and echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Unique, stable identifier (numeric keys are read as strings)
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Lifecycle status
    pub status: AnalysisStatus,
    /// Creation time, the listing sort key. Timestamps without an offset
    /// are read as UTC; a null or missing value sorts after all others.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    /// Remaining columns, opaque to the service
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl AnalysisRecord {
    pub fn new(
        id: impl Into<String>,
        status: AnalysisStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            status,
            created_at: Some(created_at),
            fields: serde_json::Map::new(),
        }
    }

    /// Attach an extra column
    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Listing order: `created_at` descending with missing timestamps last,
    /// ties broken by `id` ascending
    pub fn newest_first(a: &Self, b: &Self) -> Ordering {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    }
}

/// Record lifecycle status
///
/// Unknown values are preserved in `Other` so records round-trip untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnalysisStatus {
    /// Shown in listings
    Active,
    Deleted,
    Archived,
    Other(String),
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AnalysisStatus::Active => "active",
            AnalysisStatus::Deleted => "deleted",
            AnalysisStatus::Archived => "archived",
            AnalysisStatus::Other(s) => s,
        }
    }
}

impl From<String> for AnalysisStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "active" => AnalysisStatus::Active,
            "deleted" => AnalysisStatus::Deleted,
            "archived" => AnalysisStatus::Archived,
            _ => AnalysisStatus::Other(s),
        }
    }
}

impl From<&str> for AnalysisStatus {
    fn from(s: &str) -> Self {
        AnalysisStatus::from(s.to_string())
    }
}

impl From<AnalysisStatus> for String {
    fn from(status: AnalysisStatus) -> Self {
        match status {
            AnalysisStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse an RFC 3339 timestamp, or a naive one (taken as UTC)
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    parse_timestamp(&raw)
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("invalid timestamp '{}'", raw)))
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Str(String),
        Int(i64),
        Uint(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Str(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Uint(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_deserialize_keeps_extra_columns() {
        let record: AnalysisRecord = serde_json::from_value(json!({
            "id": "a1",
            "status": "active",
            "created_at": "2024-03-01T12:00:00+00:00",
            "listing_url": "https://example.com/car/1",
            "score": 7.5
        }))
        .unwrap();

        assert_eq!(record.id, "a1");
        assert_eq!(record.status, AnalysisStatus::Active);
        assert_eq!(
            record.created_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
        );
        assert_eq!(record.fields["listing_url"], "https://example.com/car/1");

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["score"], 7.5);
        assert_eq!(back["status"], "active");
    }

    #[test]
    fn test_numeric_id_is_read_as_string() {
        let record: AnalysisRecord = serde_json::from_value(json!({
            "id": 42,
            "status": "deleted",
            "created_at": "2024-03-01T12:00:00Z"
        }))
        .unwrap();
        assert_eq!(record.id, "42");
        assert_eq!(record.status, AnalysisStatus::Deleted);
    }

    #[test]
    fn test_unknown_status_round_trips() {
        let status: AnalysisStatus = serde_json::from_value(json!("pending_review")).unwrap();
        assert_eq!(status, AnalysisStatus::Other("pending_review".to_string()));
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("pending_review"));
    }

    #[test]
    fn test_naive_and_null_timestamps() {
        let naive: AnalysisRecord = serde_json::from_value(json!({
            "id": "a1",
            "status": "active",
            "created_at": "2024-01-02T08:15:30.250"
        }))
        .unwrap();
        assert_eq!(
            naive.created_at,
            Some(
                Utc.with_ymd_and_hms(2024, 1, 2, 8, 15, 30).unwrap()
                    + chrono::Duration::milliseconds(250)
            )
        );

        let spaced: AnalysisRecord = serde_json::from_value(json!({
            "id": "a2",
            "status": "active",
            "created_at": "2024-01-02 00:00:00"
        }))
        .unwrap();
        assert_eq!(
            spaced.created_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
        );

        let null: AnalysisRecord =
            serde_json::from_value(json!({ "id": "a3", "status": "active", "created_at": null }))
                .unwrap();
        assert_eq!(null.created_at, None);

        let missing: AnalysisRecord =
            serde_json::from_value(json!({ "id": "a4", "status": "active" })).unwrap();
        assert_eq!(missing.created_at, None);
        assert!(!missing.fields.contains_key("created_at"));

        assert!(serde_json::from_value::<AnalysisRecord>(json!({
            "id": "a5",
            "status": "active",
            "created_at": "yesterday"
        }))
        .is_err());
    }

    #[test]
    fn test_missing_timestamp_sorts_last() {
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut undated = AnalysisRecord::new("a", AnalysisStatus::Active, t1);
        undated.created_at = None;

        let mut records = vec![undated, AnalysisRecord::new("b", AnalysisStatus::Active, t1)];
        records.sort_by(AnalysisRecord::newest_first);

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_newest_first_breaks_ties_by_id() {
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();

        let mut records = vec![
            AnalysisRecord::new("b", AnalysisStatus::Active, t1),
            AnalysisRecord::new("c", AnalysisStatus::Active, t2),
            AnalysisRecord::new("a", AnalysisStatus::Active, t1),
        ];
        records.sort_by(AnalysisRecord::newest_first);

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }
}
