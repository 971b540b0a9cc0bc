// Core structs: BrandConnection, CandidateRecord, MatchResult, BrandAssignment
use crate::normalizer::list_contains;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw observation that `primary` co-occurs with each of `related`.
/// Values are lower-cased and trimmed on ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandConnection {
    pub primary: String,
    pub related: Vec<String>,
}

impl BrandConnection {
    pub fn new(primary: &str, related: &[&str]) -> Self {
        Self {
            primary: primary.trim().to_lowercase(),
            related: related
                .iter()
                .map(|b| b.trim().to_lowercase())
                .filter(|b| !b.is_empty())
                .collect(),
        }
    }

    /// Builds a connection from a delimiter-joined list, e.g. `"bepanthen;aspirin"`.
    pub fn from_delimited(primary: &str, related: &str, delimiter: &str) -> Self {
        let parts: Vec<&str> = related.split(delimiter).collect();
        Self::new(primary, &parts)
    }

    /// Removes generic placeholder brands. Returns `None` when the primary itself is generic
    /// or nothing related is left.
    pub fn without_generic(mut self, generic: &[String]) -> Option<Self> {
        let is_generic = |b: &str| list_contains(generic, b);
        if is_generic(&self.primary) {
            return None;
        }
        self.related.retain(|b| !is_generic(b));
        if self.related.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

/// Connection snapshot row: `{ "primary": "bayer", "related": "bepanthen;aspirin" }`.
/// Exports of the matching-validation query name the columns
/// `manufacturer_p1` / `manufacturers_p2`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConnection {
    #[serde(alias = "manufacturer_p1")]
    pub primary: String,
    #[serde(alias = "manufacturers_p2")]
    pub related: String,
}

/// Product record to be enriched with a brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub title: String,
    pub source_id: String,
    #[serde(default, alias = "m_id")]
    pub existing_mapping: Option<String>,
}

impl CandidateRecord {
    pub fn is_resolved(&self) -> bool {
        self.existing_mapping
            .as_deref()
            .is_some_and(|m| !m.trim().is_empty())
    }
}

/// Matched canonical brand keys for one record, in discovery order without duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub source_id: String,
    pub matched_brand_keys: Vec<String>,
}

impl MatchResult {
    pub fn new(source_id: &str) -> Self {
        Self {
            source_id: source_id.to_string(),
            matched_brand_keys: Vec::new(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.matched_brand_keys.iter().any(|k| k == key)
    }

    /// Adds a key unless it is already present.
    pub fn insert(&mut self, key: &str) -> bool {
        if self.contains(key) {
            return false;
        }
        self.matched_brand_keys.push(key.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.matched_brand_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matched_brand_keys.is_empty()
    }

    /// First matched key in class iteration order.
    pub fn primary_brand(&self) -> Option<&str> {
        self.matched_brand_keys.first().map(String::as_str)
    }
}

/// Row written to the assignment table.
#[derive(Debug, Clone, PartialEq)]
pub struct BrandAssignment {
    pub id: String,
    pub source: String,
    pub country_code: String,
    pub source_id: String,
    pub brand: Option<String>,
    pub meta: serde_json::Value,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub skipped: usize,
    pub matched: usize,
    pub unmatched: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("meta encoding error: {0}")]
    Meta(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid snapshot: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("cannot compile pattern for brand '{brand}': {source}")]
    Compile {
        brand: String,
        #[source]
        source: regex::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimited_connection_is_split_trimmed_and_lowercased() {
        let c = BrandConnection::from_delimited("Bayer", " Bepanthen ; ASPIRIN;;", ";");
        assert_eq!(c.primary, "bayer");
        assert_eq!(c.related, vec!["bepanthen", "aspirin"]);
    }

    #[test]
    fn generic_brands_are_dropped() {
        let generic = vec!["kita".to_string()];
        let c = BrandConnection::from_delimited("bayer", "kita;aspirin", ";");
        let c = c.without_generic(&generic).unwrap();
        assert_eq!(c.related, vec!["aspirin"]);

        let only_generic = BrandConnection::from_delimited("bayer", "KITA", ";");
        assert!(only_generic.without_generic(&generic).is_none());
        let generic_primary = BrandConnection::from_delimited("kita", "bayer", ";");
        assert!(generic_primary.without_generic(&generic).is_none());
    }

    #[test]
    fn generic_brands_match_regardless_of_accents_and_case() {
        let generic = vec!["NĖRA".to_string()];
        let c = BrandConnection::from_delimited("bayer", "nėra;aspirin", ";");
        let c = c.without_generic(&generic).unwrap();
        assert_eq!(c.related, vec!["aspirin"]);

        let plain = vec!["nera".to_string()];
        let c = BrandConnection::from_delimited("Nėra", "aspirin", ";");
        assert!(c.without_generic(&plain).is_none());
    }

    #[test]
    fn exported_column_names_are_accepted() {
        let raw: RawConnection = serde_json::from_str(
            r#"{ "manufacturer_p1": "bayer", "manufacturers_p2": "bepanthen;aspirin" }"#,
        )
        .unwrap();
        assert_eq!(raw.primary, "bayer");
        assert_eq!(raw.related, "bepanthen;aspirin");

        let record: CandidateRecord = serde_json::from_str(
            r#"{ "title": "Bepanthen Cream", "source_id": "9", "m_id": "77", "url": "https://x" }"#,
        )
        .unwrap();
        assert_eq!(record.existing_mapping.as_deref(), Some("77"));
        assert!(record.is_resolved());

        let unmapped: CandidateRecord =
            serde_json::from_str(r#"{ "title": "x", "source_id": "1", "m_id": null }"#).unwrap();
        assert!(!unmapped.is_resolved());
    }

    #[test]
    fn blank_existing_mapping_is_not_resolved() {
        let mut r = CandidateRecord {
            title: "x".into(),
            source_id: "1".into(),
            existing_mapping: Some("  ".into()),
        };
        assert!(!r.is_resolved());
        r.existing_mapping = Some("m-1".into());
        assert!(r.is_resolved());
    }

    #[test]
    fn match_result_keeps_first_insertion_order() {
        let mut m = MatchResult::new("1");
        assert!(m.insert("bayer"));
        assert!(m.insert("nivea"));
        assert!(!m.insert("bayer"));
        assert_eq!(m.len(), 2);
        assert_eq!(m.primary_brand(), Some("bayer"));
    }
}
