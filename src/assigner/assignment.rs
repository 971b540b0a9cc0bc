use crate::model::{BrandAssignment, MatchResult};
use chrono::Utc;
use serde_json::json;

/// Stable row id for a catalog item: blake3 of `source_country_sourceId`.
pub fn assignment_id(source: &str, country_code: &str, source_id: &str) -> String {
    let key = format!("{}_{}_{}", source, country_code, source_id);
    blake3::hash(key.as_bytes()).to_hex().to_string()
}

/// Turns a match into the row handed to storage. The meta is tagged with
/// `version_key` so the candidate source skips the item on the next run.
pub fn build_assignment(
    source: &str,
    country_code: &str,
    version_key: &str,
    result: &MatchResult,
) -> BrandAssignment {
    let mut meta = serde_json::Map::new();
    meta.insert(
        version_key.to_string(),
        json!({ "matchedBrands": result.matched_brand_keys }),
    );

    BrandAssignment {
        id: assignment_id(source, country_code, &result.source_id),
        source: source.to_string(),
        country_code: country_code.to_string(),
        source_id: result.source_id.clone(),
        brand: result.primary_brand().map(str::to_string),
        meta: serde_json::Value::Object(meta),
        assigned_at: Utc::now(),
    }
}
