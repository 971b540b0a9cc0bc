use crate::brands::EquivalenceClasses;
use crate::matcher::{BrandPattern, TitleBrandMatcher};
use crate::model::{CandidateRecord, MatchResult, RunSummary};
use crate::normalizer::strip_diacritics;
use tracing::{debug, warn};

/// Trait defining the interface for a brand assigner.
pub trait Assigner: Send + Sync {
    /// Returns `None` for records already resolved upstream.
    fn assign(&self, record: &CandidateRecord) -> Option<MatchResult>;

    fn assign_all(&self, records: &[CandidateRecord]) -> (Vec<MatchResult>, RunSummary) {
        let mut summary = RunSummary::default();
        let mut results = Vec::with_capacity(records.len());

        for record in records {
            summary.processed += 1;
            match self.assign(record) {
                Some(result) => {
                    if result.is_empty() {
                        summary.unmatched += 1;
                    } else {
                        summary.matched += 1;
                    }
                    results.push(result);
                }
                None => summary.skipped += 1,
            }
        }

        (results, summary)
    }
}

struct CompiledClass {
    key: String,
    synonyms: Vec<BrandPattern>,
}

/// Scans every brand equivalence class against each record title.
///
/// Classes are taken once per connected component (see
/// [`EquivalenceClasses::components`]) and their synonyms are compiled up
/// front, so one instance can be shared read-only between workers.
pub struct BrandAssigner {
    classes: Vec<CompiledClass>,
}

impl BrandAssigner {
    pub fn new(classes: &EquivalenceClasses, matcher: &TitleBrandMatcher) -> Self {
        let rules = matcher.rules();
        let compiled = classes
            .components()
            .map(|(key, members)| {
                let synonyms = members
                    .iter()
                    .filter(|brand| !rules.is_ignored(brand))
                    .filter_map(|brand| match matcher.compile(brand) {
                        Ok(pattern) => Some(pattern),
                        Err(e) => {
                            warn!("Skipping brand: {}", e);
                            None
                        }
                    })
                    .collect();
                CompiledClass {
                    key: key.to_string(),
                    synonyms,
                }
            })
            .collect();

        Self { classes: compiled }
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }
}

impl Assigner for BrandAssigner {
    fn assign(&self, record: &CandidateRecord) -> Option<MatchResult> {
        if record.is_resolved() {
            return None;
        }

        let title = strip_diacritics(&record.title);
        let mut result = MatchResult::new(&record.source_id);

        for class in &self.classes {
            for synonym in &class.synonyms {
                // once two brands matched, prefer title-start mentions
                let prioritize_beginning = result.len() > 1;
                if synonym.is_present(&title, prioritize_beginning) {
                    result.insert(&class.key);
                    break;
                }
            }
        }

        debug!("{} -> {}", record.title, result.matched_brand_keys.join(", "));
        Some(result)
    }
}
