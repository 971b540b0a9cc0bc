// Title/brand presence heuristics.

pub mod pattern;
pub mod rules;

pub use pattern::BrandPattern;
pub use rules::BrandRules;

use crate::model::PatternError;
use crate::normalizer::strip_diacritics;
use tracing::warn;

/// Decides whether a brand is mentioned in a title as a standalone brand.
pub trait Matcher {
    fn is_brand_present(&self, title: &str, brand: &str, prioritize_beginning: bool) -> bool;
}

/// Matcher driven by the configured per-brand override lists.
#[derive(Debug, Clone, Default)]
pub struct TitleBrandMatcher {
    rules: BrandRules,
}

impl TitleBrandMatcher {
    pub fn new(rules: BrandRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &BrandRules {
        &self.rules
    }

    /// Compiles the patterns for one brand so they can be reused across titles.
    pub fn compile(&self, brand: &str) -> Result<BrandPattern, PatternError> {
        BrandPattern::compile(brand, &self.rules)
    }
}

impl Matcher for TitleBrandMatcher {
    fn is_brand_present(&self, title: &str, brand: &str, prioritize_beginning: bool) -> bool {
        match self.compile(brand) {
            Ok(pattern) => pattern.is_present(&strip_diacritics(title), prioritize_beginning),
            Err(e) => {
                warn!("{}", e);
                false
            }
        }
    }
}
