use crate::normalizer::{fold, list_contains};
use serde::Deserialize;

/// Static per-brand override lists, loaded once with the configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrandRules {
    /// Brands too generic to be trusted as a match.
    #[serde(default)]
    pub ignore_list: Vec<String>,
    /// Brands matched case-sensitively, written in their exact casing.
    #[serde(default)]
    pub case_sensitive: Vec<String>,
    /// Brands that only count as the first word of a title.
    #[serde(default)]
    pub first_word: Vec<String>,
    /// Brands that only count as the first or second word of a title.
    #[serde(default)]
    pub first_or_second_word: Vec<String>,
}

impl BrandRules {
    pub fn is_ignored(&self, brand: &str) -> bool {
        list_contains(&self.ignore_list, brand)
    }

    /// Exact-casing literal for a brand listed as case-sensitive.
    pub fn case_sensitive_literal(&self, brand: &str) -> Option<&str> {
        let folded = fold(brand);
        self.case_sensitive
            .iter()
            .find(|entry| fold(entry) == folded)
            .map(String::as_str)
    }

    pub fn is_first_word(&self, brand: &str) -> bool {
        list_contains(&self.first_word, brand)
    }

    pub fn is_first_or_second_word(&self, brand: &str) -> bool {
        list_contains(&self.first_or_second_word, brand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_are_case_insensitive() {
        let rules = BrandRules {
            ignore_list: vec!["Kita".into()],
            case_sensitive: vec!["MAX".into()],
            first_word: vec!["always".into()],
            first_or_second_word: vec![],
        };
        assert!(rules.is_ignored("KITA"));
        assert_eq!(rules.case_sensitive_literal("max"), Some("MAX"));
        assert_eq!(rules.case_sensitive_literal("nivea"), None);
        assert!(rules.is_first_word("Always"));
        assert!(!rules.is_first_or_second_word("always"));
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let rules: BrandRules = serde_json::from_str(r#"{ "first_word": ["always"] }"#).unwrap();
        assert!(rules.ignore_list.is_empty());
        assert!(rules.is_first_word("always"));
    }
}
