use super::rules::BrandRules;
use crate::model::PatternError;
use crate::normalizer::{fold, strip_diacritics};
use regex::{Regex, RegexBuilder};

/// Where a brand is allowed to appear in a title.
#[derive(Debug, Clone)]
pub enum Placement {
    FirstWord,
    FirstOrSecondWord { second: Regex },
    /// Whole word anywhere, or whitespace-delimited at the start or end.
    Anywhere { word: Regex, edges: Regex },
}

/// Precompiled presence test for a single brand.
#[derive(Debug, Clone)]
pub struct BrandPattern {
    case_sensitive: bool,
    beginning: Regex,
    placement: Placement,
}

impl BrandPattern {
    pub fn compile(brand: &str, rules: &BrandRules) -> Result<Self, PatternError> {
        let normalized = strip_diacritics(brand);
        let (literal, case_sensitive) = match rules.case_sensitive_literal(&normalized) {
            Some(exact) => (regex::escape(&strip_diacritics(exact)), true),
            None => (regex::escape(&normalized), false),
        };

        let build = |pattern: String| {
            RegexBuilder::new(&pattern)
                .case_insensitive(!case_sensitive)
                .build()
                .map_err(|source| PatternError::Compile {
                    brand: brand.to_string(),
                    source,
                })
        };

        let beginning = build(format!(r"^{literal}\s*"))?;
        let folded = fold(&normalized);
        let placement = if rules.is_first_word(&folded) {
            Placement::FirstWord
        } else if rules.is_first_or_second_word(&folded) {
            Placement::FirstOrSecondWord {
                second: build(format!(r"^\S+\s+{literal}\s*"))?,
            }
        } else {
            Placement::Anywhere {
                word: build(format!(r"\b{literal}\b"))?,
                edges: build(format!(r"^(?:{literal}\s|.*\s{literal}\s.*|.*\s{literal})$"))?,
            }
        };

        Ok(Self {
            case_sensitive,
            beginning,
            placement,
        })
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// `title` must already be diacritic-free (see [`strip_diacritics`]).
    pub fn is_present(&self, title: &str, prioritize_beginning: bool) -> bool {
        let at_beginning = self.beginning.is_match(title);
        if prioritize_beginning && at_beginning {
            return true;
        }

        match &self.placement {
            Placement::FirstWord => at_beginning,
            Placement::FirstOrSecondWord { second } => at_beginning || second.is_match(title),
            Placement::Anywhere { word, edges } => word.is_match(title) || edges.is_match(title),
        }
    }
}
