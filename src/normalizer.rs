// Text folding shared by the brand graph and the title matcher
use unicode_normalization::UnicodeNormalization;

/// Decomposes accented characters and drops combining diacritical marks (U+0300..U+036F),
/// so "Ácido" becomes "Acido".
pub fn strip_diacritics(text: &str) -> String {
    text.nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect()
}

/// Diacritic-free, lower-cased form used for list lookups.
pub fn fold(text: &str) -> String {
    strip_diacritics(text).to_lowercase()
}

/// Case- and accent-insensitive membership test against a configured list.
pub fn list_contains(list: &[String], brand: &str) -> bool {
    let folded = fold(brand);
    list.iter().any(|entry| fold(entry) == folded)
}
