//! Collation keys for locale-aware ordering of deputy and party names.
//!
//! Names arrive in Spanish with mixed case and diacritics ("Álvaro Carter",
//! "Héctor Barría", "Rubén Oyarzo"). A plain byte comparison puts every
//! accented initial after "Z", so sorting compares folded keys instead.
//!
//! # Folding rules
//!
//! - Case: lower-cased (full Unicode lower-casing)
//! - Diacritics: canonical decomposition (NFD), combining marks dropped, so
//!   precomposed and decomposed spellings share one key
//! - Stroked letters with no decomposition: ø→o, ł→l, đ→d, ħ→h
//! - Surrounding whitespace: trimmed

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Fold a display string into its primary collation key.
///
/// Input: "  Álvaro Carter "
/// Output: "alvaro carter"
pub fn collation_key(s: &str) -> String {
    s.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(fold_stroke)
        .collect()
}

/// Compare two strings the way a Spanish-locale `localeCompare` would order
/// them for display.
///
/// Primary level: folded keys. Strings that fold to the same key are ordered
/// by their raw text so the comparison stays a total order.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn fold_stroke(c: char) -> char {
    match c {
        'ø' => 'o',
        'ł' => 'l',
        'đ' => 'd',
        'ħ' => 'h',
        other => other,
    }
}
