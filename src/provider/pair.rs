//! Language pair keys.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Trim and lower-case a language code.
pub fn normalize_lang(lang: &str) -> String {
    lang.trim().to_lowercase()
}

/// An ordered (source, target) pair of normalized language codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LanguagePair {
    pub source_lang: String,
    pub target_lang: String,
}

impl LanguagePair {
    /// Build a pair, normalizing both codes.
    pub fn new(source_lang: &str, target_lang: &str) -> Self {
        Self {
            source_lang: normalize_lang(source_lang),
            target_lang: normalize_lang(target_lang),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.source_lang == self.target_lang
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.source_lang, self.target_lang)
    }
}

/// Render pairs as lexicographically sorted, comma-joined `src->tgt` tokens.
pub fn format_pairs<'a>(pairs: impl IntoIterator<Item = &'a LanguagePair>) -> String {
    let mut tokens: Vec<String> = pairs.into_iter().map(ToString::to_string).collect();
    tokens.sort();
    tokens.dedup();
    tokens.join(", ")
}

/// Group pairs into source → sorted targets, for pickers that choose the
/// source first.
pub fn group_by_source<'a>(
    pairs: impl IntoIterator<Item = &'a LanguagePair>,
) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for pair in pairs {
        grouped
            .entry(pair.source_lang.clone())
            .or_default()
            .push(pair.target_lang.clone());
    }
    for targets in grouped.values_mut() {
        targets.sort();
        targets.dedup();
    }
    grouped
}
