use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-language text for one diagnostic bit.
///
/// Maps language code (`en-GB`, `sv-SE`, ...) to the description string.
/// An *absent* language is distinct from an empty string: absence means
/// the document carries no `LocalizedComment` for that language at all.
/// Backed by a `BTreeMap` so iteration order is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitText(BTreeMap<String, String>);

impl BitText {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text for a language, or `None` when no entry exists.
    #[must_use]
    pub fn get(&self, lang: &str) -> Option<&str> {
        self.0.get(lang).map(String::as_str)
    }

    /// Text for a language, defaulting to empty when absent. The
    /// classifier compares in this shape: a missing side reads as "".
    #[must_use]
    pub fn get_or_empty(&self, lang: &str) -> &str {
        self.get(lang).unwrap_or("")
    }

    pub fn set(&mut self, lang: impl Into<String>, text: impl Into<String>) {
        self.0.insert(lang.into(), text.into());
    }

    #[must_use]
    pub fn contains_lang(&self, lang: &str) -> bool {
        self.0.contains_key(lang)
    }

    /// Language codes present in this entry.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// (language, text) pairs in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(l, t)| (l.as_str(), t.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when at least one language carries non-empty text.
    #[must_use]
    pub fn has_any_text(&self) -> bool {
        self.0.values().any(|t| !t.is_empty())
    }
}

impl<L: Into<String>, T: Into<String>> FromIterator<(L, T)> for BitText {
    fn from_iter<I: IntoIterator<Item = (L, T)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(l, t)| (l.into(), t.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_is_not_empty() {
        let mut text = BitText::new();
        text.set("en-GB", "");
        assert!(text.contains_lang("en-GB"));
        assert!(!text.contains_lang("sv-SE"));
        assert_eq!(text.get_or_empty("sv-SE"), "");
        assert!(!text.has_any_text());
    }

    #[test]
    fn has_any_text_sees_one_language() {
        let text: BitText = [("en-GB", "UF_03 Sensor fault"), ("sv-SE", "")]
            .into_iter()
            .collect();
        assert!(text.has_any_text());
    }

    #[test]
    fn languages_iterate_sorted() {
        let text: BitText = [("sv-SE", "b"), ("en-GB", "a")].into_iter().collect();
        let langs: Vec<_> = text.languages().collect();
        assert_eq!(langs, vec!["en-GB", "sv-SE"]);
    }
}
