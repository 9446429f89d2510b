//! Locale-keyed keyword sets used to interpret carrier page text.
//!
//! Each locale contributes phrase lists for "no data", "has results",
//! "delivered" and "in customs". A predicate holds when any locale matches,
//! so adding a carrier language is a config change, not a code change.

use serde::{Deserialize, Serialize};

/// A list of phrases matched by substring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordGroup {
    #[serde(default)]
    pub terms: Vec<String>,

    /// Compare lowercased text and terms
    #[serde(default)]
    pub ignore_case: bool,
}

impl KeywordGroup {
    pub fn new<I, S>(terms: I, ignore_case: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms.into_iter().map(Into::into).collect(),
            ignore_case,
        }
    }

    /// Check whether the text contains any of the terms.
    pub fn matches(&self, text: &str) -> bool {
        if self.ignore_case {
            let lower = text.to_lowercase();
            self.terms
                .iter()
                .any(|term| lower.contains(&term.to_lowercase()))
        } else {
            self.terms.iter().any(|term| text.contains(term.as_str()))
        }
    }
}

/// Keyword sets for one carrier locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleKeywords {
    /// Locale tag, e.g. "he"
    pub locale: String,

    /// Page states "no such item" / "no information"
    #[serde(default)]
    pub not_found: KeywordGroup,

    /// Textual cues that tracking data is present
    #[serde(default)]
    pub has_results: KeywordGroup,

    #[serde(default)]
    pub delivered: KeywordGroup,

    #[serde(default)]
    pub customs: KeywordGroup,
}

/// The full set of locales consulted for classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordStrategy {
    locales: Vec<LocaleKeywords>,
}

impl KeywordStrategy {
    pub fn new(locales: Vec<LocaleKeywords>) -> Self {
        Self { locales }
    }

    pub fn locales(&self) -> &[LocaleKeywords] {
        &self.locales
    }

    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }

    pub fn is_not_found(&self, text: &str) -> bool {
        self.any(text, |l| &l.not_found)
    }

    pub fn has_results(&self, text: &str) -> bool {
        self.any(text, |l| &l.has_results)
    }

    pub fn is_delivered(&self, text: &str) -> bool {
        self.any(text, |l| &l.delivered)
    }

    pub fn is_in_customs(&self, text: &str) -> bool {
        self.any(text, |l| &l.customs)
    }

    fn any(&self, text: &str, group: impl Fn(&LocaleKeywords) -> &KeywordGroup) -> bool {
        self.locales.iter().any(|l| group(l).matches(text))
    }
}

impl Default for KeywordStrategy {
    fn default() -> Self {
        Self::new(vec![hebrew(), english()])
    }
}

/// Israel Post Hebrew phrasing.
pub fn hebrew() -> LocaleKeywords {
    LocaleKeywords {
        locale: "he".to_string(),
        not_found: KeywordGroup::new(
            ["לא נמצא", "אין מידע", "לא קיים", "לא אותר", "לא נמסר"],
            true,
        ),
        has_results: KeywordGroup::new(["תל אביב", "נמסר", "ירושלים", "נמצא"], false),
        delivered: KeywordGroup::new(["נמסר לנמען", "נמסר", "נמסרה"], false),
        customs: KeywordGroup::new(["מכס", "עצור", "בדיקת מכס"], true),
    }
}

/// English phrasing used on the same pages.
pub fn english() -> LocaleKeywords {
    LocaleKeywords {
        locale: "en".to_string(),
        not_found: KeywordGroup::new(
            ["not found", "no information", "no results", "item not found"],
            true,
        ),
        has_results: KeywordGroup::new(["delivered", "transit", "customs"], false),
        delivered: KeywordGroup::new(["delivered"], false),
        customs: KeywordGroup::new(["customs"], true),
    }
}
