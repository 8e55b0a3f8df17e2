//! Fallback policy: which text a lookup renders.
//!
//! The chain has two steps. A finished translation for the resolved slot
//! is used when it is non-empty; otherwise the source text is returned
//! unchanged. Obsolete entries never reach this point because the index
//! does not hold them.

use core::fmt;

use lingo_catalog::TranslationStatus;

use crate::index::IndexEntry;
use crate::plural::PluralRule;

/// Why a lookup produced the text it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// A finished, non-empty translation.
    Translated,
    /// No entry for the key.
    Missing,
    /// The entry is marked unfinished.
    Unfinished,
    /// The entry is finished but the selected form is empty.
    EmptyForm,
}

impl Outcome {
    /// True for every outcome that renders the source text.
    #[must_use]
    pub fn is_fallback(self) -> bool {
        self != Self::Translated
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Translated => write!(f, "translated"),
            Self::Missing => write!(f, "missing"),
            Self::Unfinished => write!(f, "unfinished"),
            Self::EmptyForm => write!(f, "empty form"),
        }
    }
}

/// Selected text before placeholder substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub text: &'a str,
    pub outcome: Outcome,
}

impl<'a> Resolution<'a> {
    fn source(source: &'a str, outcome: Outcome) -> Self {
        Self {
            text: source,
            outcome,
        }
    }
}

/// Apply the fallback chain to an optional entry.
///
/// A plural entry uses slot `rule.slot(count)`, or slot 0 when `count` is
/// `None`. A singular entry ignores `count`.
#[must_use]
pub fn select<'a>(
    entry: Option<&'a IndexEntry>,
    rule: &PluralRule,
    source: &'a str,
    count: Option<i64>,
) -> Resolution<'a> {
    let Some(entry) = entry else {
        return Resolution::source(source, Outcome::Missing);
    };
    if entry.status() != TranslationStatus::Finished {
        return Resolution::source(source, Outcome::Unfinished);
    }

    let slot = match count {
        Some(count) if entry.is_plural() => rule.slot(count),
        _ => 0,
    };
    match entry.form(slot) {
        "" => Resolution::source(source, Outcome::EmptyForm),
        text => Resolution {
            text,
            outcome: Outcome::Translated,
        },
    }
}
