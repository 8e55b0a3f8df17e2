//! Read-optimized lookup index built from one catalog document.
//!
//! # Invariants
//!
//! 1. **Obsolete entries are invisible**: messages whose status is
//!    [`TranslationStatus::Obsolete`] (including the `vanished` marker) are
//!    never indexed.
//! 2. **Last declaration wins**: when `(context, source, disambiguator)`
//!    repeats, the later message in document order replaces the earlier.
//! 3. **Plural slots match the rule**: every plural entry carries exactly
//!    `rule.category_count()` forms. Short lists are padded with empty
//!    forms, long lists truncated.
//! 4. **Immutable**: the index never changes after [`CatalogIndex::build`];
//!    it is `Send + Sync` and lookups allocate nothing.
//!
//! # Failure Modes
//!
//! | Situation | Behavior |
//! |-----------|----------|
//! | Plural slot count differs from the rule | Normalized, counted in [`IndexStats`] |
//! | Duplicate key | Later entry kept, counted in [`IndexStats`] |
//! | Plural translation on a singular message | First form used as the text |

use ahash::AHashMap;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use lingo_catalog::{Document, Message, TextNode, TranslationForms, TranslationStatus};

use crate::config::IndexConfig;
use crate::plural::PluralRule;

/// The indexed translation payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValue {
    Single(Box<str>),
    /// One form per slot of the index's plural rule.
    Plural(Box<[Box<str>]>),
}

/// One indexed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    status: TranslationStatus,
    value: EntryValue,
}

impl IndexEntry {
    /// [`TranslationStatus::Finished`] or [`TranslationStatus::Unfinished`].
    #[must_use]
    pub fn status(&self) -> TranslationStatus {
        self.status
    }

    #[must_use]
    pub fn value(&self) -> &EntryValue {
        &self.value
    }

    #[must_use]
    pub fn is_plural(&self) -> bool {
        matches!(self.value, EntryValue::Plural(_))
    }

    /// Text for `slot`. Singular entries ignore the slot; a slot past the
    /// end reads as empty.
    #[must_use]
    pub fn form(&self, slot: usize) -> &str {
        match &self.value {
            EntryValue::Single(text) => &**text,
            EntryValue::Plural(forms) => forms.get(slot).map_or("", |form| &**form),
        }
    }
}

/// Counters collected while building an index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexStats {
    /// Indexed entries with status finished.
    pub finished: usize,
    /// Indexed entries with status unfinished.
    pub unfinished: usize,
    /// Obsolete or vanished messages left out.
    pub obsolete_skipped: usize,
    /// Entries replaced by a later duplicate.
    pub duplicates_replaced: usize,
    /// Plural messages with fewer forms than the rule has slots.
    pub plural_padded: usize,
    /// Plural messages with more forms than the rule has slots.
    pub plural_truncated: usize,
}

impl IndexStats {
    /// Number of entries in the index.
    #[must_use]
    pub fn indexed(&self) -> usize {
        self.finished + self.unfinished
    }
}

type Disambiguated = Vec<(Box<str>, IndexEntry)>;
type ContextTable = AHashMap<Box<str>, Disambiguated>;

/// Immutable map from `(context, source, disambiguator)` to an entry.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    locale: Box<str>,
    rule: PluralRule,
    contexts: AHashMap<Box<str>, ContextTable>,
    stats: IndexStats,
}

impl CatalogIndex {
    /// Build for `locale`, deriving the plural rule from it.
    #[must_use]
    pub fn build(document: &Document, locale: &str) -> Self {
        Self::build_with(document, &IndexConfig::new().locale(locale))
    }

    /// Build with explicit configuration.
    #[must_use]
    pub fn build_with(document: &Document, config: &IndexConfig) -> Self {
        let locale = config.effective_locale(document.language());
        let rule = config.effective_rule(document.language());
        let slots = rule.category_count();

        let mut contexts: AHashMap<Box<str>, ContextTable> = AHashMap::new();
        let mut stats = IndexStats::default();

        for (context, message) in document.messages() {
            let status = message.status();
            if status == TranslationStatus::Obsolete {
                stats.obsolete_skipped += 1;
                continue;
            }

            let entry = IndexEntry {
                status,
                value: entry_value(message, slots, &mut stats),
            };
            count_status(&mut stats, status, 1);

            let table = contexts.entry(context.name.as_str().into()).or_default();
            let variants = table.entry(message.source.as_str().into()).or_default();
            let disambiguator = message.disambiguator();
            match variants.iter_mut().find(|(d, _)| &**d == disambiguator) {
                Some((_, existing)) => {
                    count_status(&mut stats, existing.status, -1);
                    stats.duplicates_replaced += 1;
                    *existing = entry;
                }
                None => variants.push((disambiguator.into(), entry)),
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            locale,
            rule = ?rule,
            finished = stats.finished,
            unfinished = stats.unfinished,
            obsolete_skipped = stats.obsolete_skipped,
            duplicates_replaced = stats.duplicates_replaced,
            plural_padded = stats.plural_padded,
            plural_truncated = stats.plural_truncated,
            "catalog index built"
        );

        Self {
            locale: locale.into(),
            rule,
            contexts,
            stats,
        }
    }

    /// Entry for the key, if indexed.
    #[must_use]
    pub fn lookup(&self, context: &str, source: &str, disambiguator: &str) -> Option<&IndexEntry> {
        self.contexts
            .get(context)?
            .get(source)?
            .iter()
            .find(|(d, _)| &**d == disambiguator)
            .map(|(_, entry)| entry)
    }

    #[must_use]
    pub fn contains(&self, context: &str, source: &str, disambiguator: &str) -> bool {
        self.lookup(context, source, disambiguator).is_some()
    }

    /// Locale the index was built for.
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    #[must_use]
    pub fn rule(&self) -> PluralRule {
        self.rule
    }

    #[must_use]
    pub fn stats(&self) -> IndexStats {
        self.stats
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stats.indexed()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate `((context, source, disambiguator), entry)` in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = ((&str, &str, &str), &IndexEntry)> {
        self.contexts.iter().flat_map(|(context, table)| {
            table.iter().flat_map(move |(source, variants)| {
                variants
                    .iter()
                    .map(move |(d, entry)| ((&**context, &**source, &**d), entry))
            })
        })
    }

    /// Per-context translation coverage, sorted by context name.
    #[must_use]
    pub fn coverage_report(&self) -> CoverageReport {
        let mut contexts: Vec<ContextCoverage> = self
            .contexts
            .iter()
            .map(|(name, table)| {
                let mut finished = 0;
                let mut missing = Vec::new();
                for (source, variants) in table {
                    for (_, entry) in variants {
                        if entry.status == TranslationStatus::Finished {
                            finished += 1;
                        } else {
                            missing.push(source.to_string());
                        }
                    }
                }
                missing.sort_unstable();
                let present = finished + missing.len();
                ContextCoverage {
                    context: name.to_string(),
                    present,
                    finished,
                    missing,
                    coverage_percent: percent(finished, present),
                }
            })
            .collect();
        contexts.sort_unstable_by(|a, b| a.context.cmp(&b.context));

        CoverageReport {
            locale: self.locale.to_string(),
            total_entries: self.len(),
            finished: self.stats.finished,
            coverage_percent: percent(self.stats.finished, self.len()),
            contexts,
        }
    }
}

/// Coverage of one index, overall and per context.
#[derive(Debug, Clone)]
pub struct CoverageReport {
    pub locale: String,
    pub total_entries: usize,
    pub finished: usize,
    /// Finished entries as a percentage (0.0–100.0).
    pub coverage_percent: f32,
    pub contexts: Vec<ContextCoverage>,
}

/// Coverage statistics for one context.
#[derive(Debug, Clone)]
pub struct ContextCoverage {
    pub context: String,
    /// Indexed entries in this context.
    pub present: usize,
    pub finished: usize,
    /// Sources of unfinished entries, sorted.
    pub missing: Vec<String>,
    /// Finished entries as a percentage (0.0–100.0).
    pub coverage_percent: f32,
}

#[allow(clippy::cast_precision_loss)]
fn percent(part: usize, total: usize) -> f32 {
    if total == 0 {
        100.0
    } else {
        (part as f32 / total as f32) * 100.0
    }
}

fn count_status(stats: &mut IndexStats, status: TranslationStatus, delta: isize) {
    let counter = match status {
        TranslationStatus::Finished => &mut stats.finished,
        TranslationStatus::Unfinished => &mut stats.unfinished,
        TranslationStatus::Obsolete => return,
    };
    *counter = counter.saturating_add_signed(delta);
}

fn entry_value(message: &Message, slots: usize, stats: &mut IndexStats) -> EntryValue {
    let forms: &[TextNode] = match message.translation.as_ref().map(|t| &t.forms) {
        Some(TranslationForms::Single(text)) => std::slice::from_ref(text),
        Some(TranslationForms::Plural(forms)) => forms,
        None => &[],
    };

    if !message.is_plural() {
        let text = forms.first().map_or("", TextNode::as_str);
        return EntryValue::Single(text.into());
    }

    if forms.len() < slots {
        stats.plural_padded += 1;
    } else if forms.len() > slots {
        stats.plural_truncated += 1;
    }
    let normalized: Box<[Box<str>]> = (0..slots)
        .map(|slot| forms.get(slot).map_or("", TextNode::as_str).into())
        .collect();
    EntryValue::Plural(normalized)
}
