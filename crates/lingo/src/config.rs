//! Index build configuration.

use crate::plural::PluralRule;

/// Locale used when neither the configuration nor the document names one.
pub const DEFAULT_LOCALE: &str = "en";

/// How a [`CatalogIndex`](crate::CatalogIndex) is built from a document.
///
/// ```
/// use lingo::{IndexConfig, PluralRule};
///
/// let config = IndexConfig::new().locale("sl_SI");
/// assert!(matches!(config.effective_rule(None), PluralRule::Slovenian));
///
/// let config = config.plural_rule(PluralRule::Uniform);
/// assert!(matches!(config.effective_rule(None), PluralRule::Uniform));
/// ```
#[derive(Debug, Clone, Default)]
pub struct IndexConfig {
    locale: Option<String>,
    plural_rule: Option<PluralRule>,
}

impl IndexConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Target locale, overriding the document's `language` attribute.
    #[must_use]
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Plural rule, overriding the rule derived from the locale.
    #[must_use]
    pub fn plural_rule(mut self, rule: PluralRule) -> Self {
        self.plural_rule = Some(rule);
        self
    }

    /// Locale to build for: the configured one, else `document_language`,
    /// else [`DEFAULT_LOCALE`].
    #[must_use]
    pub fn effective_locale<'a>(&'a self, document_language: Option<&'a str>) -> &'a str {
        self.locale
            .as_deref()
            .or(document_language.filter(|l| !l.is_empty()))
            .unwrap_or(DEFAULT_LOCALE)
    }

    /// Plural rule to build with.
    #[must_use]
    pub fn effective_rule(&self, document_language: Option<&str>) -> PluralRule {
        self.plural_rule
            .unwrap_or_else(|| PluralRule::for_locale(self.effective_locale(document_language)))
    }
}
