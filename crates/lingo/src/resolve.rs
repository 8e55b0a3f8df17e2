//! Query surface over a [`CatalogIndex`].
//!
//! Every call returns text: a lookup never fails, it falls back to the
//! queried source (see [`crate::fallback`]) and then applies placeholder
//! substitution (see [`crate::substitute`]).

use std::fmt::Display;

use crate::fallback::{self, Resolution};
use crate::index::CatalogIndex;
use crate::substitute::substitute;

/// A lookup key plus an optional plural count.
///
/// ```
/// use lingo::Query;
///
/// let query = Query::new("QPrintDialog", "%n page(s)").count(3);
/// assert_eq!(query.disambiguator, "");
/// assert_eq!(query.count, Some(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Query<'a> {
    pub context: &'a str,
    pub source: &'a str,
    /// Empty when the message has no disambiguating comment.
    pub disambiguator: &'a str,
    pub count: Option<i64>,
}

impl<'a> Query<'a> {
    #[must_use]
    pub fn new(context: &'a str, source: &'a str) -> Self {
        Self {
            context,
            source,
            disambiguator: "",
            count: None,
        }
    }

    #[must_use]
    pub fn disambiguator(mut self, disambiguator: &'a str) -> Self {
        self.disambiguator = disambiguator;
        self
    }

    #[must_use]
    pub fn count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }
}

impl CatalogIndex {
    /// Select the text for `query` without substitution. Allocates nothing.
    #[must_use]
    pub fn select<'a>(&'a self, query: &Query<'a>) -> Resolution<'a> {
        let entry = self.lookup(query.context, query.source, query.disambiguator);
        let resolution = fallback::select(entry, &self.rule(), query.source, query.count);

        #[cfg(feature = "tracing")]
        if resolution.outcome.is_fallback() {
            tracing::trace!(
                context = query.context,
                source = query.source,
                disambiguator = query.disambiguator,
                outcome = %resolution.outcome,
                "translation fell back to source"
            );
        }

        resolution
    }

    /// Translated text for a singular key, or `source`. Allocates nothing.
    #[must_use]
    pub fn translate<'a>(&'a self, context: &'a str, source: &'a str, disambiguator: &'a str) -> &'a str {
        self.select(&Query::new(context, source).disambiguator(disambiguator))
            .text
    }

    /// Resolve `query` and substitute `args` (and the count, for `%n`).
    #[must_use]
    pub fn resolve_query(&self, query: &Query<'_>, args: &[&dyn Display]) -> String {
        let text = self.select(query).text;
        substitute(text, args, query.count).into_owned()
    }

    /// Resolve a key to display text.
    ///
    /// ```
    /// use lingo::{CatalogIndex, parse};
    ///
    /// let doc = parse(br#"<TS version="2.1" language="en">
    /// <context>
    ///     <name>Files</name>
    ///     <message numerus="yes">
    ///         <source>%n file(s) in %1</source>
    ///         <translation>
    ///             <numerusform>one file in %1</numerusform>
    ///             <numerusform>%n files in %1</numerusform>
    ///         </translation>
    ///     </message>
    /// </context>
    /// </TS>"#).unwrap();
    /// let index = CatalogIndex::build(&doc, "en");
    ///
    /// assert_eq!(index.resolve("Files", "%n file(s) in %1", "", Some(1), &[&"/tmp"]), "one file in /tmp");
    /// assert_eq!(index.resolve("Files", "%n file(s) in %1", "", Some(4), &[&"/tmp"]), "4 files in /tmp");
    /// assert_eq!(index.resolve("Files", "Unknown %1", "", None, &[&7]), "Unknown 7");
    /// ```
    #[must_use]
    pub fn resolve(
        &self,
        context: &str,
        source: &str,
        disambiguator: &str,
        count: Option<i64>,
        args: &[&dyn Display],
    ) -> String {
        let query = Query {
            context,
            source,
            disambiguator,
            count,
        };
        self.resolve_query(&query, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::Outcome;
    use lingo_catalog::{Context, Document, Message, StatusMarker, Translation};

    fn catalog() -> CatalogIndex {
        let document = Document::new("en")
            .with_context(
                Context::new("Dialog")
                    .with_message(
                        Message::new("Open").with_translation(Translation::single("Open…")),
                    )
                    .with_message(
                        Message::new("Open")
                            .with_comment("state")
                            .with_translation(Translation::single("Opened")),
                    )
                    .with_message(
                        Message::new("%n item(s)")
                            .with_translation(Translation::plural(["one item", "%1 items"])),
                    )
                    .with_message(
                        Message::new("%n row(s)")
                            .with_translation(Translation::plural(["one row", ""])),
                    )
                    .with_message(Message::new("Page %1 of %2").with_translation(
                        Translation::single("Seite %1 von %2").with_marker(StatusMarker::Unfinished),
                    )),
            );
        CatalogIndex::build(&document, "en")
    }

    #[test]
    fn absent_key_returns_source_unchanged() {
        let index = catalog();
        assert_eq!(index.resolve("Dialog", "Close\nwindow", "", None, &[]), "Close\nwindow");
        assert_eq!(index.resolve("Nowhere", "Open", "", None, &[]), "Open");
    }

    #[test]
    fn disambiguator_selects_entry() {
        let index = catalog();
        assert_eq!(index.translate("Dialog", "Open", ""), "Open…");
        assert_eq!(index.translate("Dialog", "Open", "state"), "Opened");
        assert_eq!(index.translate("Dialog", "Open", "other"), "Open");
    }

    #[test]
    fn english_plural_with_args() {
        let index = catalog();
        assert_eq!(index.resolve("Dialog", "%n item(s)", "", Some(1), &[]), "one item");
        assert_eq!(index.resolve("Dialog", "%n item(s)", "", Some(5), &[&5]), "5 items");
    }

    #[test]
    fn empty_slot_falls_back_to_source() {
        let index = catalog();
        assert_eq!(index.resolve("Dialog", "%n row(s)", "", Some(3), &[]), "3 row(s)");
        let query = Query::new("Dialog", "%n row(s)").count(3);
        assert_eq!(index.select(&query).outcome, Outcome::EmptyForm);
    }

    #[test]
    fn unfinished_falls_back_and_still_substitutes() {
        let index = catalog();
        assert_eq!(
            index.resolve("Dialog", "Page %1 of %2", "", None, &[&"3", &"10"]),
            "Page 3 of 10"
        );
        assert_eq!(index.resolve("Dialog", "Page %1 of %2", "", None, &[]), "Page %1 of %2");
    }

    #[test]
    fn resolve_query_matches_resolve() {
        let index = catalog();
        let query = Query::new("Dialog", "%n item(s)").count(2);
        assert_eq!(
            index.resolve_query(&query, &[&2]),
            index.resolve("Dialog", "%n item(s)", "", Some(2), &[&2])
        );
    }

    #[test]
    fn translate_does_not_copy() {
        let index = catalog();
        let source = String::from("Missing");
        let text = index.translate("Dialog", &source, "");
        assert!(std::ptr::eq(text, source.as_str()));
    }
}
