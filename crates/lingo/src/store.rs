//! Hot-swappable catalog index.
//!
//! Readers take a snapshot with [`CatalogStore::load`] and keep it for as
//! long as they like; a reload builds a complete new [`CatalogIndex`] off to
//! the side and publishes it with a single atomic pointer swap.
//!
//! # Constraints
//!
//! - Read path is wait-free and allocates nothing (arc-swap `load` returns
//!   a guard, no clone).
//! - A reload that fails to parse leaves the served index untouched.
//! - Readers never observe a partially built index.
//!
//! # Example
//!
//! ```
//! use lingo::{CatalogStore, Query};
//!
//! let store = CatalogStore::empty("de");
//! assert_eq!(store.load().translate("Dialog", "Open", ""), "Open");
//!
//! store
//!     .reload_from_bytes(r#"<TS version="2.1" language="de">
//! <context>
//!     <name>Dialog</name>
//!     <message>
//!         <source>Open</source>
//!         <translation>Öffnen</translation>
//!     </message>
//! </context>
//! </TS>"#.as_bytes())
//!     .unwrap();
//! assert_eq!(store.resolve(&Query::new("Dialog", "Open"), &[]), "Öffnen");
//! ```

use std::fmt::Display;
use std::sync::Arc;

use arc_swap::{ArcSwap, Guard};
use lingo_catalog::Document;

use crate::config::IndexConfig;
use crate::error::LoadError;
use crate::index::{CatalogIndex, IndexStats};
use crate::resolve::Query;

/// Shared, atomically replaceable [`CatalogIndex`].
pub struct CatalogStore {
    inner: ArcSwap<CatalogIndex>,
    config: IndexConfig,
}

impl CatalogStore {
    /// Serve `index`. Later reloads use the default [`IndexConfig`].
    #[must_use]
    pub fn new(index: CatalogIndex) -> Self {
        Self::with_config(index, IndexConfig::new())
    }

    /// Serve `index`; later reloads build with `config`.
    #[must_use]
    pub fn with_config(index: CatalogIndex, config: IndexConfig) -> Self {
        Self {
            inner: ArcSwap::from_pointee(index),
            config,
        }
    }

    /// Build from `document` with `config` and serve the result.
    #[must_use]
    pub fn from_document(document: &Document, config: IndexConfig) -> Self {
        let index = CatalogIndex::build_with(document, &config);
        Self::with_config(index, config)
    }

    /// Serve an empty index for `locale`: every lookup falls back to source.
    #[must_use]
    pub fn empty(locale: &str) -> Self {
        Self::from_document(&Document::default(), IndexConfig::new().locale(locale))
    }

    /// Current snapshot, without cloning the index.
    ///
    /// Prefer this when you only need a short-lived reference.
    #[inline]
    pub fn load(&self) -> Guard<Arc<CatalogIndex>> {
        self.inner.load()
    }

    /// Current snapshot as an owned `Arc`, for holding across calls.
    #[must_use]
    pub fn load_full(&self) -> Arc<CatalogIndex> {
        self.inner.load_full()
    }

    /// Publish `index`, returning the one it replaced.
    pub fn swap(&self, index: CatalogIndex) -> Arc<CatalogIndex> {
        self.inner.swap(Arc::new(index))
    }

    /// Build a new index from `document` and publish it.
    pub fn reload(&self, document: &Document) -> IndexStats {
        let index = CatalogIndex::build_with(document, &self.config);
        let stats = index.stats();

        #[cfg(feature = "tracing")]
        tracing::info!(
            locale = index.locale(),
            entries = index.len(),
            finished = stats.finished,
            unfinished = stats.unfinished,
            "catalog reloaded"
        );

        self.inner.store(Arc::new(index));
        stats
    }

    /// Parse `bytes`, build, and publish.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Parse`] when the bytes are not a valid catalog;
    /// the previously served index stays in place.
    pub fn reload_from_bytes(&self, bytes: &[u8]) -> Result<IndexStats, LoadError> {
        match lingo_catalog::parse(bytes) {
            Ok(document) => Ok(self.reload(&document)),
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %err, "catalog reload rejected, keeping current index");
                Err(err.into())
            }
        }
    }

    /// Configuration used by [`reload`](Self::reload).
    #[must_use]
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Resolve against the current snapshot.
    #[must_use]
    pub fn resolve(&self, query: &Query<'_>, args: &[&dyn Display]) -> String {
        self.inner.load().resolve_query(query, args)
    }
}

impl std::fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let index = self.inner.load();
        f.debug_struct("CatalogStore")
            .field("locale", &index.locale())
            .field("entries", &index.len())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_catalog::{Context, Message, Translation};
    use std::sync::Barrier;
    use std::thread;

    // -- Helpers -----------------------------------------------------------

    fn generation(n: u64) -> Document {
        Document::new("de").with_context(
            Context::new("Gen").with_message(
                Message::new("current").with_translation(Translation::single(format!("gen-{n}"))),
            ),
        )
    }

    fn generation_of(text: &str) -> u64 {
        text.strip_prefix("gen-")
            .and_then(|n| n.parse().ok())
            .unwrap_or(0)
    }

    // -- Basic operations ---------------------------------------------------

    #[test]
    fn store_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CatalogStore>();
    }

    #[test]
    fn empty_store_falls_back() {
        let store = CatalogStore::empty("ar");
        assert!(store.load().is_empty());
        assert_eq!(store.load().locale(), "ar");
        assert_eq!(store.resolve(&Query::new("C", "%1 left").count(2), &[&3]), "3 left");
    }

    #[test]
    fn reload_replaces_index() {
        let store = CatalogStore::from_document(&generation(1), IndexConfig::new());
        assert_eq!(store.load().translate("Gen", "current", ""), "gen-1");
        let stats = store.reload(&generation(2));
        assert_eq!(stats.finished, 1);
        assert_eq!(store.load().translate("Gen", "current", ""), "gen-2");
    }

    #[test]
    fn snapshot_survives_reload() {
        let store = CatalogStore::from_document(&generation(1), IndexConfig::new());
        let snapshot = store.load_full();
        store.reload(&generation(2));
        assert_eq!(snapshot.translate("Gen", "current", ""), "gen-1");
        assert_eq!(store.load().translate("Gen", "current", ""), "gen-2");
    }

    #[test]
    fn swap_returns_previous() {
        let store = CatalogStore::from_document(&generation(1), IndexConfig::new());
        let previous = store.swap(CatalogIndex::build(&generation(7), "de"));
        assert_eq!(previous.translate("Gen", "current", ""), "gen-1");
        assert_eq!(store.load().translate("Gen", "current", ""), "gen-7");
    }

    #[test]
    fn failed_reload_keeps_current_index() {
        let store = CatalogStore::from_document(&generation(1), IndexConfig::new());
        let err = store
            .reload_from_bytes(b"<TS><context><message/></context></TS>")
            .unwrap_err();
        assert!(matches!(err, LoadError::Parse(ref e) if e.is_malformed_structure()));
        assert_eq!(store.load().translate("Gen", "current", ""), "gen-1");
    }

    #[test]
    fn reload_uses_configured_locale() {
        let store = CatalogStore::from_document(&generation(1), IndexConfig::new().locale("ru"));
        store.reload(&generation(2));
        assert_eq!(store.load().locale(), "ru");
        assert_eq!(store.load().rule().category_count(), 3);
    }

    // -- Concurrency ----------------------------------------------------------

    #[test]
    fn concurrent_reads_during_reloads() {
        let store = Arc::new(CatalogStore::from_document(&generation(0), IndexConfig::new()));
        let barrier = Arc::new(Barrier::new(9)); // 8 readers + 1 writer

        let readers: Vec<_> = (0..8)
            .map(|_| {
                let s = Arc::clone(&store);
                let b = Arc::clone(&barrier);
                thread::spawn(move || {
                    b.wait();
                    let mut last = 0u64;
                    for _ in 0..2_000 {
                        let snapshot = s.load();
                        let text = snapshot.translate("Gen", "current", "");
                        // Every snapshot is a complete index.
                        assert!(text.starts_with("gen-"), "torn read: {text}");
                        let g = generation_of(text);
                        assert!(g >= last, "stale read: got {g}, expected >= {last}");
                        last = g;
                    }
                })
            })
            .collect();

        let writer = {
            let s = Arc::clone(&store);
            let b = Arc::clone(&barrier);
            thread::spawn(move || {
                b.wait();
                for i in 1..=200u64 {
                    s.reload(&generation(i));
                }
            })
        };

        writer.join().unwrap();
        for h in readers {
            h.join().unwrap();
        }
        assert_eq!(store.load().translate("Gen", "current", ""), "gen-200");
    }

    #[test]
    fn debug_shows_locale_and_size() {
        let store = CatalogStore::from_document(&generation(1), IndexConfig::new());
        let debug = format!("{store:?}");
        assert!(debug.contains("locale: \"de\""));
        assert!(debug.contains("entries: 1"));
    }
}
