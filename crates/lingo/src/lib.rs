#![forbid(unsafe_code)]

//! Translation lookup for lingo.
//!
//! Builds an immutable, read-optimized [`CatalogIndex`] from a parsed
//! catalog [`Document`] and resolves `(context, source, disambiguator,
//! count)` queries against it: plural slot selection, fallback to the
//! source text, and `%N` placeholder substitution.
//!
//! # Role in lingo
//! `lingo` sits on the rendering hot path. Parsing and index building happen
//! once per catalog and locale; lookups happen for every displayed string
//! and never fail. [`CatalogStore`] publishes rebuilt indexes with an atomic
//! pointer swap so readers are never blocked by a reload.
//!
//! # How it fits in the system
//! The wire format lives in `lingo-catalog`, re-exported here as
//! [`catalog`]. This crate owns everything after a successful parse.
//!
//! ```
//! use lingo::{CatalogIndex, parse};
//!
//! let doc = parse(br#"<TS version="2.1" language="sl_SI">
//! <context>
//!     <name>QPrintDialog</name>
//!     <message numerus="yes">
//!         <source>%n page(s)</source>
//!         <translation>
//!             <numerusform>%n stran</numerusform>
//!             <numerusform>%n strani</numerusform>
//!             <numerusform>%n strani</numerusform>
//!             <numerusform>%n strani</numerusform>
//!         </translation>
//!     </message>
//! </context>
//! </TS>"#).unwrap();
//!
//! let index = CatalogIndex::build(&doc, "sl_SI");
//! assert_eq!(index.resolve("QPrintDialog", "%n page(s)", "", Some(101), &[]), "101 stran");
//! assert_eq!(index.resolve("QPrintDialog", "Cancel", "", None, &[]), "Cancel");
//! ```

pub mod config;
pub mod error;
pub mod fallback;
pub mod index;
pub mod plural;
pub mod resolve;
pub mod store;
pub mod substitute;

pub use lingo_catalog as catalog;
pub use lingo_catalog::{Document, ParseError, TranslationStatus, parse, parse_str};

pub use config::{DEFAULT_LOCALE, IndexConfig};
pub use error::LoadError;
pub use fallback::{Outcome, Resolution};
pub use index::{CatalogIndex, ContextCoverage, CoverageReport, EntryValue, IndexEntry, IndexStats};
pub use plural::{PluralCategory, PluralRule, category_count, category_for};
pub use resolve::Query;
pub use store::CatalogStore;
pub use substitute::substitute;
