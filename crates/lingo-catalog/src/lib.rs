#![forbid(unsafe_code)]

//! Translation catalog documents for lingo.
//!
//! Parses Qt Linguist TS catalogs into a typed, immutable [`Document`] tree
//! of contexts and messages, and writes such trees back out.
//!
//! # Role in lingo
//! `lingo-catalog` owns the wire format. It validates structure and keeps
//! every text node exactly as it appeared on the wire, but it does not
//! resolve plurals or apply fallback; that is the job of the `lingo` crate,
//! which builds a lookup index from a parsed [`Document`].
//!
//! # Example
//!
//! ```
//! use lingo_catalog::{parse, TranslationStatus};
//!
//! let ts = br#"<?xml version="1.0" encoding="utf-8"?>
//! <!DOCTYPE TS>
//! <TS version="2.1" language="de">
//! <context>
//!     <name>Dialog</name>
//!     <message>
//!         <source>Don&apos;t Save</source>
//!         <translation>Nicht speichern</translation>
//!     </message>
//! </context>
//! </TS>
//! "#;
//!
//! let doc = parse(ts).unwrap();
//! let message = &doc.contexts[0].messages[0];
//! assert_eq!(message.source.as_str(), "Don't Save");
//! assert_eq!(message.source.raw(), "Don&apos;t Save");
//! assert_eq!(message.status(), TranslationStatus::Finished);
//! assert_eq!(doc.to_ts_string().as_bytes(), &ts[..]);
//! ```

pub mod document;
pub mod error;
pub mod parse;
pub mod write;

pub use document::{
    Context, Document, Extra, Location, Message, StatusMarker, TextNode, Translation,
    TranslationForms, TranslationStatus,
};
pub use error::ParseError;
pub use parse::{parse, parse_str};
pub use write::write_document;
