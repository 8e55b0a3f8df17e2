//! Typed in-memory catalog tree.
//!
//! A [`Document`] owns an ordered list of [`Context`]s, each owning an
//! ordered list of [`Message`]s. Order is kept for traceability and for
//! byte-exact re-serialization; it does not affect lookup.
//!
//! # Invariants
//!
//! 1. **Text nodes are lossless**: every [`TextNode`] keeps the exact raw
//!    markup it was parsed from next to its decoded text, so writing a parsed
//!    document reproduces each text node byte for byte.
//! 2. **Status is derived**: [`Message::status`] is computed from the
//!    on-wire [`StatusMarker`] and the payload, never stored separately.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::write::escape_text;

/// A text node: decoded text plus the raw markup it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextNode {
    raw: String,
    text: String,
}

impl TextNode {
    /// Build a node from decoded text. The raw form is the canonical escape.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let raw = escape_text(&text);
        Self { raw, text }
    }

    pub(crate) fn from_parts(raw: String, text: String) -> Self {
        Self { raw, text }
    }

    /// Decoded text (entities expanded, `<byte>` elements resolved).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Exact markup between the element's start and end tags.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Take the decoded text, dropping the raw form.
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for TextNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for TextNode {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for TextNode {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// Translation status as seen by lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TranslationStatus {
    /// Translated and ready to show.
    Finished,
    /// Present but not yet translated; text may be empty or a draft.
    Unfinished,
    /// Kept for reference only; never returned by lookup.
    Obsolete,
}

impl fmt::Display for TranslationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finished => write!(f, "finished"),
            Self::Unfinished => write!(f, "unfinished"),
            Self::Obsolete => write!(f, "obsolete"),
        }
    }
}

/// The `type` attribute of a `<translation>` element, as written on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StatusMarker {
    /// No `type` attribute.
    #[default]
    None,
    /// `type="unfinished"`
    Unfinished,
    /// `type="obsolete"`
    Obsolete,
    /// `type="vanished"`: the source string disappeared from the code base.
    Vanished,
}

impl StatusMarker {
    /// Parse a `type` attribute value. Unknown values yield `None`.
    #[must_use]
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "unfinished" => Some(Self::Unfinished),
            "obsolete" => Some(Self::Obsolete),
            "vanished" => Some(Self::Vanished),
            _ => None,
        }
    }

    /// Attribute value to write, or `None` when no attribute is written.
    #[must_use]
    pub fn as_attr(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Unfinished => Some("unfinished"),
            Self::Obsolete => Some("obsolete"),
            Self::Vanished => Some("vanished"),
        }
    }
}

/// Translation payload: one text, or one text per plural slot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TranslationForms {
    Single(TextNode),
    Plural(Vec<TextNode>),
}

impl TranslationForms {
    /// True when no slot carries any text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(text) => text.is_empty(),
            Self::Plural(forms) => forms.iter().all(TextNode::is_empty),
        }
    }
}

/// A `<translation>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Translation {
    pub marker: StatusMarker,
    pub forms: TranslationForms,
}

impl Translation {
    /// A finished singular translation.
    #[must_use]
    pub fn single(text: impl Into<TextNode>) -> Self {
        Self {
            marker: StatusMarker::None,
            forms: TranslationForms::Single(text.into()),
        }
    }

    /// A finished plural translation, one text per category slot.
    #[must_use]
    pub fn plural<I, T>(forms: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TextNode>,
    {
        Self {
            marker: StatusMarker::None,
            forms: TranslationForms::Plural(forms.into_iter().map(Into::into).collect()),
        }
    }

    /// Replace the status marker.
    #[must_use]
    pub fn with_marker(mut self, marker: StatusMarker) -> Self {
        self.marker = marker;
        self
    }
}

/// A `<location>` reference into the code the message was extracted from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Location {
    pub filename: Option<String>,
    /// Kept verbatim: relative forms such as `+3` are valid.
    pub line: Option<String>,
}

/// An `extra-*` element, carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Extra {
    pub name: String,
    pub content: TextNode,
}

/// One translatable unit within a context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Message {
    pub id: Option<String>,
    /// `numerus="yes"`: the translation carries plural forms.
    pub numerus: bool,
    pub locations: Vec<Location>,
    pub source: TextNode,
    pub old_source: Option<TextNode>,
    /// Disambiguating comment; part of the lookup key.
    pub comment: Option<TextNode>,
    pub old_comment: Option<TextNode>,
    /// Guidance for translators; never part of the lookup key.
    pub extra_comment: Option<TextNode>,
    pub translator_comment: Option<TextNode>,
    /// `None` when the message has no `<translation>` element at all.
    pub translation: Option<Translation>,
    pub extras: Vec<Extra>,
}

impl Message {
    /// A singular message with no translation yet.
    #[must_use]
    pub fn new(source: impl Into<TextNode>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Set the disambiguating comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<TextNode>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Set the translation; a plural translation also marks the message numerus.
    #[must_use]
    pub fn with_translation(mut self, translation: Translation) -> Self {
        self.numerus = matches!(translation.forms, TranslationForms::Plural(_));
        self.translation = Some(translation);
        self
    }

    /// Disambiguator for the lookup key; empty when no comment is present.
    #[must_use]
    pub fn disambiguator(&self) -> &str {
        self.comment.as_ref().map_or("", TextNode::as_str)
    }

    #[must_use]
    pub fn is_plural(&self) -> bool {
        self.numerus
    }

    /// Effective status.
    ///
    /// `obsolete` and `vanished` markers map to [`TranslationStatus::Obsolete`].
    /// Without a marker a message is finished when any slot has text and
    /// unfinished otherwise. A missing `<translation>` is unfinished.
    #[must_use]
    pub fn status(&self) -> TranslationStatus {
        let Some(translation) = &self.translation else {
            return TranslationStatus::Unfinished;
        };
        match translation.marker {
            StatusMarker::Obsolete | StatusMarker::Vanished => TranslationStatus::Obsolete,
            StatusMarker::Unfinished => TranslationStatus::Unfinished,
            StatusMarker::None if translation.forms.is_empty() => TranslationStatus::Unfinished,
            StatusMarker::None => TranslationStatus::Finished,
        }
    }
}

/// A named group of messages from one logical origin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Context {
    pub name: TextNode,
    pub messages: Vec<Message>,
}

impl Context {
    #[must_use]
    pub fn new(name: impl Into<TextNode>) -> Self {
        Self {
            name: name.into(),
            messages: Vec::new(),
        }
    }

    /// Append a message, builder style.
    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }
}

/// Root of a parsed catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Document {
    /// Format version, `"2.1"` for current catalogs.
    pub version: Option<String>,
    pub source_language: Option<String>,
    /// Target locale identifier, e.g. `"sl_SI"`.
    pub language: Option<String>,
    pub contexts: Vec<Context>,
    pub extras: Vec<Extra>,
}

impl Document {
    /// An empty version 2.1 document for `language`.
    #[must_use]
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            version: Some("2.1".into()),
            language: Some(language.into()),
            ..Self::default()
        }
    }

    /// Append a context, builder style.
    #[must_use]
    pub fn with_context(mut self, context: Context) -> Self {
        self.contexts.push(context);
        self
    }

    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    #[must_use]
    pub fn contexts(&self) -> &[Context] {
        &self.contexts
    }

    /// First context named `name`.
    #[must_use]
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name.as_str() == name)
    }

    /// Total number of messages across all contexts.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.contexts.iter().map(|c| c.messages.len()).sum()
    }

    /// Iterate `(context, message)` pairs in document order.
    pub fn messages(&self) -> impl Iterator<Item = (&Context, &Message)> {
        self.contexts
            .iter()
            .flat_map(|c| c.messages.iter().map(move |m| (c, m)))
    }
}
