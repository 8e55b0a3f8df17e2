//! TS catalog parser.
//!
//! Converts raw catalog bytes into a [`Document`]. Parsing is a pure
//! function of the input: no plural resolution, no fallback.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Error |
//! |---------|-------|-------|
//! | Not UTF-8 | Invalid byte sequence | [`ParseError::Encoding`] |
//! | Not XML | Bad entity, bad attribute syntax | [`ParseError::Syntax`] |
//! | Bad nesting | Mismatched or missing end tags | [`ParseError::MalformedStructure`] |
//! | No source | `<message>` without `<source>` | [`ParseError::MalformedStructure`] |
//! | No plural slots | `numerus="yes"` translation without `<numerusform>` | [`ParseError::MalformedStructure`] |
//! | Stray message | `<message>` outside a `<context>` | [`ParseError::MalformedStructure`] |
//!
//! A message without a `<translation>`, or with an empty one, is not an
//! error: it parses as unfinished.

use std::fmt;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, BytesText, Event};

use crate::document::{
    Context, Document, Extra, Location, Message, StatusMarker, TextNode, Translation,
    TranslationForms,
};
use crate::error::ParseError;

const UTF8_BOM: &str = "\u{feff}";

/// Parse a catalog from raw bytes.
///
/// # Errors
///
/// Returns [`ParseError`] when the bytes are not UTF-8, not well-formed XML,
/// or do not describe a catalog.
pub fn parse(input: &[u8]) -> Result<Document, ParseError> {
    let text = std::str::from_utf8(input).map_err(|err| ParseError::Encoding {
        offset: err.valid_up_to(),
    })?;
    parse_str(text)
}

/// Parse a catalog from text.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_str(input: &str) -> Result<Document, ParseError> {
    let (base, body) = match input.strip_prefix(UTF8_BOM) {
        Some(rest) => (UTF8_BOM.len(), rest),
        None => (0, input),
    };
    let result = Parser::new(body, base).document();

    #[cfg(feature = "tracing")]
    match &result {
        Ok(doc) => tracing::debug!(
            bytes = input.len(),
            contexts = doc.contexts.len(),
            messages = doc.message_count(),
            language = doc.language().unwrap_or(""),
            "catalog parsed"
        ),
        Err(err) => tracing::debug!(error = %err, "catalog rejected"),
    }

    result
}

struct Parser<'a> {
    input: &'a str,
    base: usize,
    reader: Reader<&'a [u8]>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, base: usize) -> Self {
        let mut reader = Reader::from_str(input);
        reader.config_mut().expand_empty_elements = true;
        Self {
            input,
            base,
            reader,
        }
    }

    fn position(&self) -> usize {
        self.reader.buffer_position() as usize
    }

    fn next(&mut self) -> Result<(usize, Event<'a>), ParseError> {
        let offset = self.position();
        match self.reader.read_event() {
            Ok(event) => Ok((offset, event)),
            Err(err) => Err(self.reader_error(err)),
        }
    }

    // ── Root ────────────────────────────────────────────────────────────

    fn document(mut self) -> Result<Document, ParseError> {
        let mut document = None;
        loop {
            let (offset, event) = self.next()?;
            match event {
                Event::Start(start) if document.is_none() => {
                    if start.name().as_ref() != b"TS" {
                        return Err(self.malformed(
                            offset,
                            format!(
                                "expected <TS> root element, found <{}>",
                                tag(start.name().as_ref())
                            ),
                        ));
                    }
                    document = Some(self.ts(offset, &start)?);
                }
                Event::Start(_) => {
                    return Err(self.malformed(offset, "content after the <TS> root element"));
                }
                Event::Text(text) if is_blank(&text) => {}
                Event::Text(_) | Event::CData(_) => {
                    return Err(self.malformed(offset, "text outside of the <TS> root element"));
                }
                Event::End(end) => {
                    return Err(self.malformed(
                        offset,
                        format!("unexpected </{}>", tag(end.name().as_ref())),
                    ));
                }
                Event::Eof => {
                    return document
                        .ok_or_else(|| self.malformed(offset, "missing <TS> root element"));
                }
                _ => {}
            }
        }
    }

    fn ts(&mut self, offset: usize, start: &BytesStart<'_>) -> Result<Document, ParseError> {
        let mut document = Document::default();
        for (key, value) in self.attributes(offset, start)? {
            match key.as_str() {
                "version" => document.version = Some(value),
                "sourcelanguage" => document.source_language = Some(value),
                "language" => document.language = Some(value),
                _ => {}
            }
        }

        loop {
            let (offset, event) = self.next()?;
            match event {
                Event::Start(start) => match start.name().as_ref() {
                    b"context" => document.contexts.push(self.context(offset)?),
                    b"message" => {
                        return Err(self.malformed(offset, "<message> outside of a <context>"));
                    }
                    name if name.starts_with(b"extra-") => {
                        document.extras.push(self.extra(name)?);
                    }
                    name => return Err(self.unexpected(offset, name, "TS")),
                },
                Event::End(_) => return Ok(document),
                Event::Text(text) => self.expect_blank(offset, &text, "TS")?,
                Event::CData(_) => return Err(self.stray_text(offset, "TS")),
                Event::Eof => return Err(self.unterminated(offset, "TS")),
                _ => {}
            }
        }
    }

    // ── Context and message blocks ─────────────────────────────────────

    fn context(&mut self, context_offset: usize) -> Result<Context, ParseError> {
        let mut name = None;
        let mut messages = Vec::new();
        loop {
            let (offset, event) = self.next()?;
            match event {
                Event::Start(start) => match start.name().as_ref() {
                    b"name" => self.leaf_into(&mut name, offset, "name")?,
                    b"message" => messages.push(self.message(offset, &start)?),
                    b"context" => {
                        return Err(self.malformed(offset, "<context> nested inside <context>"));
                    }
                    other => return Err(self.unexpected(offset, other, "context")),
                },
                Event::End(_) => break,
                Event::Text(text) => self.expect_blank(offset, &text, "context")?,
                Event::CData(_) => return Err(self.stray_text(offset, "context")),
                Event::Eof => return Err(self.unterminated(offset, "context")),
                _ => {}
            }
        }

        let name = name.ok_or_else(|| self.malformed(context_offset, "<context> without <name>"))?;
        Ok(Context { name, messages })
    }

    fn message(
        &mut self,
        message_offset: usize,
        start: &BytesStart<'_>,
    ) -> Result<Message, ParseError> {
        let mut message = Message::default();
        for (key, value) in self.attributes(message_offset, start)? {
            match key.as_str() {
                "id" => message.id = Some(value),
                "numerus" => message.numerus = value == "yes",
                _ => {}
            }
        }

        let mut source = None;
        loop {
            let (offset, event) = self.next()?;
            match event {
                Event::Start(child) => match child.name().as_ref() {
                    b"location" => {
                        let location = self.location(offset, &child)?;
                        message.locations.push(location);
                    }
                    b"source" => self.leaf_into(&mut source, offset, "source")?,
                    b"oldsource" => self.leaf_into(&mut message.old_source, offset, "oldsource")?,
                    b"comment" => self.leaf_into(&mut message.comment, offset, "comment")?,
                    b"oldcomment" => {
                        self.leaf_into(&mut message.old_comment, offset, "oldcomment")?;
                    }
                    b"extracomment" => {
                        self.leaf_into(&mut message.extra_comment, offset, "extracomment")?;
                    }
                    b"translatorcomment" => self.leaf_into(
                        &mut message.translator_comment,
                        offset,
                        "translatorcomment",
                    )?,
                    b"translation" => {
                        if message.translation.is_some() {
                            return Err(self.duplicate(offset, "translation"));
                        }
                        let translation = self.translation(offset, &child, message.numerus)?;
                        message.translation = Some(translation);
                    }
                    b"message" => {
                        return Err(self.malformed(offset, "<message> nested inside <message>"));
                    }
                    name if name.starts_with(b"extra-") => {
                        message.extras.push(self.extra(name)?);
                    }
                    other => return Err(self.unexpected(offset, other, "message")),
                },
                Event::End(_) => break,
                Event::Text(text) => self.expect_blank(offset, &text, "message")?,
                Event::CData(_) => return Err(self.stray_text(offset, "message")),
                Event::Eof => return Err(self.unterminated(offset, "message")),
                _ => {}
            }
        }

        message.source =
            source.ok_or_else(|| self.malformed(message_offset, "<message> without <source>"))?;
        Ok(message)
    }

    fn translation(
        &mut self,
        offset: usize,
        start: &BytesStart<'_>,
        numerus: bool,
    ) -> Result<Translation, ParseError> {
        let mut marker = StatusMarker::None;
        for (key, value) in self.attributes(offset, start)? {
            match key.as_str() {
                "type" => {
                    marker = StatusMarker::from_attr(&value).ok_or_else(|| {
                        self.malformed(offset, format!("unknown translation type \"{value}\""))
                    })?;
                }
                "variants" if value == "yes" => {
                    return Err(self.malformed(offset, "length variants are not supported"));
                }
                _ => {}
            }
        }

        let forms = if numerus {
            TranslationForms::Plural(self.numerus_forms(offset)?)
        } else {
            TranslationForms::Single(self.text("translation")?)
        };
        Ok(Translation { marker, forms })
    }

    fn numerus_forms(&mut self, translation_offset: usize) -> Result<Vec<TextNode>, ParseError> {
        let mut forms = Vec::new();
        loop {
            let (offset, event) = self.next()?;
            match event {
                Event::Start(start) if start.name().as_ref() == b"numerusform" => {
                    forms.push(self.text("numerusform")?);
                }
                Event::Start(start) => {
                    return Err(self.unexpected(offset, start.name().as_ref(), "translation"));
                }
                Event::End(_) => break,
                Event::Text(text) if is_blank(&text) => {}
                Event::Text(_) | Event::CData(_) => {
                    return Err(self.malformed(
                        offset,
                        "plural translation text must be inside <numerusform>",
                    ));
                }
                Event::Eof => return Err(self.unterminated(offset, "translation")),
                _ => {}
            }
        }

        if forms.is_empty() {
            return Err(self.malformed(
                translation_offset,
                "plural message declares no <numerusform> slots",
            ));
        }
        Ok(forms)
    }

    fn location(&mut self, offset: usize, start: &BytesStart<'_>) -> Result<Location, ParseError> {
        let mut location = Location::default();
        for (key, value) in self.attributes(offset, start)? {
            match key.as_str() {
                "filename" => location.filename = Some(value),
                "line" => location.line = Some(value),
                _ => {}
            }
        }
        self.expect_end("location")?;
        Ok(location)
    }

    fn extra(&mut self, name: &[u8]) -> Result<Extra, ParseError> {
        let name = tag(name);
        let content = self.text(&name)?;
        Ok(Extra { name, content })
    }

    // ── Text nodes ─────────────────────────────────────────────────────

    fn leaf_into(
        &mut self,
        slot: &mut Option<TextNode>,
        offset: usize,
        element: &str,
    ) -> Result<(), ParseError> {
        if slot.is_some() {
            return Err(self.duplicate(offset, element));
        }
        *slot = Some(self.text(element)?);
        Ok(())
    }

    /// Read the body of a leaf element up to and including its end tag.
    fn text(&mut self, element: &str) -> Result<TextNode, ParseError> {
        let content_start = self.position();
        let mut decoded = String::new();
        loop {
            let (offset, event) = self.next()?;
            match event {
                Event::Text(text) => {
                    let unescaped = text.unescape().map_err(|err| self.syntax(offset, &err))?;
                    decoded.push_str(&unescaped);
                }
                Event::CData(cdata) => {
                    let content =
                        std::str::from_utf8(&cdata).map_err(|err| self.syntax(offset, &err))?;
                    decoded.push_str(content);
                }
                Event::Start(start) if start.name().as_ref() == b"byte" => {
                    if let Some(ch) = self.byte(offset, &start)? {
                        decoded.push(ch);
                    }
                    self.expect_end("byte")?;
                }
                Event::Start(start) => {
                    return Err(self.unexpected(offset, start.name().as_ref(), element));
                }
                Event::End(_) => {
                    let raw = raw_content(self.input, content_start, self.position());
                    return Ok(TextNode::from_parts(raw.to_owned(), decoded));
                }
                Event::Eof => return Err(self.unterminated(offset, element)),
                _ => {}
            }
        }
    }

    /// Decode `<byte value="x1b"/>`. A zero value decodes to nothing.
    fn byte(&self, offset: usize, start: &BytesStart<'_>) -> Result<Option<char>, ParseError> {
        let value = self
            .attributes(offset, start)?
            .into_iter()
            .find_map(|(key, value)| (key == "value").then_some(value))
            .ok_or_else(|| self.malformed(offset, "<byte> without a value"))?;

        let (digits, radix) = if let Some(hex) = value.strip_prefix("0x") {
            (hex, 16)
        } else if let Some(hex) = value.strip_prefix('x') {
            (hex, 16)
        } else {
            (value.as_str(), 10)
        };
        match u32::from_str_radix(digits, radix) {
            Ok(0) => Ok(None),
            Ok(code) => char::from_u32(code).map(Some).ok_or_else(|| {
                self.malformed(offset, format!("<byte> value {value} is not a character"))
            }),
            Err(_) => Err(self.malformed(offset, format!("invalid <byte> value \"{value}\""))),
        }
    }

    fn expect_end(&mut self, element: &str) -> Result<(), ParseError> {
        loop {
            let (offset, event) = self.next()?;
            match event {
                Event::End(_) => return Ok(()),
                Event::Text(text) if is_blank(&text) => {}
                Event::Comment(_) => {}
                Event::Eof => return Err(self.unterminated(offset, element)),
                _ => {
                    return Err(self.malformed(offset, format!("<{element}> must be empty")));
                }
            }
        }
    }

    fn attributes(
        &self,
        offset: usize,
        start: &BytesStart<'_>,
    ) -> Result<Vec<(String, String)>, ParseError> {
        start
            .attributes()
            .map(|attr| {
                let attr = attr.map_err(|err| self.syntax(offset, &err))?;
                let key = tag(attr.key.as_ref());
                let value = attr
                    .unescape_value()
                    .map_err(|err| self.syntax(offset, &err))?
                    .into_owned();
                Ok((key, value))
            })
            .collect()
    }

    // ── Errors ─────────────────────────────────────────────────────────

    fn line(&self, offset: usize) -> usize {
        let end = offset.min(self.input.len());
        self.input.as_bytes()[..end]
            .iter()
            .filter(|&&b| b == b'\n')
            .count()
            + 1
    }

    fn malformed(&self, offset: usize, reason: impl Into<String>) -> ParseError {
        ParseError::MalformedStructure {
            offset: self.base + offset,
            line: self.line(offset),
            reason: reason.into(),
        }
    }

    fn syntax(&self, offset: usize, err: &dyn fmt::Display) -> ParseError {
        ParseError::Syntax {
            offset: self.base + offset,
            line: self.line(offset),
            message: err.to_string(),
        }
    }

    fn reader_error(&self, err: quick_xml::Error) -> ParseError {
        let offset = self.position();
        match err {
            quick_xml::Error::IllFormed(ill) => self.malformed(offset, ill.to_string()),
            other => self.syntax(offset, &other),
        }
    }

    fn unexpected(&self, offset: usize, name: &[u8], parent: &str) -> ParseError {
        self.malformed(
            offset,
            format!("unexpected <{}> inside <{parent}>", tag(name)),
        )
    }

    fn duplicate(&self, offset: usize, element: &str) -> ParseError {
        self.malformed(offset, format!("duplicate <{element}>"))
    }

    fn unterminated(&self, offset: usize, element: &str) -> ParseError {
        self.malformed(offset, format!("unterminated <{element}>"))
    }

    fn stray_text(&self, offset: usize, parent: &str) -> ParseError {
        self.malformed(offset, format!("unexpected text inside <{parent}>"))
    }

    fn expect_blank(
        &self,
        offset: usize,
        text: &BytesText<'_>,
        parent: &str,
    ) -> Result<(), ParseError> {
        if is_blank(text) {
            Ok(())
        } else {
            Err(self.stray_text(offset, parent))
        }
    }
}

fn is_blank(text: &BytesText<'_>) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}

fn tag(name: &[u8]) -> String {
    String::from_utf8_lossy(name).into_owned()
}

/// Markup between a start tag ending at `start` and an end tag ending at `end`.
fn raw_content(input: &str, start: usize, end: usize) -> &str {
    let region = input.get(start..end).unwrap_or("");
    region.rfind("</").map_or("", |close| &region[..close])
}
