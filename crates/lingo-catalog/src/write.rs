//! TS catalog writer.
//!
//! Emits the canonical layout: four-space indentation, one element per
//! line, children in the fixed order below. Text nodes are written from
//! their raw form, so a parsed document writes back byte for byte.
//!
//! ```text
//! location* source oldsource? comment? oldcomment? extracomment?
//! translatorcomment? translation? extra-*
//! ```

use std::fmt::{self, Write};

use quick_xml::escape::escape;

use crate::document::{Context, Document, Extra, Message, TextNode, TranslationForms};

const INDENT: &str = "    ";

/// Render a document as TS text.
#[must_use]
pub fn write_document(document: &Document) -> String {
    document.to_string()
}

impl Document {
    /// Render as TS text. Same as [`write_document`].
    #[must_use]
    pub fn to_ts_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n<TS")?;
        write_attr(f, "version", self.version.as_deref())?;
        write_attr(f, "sourcelanguage", self.source_language.as_deref())?;
        write_attr(f, "language", self.language.as_deref())?;
        f.write_str(">\n")?;
        for extra in &self.extras {
            write_extra(f, 0, extra)?;
        }
        for context in &self.contexts {
            write_context(f, context)?;
        }
        f.write_str("</TS>\n")
    }
}

fn write_context(out: &mut impl Write, context: &Context) -> fmt::Result {
    out.write_str("<context>\n")?;
    write_leaf(out, 1, "name", &context.name)?;
    for message in &context.messages {
        write_message(out, message)?;
    }
    out.write_str("</context>\n")
}

fn write_message(out: &mut impl Write, message: &Message) -> fmt::Result {
    write!(out, "{INDENT}<message")?;
    write_attr(out, "id", message.id.as_deref())?;
    if message.numerus {
        out.write_str(" numerus=\"yes\"")?;
    }
    out.write_str(">\n")?;

    for location in &message.locations {
        write!(out, "{INDENT}{INDENT}<location")?;
        write_attr(out, "filename", location.filename.as_deref())?;
        write_attr(out, "line", location.line.as_deref())?;
        out.write_str("/>\n")?;
    }
    write_leaf(out, 2, "source", &message.source)?;
    write_opt_leaf(out, "oldsource", message.old_source.as_ref())?;
    write_opt_leaf(out, "comment", message.comment.as_ref())?;
    write_opt_leaf(out, "oldcomment", message.old_comment.as_ref())?;
    write_opt_leaf(out, "extracomment", message.extra_comment.as_ref())?;
    write_opt_leaf(out, "translatorcomment", message.translator_comment.as_ref())?;

    if let Some(translation) = &message.translation {
        write!(out, "{INDENT}{INDENT}<translation")?;
        write_attr(out, "type", translation.marker.as_attr())?;
        out.write_char('>')?;
        match &translation.forms {
            TranslationForms::Single(text) => out.write_str(text.raw())?,
            TranslationForms::Plural(forms) => {
                out.write_char('\n')?;
                for form in forms {
                    write_leaf(out, 3, "numerusform", form)?;
                }
                write!(out, "{INDENT}{INDENT}")?;
            }
        }
        out.write_str("</translation>\n")?;
    }

    for extra in &message.extras {
        write_extra(out, 2, extra)?;
    }
    writeln!(out, "{INDENT}</message>")
}

fn write_extra(out: &mut impl Write, depth: usize, extra: &Extra) -> fmt::Result {
    write_leaf(out, depth, &extra.name, &extra.content)
}

fn write_opt_leaf(out: &mut impl Write, name: &str, text: Option<&TextNode>) -> fmt::Result {
    match text {
        Some(text) => write_leaf(out, 2, name, text),
        None => Ok(()),
    }
}

fn write_leaf(out: &mut impl Write, depth: usize, name: &str, text: &TextNode) -> fmt::Result {
    for _ in 0..depth {
        out.write_str(INDENT)?;
    }
    writeln!(out, "<{name}>{}</{name}>", text.raw())
}

fn write_attr(out: &mut impl Write, key: &str, value: Option<&str>) -> fmt::Result {
    match value {
        Some(value) => write!(out, " {key}=\"{}\"", escape(value)),
        None => Ok(()),
    }
}

/// Canonical escape of decoded text.
///
/// The five markup characters become entities; control characters other
/// than tab, newline and carriage return become `<byte>` elements, since
/// XML 1.0 cannot carry them as text.
pub(crate) fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut plain_start = 0;
    for (index, ch) in text.char_indices() {
        if ch < ' ' && !matches!(ch, '\t' | '\n' | '\r') {
            out.push_str(&escape(&text[plain_start..index]));
            out.push_str(&format!("<byte value=\"x{:x}\"/>", u32::from(ch)));
            plain_start = index + ch.len_utf8();
        }
    }
    out.push_str(&escape(&text[plain_start..]));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Context, Location, Message, StatusMarker, Translation};
    use crate::parse::parse_str;

    #[test]
    fn writes_canonical_layout() {
        let doc = Document::new("de").with_context(
            Context::new("Dialog")
                .with_message(
                    Message::new("Don't Save").with_translation(Translation::single("Nicht speichern")),
                )
                .with_message(
                    Message::new("%n file(s)").with_translation(
                        Translation::plural(["%n Datei", ""]).with_marker(StatusMarker::Unfinished),
                    ),
                ),
        );

        let expected = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
<!DOCTYPE TS>\n\
<TS version=\"2.1\" language=\"de\">\n\
<context>\n\
\x20   <name>Dialog</name>\n\
\x20   <message>\n\
\x20       <source>Don&apos;t Save</source>\n\
\x20       <translation>Nicht speichern</translation>\n\
\x20   </message>\n\
\x20   <message numerus=\"yes\">\n\
\x20       <source>%n file(s)</source>\n\
\x20       <translation type=\"unfinished\">\n\
\x20           <numerusform>%n Datei</numerusform>\n\
\x20           <numerusform></numerusform>\n\
\x20       </translation>\n\
\x20   </message>\n\
</context>\n\
</TS>\n";
        assert_eq!(doc.to_ts_string(), expected);
    }

    #[test]
    fn write_then_parse_preserves_model() {
        let mut message = Message::new("Tab\tand\nnewline <here>")
            .with_comment("menu")
            .with_translation(Translation::single("Tab\tund\nZeilenumbruch <hier>"));
        message.locations.push(Location {
            filename: Some("../a&b.cpp".into()),
            line: Some("12".into()),
        });
        message.extra_comment = Some(TextNode::new("shown in the \"File\" menu"));
        let doc = Document::new("de").with_context(Context::new("Menu").with_message(message));

        let reparsed = parse_str(&write_document(&doc)).unwrap();
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn escape_text_handles_controls() {
        assert_eq!(escape_text("plain"), "plain");
        assert_eq!(escape_text("a<b"), "a&lt;b");
        assert_eq!(escape_text("\u{7}bell & \u{1b}"), "<byte value=\"x7\"/>bell &amp; <byte value=\"x1b\"/>");
        assert_eq!(escape_text("tab\tnl\n"), "tab\tnl\n");
    }

    #[test]
    fn missing_translation_writes_no_element() {
        let doc = Document::new("fr").with_context(Context::new("C").with_message(Message::new("x")));
        let text = write_document(&doc);
        assert!(!text.contains("<translation"));
    }
}
