//! TS catalog codec.
//!
//! Round-trips a [`Catalog`] through the XML "TS" format:
//!
//! ```text
//! <?xml version="1.0" encoding="utf-8"?>
//! <!DOCTYPE TS>
//! <TS version="2.1" language="fr_FR">
//! <context>
//!     <name>AssetLocator</name>
//!     <message>
//!         <location filename="../src/openblox/AssetLocator.cpp" line="88"/>
//!         <source>Failed to allocate memory.</source>
//!         <translation>Échec de l&apos;allocation de la mémoire.</translation>
//!     </message>
//! </context>
//! </TS>
//! ```
//!
//! # Invariants
//!
//! 1. **Round-trip**: `deserialize(&serialize(c)) == Ok(c)` for every catalog.
//! 2. **Deterministic output**: equal catalogs serialize to identical bytes;
//!    contexts, messages and locations are written in insertion order.
//! 3. **Forward compatible**: unknown elements and attributes are skipped and
//!    the version attribute is informational.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing `language` | Root without locale | `Schema` error |
//! | Missing `<source>` / `<name>` | Mandatory field absent | `Schema` error |
//! | Bad `line` attribute | Non-decimal line number | `Schema` error |
//! | Unknown `type` on `<translation>` | Unsupported status | `Schema` error |
//! | Duplicate key in a context | Two identical messages | `Schema` error |
//! | Malformed XML | Broken markup | `Schema` error |

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};

use crate::error::{CatalogError, Result};
use crate::model::{Catalog, FormatVersion, Location, Message, Translation, TranslationStatus};

const INDENT: &str = "    ";

// ---------------------------------------------------------------------------
// Serializer
// ---------------------------------------------------------------------------

/// Encode a catalog as TS bytes.
#[must_use]
pub fn serialize(catalog: &Catalog) -> Vec<u8> {
    let mut out = String::with_capacity(256 + catalog.len() * 256);
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n");

    out.push_str("<TS version=\"");
    out.push_str(&catalog.version().to_string());
    out.push_str("\" language=\"");
    out.push_str(&escape(catalog.language()));
    out.push('"');
    if let Some(source_language) = catalog.source_language() {
        out.push_str(" sourcelanguage=\"");
        out.push_str(&escape(source_language));
        out.push('"');
    }
    out.push_str(">\n");

    for context in catalog.contexts() {
        out.push_str("<context>\n");
        write_element(&mut out, 1, "name", context.name());
        for message in context.messages() {
            write_message(&mut out, message);
        }
        out.push_str("</context>\n");
    }

    out.push_str("</TS>\n");
    tracing::debug!(
        target: "tscat.codec",
        language = %catalog.language(),
        messages = catalog.len(),
        bytes = out.len(),
        "catalog serialized"
    );
    out.into_bytes()
}

fn write_message(out: &mut String, message: &Message) {
    indent(out, 1);
    out.push_str("<message>\n");
    for location in message.locations() {
        indent(out, 2);
        out.push_str("<location filename=\"");
        out.push_str(&escape(location.file.as_str()));
        out.push_str("\" line=\"");
        out.push_str(&location.line.to_string());
        out.push_str("\"/>\n");
    }
    write_element(out, 2, "source", message.source());
    if let Some(note) = message.disambiguation() {
        write_element(out, 2, "comment", note);
    }
    if let Some(comment) = message.extra_comment() {
        write_element(out, 2, "extracomment", comment);
    }
    if let Some(comment) = message.translator_comment() {
        write_element(out, 2, "translatorcomment", comment);
    }

    let translation = message.translation();
    indent(out, 2);
    match translation.status() {
        TranslationStatus::Finished => out.push_str("<translation>"),
        status => {
            out.push_str("<translation type=\"");
            out.push_str(status.as_str());
            out.push_str("\">");
        }
    }
    out.push_str(&escape(translation.text()));
    out.push_str("</translation>\n");

    indent(out, 1);
    out.push_str("</message>\n");
}

fn write_element(out: &mut String, depth: usize, tag: &str, text: &str) {
    indent(out, depth);
    out.push('<');
    out.push_str(tag);
    out.push('>');
    out.push_str(&escape(text));
    out.push_str("</");
    out.push_str(tag);
    out.push_str(">\n");
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

// ---------------------------------------------------------------------------
// Deserializer
// ---------------------------------------------------------------------------

/// Decode TS bytes into a catalog.
///
/// Aborts with [`CatalogError::Schema`] rather than returning a partially
/// built catalog.
pub fn deserialize(bytes: &[u8]) -> Result<Catalog> {
    let _span = tracing::debug_span!("tscat.deserialize", bytes = bytes.len()).entered();
    let catalog = Parser::new(bytes).document()?;
    if catalog.version().is_newer_than_supported() {
        tracing::warn!(
            target: "tscat.codec",
            version = %catalog.version(),
            supported = %FormatVersion::CURRENT,
            "catalog written by a newer format revision; unknown fields skipped"
        );
    }
    tracing::debug!(
        target: "tscat.codec",
        language = %catalog.language(),
        contexts = catalog.contexts().len(),
        messages = catalog.len(),
        "catalog deserialized"
    );
    Ok(catalog)
}

struct Parser<'a> {
    reader: Reader<&'a [u8]>,
}

/// Fields collected while reading one `<message>`.
#[derive(Default)]
struct MessageFields {
    source: Option<String>,
    disambiguation: Option<String>,
    extra_comment: Option<String>,
    translator_comment: Option<String>,
    locations: Vec<Location>,
    translation: Option<Translation>,
}

impl<'a> Parser<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        let mut reader = Reader::from_reader(bytes);
        reader.config_mut().trim_text(false);
        Self { reader }
    }

    fn error(&self, message: impl Into<String>) -> CatalogError {
        CatalogError::schema(message, self.reader.buffer_position() as u64)
    }

    fn next(&mut self) -> Result<Event<'a>> {
        match self.reader.read_event() {
            Ok(event) => Ok(event),
            Err(e) => Err(self.error(format!("malformed XML: {e}"))),
        }
    }

    fn document(&mut self) -> Result<Catalog> {
        loop {
            match self.next()? {
                Event::Start(e) if e.local_name().as_ref() == b"TS" => {
                    let mut catalog = self.root(&e)?;
                    self.root_body(&mut catalog)?;
                    return Ok(catalog);
                }
                Event::Empty(e) if e.local_name().as_ref() == b"TS" => return self.root(&e),
                Event::Start(e) | Event::Empty(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    return Err(self.error(format!("unexpected root element <{name}>")));
                }
                Event::Eof => return Err(self.error("missing <TS> root element")),
                _ => {}
            }
        }
    }

    fn root(&self, e: &BytesStart<'_>) -> Result<Catalog> {
        let language = self
            .attribute(e, b"language")?
            .ok_or_else(|| self.error("<TS> is missing the language attribute"))?;
        let mut catalog = Catalog::new(language);
        let version = match self.attribute(e, b"version")? {
            Some(raw) => raw
                .parse::<FormatVersion>()
                .map_err(|err| self.error(err.to_string()))?,
            None => FormatVersion::IMPLICIT,
        };
        catalog.set_version(version);
        catalog.set_source_language(self.attribute(e, b"sourcelanguage")?);
        Ok(catalog)
    }

    fn root_body(&mut self, catalog: &mut Catalog) -> Result<()> {
        loop {
            match self.next()? {
                Event::Start(e) if e.local_name().as_ref() == b"context" => {
                    self.context(catalog)?;
                }
                Event::Empty(e) if e.local_name().as_ref() == b"context" => {
                    return Err(self.error("<context> is missing <name>"));
                }
                Event::Start(e) => self.skip(&e)?,
                Event::End(_) => return Ok(()),
                Event::Eof => return Err(self.error("unterminated <TS> element")),
                _ => {}
            }
        }
    }

    fn context(&mut self, catalog: &mut Catalog) -> Result<()> {
        let mut name = None;
        let mut messages = Vec::new();
        loop {
            match self.next()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"name" => name = Some(self.text()?),
                    b"message" => messages.push(self.message()?),
                    _ => self.skip(&e)?,
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"name" => name = Some(String::new()),
                    b"message" => return Err(self.error("<message> is missing <source>")),
                    _ => {}
                },
                Event::End(_) => break,
                Event::Eof => return Err(self.error("unterminated <context> element")),
                _ => {}
            }
        }

        let name = name.ok_or_else(|| self.error("<context> is missing <name>"))?;
        // A repeated context name continues the earlier context.
        let index = catalog.context_index_or_insert(&name);
        for message in messages {
            let inserted = catalog
                .context_at_mut(index)
                .map(|context| context.insert(message));
            if let Some(Err(duplicate)) = inserted {
                let key = duplicate.key(&name);
                return Err(self.error(format!("duplicate message {key}")));
            }
        }
        Ok(())
    }

    fn message(&mut self) -> Result<Message> {
        let mut fields = MessageFields::default();
        loop {
            match self.next()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"location" => {
                        fields.locations.push(self.location(&e)?);
                        self.skip(&e)?;
                    }
                    b"source" => fields.source = Some(self.text()?),
                    b"comment" => fields.disambiguation = Some(self.text()?),
                    b"extracomment" => fields.extra_comment = Some(self.text()?),
                    b"translatorcomment" => fields.translator_comment = Some(self.text()?),
                    b"translation" => {
                        let status = self.translation_status(&e)?;
                        let text = self.text()?;
                        fields.translation = Some(Translation::with_status(status, text));
                    }
                    _ => self.skip(&e)?,
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"location" => fields.locations.push(self.location(&e)?),
                    b"source" => fields.source = Some(String::new()),
                    b"translation" => {
                        let status = self.translation_status(&e)?;
                        fields.translation = Some(Translation::with_status(status, ""));
                    }
                    _ => {}
                },
                Event::End(_) => break,
                Event::Eof => return Err(self.error("unterminated <message> element")),
                _ => {}
            }
        }

        let source = fields
            .source
            .ok_or_else(|| self.error("<message> is missing <source>"))?;
        let mut message = Message::new(source, fields.disambiguation);
        for location in fields.locations {
            message.push_location(location);
        }
        message.set_extra_comment(fields.extra_comment);
        message.set_translator_comment(fields.translator_comment);
        message.set_translation(fields.translation.unwrap_or_default());
        Ok(message)
    }

    fn location(&self, e: &BytesStart<'_>) -> Result<Location> {
        let file = self
            .attribute(e, b"filename")?
            .ok_or_else(|| self.error("<location> is missing the filename attribute"))?;
        let raw = self
            .attribute(e, b"line")?
            .ok_or_else(|| self.error("<location> is missing the line attribute"))?;
        let digits = raw.trim();
        // Relative forms such as `+3` are not supported.
        let line = digits
            .bytes()
            .all(|b| b.is_ascii_digit())
            .then(|| digits.parse().ok())
            .flatten()
            .ok_or_else(|| self.error(format!("<location> line `{raw}` is not a line number")))?;
        Ok(Location::new(file, line))
    }

    fn translation_status(&self, e: &BytesStart<'_>) -> Result<TranslationStatus> {
        match self.attribute(e, b"type")?.as_deref() {
            None => Ok(TranslationStatus::Finished),
            Some("unfinished") => Ok(TranslationStatus::Unfinished),
            Some("obsolete") => Ok(TranslationStatus::Obsolete),
            Some("vanished") => Ok(TranslationStatus::Vanished),
            Some(other) => Err(self.error(format!("unknown translation type `{other}`"))),
        }
    }

    /// Concatenated character data up to the matching end tag.
    ///
    /// Nested elements inside text fields are skipped.
    fn text(&mut self) -> Result<String> {
        let mut text = String::new();
        loop {
            match self.next()? {
                Event::Text(t) => {
                    let chunk = t
                        .unescape()
                        .map_err(|e| self.error(format!("bad character data: {e}")))?;
                    text.push_str(&chunk);
                }
                Event::CData(c) => {
                    let raw = c.into_inner();
                    text.push_str(&String::from_utf8_lossy(&raw));
                }
                Event::Start(e) => self.skip(&e)?,
                Event::End(_) => return Ok(text),
                Event::Eof => return Err(self.error("unterminated text element")),
                _ => {}
            }
        }
    }

    fn skip(&mut self, e: &BytesStart<'_>) -> Result<()> {
        let name = e.name().as_ref().to_vec();
        self.reader
            .read_to_end(quick_xml::name::QName(&name))
            .map(|_| ())
            .map_err(|err| self.error(format!("malformed XML: {err}")))
    }

    fn attribute(&self, e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
        for attr in e.attributes() {
            let attr = attr.map_err(|err| self.error(format!("bad attribute: {err}")))?;
            if attr.key.local_name().as_ref() == key {
                let value: Cow<'_, str> = attr
                    .unescape_value()
                    .map_err(|err| self.error(format!("bad attribute value: {err}")))?;
                return Ok(Some(value.into_owned()));
            }
        }
        Ok(None)
    }
}
