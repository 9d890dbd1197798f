//! Support for the Qt Linguist TS catalog format.
//!
//! The reader is strict about structure: elements out of place (a `<message>`
//! outside a `<context>`, a `<numerusform>` outside a `<translation>`, text
//! where only elements belong) fail the whole document. Elements it does not
//! know about are skipped.

use std::{
    io::{BufRead, Write},
    str::FromStr,
};

use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    name::QName,
};

use crate::{
    error::Error,
    traits::Document,
    types::{Catalog, Context, Location, Message, MessageStatus, Translation},
};

/// A TS document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    pub catalog: Catalog,
}

impl Document for Format {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml = Reader::from_reader(reader);
        xml.config_mut().trim_text(false);

        let mut buf = Vec::new();
        loop {
            match xml.read_event_into(&mut buf)? {
                Event::Start(e) if e.name().as_ref() == b"TS" => {
                    let catalog = read_ts(&e, &mut xml, false)?;
                    return Ok(Format { catalog });
                }
                Event::Empty(e) if e.name().as_ref() == b"TS" => {
                    let catalog = read_ts(&e, &mut xml, true)?;
                    return Ok(Format { catalog });
                }
                Event::Start(e) | Event::Empty(e) => {
                    return Err(Error::malformed(format!(
                        "root element must be <TS>, found <{}>",
                        element_name(&e)
                    )));
                }
                Event::Text(t) if !is_blank(&t.unescape()?) => {
                    return Err(Error::malformed("text outside the <TS> element"));
                }
                Event::Eof => return Err(Error::malformed("document has no <TS> element")),
                _ => {}
            }
            buf.clear();
        }
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let catalog = &self.catalog;
        let mut xml = Writer::new_with_indent(&mut writer, b' ', 4);

        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml.write_event(Event::DocType(BytesText::from_escaped("TS")))?;

        let mut ts = BytesStart::new("TS");
        if let Some(version) = &catalog.version {
            ts.push_attribute(("version", version.as_str()));
        }
        if !catalog.locale.is_empty() {
            ts.push_attribute(("language", catalog.locale.as_str()));
        }
        if let Some(source_locale) = &catalog.source_locale {
            ts.push_attribute(("sourcelanguage", source_locale.as_str()));
        }
        xml.write_event(Event::Start(ts))?;

        if let Some(codec) = &catalog.default_codec {
            write_text_element(&mut xml, "defaultcodec", codec)?;
        }
        for context in &catalog.contexts {
            write_context(&mut xml, context)?;
        }

        xml.write_event(Event::End(BytesEnd::new("TS")))?;
        xml.get_mut().write_all(b"\n")?;
        Ok(())
    }
}

impl From<Format> for Catalog {
    fn from(value: Format) -> Self {
        value.catalog
    }
}

impl From<Catalog> for Format {
    fn from(value: Catalog) -> Self {
        Format { catalog: value }
    }
}

// ── Reading ─────────────────────────────────────────────────────────

/// Elements whose position in the document is fixed.
const STRUCTURAL: &[&[u8]] = &[
    b"TS",
    b"context",
    b"name",
    b"message",
    b"source",
    b"oldsource",
    b"comment",
    b"oldcomment",
    b"extracomment",
    b"translatorcomment",
    b"location",
    b"translation",
    b"numerusform",
    b"lengthvariant",
];

fn is_structural(name: &[u8]) -> bool {
    STRUCTURAL.contains(&name)
}

fn is_blank(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn misplaced(e: &BytesStart, parent: &str) -> Error {
    Error::malformed(format!(
        "<{}> is not allowed inside <{}>",
        element_name(e),
        parent
    ))
}

fn unexpected_eof(parent: &str) -> Error {
    Error::malformed(format!("unexpected end of document inside <{}>", parent))
}

fn attribute(e: &BytesStart, key: &[u8]) -> Result<Option<String>, Error> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn skip_element<R: BufRead>(xml: &mut Reader<R>, e: &BytesStart) -> Result<(), Error> {
    let name = e.name().as_ref().to_vec();
    tracing::debug!(
        element = %String::from_utf8_lossy(&name),
        "skipping unknown element"
    );
    let mut skipped = Vec::new();
    xml.read_to_end_into(QName(&name), &mut skipped)?;
    Ok(())
}

/// Decodes Qt's `<byte value="x1b"/>` escape (hex with an `x` prefix,
/// decimal otherwise).
fn byte_char(e: &BytesStart) -> Result<char, Error> {
    let value = attribute(e, b"value")?
        .ok_or_else(|| Error::malformed("<byte> without a value"))?;
    let code = match value.strip_prefix('x') {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => value.parse::<u32>().ok(),
    };
    code.and_then(char::from_u32)
        .ok_or_else(|| Error::malformed(format!("invalid <byte> value `{}`", value)))
}

/// Reads character content up to the end of the element `parent`.
fn read_text<R: BufRead>(xml: &mut Reader<R>, parent: &str) -> Result<String, Error> {
    let mut buf = Vec::new();
    let mut text = String::new();
    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Text(t) => text.push_str(&t.unescape()?),
            Event::CData(c) => text.push_str(
                std::str::from_utf8(&c)
                    .map_err(|_| Error::malformed("CDATA section is not valid UTF-8"))?,
            ),
            Event::Empty(e) if e.name().as_ref() == b"byte" => text.push(byte_char(&e)?),
            Event::Start(e) | Event::Empty(e) => return Err(misplaced(&e, parent)),
            Event::End(_) => break,
            Event::Eof => return Err(unexpected_eof(parent)),
            _ => {}
        }
        buf.clear();
    }
    Ok(text)
}

fn read_ts<R: BufRead>(
    start: &BytesStart,
    xml: &mut Reader<R>,
    empty: bool,
) -> Result<Catalog, Error> {
    let mut catalog = Catalog {
        locale: attribute(start, b"language")?.unwrap_or_default(),
        source_locale: attribute(start, b"sourcelanguage")?,
        version: attribute(start, b"version")?,
        ..Default::default()
    };
    if empty {
        return Ok(catalog);
    }

    let mut buf = Vec::new();
    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"context" => {
                    let context = read_context(xml)?;
                    if catalog.context(&context.name).is_some() {
                        return Err(Error::malformed("duplicate context name")
                            .located(Some(context.name.as_str()), None));
                    }
                    catalog.contexts.push(context);
                }
                b"defaultcodec" => catalog.default_codec = Some(read_text(xml, "defaultcodec")?),
                name if is_structural(name) => return Err(misplaced(&e, "TS")),
                _ => skip_element(xml, &e)?,
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"defaultcodec" => catalog.default_codec = Some(String::new()),
                b"context" => return Err(Error::malformed("context without <name>")),
                name if is_structural(name) => return Err(misplaced(&e, "TS")),
                _ => {}
            },
            Event::Text(t) if !is_blank(&t.unescape()?) => {
                return Err(Error::malformed("unexpected text inside <TS>"));
            }
            Event::End(_) => break,
            Event::Eof => return Err(unexpected_eof("TS")),
            _ => {}
        }
        buf.clear();
    }
    Ok(catalog)
}

fn read_context<R: BufRead>(xml: &mut Reader<R>) -> Result<Context, Error> {
    let mut name: Option<String> = None;
    let mut comment = None;
    let mut messages = Vec::new();

    let mut buf = Vec::new();
    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"name" => name = Some(read_text(xml, "name")?),
                b"comment" => comment = Some(read_text(xml, "comment")?),
                b"message" => {
                    let message = read_message(&e, xml, false)
                        .map_err(|err| err.located(name.as_deref(), None))?;
                    messages.push(message);
                }
                tag if is_structural(tag) => {
                    return Err(misplaced(&e, "context").located(name.as_deref(), None));
                }
                _ => skip_element(xml, &e)?,
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"name" => name = Some(String::new()),
                b"comment" => comment = Some(String::new()),
                b"message" => {
                    let message = read_message(&e, xml, true)
                        .map_err(|err| err.located(name.as_deref(), None))?;
                    messages.push(message);
                }
                tag if is_structural(tag) => {
                    return Err(misplaced(&e, "context").located(name.as_deref(), None));
                }
                _ => {}
            },
            Event::Text(t) if !is_blank(&t.unescape()?) => {
                return Err(Error::malformed("unexpected text inside <context>")
                    .located(name.as_deref(), None));
            }
            Event::End(_) => break,
            Event::Eof => return Err(unexpected_eof("context").located(name.as_deref(), None)),
            _ => {}
        }
        buf.clear();
    }

    let name = name.ok_or_else(|| Error::malformed("context without <name>"))?;
    Ok(Context {
        name,
        comment,
        messages,
    })
}

fn read_message<R: BufRead>(
    start: &BytesStart,
    xml: &mut Reader<R>,
    empty: bool,
) -> Result<Message, Error> {
    let numerus = attribute(start, b"numerus")?.is_some_and(|v| v == "yes");
    let mut message = Message {
        id: attribute(start, b"id")?,
        numerus,
        ..Default::default()
    };
    let mut source: Option<String> = None;
    let mut stated = MessageStatus::Translated;

    let mut buf = Vec::new();
    while !empty {
        match xml.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"source" => source = Some(read_text(xml, "source")?),
                b"comment" => message.comment = read_text(xml, "comment")?,
                b"oldsource" => message.old_source = Some(read_text(xml, "oldsource")?),
                b"oldcomment" => message.old_comment = Some(read_text(xml, "oldcomment")?),
                b"extracomment" => {
                    message.extra_comment = Some(read_text(xml, "extracomment")?)
                }
                b"translatorcomment" => {
                    message.translator_comment = Some(read_text(xml, "translatorcomment")?)
                }
                b"location" => {
                    message.locations.push(read_location(&e)?);
                    skip_element(xml, &e)?;
                }
                b"translation" => {
                    let (status, translation) = read_translation(&e, xml, numerus)
                        .map_err(|err| err.located(None, source.as_deref()))?;
                    stated = status;
                    message.translation = translation;
                }
                tag if is_structural(tag) => {
                    return Err(misplaced(&e, "message").located(None, source.as_deref()));
                }
                _ => skip_element(xml, &e)?,
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"source" => source = Some(String::new()),
                b"comment" => message.comment = String::new(),
                b"oldsource" => message.old_source = Some(String::new()),
                b"oldcomment" => message.old_comment = Some(String::new()),
                b"extracomment" => message.extra_comment = Some(String::new()),
                b"translatorcomment" => message.translator_comment = Some(String::new()),
                b"location" => message.locations.push(read_location(&e)?),
                b"translation" => {
                    stated = translation_status(&e)?;
                    message.translation = None;
                }
                tag if is_structural(tag) => {
                    return Err(misplaced(&e, "message").located(None, source.as_deref()));
                }
                _ => {}
            },
            Event::Text(t) if !is_blank(&t.unescape()?) => {
                return Err(Error::malformed("unexpected text inside <message>")
                    .located(None, source.as_deref()));
            }
            Event::End(_) => break,
            Event::Eof => return Err(unexpected_eof("message").located(None, source.as_deref())),
            _ => {}
        }
        buf.clear();
    }

    message.source = source.ok_or_else(|| Error::malformed("message without <source>"))?;
    message.status = MessageStatus::derive(stated, message.translation.as_ref());
    Ok(message)
}

fn read_location(e: &BytesStart) -> Result<Location, Error> {
    Ok(Location {
        filename: attribute(e, b"filename")?,
        line: attribute(e, b"line")?,
    })
}

fn translation_status(e: &BytesStart) -> Result<MessageStatus, Error> {
    match attribute(e, b"type")? {
        None => Ok(MessageStatus::Translated),
        Some(value) => match value.as_str() {
            "unfinished" => Ok(MessageStatus::Unfinished),
            "obsolete" | "vanished" => Ok(MessageStatus::Obsolete),
            other => MessageStatus::from_str(other).map_err(|_| {
                Error::malformed(format!("unknown translation type `{}`", other))
            }),
        },
    }
}

fn read_translation<R: BufRead>(
    start: &BytesStart,
    xml: &mut Reader<R>,
    numerus: bool,
) -> Result<(MessageStatus, Option<Translation>), Error> {
    let status = translation_status(start)?;
    let mut text = String::new();
    let mut forms: Vec<String> = Vec::new();
    let mut variants: Vec<String> = Vec::new();

    let mut buf = Vec::new();
    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Text(t) => text.push_str(&t.unescape()?),
            Event::CData(c) => text.push_str(
                std::str::from_utf8(&c)
                    .map_err(|_| Error::malformed("CDATA section is not valid UTF-8"))?,
            ),
            Event::Start(e) => match e.name().as_ref() {
                b"numerusform" => forms.push(read_text(xml, "numerusform")?),
                b"lengthvariant" => variants.push(read_text(xml, "lengthvariant")?),
                _ => return Err(misplaced(&e, "translation")),
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"numerusform" => forms.push(String::new()),
                b"lengthvariant" => variants.push(String::new()),
                b"byte" => text.push(byte_char(&e)?),
                _ => return Err(misplaced(&e, "translation")),
            },
            Event::End(_) => break,
            Event::Eof => return Err(unexpected_eof("translation")),
            _ => {}
        }
        buf.clear();
    }

    let translation = if numerus {
        if !is_blank(&text) || !variants.is_empty() {
            return Err(Error::malformed(
                "numerus message with a non-list translation body",
            ));
        }
        (!forms.is_empty()).then_some(Translation::Plural(forms))
    } else {
        if !forms.is_empty() {
            return Err(Error::malformed("<numerusform> in a non-numerus message"));
        }
        match variants.into_iter().next() {
            Some(first) => Some(Translation::Singular(first)),
            None => Some(Translation::Singular(text)),
        }
    };
    Ok((status, translation))
}

// ── Writing ─────────────────────────────────────────────────────────

fn write_text<W: Write>(xml: &mut Writer<W>, text: &str) -> Result<(), Error> {
    // XML 1.0 cannot carry most control characters; Qt writes them as <byte>.
    let mut run_start = 0;
    for (i, c) in text.char_indices() {
        if c.is_control() && !matches!(c, '\t' | '\n' | '\r') {
            xml.write_event(Event::Text(BytesText::new(&text[run_start..i])))?;
            let mut byte = BytesStart::new("byte");
            byte.push_attribute(("value", format!("x{:x}", c as u32).as_str()));
            xml.write_event(Event::Empty(byte))?;
            run_start = i + c.len_utf8();
        }
    }
    xml.write_event(Event::Text(BytesText::new(&text[run_start..])))?;
    Ok(())
}

fn write_text_element<W: Write>(xml: &mut Writer<W>, name: &str, text: &str) -> Result<(), Error> {
    xml.write_event(Event::Start(BytesStart::new(name)))?;
    write_text(xml, text)?;
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_context<W: Write>(xml: &mut Writer<W>, context: &Context) -> Result<(), Error> {
    xml.write_event(Event::Start(BytesStart::new("context")))?;
    write_text_element(xml, "name", &context.name)?;
    if let Some(comment) = &context.comment {
        write_text_element(xml, "comment", comment)?;
    }
    for message in &context.messages {
        write_message(xml, message)?;
    }
    xml.write_event(Event::End(BytesEnd::new("context")))?;
    Ok(())
}

fn write_message<W: Write>(xml: &mut Writer<W>, message: &Message) -> Result<(), Error> {
    let mut start = BytesStart::new("message");
    if let Some(id) = &message.id {
        start.push_attribute(("id", id.as_str()));
    }
    if message.numerus {
        start.push_attribute(("numerus", "yes"));
    }
    xml.write_event(Event::Start(start))?;

    for location in &message.locations {
        let mut elem = BytesStart::new("location");
        if let Some(filename) = &location.filename {
            elem.push_attribute(("filename", filename.as_str()));
        }
        if let Some(line) = &location.line {
            elem.push_attribute(("line", line.as_str()));
        }
        xml.write_event(Event::Empty(elem))?;
    }
    write_text_element(xml, "source", &message.source)?;
    if let Some(old_source) = &message.old_source {
        write_text_element(xml, "oldsource", old_source)?;
    }
    if !message.comment.is_empty() {
        write_text_element(xml, "comment", &message.comment)?;
    }
    if let Some(old_comment) = &message.old_comment {
        write_text_element(xml, "oldcomment", old_comment)?;
    }
    if let Some(extra) = &message.extra_comment {
        write_text_element(xml, "extracomment", extra)?;
    }
    if let Some(note) = &message.translator_comment {
        write_text_element(xml, "translatorcomment", note)?;
    }

    let mut translation = BytesStart::new("translation");
    match message.status {
        MessageStatus::Translated => {}
        MessageStatus::Unfinished => translation.push_attribute(("type", "unfinished")),
        MessageStatus::Obsolete => translation.push_attribute(("type", "obsolete")),
    }
    match &message.translation {
        None => xml.write_event(Event::Empty(translation))?,
        Some(Translation::Singular(text)) => {
            xml.write_event(Event::Start(translation))?;
            write_text(xml, text)?;
            xml.write_event(Event::End(BytesEnd::new("translation")))?;
        }
        Some(Translation::Plural(forms)) => {
            xml.write_event(Event::Start(translation))?;
            for form in forms {
                write_text_element(xml, "numerusform", form)?;
            }
            xml.write_event(Event::End(BytesEnd::new("translation")))?;
        }
    }

    xml.write_event(Event::End(BytesEnd::new("message")))?;
    Ok(())
}
