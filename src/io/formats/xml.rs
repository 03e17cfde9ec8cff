//! XML format adapter.
//!
//! Parses `<BusinessCards>` collection documents into raw cards and
//! serializes canonical cards back out in the same schema. Parser and
//! sink share one tag-name table ([`crate::io::schema`]), so the two
//! sides cannot drift apart.

use crate::io::formats::IngestFormat;
use crate::io::schema;
use crate::io::traits::{ExportSink, ParsedBatch, RecordParser};
use crate::models::{BusinessCard, RawCard};
use crate::{Error, Result};
use chrono::NaiveDate;
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;

/// Sub-elements of a `<BusinessCard>` record element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CardField {
    Name,
    Gender,
    DateOfBirth,
    Email,
    Phone,
    Photo,
    Address,
}

impl CardField {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            t if t == schema::NAME.as_bytes() => Some(Self::Name),
            t if t == schema::GENDER.as_bytes() => Some(Self::Gender),
            t if t == schema::DATE_OF_BIRTH.as_bytes() => Some(Self::DateOfBirth),
            t if t == schema::EMAIL.as_bytes() => Some(Self::Email),
            t if t == schema::PHONE.as_bytes() => Some(Self::Phone),
            t if t == schema::PHOTO.as_bytes() => Some(Self::Photo),
            t if t == schema::ADDRESS.as_bytes() => Some(Self::Address),
            _ => None,
        }
    }
}

fn parse_error(cause: impl Into<String>) -> Error {
    Error::Parse {
        format: IngestFormat::Xml,
        cause: cause.into(),
    }
}

/// Parses an XML collection document into raw cards.
///
/// All-or-nothing: a malformed document, absent `<BusinessCard>` children,
/// or an unparsable `<DateOfBirth>` fails the whole call. Unknown
/// sub-elements (including the exporter's `<Id>`) are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlCardParser;

impl XmlCardParser {
    /// Creates a new XML parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn assign(card: &mut RawCard, field: CardField, text: String) -> Result<()> {
        match field {
            CardField::Name => card.name = Some(text),
            CardField::Gender => card.gender = Some(text),
            CardField::DateOfBirth => {
                let date = text.parse::<NaiveDate>().map_err(|e| {
                    parse_error(format!("invalid date of birth '{text}': {e}"))
                })?;
                card.date_of_birth = Some(date);
            },
            CardField::Email => card.email = Some(text),
            CardField::Phone => card.phone = Some(text),
            CardField::Photo => card.photo = Some(text),
            CardField::Address => card.address = Some(text),
        }
        Ok(())
    }
}

impl RecordParser for XmlCardParser {
    fn parse(&self, input: &str) -> Result<ParsedBatch> {
        let mut reader = Reader::from_str(input);
        reader.config_mut().trim_text(true);

        let mut batch = ParsedBatch::default();
        let mut current: Option<RawCard> = None;
        let mut field: Option<CardField> = None;

        loop {
            match reader.read_event() {
                Err(e) => return Err(parse_error(e.to_string())),
                Ok(Event::Eof) => break,
                Ok(Event::Start(e)) => {
                    let name = e.name();
                    if name.as_ref() == schema::RECORD_ELEMENT.as_bytes() {
                        current = Some(RawCard::default());
                        field = None;
                    } else if current.is_some() {
                        field = CardField::from_tag(name.as_ref());
                    }
                },
                Ok(Event::Empty(e)) => {
                    // <BusinessCard/> is a record with no fields.
                    if e.name().as_ref() == schema::RECORD_ELEMENT.as_bytes() {
                        let index = batch.records.len() + 1;
                        batch.push_record(index, RawCard::default());
                    }
                },
                Ok(Event::Text(t)) => {
                    if let (Some(card), Some(f)) = (current.as_mut(), field) {
                        let text = t
                            .unescape()
                            .map_err(|e| parse_error(e.to_string()))?
                            .into_owned();
                        Self::assign(card, f, text)?;
                    }
                },
                Ok(Event::CData(t)) => {
                    if let (Some(card), Some(f)) = (current.as_mut(), field) {
                        let text = String::from_utf8(t.into_inner().into_owned())
                            .map_err(|e| parse_error(e.to_string()))?;
                        Self::assign(card, f, text)?;
                    }
                },
                Ok(Event::End(e)) => {
                    if e.name().as_ref() == schema::RECORD_ELEMENT.as_bytes() {
                        if let Some(card) = current.take() {
                            let index = batch.records.len() + 1;
                            batch.push_record(index, card);
                        }
                    } else {
                        field = None;
                    }
                },
                Ok(_) => {},
            }
        }

        if batch.records.is_empty() {
            return Err(parse_error(format!(
                "no <{}> elements found under <{}>",
                schema::RECORD_ELEMENT,
                schema::ROOT_ELEMENT
            )));
        }

        Ok(batch)
    }
}

/// XML export sink.
///
/// Writes a `<BusinessCards>` collection document, one `<BusinessCard>`
/// child per card. The root element is emitted even for an empty export.
pub struct XmlExportSink<W: Write> {
    writer: Writer<W>,
    include_id: bool,
    root_open: bool,
}

impl<W: Write> XmlExportSink<W> {
    /// Creates a new XML export sink.
    #[must_use]
    pub fn new(writer: W, include_id: bool) -> Self {
        Self {
            writer: Writer::new_with_indent(writer, b' ', 2),
            include_id,
            root_open: false,
        }
    }

    fn emit(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| Error::OperationFailed {
                operation: "write_xml".to_string(),
                cause: e.to_string(),
            })
    }

    fn ensure_root(&mut self) -> Result<()> {
        if !self.root_open {
            self.emit(Event::Start(BytesStart::new(schema::ROOT_ELEMENT)))?;
            self.root_open = true;
        }
        Ok(())
    }

    fn text_element(&mut self, tag: &str, value: &str) -> Result<()> {
        self.emit(Event::Start(BytesStart::new(tag)))?;
        if !value.is_empty() {
            self.emit(Event::Text(BytesText::new(value)))?;
        }
        self.emit(Event::End(BytesEnd::new(tag)))
    }
}

impl<W: Write> ExportSink for XmlExportSink<W> {
    fn write(&mut self, card: &BusinessCard) -> Result<()> {
        self.ensure_root()?;

        self.emit(Event::Start(BytesStart::new(schema::RECORD_ELEMENT)))?;
        if self.include_id {
            let id = card.id.map(|i| i.to_string()).unwrap_or_default();
            self.text_element(schema::ID, &id)?;
        }
        self.text_element(schema::NAME, &card.name)?;
        self.text_element(schema::GENDER, &card.gender)?;
        self.text_element(
            schema::DATE_OF_BIRTH,
            &card.date_of_birth.format("%Y-%m-%d").to_string(),
        )?;
        self.text_element(schema::EMAIL, &card.email)?;
        self.text_element(schema::PHONE, card.phone.as_deref().unwrap_or(""))?;
        self.text_element(schema::PHOTO, &card.photo)?;
        self.text_element(schema::ADDRESS, &card.address)?;
        self.emit(Event::End(BytesEnd::new(schema::RECORD_ELEMENT)))
    }

    fn finalize(mut self: Box<Self>) -> Result<()> {
        self.ensure_root()?;
        self.emit(Event::End(BytesEnd::new(schema::ROOT_ELEMENT)))?;
        self.writer
            .get_mut()
            .flush()
            .map_err(|e| Error::OperationFailed {
                operation: "flush_xml".to_string(),
                cause: e.to_string(),
            })
    }
}
