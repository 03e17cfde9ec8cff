//! QR payload adapter.
//!
//! A scanned QR code carries one JSON-encoded record whose keys match the
//! canonical field names (minus the identifier).

use crate::io::formats::IngestFormat;
use crate::io::traits::{ParsedBatch, RecordParser};
use crate::models::RawCard;
use crate::{Error, Result};

/// Parses a QR-code JSON payload into exactly one raw card.
///
/// All-or-nothing: invalid JSON or a value that does not match the
/// expected field set fails the call.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrPayloadParser;

impl QrPayloadParser {
    /// Creates a new QR payload parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl RecordParser for QrPayloadParser {
    fn parse(&self, input: &str) -> Result<ParsedBatch> {
        let card: RawCard = serde_json::from_str(input).map_err(|e| Error::Parse {
            format: IngestFormat::Qr,
            cause: e.to_string(),
        })?;
        Ok(ParsedBatch::single(card))
    }
}
