//! Core traits and intermediate types for ingestion and export.
//!
//! Format adapters implement [`RecordParser`] (serialized payload in, raw
//! cards out) and [`ExportSink`] (canonical cards in, serialized text out).

use crate::Result;
use crate::io::validation::PhotoError;
use crate::models::{BusinessCard, RawCard};
use serde::Serialize;
use thiserror::Error as ThisError;

/// Why a single record or line was rejected.
///
/// Carried inside [`LineError`] (parse stage) and
/// [`crate::io::services::ingest::IngestFailure`] (pipeline outcome), so
/// the caller always learns why an item failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ThisError)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// A CSV line did not have the canonical column count.
    #[error("expected {expected} columns, found {found}")]
    ColumnCount {
        /// The canonical column count.
        expected: usize,
        /// Columns actually present on the line.
        found: usize,
    },
    /// A date-of-birth value could not be parsed as an ISO-8601 date.
    #[error("invalid date of birth: '{0}'")]
    InvalidDate(String),
    /// A line could not be tokenized at all.
    #[error("malformed line: {0}")]
    MalformedLine(String),
    /// The record's photo failed validation.
    #[error(transparent)]
    Photo(#[from] PhotoError),
}

/// A per-line failure recorded by a tolerant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    /// 1-based data line number. The header line is not counted.
    pub line: usize,
    /// The offending line text.
    pub input: String,
    /// Why the line was rejected.
    pub reason: FailureReason,
}

/// A raw card together with its 1-based position in the source payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord {
    /// 1-based line (CSV) or record (XML) index.
    pub index: usize,
    /// The parsed raw card.
    pub card: RawCard,
}

/// The output of one parser invocation.
///
/// Strict parsers (XML, QR) never populate `line_errors`; they fail the
/// whole call instead. The tolerant CSV parser fills both sides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedBatch {
    /// Successfully parsed records, in source order.
    pub records: Vec<ParsedRecord>,
    /// Lines that were skipped, in source order.
    pub line_errors: Vec<LineError>,
}

impl ParsedBatch {
    /// Creates a batch holding exactly one record.
    #[must_use]
    pub fn single(card: RawCard) -> Self {
        Self {
            records: vec![ParsedRecord { index: 1, card }],
            line_errors: Vec::new(),
        }
    }

    /// Appends a record at the given source index.
    pub fn push_record(&mut self, index: usize, card: RawCard) {
        self.records.push(ParsedRecord { index, card });
    }

    /// Records a skipped line.
    pub fn push_error(&mut self, error: LineError) {
        self.line_errors.push(error);
    }

    /// Returns whether the batch holds neither records nor failures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.line_errors.is_empty()
    }
}

/// Parses one serialized representation into zero or more raw cards.
///
/// # Failure posture
///
/// An `Err` from [`RecordParser::parse`] aborts the whole submission; a
/// populated `line_errors` list does not. Which of the two a parser uses
/// for a given defect is its format's documented policy (see
/// [`crate::io::formats::IngestFormat::parse_policy`]).
pub trait RecordParser {
    /// Parses the payload text.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload as a whole is unusable for this
    /// format. Line-scoped problems in tolerant formats are recorded in
    /// the returned batch instead.
    fn parse(&self, input: &str) -> Result<ParsedBatch>;
}

/// Sink for exported cards.
///
/// # Lifecycle
///
/// 1. Create the sink over an output writer
/// 2. Call `write()` for each card
/// 3. Call `finalize()` to write any footer and flush
pub trait ExportSink {
    /// Writes a single card to the sink.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    fn write(&mut self, card: &BusinessCard) -> Result<()>;

    /// Finalizes the export, writing any footer and flushing buffers.
    ///
    /// This method consumes the sink.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn finalize(self: Box<Self>) -> Result<()>;
}
