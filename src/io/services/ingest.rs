//! Card ingestion pipeline.
//!
//! One pass per submission: select the payload, run its parser, normalize
//! each raw card, and return the outcome. The pipeline never persists
//! anything; the canonical cards are handed back to the caller.

use crate::io::formats::{IngestFormat, ParsePolicy, Payload, select_payload};
use crate::io::formats::{csv::CsvCardParser, qr::QrPayloadParser, xml::XmlCardParser};
use crate::io::traits::{FailureReason, ParsedBatch, RecordParser};
use crate::io::validation::{CardNormalizer, MAX_PHOTO_BYTES, PhotoValidator};
use crate::models::{BusinessCard, Submission};
use crate::{Error, Result};
use serde::Serialize;

/// Options for card ingestion.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Maximum decoded photo size in bytes.
    pub max_photo_bytes: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            max_photo_bytes: MAX_PHOTO_BYTES,
        }
    }
}

impl IngestOptions {
    /// Sets the decoded photo size cap.
    #[must_use]
    pub const fn with_max_photo_bytes(mut self, max_photo_bytes: usize) -> Self {
        self.max_photo_bytes = max_photo_bytes;
        self
    }
}

/// One failed record or line in an ingestion outcome.
#[derive(Debug, Clone, Serialize)]
pub struct IngestFailure {
    /// 1-based line (CSV) or record (XML) index in the source payload.
    pub record: usize,
    /// The offending line text, when the source format has lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    /// Why the record was rejected.
    pub reason: FailureReason,
}

impl std::fmt::Display for IngestFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "record {}: {}", self.record, self.reason)
    }
}

/// Result of one ingestion pass.
///
/// A submission with failures can still succeed at the pipeline level as
/// long as its format tolerates them; `cards` and `failures` together
/// account for every record the parser saw.
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    /// The format that was selected and parsed.
    pub format: IngestFormat,
    /// Successfully normalized cards, in source order.
    pub cards: Vec<BusinessCard>,
    /// Per-record failures, in source order.
    pub failures: Vec<IngestFailure>,
}

impl IngestOutcome {
    /// Creates an empty outcome for the given format.
    #[must_use]
    pub const fn new(format: IngestFormat) -> Self {
        Self {
            format,
            cards: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Returns whether any records failed.
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Orchestrates format selection, parsing, and normalization.
pub struct IngestService {
    normalizer: CardNormalizer,
}

impl Default for IngestService {
    fn default() -> Self {
        Self::new()
    }
}

impl IngestService {
    /// Creates a service with default options.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            normalizer: CardNormalizer::new(),
        }
    }

    /// Creates a service with the given options.
    #[must_use]
    pub const fn with_options(options: &IngestOptions) -> Self {
        Self {
            normalizer: CardNormalizer::with_validator(
                PhotoValidator::new().with_max_bytes(options.max_photo_bytes),
            ),
        }
    }

    /// Ingests one submission.
    ///
    /// # Errors
    ///
    /// Returns an error when a strict-format payload (XML, QR) fails to
    /// parse, or when a photo fails validation in a single-record
    /// submission. Failures in tolerant or multi-record batches are
    /// recorded in the outcome instead.
    pub fn ingest(&self, submission: &Submission) -> Result<IngestOutcome> {
        let payload = select_payload(submission);
        let format = payload.format();
        tracing::debug!(%format, "selected ingestion format");

        let batch = match payload {
            Payload::Xml(document) => XmlCardParser::new().parse(document)?,
            Payload::Csv(text) => CsvCardParser::new().parse(text)?,
            Payload::Qr(data) => QrPayloadParser::new().parse(data)?,
            Payload::Direct(fields) => ParsedBatch::single(fields.clone()),
        };

        // Per-record failures are tolerated by per-line formats, and by
        // any batch holding more than one record; a single-record strict
        // submission aborts instead.
        let tolerate_record_failures =
            format.parse_policy() == ParsePolicy::PerLine || batch.records.len() > 1;

        let mut outcome = IngestOutcome::new(format);
        for error in batch.line_errors {
            tracing::warn!(line = error.line, reason = %error.reason, "skipping malformed line");
            outcome.failures.push(IngestFailure {
                record: error.line,
                input: Some(error.input),
                reason: error.reason,
            });
        }

        for record in batch.records {
            match self.normalizer.normalize(&record.card) {
                Ok(card) => outcome.cards.push(card),
                Err(photo) if tolerate_record_failures => {
                    tracing::warn!(record = record.index, reason = %photo, "skipping record with invalid photo");
                    outcome.failures.push(IngestFailure {
                        record: record.index,
                        input: None,
                        reason: FailureReason::Photo(photo),
                    });
                },
                Err(photo) => return Err(Error::Photo(photo)),
            }
        }

        outcome.failures.sort_by_key(|f| f.record);
        tracing::debug!(
            cards = outcome.cards.len(),
            failures = outcome.failures.len(),
            "ingestion pass complete"
        );
        Ok(outcome)
    }
}
