//! # Cardex
//!
//! Business card record ingestion and export core.
//!
//! Cardex accepts a record submission in one of four mutually exclusive
//! representations (direct field set, embedded XML document, embedded CSV
//! document, QR-code JSON payload), normalizes each into one canonical
//! card shape, validates the embedded base64 photo, and serializes stored
//! cards back out as XML or CSV.
//!
//! ## Example
//!
//! ```rust
//! use cardex::{IngestService, Submission};
//!
//! let submission = Submission {
//!     qr_payload: Some(r#"{"Name":"Jane Doe","Email":"jane@example.com"}"#.to_string()),
//!     ..Default::default()
//! };
//! let outcome = IngestService::new().ingest(&submission).unwrap();
//! assert_eq!(outcome.cards.len(), 1);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use thiserror::Error as ThisError;

// Module declarations
pub mod cli;
pub mod io;
pub mod models;

// Re-exports for convenience
pub use io::formats::{ExportFormat, IngestFormat, ParsePolicy, Payload, select_payload};
pub use io::services::export::{ExportOptions, ExportService};
pub use io::services::ingest::{IngestFailure, IngestOptions, IngestOutcome, IngestService};
pub use io::traits::{ExportSink, FailureReason, LineError, ParsedBatch, RecordParser};
pub use io::validation::{CardNormalizer, MAX_PHOTO_BYTES, PhotoError, PhotoValidator};
pub use models::{BusinessCard, RawCard, Submission, min_date_of_birth};

/// Error type for cardex operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Unknown format names, unusable file extensions |
/// | `Parse` | Malformed XML/JSON payloads, absent record elements, bad XML dates |
/// | `Photo` | Photo fails base64 decoding or exceeds the size cap |
/// | `OperationFailed` | Writer I/O errors during export |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - A format name cannot be parsed
    /// - A file extension does not map to a known format
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A payload could not be parsed.
    ///
    /// Parse errors abort the whole submission for the all-or-nothing
    /// formats (XML, QR). CSV line-level problems are never surfaced here;
    /// they are recorded per line in the ingestion outcome instead.
    #[error("failed to parse {format} payload: {cause}")]
    Parse {
        /// The format whose parser rejected the payload.
        format: io::formats::IngestFormat,
        /// The underlying cause.
        cause: String,
    },

    /// A photo failed validation.
    ///
    /// Raised when a single-record submission carries a photo that is not
    /// valid base64 or whose decoded size exceeds the cap. Multi-record
    /// batches record the same failure per record instead of aborting.
    #[error("photo validation failed: {0}")]
    Photo(#[from] io::validation::PhotoError),

    /// An operation failed.
    ///
    /// Raised when:
    /// - Writing serialized output to the destination fails
    /// - Export output is not valid UTF-8
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for cardex operations.
pub type Result<T> = std::result::Result<T, Error>;
