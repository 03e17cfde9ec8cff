//! Ingestion/export I/O subsystem.
//!
//! Turns record submissions into canonical cards and serializes stored
//! cards back out as XML or CSV.
//!
//! # Architecture
//!
//! - **Format adapters** implement [`RecordParser`] and/or [`ExportSink`]
//! - **Validation layer** checks photos and normalizes raw cards
//! - **Services** orchestrate selection, parsing, validation, and export
//!
//! # Supported Formats
//!
//! | Format | Ingest | Export | Failure posture |
//! |--------|--------|--------|-----------------|
//! | XML | ✓ | ✓ | All-or-nothing |
//! | CSV | ✓ | ✓ | Per-line |
//! | QR (JSON) | ✓ | - | All-or-nothing |
//! | Direct fields | ✓ | - | Single record |
//!
//! # Examples
//!
//! ## Ingest a CSV payload
//!
//! ```rust,ignore
//! use cardex::{IngestService, Submission};
//!
//! let submission = Submission {
//!     csv_payload: Some(csv_text),
//!     ..Default::default()
//! };
//! let outcome = IngestService::new().ingest(&submission)?;
//! println!("{} cards, {} failures", outcome.cards.len(), outcome.failures.len());
//! ```
//!
//! ## Export stored cards as XML
//!
//! ```rust,ignore
//! use cardex::{ExportFormat, ExportOptions, ExportService};
//!
//! let options = ExportOptions::default().with_format(ExportFormat::Xml);
//! let xml = ExportService::new().export_to_string(&cards, &options)?;
//! ```

pub mod formats;
pub mod schema;
pub mod services;
pub mod traits;
pub mod validation;

// Re-exports for convenience
pub use formats::{ExportFormat, IngestFormat, ParsePolicy, Payload, select_payload};
pub use services::export::{ExportOptions, ExportService};
pub use services::ingest::{IngestFailure, IngestOptions, IngestOutcome, IngestService};
pub use traits::{ExportSink, FailureReason, LineError, ParsedBatch, ParsedRecord, RecordParser};
pub use validation::{CardNormalizer, MAX_PHOTO_BYTES, PhotoError, PhotoValidator};
