//! Format adapters for ingestion and export.
//!
//! Each format implements [`RecordParser`] and/or [`ExportSink`]. This
//! module also owns format selection: a submission's four optional inputs
//! collapse into one [`Payload`] choice, by fixed priority, before any
//! parser runs.

pub mod csv;
pub mod qr;
pub mod xml;

use crate::models::{RawCard, Submission};
use crate::{Error, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use super::services::export::ExportOptions;
use super::traits::ExportSink;

/// Ingestion formats, in selection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestFormat {
    /// Embedded XML document, possibly holding many records.
    Xml,
    /// Embedded CSV document, possibly holding many records.
    Csv,
    /// QR-code JSON payload holding exactly one record.
    Qr,
    /// Direct field set; the fallback representation.
    Direct,
}

/// Per-format parse-stage failure posture.
///
/// CSV forgives individual lines; XML and QR do not. The asymmetry is
/// intentional and is carried here as data so the pipeline stays policy-
/// driven instead of hard-coding divergent control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsePolicy {
    /// Any parse or date defect aborts the whole submission.
    Strict,
    /// A defective line is recorded and skipped; the batch continues.
    PerLine,
}

impl IngestFormat {
    /// Returns the parse-stage failure posture for this format.
    #[must_use]
    pub const fn parse_policy(self) -> ParsePolicy {
        match self {
            Self::Csv => ParsePolicy::PerLine,
            Self::Xml | Self::Qr | Self::Direct => ParsePolicy::Strict,
        }
    }

    /// Detects the ingestion format from a file extension.
    ///
    /// `.json` maps to [`IngestFormat::Direct`] (a submission document);
    /// QR payload files must be named explicitly.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is not recognized.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match ext.as_deref() {
            Some("xml") => Ok(Self::Xml),
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Direct),
            Some(ext) => Err(Error::InvalidInput(format!(
                "unsupported file extension: .{ext}"
            ))),
            None => Err(Error::InvalidInput(
                "cannot determine format: file has no extension".to_string(),
            )),
        }
    }
}

impl FromStr for IngestFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "xml" => Ok(Self::Xml),
            "csv" => Ok(Self::Csv),
            "qr" => Ok(Self::Qr),
            "direct" | "fields" => Ok(Self::Direct),
            _ => Err(Error::InvalidInput(format!("unknown ingest format: {s}"))),
        }
    }
}

impl std::fmt::Display for IngestFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xml => write!(f, "xml"),
            Self::Csv => write!(f, "csv"),
            Self::Qr => write!(f, "qr"),
            Self::Direct => write!(f, "direct"),
        }
    }
}

/// Export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// XML collection document.
    Xml,
    /// CSV with a header row.
    Csv,
}

impl ExportFormat {
    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Csv => "csv",
        }
    }

    /// Returns the MIME type for this format.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Xml => "application/xml",
            Self::Csv => "text/csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "xml" => Ok(Self::Xml),
            "csv" => Ok(Self::Csv),
            _ => Err(Error::InvalidInput(format!("unknown export format: {s}"))),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// One selected submission input, tagged by format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload<'a> {
    /// An embedded XML document.
    Xml(&'a str),
    /// An embedded CSV document.
    Csv(&'a str),
    /// A QR-code JSON payload.
    Qr(&'a str),
    /// The direct field set.
    Direct(&'a RawCard),
}

impl Payload<'_> {
    /// Returns the format tag of this payload.
    #[must_use]
    pub const fn format(&self) -> IngestFormat {
        match self {
            Self::Xml(_) => IngestFormat::Xml,
            Self::Csv(_) => IngestFormat::Csv,
            Self::Qr(_) => IngestFormat::Qr,
            Self::Direct(_) => IngestFormat::Direct,
        }
    }
}

/// Selects exactly one submission input to process.
///
/// Fixed priority: XML, then CSV, then QR, then direct fields. Selection
/// is by presence (non-empty) only; content is never inspected. Direct
/// fields are the always-valid fallback, even when empty — normalization
/// and the persistence boundary surface problems later.
#[must_use]
pub fn select_payload(submission: &Submission) -> Payload<'_> {
    if let Some(xml) = non_empty(submission.xml_payload.as_deref()) {
        Payload::Xml(xml)
    } else if let Some(csv) = non_empty(submission.csv_payload.as_deref()) {
        Payload::Csv(csv)
    } else if let Some(qr) = non_empty(submission.qr_payload.as_deref()) {
        Payload::Qr(qr)
    } else {
        Payload::Direct(&submission.fields)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Creates an export sink for the configured format and writer.
pub fn create_export_sink<'a, W: Write + 'a>(
    writer: W,
    options: &ExportOptions,
) -> Box<dyn ExportSink + 'a> {
    match options.format {
        ExportFormat::Xml => Box::new(xml::XmlExportSink::new(writer, options.include_id)),
        ExportFormat::Csv => Box::new(csv::CsvExportSink::new(writer, options.include_id)),
    }
}
