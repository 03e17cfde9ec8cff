//! Card export service.
//!
//! Serializes stored cards to XML or CSV text. Pure transformation: the
//! only I/O is the caller-supplied writer.

use crate::io::formats::{ExportFormat, create_export_sink};
use crate::models::BusinessCard;
use crate::{Error, Result};
use std::io::Write;

/// Options for card export.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Output format.
    pub format: ExportFormat,
    /// Whether the store-assigned identifier column/element is included.
    pub include_id: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Xml,
            include_id: true,
        }
    }
}

impl ExportOptions {
    /// Sets the output format.
    #[must_use]
    pub const fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// Enables or disables the identifier column/element.
    #[must_use]
    pub const fn with_include_id(mut self, include_id: bool) -> Self {
        self.include_id = include_id;
        self
    }
}

/// Service for exporting cards to external formats.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportService;

impl ExportService {
    /// Creates a new export service.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Exports cards to a writer.
    ///
    /// Returns the number of cards written.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn export_to_writer<W: Write>(
        &self,
        cards: &[BusinessCard],
        writer: W,
        options: &ExportOptions,
    ) -> Result<usize> {
        let mut sink = create_export_sink(writer, options);
        for card in cards {
            sink.write(card)?;
        }
        sink.finalize()?;
        Ok(cards.len())
    }

    /// Exports cards to a text blob.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export_to_string(
        &self,
        cards: &[BusinessCard],
        options: &ExportOptions,
    ) -> Result<String> {
        let mut output = Vec::new();
        self.export_to_writer(cards, &mut output, options)?;
        String::from_utf8(output).map_err(|e| Error::OperationFailed {
            operation: "encode_export".to_string(),
            cause: e.to_string(),
        })
    }
}
