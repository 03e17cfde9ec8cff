//! CSV format adapter.
//!
//! Parses seven-column card CSV line by line, recording per-line failures
//! instead of aborting, and serializes canonical cards back out with a
//! header row.

use crate::Result;
use crate::io::schema;
use crate::io::traits::{ExportSink, FailureReason, LineError, ParsedBatch, RecordParser};
use crate::models::{BusinessCard, RawCard};
use chrono::NaiveDate;
use std::io::Write;

/// Parses CSV card batches.
///
/// The first line is a header and is always skipped. Each data line must
/// hold exactly [`schema::CSV_COLUMN_COUNT`] comma-separated fields in
/// the order of [`schema::CSV_COLUMNS`]; fields may be double-quoted to
/// carry embedded commas, with doubled quotes encoding a literal quote.
///
/// Processing is line-independent: a line with the wrong column count or
/// an unparsable date is recorded as a [`LineError`] and skipped, and the
/// rest of the batch proceeds. Line numbers in errors are 1-based over
/// the data lines; the header is not counted.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvCardParser;

impl CsvCardParser {
    /// Creates a new CSV parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn parse_line(line: &str) -> std::result::Result<RawCard, FailureReason> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(line.as_bytes());

        let mut record = csv::StringRecord::new();
        let has_record = reader
            .read_record(&mut record)
            .map_err(|e| FailureReason::MalformedLine(e.to_string()))?;
        if !has_record {
            return Err(FailureReason::MalformedLine("empty line".to_string()));
        }

        if record.len() != schema::CSV_COLUMN_COUNT {
            return Err(FailureReason::ColumnCount {
                expected: schema::CSV_COLUMN_COUNT,
                found: record.len(),
            });
        }

        let date_text = record.get(2).unwrap_or_default();
        let date_of_birth = date_text
            .parse::<NaiveDate>()
            .map_err(|_| FailureReason::InvalidDate(date_text.to_string()))?;

        let field = |i: usize| {
            record
                .get(i)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        Ok(RawCard {
            name: field(0),
            gender: field(1),
            date_of_birth: Some(date_of_birth),
            email: field(3),
            phone: field(4),
            photo: field(5),
            address: field(6),
        })
    }
}

impl RecordParser for CsvCardParser {
    fn parse(&self, input: &str) -> Result<ParsedBatch> {
        let mut batch = ParsedBatch::default();

        let mut lines = input.lines();
        let _header = lines.next(); // header is always skipped

        for (idx, line) in lines.enumerate() {
            let line_number = idx + 1;
            if line.trim().is_empty() {
                continue;
            }
            match Self::parse_line(line) {
                Ok(card) => batch.push_record(line_number, card),
                Err(reason) => batch.push_error(LineError {
                    line: line_number,
                    input: line.to_string(),
                    reason,
                }),
            }
        }

        Ok(batch)
    }
}

/// CSV export sink.
///
/// Writes a header row followed by one row per card. Fields are quoted
/// only when they contain a comma or quote, with embedded quotes doubled.
pub struct CsvExportSink<W: Write> {
    writer: csv::Writer<W>,
    include_id: bool,
    headers_written: bool,
}

impl<W: Write> CsvExportSink<W> {
    /// Creates a new CSV export sink.
    #[must_use]
    pub fn new(writer: W, include_id: bool) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false) // headers are written manually
            .from_writer(writer);
        Self {
            writer,
            include_id,
            headers_written: false,
        }
    }

    fn ensure_headers(&mut self) -> Result<()> {
        if !self.headers_written {
            self.writer
                .write_record(schema::csv_header(self.include_id))
                .map_err(|e| crate::Error::OperationFailed {
                    operation: "write_csv_headers".to_string(),
                    cause: e.to_string(),
                })?;
            self.headers_written = true;
        }
        Ok(())
    }
}

impl<W: Write> ExportSink for CsvExportSink<W> {
    fn write(&mut self, card: &BusinessCard) -> Result<()> {
        self.ensure_headers()?;

        let id = card.id.map(|i| i.to_string()).unwrap_or_default();
        let date_of_birth = card.date_of_birth.format("%Y-%m-%d").to_string();

        let mut row: Vec<&str> = Vec::with_capacity(schema::CSV_COLUMN_COUNT + 1);
        if self.include_id {
            row.push(&id);
        }
        row.push(&card.name);
        row.push(&card.gender);
        row.push(&date_of_birth);
        row.push(&card.email);
        row.push(card.phone.as_deref().unwrap_or(""));
        row.push(&card.photo);
        row.push(&card.address);

        self.writer
            .write_record(row)
            .map_err(|e| crate::Error::OperationFailed {
                operation: "write_csv".to_string(),
                cause: e.to_string(),
            })
    }

    fn finalize(mut self: Box<Self>) -> Result<()> {
        self.ensure_headers()?;
        self.writer.flush().map_err(|e| crate::Error::OperationFailed {
            operation: "flush_csv".to_string(),
            cause: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::min_date_of_birth;

    fn card(name: &str, address: &str) -> BusinessCard {
        BusinessCard {
            id: Some(1),
            name: name.to_string(),
            gender: "Female".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 4).unwrap(),
            email: "jane@example.com".to_string(),
            phone: None,
            address: address.to_string(),
            photo: String::new(),
        }
    }

    #[test]
    fn test_parse_skips_header() {
        let input = "Name,Gender,DateOfBirth,Email,Phone,PhotoBase64,Address\n\
                     Jane Doe,Female,1990-05-04,jane@example.com,555-0100,SGVsbG8=,1 Oak St\n";
        let batch = CsvCardParser::new().parse(input).unwrap();
        assert_eq!(batch.records.len(), 1);
        assert!(batch.line_errors.is_empty());

        let raw = &batch.records[0].card;
        assert_eq!(raw.name.as_deref(), Some("Jane Doe"));
        assert_eq!(raw.date_of_birth, NaiveDate::from_ymd_opt(1990, 5, 4));
        assert_eq!(raw.photo.as_deref(), Some("SGVsbG8="));
    }

    #[test]
    fn test_parse_quoted_comma() {
        let input = "header\n\
                     \"Doe, Jane\",Female,1990-05-04,jane@example.com,,,\"1 Oak St, Springfield\"\n";
        let batch = CsvCardParser::new().parse(input).unwrap();
        assert_eq!(batch.records.len(), 1);
        let raw = &batch.records[0].card;
        assert_eq!(raw.name.as_deref(), Some("Doe, Jane"));
        assert_eq!(raw.address.as_deref(), Some("1 Oak St, Springfield"));
        assert!(raw.phone.is_none());
    }

    #[test]
    fn test_short_line_fails_alone() {
        // Five data lines; the third has only three columns.
        let input = "header\n\
                     A,F,1990-01-01,a@x.com,1,,Addr\n\
                     B,M,1991-01-01,b@x.com,2,,Addr\n\
                     C,F,1992-01-01\n\
                     D,M,1993-01-01,d@x.com,4,,Addr\n\
                     E,F,1994-01-01,e@x.com,5,,Addr\n";
        let batch = CsvCardParser::new().parse(input).unwrap();
        assert_eq!(batch.records.len(), 4);
        assert_eq!(batch.line_errors.len(), 1);

        let error = &batch.line_errors[0];
        assert_eq!(error.line, 3);
        assert_eq!(
            error.reason,
            FailureReason::ColumnCount {
                expected: 7,
                found: 3
            }
        );
    }

    #[test]
    fn test_bad_date_fails_alone() {
        let input = "header\n\
                     A,F,1990-01-01,a@x.com,1,,Addr\n\
                     B,M,05/04/1991,b@x.com,2,,Addr\n";
        let batch = CsvCardParser::new().parse(input).unwrap();
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.line_errors.len(), 1);
        assert_eq!(batch.line_errors[0].line, 2);
        assert!(matches!(
            batch.line_errors[0].reason,
            FailureReason::InvalidDate(_)
        ));
    }

    #[test]
    fn test_all_lines_failing_still_succeeds() {
        let input = "header\na,b\nc,d\n";
        let batch = CsvCardParser::new().parse(input).unwrap();
        assert!(batch.records.is_empty());
        assert_eq!(batch.line_errors.len(), 2);
    }

    #[test]
    fn test_export_header_and_quoting() {
        let mut output = Vec::new();
        {
            let mut sink = CsvExportSink::new(&mut output, true);
            sink.write(&card("Doe, Jane", "say \"hi\"")).unwrap();
            Box::new(sink).finalize().unwrap();
        }

        let text = String::from_utf8(output).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Id,Name,Gender,DateOfBirth,Email,Phone,PhotoBase64,Address")
        );
        let row = lines.next().unwrap();
        assert!(row.contains("\"Doe, Jane\""));
        assert!(row.contains("\"say \"\"hi\"\"\""));
    }

    #[test]
    fn test_export_empty_list_writes_header_only() {
        let mut output = Vec::new();
        {
            let sink = CsvExportSink::new(&mut output, false);
            Box::new(sink).finalize().unwrap();
        }
        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert_eq!(text.lines().next(), Some("Name,Gender,DateOfBirth,Email,Phone,PhotoBase64,Address"));
    }

    #[test]
    fn test_export_without_id_reparses() {
        let mut output = Vec::new();
        {
            let mut sink = CsvExportSink::new(&mut output, false);
            sink.write(&card("Jane Doe", "1 Oak St")).unwrap();
            Box::new(sink).finalize().unwrap();
        }
        let text = String::from_utf8(output).unwrap();

        let batch = CsvCardParser::new().parse(&text).unwrap();
        assert_eq!(batch.records.len(), 1);
        assert!(batch.line_errors.is_empty());
        let raw = &batch.records[0].card;
        assert_eq!(raw.name.as_deref(), Some("Jane Doe"));
        assert_eq!(raw.address.as_deref(), Some("1 Oak St"));
    }

    #[test]
    fn test_default_date_survives_export() {
        let mut exported = card("Jane", "Addr");
        exported.date_of_birth = min_date_of_birth();

        let mut output = Vec::new();
        {
            let mut sink = CsvExportSink::new(&mut output, false);
            sink.write(&exported).unwrap();
            Box::new(sink).finalize().unwrap();
        }
        let text = String::from_utf8(output).unwrap();
        let batch = CsvCardParser::new().parse(&text).unwrap();
        assert_eq!(
            batch.records[0].card.date_of_birth,
            Some(min_date_of_birth())
        );
    }
}
