//! Authoritative field-name table for the card schemas.
//!
//! Parsers, exporters, and the QR payload keys all read from this table;
//! a schema change happens here or not at all.

/// Root collection element of the XML schema.
pub const ROOT_ELEMENT: &str = "BusinessCards";
/// Per-record element of the XML schema.
pub const RECORD_ELEMENT: &str = "BusinessCard";

/// Store-assigned identifier field (export only).
pub const ID: &str = "Id";
/// Name field.
pub const NAME: &str = "Name";
/// Gender field.
pub const GENDER: &str = "Gender";
/// Date-of-birth field (ISO-8601 date text).
pub const DATE_OF_BIRTH: &str = "DateOfBirth";
/// Email field.
pub const EMAIL: &str = "Email";
/// Phone field.
pub const PHONE: &str = "Phone";
/// Photo field (base64, optional data-URI prefix on ingest).
pub const PHOTO: &str = "PhotoBase64";
/// Address field.
pub const ADDRESS: &str = "Address";

/// CSV ingestion column order.
pub const CSV_COLUMNS: [&str; 7] = [NAME, GENDER, DATE_OF_BIRTH, EMAIL, PHONE, PHOTO, ADDRESS];

/// Canonical CSV column count, defined once for parser and validator alike.
pub const CSV_COLUMN_COUNT: usize = CSV_COLUMNS.len();

/// Returns the CSV export header row.
#[must_use]
pub fn csv_header(include_id: bool) -> Vec<&'static str> {
    let mut header = Vec::with_capacity(CSV_COLUMNS.len() + 1);
    if include_id {
        header.push(ID);
    }
    header.extend(CSV_COLUMNS);
    header
}
