//! Card types and the submission envelope.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Returns the minimum date of birth used when a raw record carries none.
///
/// A canonical card never has an unset date of birth; absent dates map to
/// `0001-01-01`, the minimum timestamp of the record store.
#[must_use]
pub fn min_date_of_birth() -> NaiveDate {
    NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// A partially populated card produced by a single-format parser, prior to
/// normalization.
///
/// Every field is optional at this stage. Parsers perform their own date
/// parsing, so `date_of_birth` is already a calendar date here; how an
/// unparsable date is reported (whole-submission abort vs. per-line skip)
/// is the parser's policy, not this type's concern.
///
/// The serde field names match the QR payload key set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RawCard {
    /// Card holder name.
    pub name: Option<String>,
    /// Card holder gender.
    pub gender: Option<String>,
    /// Date of birth (ISO-8601 in serialized form).
    pub date_of_birth: Option<NaiveDate>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Base64 photo payload, possibly carrying a `data:image/...,` prefix.
    #[serde(rename = "PhotoBase64")]
    pub photo: Option<String>,
    /// Postal address.
    pub address: Option<String>,
}

/// The canonical card shape used for persistence and export.
///
/// Produced by [`crate::io::validation::CardNormalizer`]; consumed by the
/// exporters and the (external) persistence collaborator.
///
/// Invariant: when `photo` is non-empty it is a bare base64 payload (any
/// data-URI prefix stripped) that decodes to at most the configured byte
/// cap. [`crate::io::validation::PhotoValidator`] is the only gate that
/// establishes this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BusinessCard {
    /// Store-assigned identifier. `None` for freshly ingested cards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Card holder name. Required downstream; may be empty here.
    pub name: String,
    /// Card holder gender. Required downstream; may be empty here.
    pub gender: String,
    /// Date of birth. Never unset; defaults to [`min_date_of_birth`].
    pub date_of_birth: NaiveDate,
    /// Contact email. Required downstream; may be empty here.
    pub email: String,
    /// Contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Postal address. Required downstream; may be empty here.
    pub address: String,
    /// Bare base64 photo payload, or empty when no photo was supplied.
    #[serde(rename = "PhotoBase64")]
    pub photo: String,
}

/// A record submission with up to four mutually exclusive representations.
///
/// The three payload slots hold already-read document text; reading an
/// uploaded file into a string is the transport layer's job. The direct
/// fields are flattened into the same serialized object, mirroring the
/// request shape of the record-management API this core serves.
///
/// Which slot wins is decided by [`crate::io::formats::select_payload`],
/// never by content inspection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Submission {
    /// Direct field set; the fallback representation.
    #[serde(flatten)]
    pub fields: RawCard,
    /// Embedded XML document.
    pub xml_payload: Option<String>,
    /// Embedded CSV document.
    pub csv_payload: Option<String>,
    /// JSON payload scanned from a QR code.
    #[serde(rename = "QrCodeData")]
    pub qr_payload: Option<String>,
}
