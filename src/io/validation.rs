//! Photo validation and card normalization.
//!
//! [`PhotoValidator`] is the only gate that establishes the canonical
//! photo invariant: bare base64, decoded size within the cap.

use crate::models::{BusinessCard, RawCard, min_date_of_birth};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use thiserror::Error as ThisError;

/// Maximum decoded photo size in bytes.
///
/// A decimal megabyte, not a binary mebibyte. The record store's upload
/// contract uses this exact threshold.
pub const MAX_PHOTO_BYTES: usize = 1_000_000;

/// Leading marker of a photo value that carries a media type.
pub const DATA_URI_PREFIX: &str = "data:image/";

/// Why a photo value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ThisError)]
#[serde(rename_all = "snake_case")]
pub enum PhotoError {
    /// The value is not decodable base64.
    #[error("photo is not valid base64: {0}")]
    InvalidBase64(String),
    /// The decoded value exceeds the size cap.
    #[error("photo exceeds the maximum allowed size of {limit} bytes ({size} bytes decoded)")]
    TooLarge {
        /// Decoded size in bytes.
        size: usize,
        /// The configured cap.
        limit: usize,
    },
}

/// Strips a `data:image/<subtype>,` prefix from a photo value.
///
/// Only a recognized image data-URI marker followed by a comma is
/// stripped; anything else passes through untouched.
#[must_use]
pub fn strip_data_uri_prefix(value: &str) -> &str {
    if value.starts_with(DATA_URI_PREFIX)
        && let Some(comma) = value.find(',')
    {
        return &value[comma + 1..];
    }
    value
}

/// Decodes and bounds-checks an embedded photo value.
///
/// Pure check-and-strip: no side effects, and the stripped payload it
/// returns is what the normalizer stores.
#[derive(Debug, Clone)]
pub struct PhotoValidator {
    /// Maximum decoded size in bytes.
    max_bytes: usize,
}

impl Default for PhotoValidator {
    fn default() -> Self {
        Self {
            max_bytes: MAX_PHOTO_BYTES,
        }
    }
}

impl PhotoValidator {
    /// Creates a validator with the default size cap.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_bytes: MAX_PHOTO_BYTES,
        }
    }

    /// Sets the decoded size cap.
    #[must_use]
    pub const fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Validates a photo value and returns the stripped payload to store.
    ///
    /// An absent or empty photo succeeds trivially with an empty stored
    /// value.
    ///
    /// # Errors
    ///
    /// Returns [`PhotoError::InvalidBase64`] if the payload does not
    /// decode, or [`PhotoError::TooLarge`] if the decoded length exceeds
    /// the cap.
    pub fn validate(&self, photo: Option<&str>) -> std::result::Result<String, PhotoError> {
        let Some(raw) = photo else {
            return Ok(String::new());
        };
        if raw.is_empty() {
            return Ok(String::new());
        }

        let payload = strip_data_uri_prefix(raw);
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| PhotoError::InvalidBase64(e.to_string()))?;

        if bytes.len() > self.max_bytes {
            return Err(PhotoError::TooLarge {
                size: bytes.len(),
                limit: self.max_bytes,
            });
        }

        Ok(payload.to_string())
    }
}

/// Maps one raw card to one canonical card.
///
/// Runs the photo gate, applies the date-of-birth default, and copies the
/// remaining fields verbatim. Trimming is parser-specific and is not
/// re-applied here. Non-emptiness of required fields is deferred to the
/// persistence boundary; a malformed photo is rejected here, never passed
/// through.
#[derive(Debug, Clone, Default)]
pub struct CardNormalizer {
    photo: PhotoValidator,
}

impl CardNormalizer {
    /// Creates a normalizer with the default photo validator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            photo: PhotoValidator::new(),
        }
    }

    /// Creates a normalizer with a custom photo validator.
    #[must_use]
    pub const fn with_validator(photo: PhotoValidator) -> Self {
        Self { photo }
    }

    /// Normalizes one raw card.
    ///
    /// # Errors
    ///
    /// Propagates the [`PhotoError`] when the photo fails validation.
    pub fn normalize(&self, raw: &RawCard) -> std::result::Result<BusinessCard, PhotoError> {
        let photo = self.photo.validate(raw.photo.as_deref())?;

        Ok(BusinessCard {
            id: None,
            name: raw.name.clone().unwrap_or_default(),
            gender: raw.gender.clone().unwrap_or_default(),
            date_of_birth: raw.date_of_birth.unwrap_or_else(min_date_of_birth),
            email: raw.email.clone().unwrap_or_default(),
            phone: raw.phone.clone(),
            address: raw.address.clone().unwrap_or_default(),
            photo,
        })
    }
}
