//! Phone number normalization.

use std::fmt;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::Serialize;

use crate::error::{DomainError, Result};

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").unwrap());

/// Value object of a normalized phone number.
///
/// Separators (spaces, dashes, dots, parentheses) are dropped; what remains
/// must be 10 to 15 digits, optionally prefixed by `+`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalizes and validates a phone number.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidPhoneFormat`] if the normalized value
    /// does not match the digit-count rule.
    pub fn parse(phone: impl AsRef<str>) -> Result<Self> {
        let normalized: String = phone
            .as_ref()
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
            .collect();

        if PHONE_RE.is_match(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(DomainError::InvalidPhoneFormat)
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
