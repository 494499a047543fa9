//! Email logic management.

use std::fmt;

use serde::Serialize;

use crate::error::{DomainError, Result};

const MAX_LENGTH: usize = 255;

/// Value object of a valid email address.
///
/// Addresses are trimmed and lower-cased on parse: two addresses that only
/// differ by letter case are the same account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Converts a string into a valid [`EmailAddress`].
    ///
    /// # Errors
    ///
    /// Returns `Err` if the string does not have exactly one `@` separating
    /// a non-empty local part from a dotted domain.
    pub fn parse(email: impl AsRef<str>) -> Result<Self> {
        let email = email.as_ref().trim().to_lowercase();

        if email.len() > MAX_LENGTH || email.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidEmailFormat);
        }

        match email.split_once('@') {
            Some((local, domain))
                if !local.is_empty()
                    && !domain.contains('@')
                    && domain.contains('.')
                    && domain.split('.').all(|label| !label.is_empty()) =>
            {
                Ok(Self(email))
            },
            _ => Err(DomainError::InvalidEmailFormat),
        }
    }

    /// Returns the same string as a string slice `&str`.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case() {
        let email = EmailAddress::parse("  A@X.com ").unwrap();
        assert_eq!(email.as_str(), "a@x.com");
        assert_eq!(email, EmailAddress::parse("a@x.COM").unwrap());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for email in ["", "a", "@x.com", "a@", "a@x", "a@@x.com", "a b@x.com", "a@.com"] {
            assert_eq!(
                EmailAddress::parse(email).unwrap_err(),
                DomainError::InvalidEmailFormat,
                "{email:?} should be rejected"
            );
        }
    }
}
