//! ID logic management.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, Result};

/// Value object of a user identifier.
///
/// Random (v4) UUIDs are assigned once, at creation, and never change.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generates a new random [`UserId`].
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Converts a string into a valid [`UserId`].
    ///
    /// # Errors
    ///
    /// Returns `Err` if the string is not a hyphenated or simple UUID.
    pub fn parse(id: &str) -> Result<Self> {
        Uuid::parse_str(id.trim())
            .map(Self)
            .map_err(|_| DomainError::InvalidIdFormat)
    }

    #[inline]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for UserId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
