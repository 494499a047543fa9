//! Bearer token kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discriminator embedded in every signed token payload.
///
/// A token is only accepted where its own kind is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived, carries user id and role.
    Access,
    /// Longer-lived, carries user id only. Used to obtain new tokens.
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
