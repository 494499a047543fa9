//! Interface for JWT/token operations.

use domain::auth::token::TokenType;
use domain::identity::id::UserId;
use domain::identity::role::Role;

use crate::error::Result;

/// Claims contained in a verified token.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenClaims {
    /// Subject (user ID).
    pub sub: UserId,
    /// Role, only present on access tokens.
    pub role: Option<Role>,
    /// Token kind.
    pub token_type: TokenType,
    /// Issued at (Unix timestamp).
    pub iat: u64,
    /// Expiration time (Unix timestamp).
    pub exp: u64,
    /// JWT ID (unique identifier).
    pub jti: String,
}

/// Port for token signing and verification.
pub trait TokenService: Send + Sync {
    /// Create a signed access token.
    fn issue_access(&self, user_id: &UserId, role: Role) -> Result<String>;

    /// Create a signed refresh token.
    fn issue_refresh(&self, user_id: &UserId) -> Result<String>;

    /// Decode and verify a token of the expected kind.
    ///
    /// Every failure (signature, expiry, kind) is reported as the same
    /// [`ApplicationError::Token`].
    ///
    /// [`ApplicationError::Token`]: crate::error::ApplicationError::Token
    fn verify(&self, token: &str, expected: TokenType) -> Result<TokenClaims>;

    /// Access token lifetime in seconds.
    fn access_ttl(&self) -> u64;
}
