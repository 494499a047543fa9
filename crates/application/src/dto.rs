//! Data Transfer Objects for the application layer.
//!
//! DTOs are used to transfer data between layers without exposing domain
//! entities.

use chrono::{DateTime, Utc};
use domain::identity::role::Role;
use domain::identity::user::User;
use serde::{Deserialize, Serialize};

/// Token type announced to clients.
pub const TOKEN_TYPE: &str = "bearer";

/// Request DTO for registration.
#[derive(Clone)]
pub struct RegisterRequestDto {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
}

/// Request DTO for authentication.
#[derive(Clone)]
pub struct LoginRequestDto {
    pub email: String,
    pub password: String,
}

/// Request DTO for token refresh.
#[derive(Debug, Clone)]
pub struct RefreshTokenRequestDto {
    /// The refresh token.
    pub refresh_token: String,
}

/// Request DTO for a password change.
#[derive(Clone)]
pub struct ChangePasswordRequestDto {
    pub current_password: String,
    pub new_password: String,
}

/// Response DTO for authentication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPairDto {
    /// Access token (JWT).
    pub access_token: String,
    /// Refresh token (JWT).
    pub refresh_token: String,
    /// Always [`TOKEN_TYPE`].
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
}

/// Sanitized view of a user: no password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().to_string(),
            full_name: user.full_name().map(str::to_owned),
            phone: user.phone().map(ToString::to_string),
            role: user.role(),
            is_active: user.is_active(),
            is_verified: user.is_verified(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

impl std::fmt::Debug for RegisterRequestDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequestDto")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("full_name", &self.full_name)
            .field("phone", &self.phone)
            .finish()
    }
}

impl std::fmt::Debug for LoginRequestDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequestDto")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl std::fmt::Debug for ChangePasswordRequestDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangePasswordRequestDto")
            .field("current_password", &"[REDACTED]")
            .field("new_password", &"[REDACTED]")
            .finish()
    }
}
