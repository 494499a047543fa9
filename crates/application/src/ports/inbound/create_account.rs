//! Account creation use case port.

use async_trait::async_trait;

use crate::dto::{RegisterRequestDto, UserView};
use crate::error::Result;

/// Inbound port for account creation.
#[async_trait]
pub trait Register: Send + Sync {
    /// Create a new user account.
    async fn execute(&self, request: RegisterRequestDto) -> Result<UserView>;
}
