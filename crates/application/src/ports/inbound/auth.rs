//! Authentication use case port.

use async_trait::async_trait;

use crate::dto::{LoginRequestDto, TokenPairDto};
use crate::error::Result;

/// Inbound port for user authentication.
#[async_trait]
pub trait Login: Send + Sync {
    /// Authenticate a user with credentials.
    async fn execute(&self, request: LoginRequestDto) -> Result<TokenPairDto>;
}
