//! Token refresh use case port.

use async_trait::async_trait;

use crate::dto::{RefreshTokenRequestDto, TokenPairDto};
use crate::error::Result;

/// Inbound port for refreshing access tokens.
#[async_trait]
pub trait RefreshAccessToken: Send + Sync {
    /// Exchange a refresh token for a new token pair.
    async fn execute(
        &self,
        request: RefreshTokenRequestDto,
    ) -> Result<TokenPairDto>;
}
