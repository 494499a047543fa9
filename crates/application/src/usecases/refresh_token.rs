//! Token refresh use case implementation.

use std::sync::Arc;

use async_trait::async_trait;
use domain::auth::token::TokenType;

use crate::dto::{RefreshTokenRequestDto, TokenPairDto};
use crate::error::{ApplicationError, Result};
use crate::ports::inbound::RefreshAccessToken;
use crate::ports::outbound::{TelemetryPort, TokenService, UserRepository};
use crate::usecases::issue_token_pair;

/// Token refresh use case service.
///
/// Refresh tokens are stateless: any valid one can be exchanged until it
/// expires, as long as its subject still exists and is active.
pub struct RefreshTokenUseCase {
    user_repo: Arc<dyn UserRepository>,
    token: Arc<dyn TokenService>,
    telemetry: Arc<dyn TelemetryPort>,
}

impl RefreshTokenUseCase {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        token: Arc<dyn TokenService>,
        telemetry: Arc<dyn TelemetryPort>,
    ) -> Self {
        Self {
            user_repo,
            token,
            telemetry,
        }
    }
}

#[async_trait]
impl RefreshAccessToken for RefreshTokenUseCase {
    async fn execute(
        &self,
        request: RefreshTokenRequestDto,
    ) -> Result<TokenPairDto> {
        let claims = self
            .token
            .verify(&request.refresh_token, TokenType::Refresh)
            .inspect_err(|_| {
                self.telemetry.record_auth_failure("invalid_refresh_token")
            })?;

        let Some(user) = self.user_repo.find_by_id(&claims.sub).await? else {
            self.telemetry.record_auth_failure("unknown_subject");
            return Err(ApplicationError::Token);
        };

        if !user.can_login() {
            self.telemetry.record_auth_failure("account_deactivated");
            return Err(ApplicationError::AccountDeactivated);
        }

        let pair = issue_token_pair(self.token.as_ref(), &user)?;

        self.telemetry
            .record_auth_success(&user.id().to_string(), "refresh_token");

        Ok(pair)
    }
}
