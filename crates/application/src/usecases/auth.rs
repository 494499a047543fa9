//! Authentication use case implementation.

use std::sync::Arc;

use async_trait::async_trait;
use domain::auth::password::{Password, PasswordHash};
use domain::identity::email::EmailAddress;

use crate::dto::{LoginRequestDto, TokenPairDto};
use crate::error::{ApplicationError, Result};
use crate::ports::inbound::Login;
use crate::ports::outbound::{
    PasswordHasher, TelemetryPort, TokenService, UserRepository,
};
use crate::usecases::issue_token_pair;

const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

/// Authentication use case service.
pub struct LoginUseCase {
    user_repo: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    token: Arc<dyn TokenService>,
    telemetry: Arc<dyn TelemetryPort>,
    /// Verified against when the email is unknown, so both failure paths
    /// cost one hash verification.
    decoy: PasswordHash,
}

impl LoginUseCase {
    /// # Errors
    ///
    /// Returns `Err` if the hasher cannot produce the decoy hash.
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        token: Arc<dyn TokenService>,
        telemetry: Arc<dyn TelemetryPort>,
    ) -> Result<Self> {
        let decoy = hasher.hash(&Password::new(DECOY_PASSWORD)?)?;

        Ok(Self {
            user_repo,
            hasher,
            token,
            telemetry,
            decoy,
        })
    }
}

#[async_trait]
impl Login for LoginUseCase {
    async fn execute(&self, request: LoginRequestDto) -> Result<TokenPairDto> {
        // A malformed address cannot match any account.
        let user = match EmailAddress::parse(&request.email) {
            Ok(email) => self.user_repo.find_by_email(&email).await?,
            Err(_) => None,
        };

        let Some(user) = user else {
            let _ = self.hasher.verify(&request.password, &self.decoy);
            self.telemetry.record_auth_failure("unknown_email");
            return Err(ApplicationError::InvalidCredentials);
        };

        if !self.hasher.verify(&request.password, user.password()) {
            self.telemetry.record_auth_failure("invalid_password");
            return Err(ApplicationError::InvalidCredentials);
        }

        if !user.can_login() {
            self.telemetry.record_auth_failure("account_deactivated");
            return Err(ApplicationError::AccountDeactivated);
        }

        let pair = issue_token_pair(self.token.as_ref(), &user)?;

        self.telemetry
            .record_auth_success(&user.id().to_string(), "password");

        Ok(pair)
    }
}
