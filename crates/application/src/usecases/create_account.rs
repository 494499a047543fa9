//! Account creation use case implementation.

use std::sync::Arc;

use async_trait::async_trait;
use domain::auth::password::Password;
use domain::identity::email::EmailAddress;
use domain::identity::phone::PhoneNumber;
use domain::identity::user::User;

use crate::dto::{RegisterRequestDto, UserView};
use crate::error::{ApplicationError, Result};
use crate::ports::inbound::Register;
use crate::ports::outbound::{Clock, PasswordHasher, TelemetryPort, UserRepository};

/// Account creation use case service.
pub struct RegisterUseCase {
    user_repo: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    telemetry: Arc<dyn TelemetryPort>,
    clock: Arc<dyn Clock>,
}

impl RegisterUseCase {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        telemetry: Arc<dyn TelemetryPort>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            telemetry,
            clock,
        }
    }
}

#[async_trait]
impl Register for RegisterUseCase {
    async fn execute(&self, request: RegisterRequestDto) -> Result<UserView> {
        let email = EmailAddress::parse(&request.email)?;
        let password = Password::new(request.password)?;
        let phone = request
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|phone| !phone.is_empty())
            .map(PhoneNumber::parse)
            .transpose()?;

        if self.user_repo.exists_by_email(&email).await? {
            return Err(ApplicationError::AlreadyExists);
        }

        let password_hash = self.hasher.hash(&password)?;

        let user = User::builder()
            .email(email)
            .password(password_hash)
            .full_name(Some(request.full_name))
            .phone(phone)
            .build(self.clock.now())?;

        // Two registrations may both pass the check above; the store rejects
        // the loser with the same `AlreadyExists`.
        self.user_repo.create(&user).await?;

        self.telemetry.record_account_created(&user.id().to_string());

        Ok(UserView::from(&user))
    }
}
