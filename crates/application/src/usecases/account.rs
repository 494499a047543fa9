//! Account management use case implementation.

use std::sync::Arc;

use async_trait::async_trait;
use domain::auth::password::Password;
use domain::identity::id::UserId;
use domain::identity::user::User;

use crate::dto::{ChangePasswordRequestDto, UserView};
use crate::error::{ApplicationError, Result};
use crate::ports::inbound::ManageAccount;
use crate::ports::outbound::{Clock, PasswordHasher, TelemetryPort, UserRepository};

/// Account management use case service.
pub struct AccountUseCase {
    user_repo: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    telemetry: Arc<dyn TelemetryPort>,
    clock: Arc<dyn Clock>,
}

impl AccountUseCase {
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

    async fn load(&self, user_id: &UserId) -> Result<User> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(ApplicationError::UserNotFound)
    }

    /// Persist `user` if `changed`, then return its view.
    async fn save_if(
        &self,
        user: User,
        changed: bool,
        change: &str,
    ) -> Result<UserView> {
        if changed {
            self.user_repo.update(&user).await?;
            self.telemetry
                .record_account_updated(&user.id().to_string(), change);
        }

        Ok(UserView::from(&user))
    }
}

#[async_trait]
impl ManageAccount for AccountUseCase {
    async fn profile(&self, user_id: &UserId) -> Result<UserView> {
        self.load(user_id).await.map(|user| UserView::from(&user))
    }

    async fn change_password(
        &self,
        user_id: &UserId,
        request: ChangePasswordRequestDto,
    ) -> Result<()> {
        let mut user = self.load(user_id).await?;

        if !self.hasher.verify(&request.current_password, user.password()) {
            self.telemetry.record_auth_failure("invalid_password");
            return Err(ApplicationError::InvalidCredentials);
        }

        let password = Password::new(request.new_password)?;
        let hash = self.hasher.hash(&password)?;
        user.change_password(hash, self.clock.now());

        self.save_if(user, true, "password").await.map(|_| ())
    }

    async fn set_active(&self, user_id: &UserId, active: bool) -> Result<UserView> {
        let mut user = self.load(user_id).await?;
        let now = self.clock.now();

        let (changed, change) = if active {
            (user.activate(now), "activated")
        } else {
            (user.deactivate(now), "deactivated")
        };

        self.save_if(user, changed, change).await
    }

    async fn mark_verified(&self, user_id: &UserId) -> Result<UserView> {
        let mut user = self.load(user_id).await?;
        let changed = user.mark_verified(self.clock.now());

        self.save_if(user, changed, "verified").await
    }

    async fn delete(&self, user_id: &UserId) -> Result<()> {
        if !self.user_repo.delete(user_id).await? {
            return Err(ApplicationError::UserNotFound);
        }

        tracing::info!(user_id = %user_id, "account deleted");
        self.telemetry
            .record_account_updated(&user_id.to_string(), "deleted");

        Ok(())
    }
}
