//! Account management use case port.

use async_trait::async_trait;
use domain::identity::id::UserId;

use crate::dto::{ChangePasswordRequestDto, UserView};
use crate::error::Result;

/// Inbound port for operations on an existing account.
#[async_trait]
pub trait ManageAccount: Send + Sync {
    /// Sanitized view of a user.
    async fn profile(&self, user_id: &UserId) -> Result<UserView>;

    /// Replace the password after checking the current one.
    async fn change_password(
        &self,
        user_id: &UserId,
        request: ChangePasswordRequestDto,
    ) -> Result<()>;

    /// Enable or disable login for an account.
    async fn set_active(&self, user_id: &UserId, active: bool) -> Result<UserView>;

    /// Flag the email address as verified.
    async fn mark_verified(&self, user_id: &UserId) -> Result<UserView>;

    /// Remove an account.
    async fn delete(&self, user_id: &UserId) -> Result<()>;
}
