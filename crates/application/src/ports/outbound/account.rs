//! User store port.

use async_trait::async_trait;
use domain::identity::email::EmailAddress;
use domain::identity::id::UserId;
use domain::identity::user::User;

use crate::error::Result;

/// Port for user persistence operations.
///
/// Implementations must keep emails unique atomically: of two concurrent
/// `create` calls for the same address, exactly one succeeds and the other
/// returns [`ApplicationError::AlreadyExists`]. The same applies to an
/// `update` that moves a user onto a taken address.
///
/// [`ApplicationError::AlreadyExists`]: crate::error::ApplicationError::AlreadyExists
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user.
    async fn create(&self, user: &User) -> Result<()>;

    /// Find a user by its normalized email.
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>>;

    /// Find a user by ID.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>>;

    /// Replace a whole user record.
    ///
    /// Returns [`ApplicationError::UserNotFound`] if no record has this ID.
    ///
    /// [`ApplicationError::UserNotFound`]: crate::error::ApplicationError::UserNotFound
    async fn update(&self, user: &User) -> Result<()>;

    /// Remove a user. Returns `true` if a record was deleted.
    async fn delete(&self, id: &UserId) -> Result<bool>;

    /// Check whether an email is already taken.
    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool>;
}
