//! User domain entity.

use chrono::{DateTime, Utc};

use crate::auth::password::PasswordHash;
use crate::identity::account::{Missing, UserBuilder};
use crate::identity::email::EmailAddress;
use crate::identity::id::UserId;
use crate::identity::phone::PhoneNumber;
use crate::identity::role::Role;

/// Represents a registered user within the system domain.
///
/// # Invariants
/// - `password` is always a PHC string, never the plaintext and never empty.
/// - `updated_at >= created_at`.
/// - `updated_at` only moves when a transition actually changes state.
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub(crate) id: UserId,
    pub(crate) email: EmailAddress,
    pub(crate) password: PasswordHash,
    pub(crate) full_name: Option<String>,
    pub(crate) phone: Option<PhoneNumber>,
    pub(crate) role: Role,
    pub(crate) is_active: bool,
    pub(crate) is_verified: bool,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl User {
    /// Starts a [`UserBuilder`].
    pub fn builder() -> UserBuilder<Missing, Missing> {
        UserBuilder::new()
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &PasswordHash {
        &self.password
    }

    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    pub fn phone(&self) -> Option<&PhoneNumber> {
        self.phone.as_ref()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_verified(&self) -> bool {
        self.is_verified
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Check if user has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Check if user is allowed to authenticate.
    pub fn can_login(&self) -> bool {
        self.is_active
    }

    /// Disables the account. No-op if it is already inactive.
    ///
    /// Returns whether the state changed.
    pub fn deactivate(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_active {
            return false;
        }

        self.is_active = false;
        self.touch(now);
        true
    }

    /// Re-enables the account. No-op if it is already active.
    pub fn activate(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_active {
            return false;
        }

        self.is_active = true;
        self.touch(now);
        true
    }

    /// Marks the email address as verified. No-op if already verified.
    pub fn mark_verified(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_verified {
            return false;
        }

        self.is_verified = true;
        self.touch(now);
        true
    }

    /// Replaces the stored password hash.
    pub fn change_password(&mut self, password: PasswordHash, now: DateTime<Utc>) {
        self.password = password;
        self.touch(now);
    }

    // A clock going backwards must not break `updated_at >= created_at`.
    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.updated_at);
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    const HASH: &str = "$argon2id$v=19$m=65536,t=4,p=2$c2FsdHNhbHQ$aGFzaGhhc2hoYXNo";

    fn user(now: DateTime<Utc>) -> User {
        User::builder()
            .email(EmailAddress::parse("a@x.com").unwrap())
            .password(PasswordHash::parse(HASH).unwrap())
            .full_name(Some("A B".into()))
            .build(now)
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let now = Utc::now();
        let user = user(now);

        assert_eq!(user.role(), Role::Customer);
        assert!(user.is_active());
        assert!(!user.is_verified());
        assert!(!user.is_admin());
        assert!(user.can_login());
        assert_eq!(user.created_at(), now);
        assert_eq!(user.updated_at(), now);
    }

    #[test]
    fn test_deactivate_only_touches_on_change() {
        let now = Utc::now();
        let mut user = user(now);

        let later = now + Duration::seconds(10);
        assert!(user.deactivate(later));
        assert!(!user.can_login());
        assert_eq!(user.updated_at(), later);

        let even_later = later + Duration::seconds(10);
        assert!(!user.deactivate(even_later));
        assert_eq!(user.updated_at(), later);

        assert!(user.activate(even_later));
        assert!(user.is_active());
        assert_eq!(user.updated_at(), even_later);
    }

    #[test]
    fn test_mark_verified_is_idempotent() {
        let now = Utc::now();
        let mut user = user(now);

        let later = now + Duration::seconds(5);
        assert!(user.mark_verified(later));
        assert!(!user.mark_verified(later + Duration::seconds(5)));
        assert!(user.is_verified());
        assert_eq!(user.updated_at(), later);
    }

    #[test]
    fn test_change_password_with_clock_skew() {
        let now = Utc::now();
        let mut user = user(now);

        let hash = PasswordHash::parse(
            "$argon2id$v=19$m=65536,t=4,p=2$b3RoZXJzYWx0$b3RoZXJoYXNo",
        )
        .unwrap();
        user.change_password(hash.clone(), now - Duration::seconds(60));

        assert_eq!(user.password(), &hash);
        assert!(user.updated_at() >= user.created_at());
    }
}
