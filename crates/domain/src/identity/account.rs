//! Typed builder for `User`.

use chrono::{DateTime, Utc};

use crate::auth::password::PasswordHash;
use crate::error::{DomainError, Result};
use crate::identity::email::EmailAddress;
use crate::identity::id::UserId;
use crate::identity::phone::PhoneNumber;
use crate::identity::role::Role;
use crate::identity::user::User;

const MAX_FULL_NAME_LENGTH: usize = 255;

/// Marker type for missing value.
#[derive(Debug)]
pub struct Missing;

/// Marker type for present value.
#[derive(Debug)]
pub struct Present<T>(pub T);

/// A builder to track presence of `Email` and `Password`.
///
/// Only a builder holding both can produce a [`User`]. Every other field
/// falls back to what a fresh registration gets: random id, customer role,
/// active, unverified, timestamps set to the build time.
#[derive(Debug)]
pub struct UserBuilder<Email, Password> {
    id: Option<UserId>,
    email: Email,
    password: Password,
    full_name: Option<String>,
    phone: Option<PhoneNumber>,
    role: Role,
    is_active: bool,
    is_verified: bool,
    timestamps: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl UserBuilder<Missing, Missing> {
    /// Creates a new [`UserBuilder`] with all required fields initialized as
    /// [`Missing`].
    pub fn new() -> Self {
        Self {
            id: None,
            email: Missing,
            password: Missing,
            full_name: None,
            phone: None,
            role: Role::Customer,
            is_active: true,
            is_verified: false,
            timestamps: None,
        }
    }
}

impl Default for UserBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Password> UserBuilder<Missing, Password> {
    /// Sets user email using [`EmailAddress`] value object.
    pub fn email(
        self,
        email: EmailAddress,
    ) -> UserBuilder<Present<EmailAddress>, Password> {
        UserBuilder {
            id: self.id,
            email: Present(email),
            password: self.password,
            full_name: self.full_name,
            phone: self.phone,
            role: self.role,
            is_active: self.is_active,
            is_verified: self.is_verified,
            timestamps: self.timestamps,
        }
    }
}

impl<Email> UserBuilder<Email, Missing> {
    /// Sets the hashed password.
    pub fn password(
        self,
        password: PasswordHash,
    ) -> UserBuilder<Email, Present<PasswordHash>> {
        UserBuilder {
            id: self.id,
            email: self.email,
            password: Present(password),
            full_name: self.full_name,
            phone: self.phone,
            role: self.role,
            is_active: self.is_active,
            is_verified: self.is_verified,
            timestamps: self.timestamps,
        }
    }
}

impl<Email, Password> UserBuilder<Email, Password> {
    /// Reuses an existing identifier instead of generating one.
    pub fn id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the display name.
    pub fn full_name(mut self, full_name: Option<String>) -> Self {
        self.full_name = full_name;
        self
    }

    pub fn phone(mut self, phone: Option<PhoneNumber>) -> Self {
        self.phone = phone;
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    pub fn verified(mut self, is_verified: bool) -> Self {
        self.is_verified = is_verified;
        self
    }

    /// Restores `created_at` and `updated_at` of a persisted user.
    pub fn timestamps(
        mut self,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        self.timestamps = Some((created_at, updated_at));
        self
    }
}

impl UserBuilder<Present<EmailAddress>, Present<PasswordHash>> {
    /// Finalizes build.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the full name is blank or too long, or if restored
    /// timestamps have `updated_at` before `created_at`.
    pub fn build(self, now: DateTime<Utc>) -> Result<User> {
        let UserBuilder {
            id,
            email: Present(email),
            password: Present(password),
            full_name,
            phone,
            role,
            is_active,
            is_verified,
            timestamps,
        } = self;

        let full_name = full_name.map(validate_full_name).transpose()?;

        let (created_at, updated_at) = timestamps.unwrap_or((now, now));
        if updated_at < created_at {
            return Err(DomainError::InvalidTimestamps);
        }

        Ok(User {
            id: id.unwrap_or_else(UserId::generate),
            email,
            password,
            full_name,
            phone,
            role,
            is_active,
            is_verified,
            created_at,
            updated_at,
        })
    }
}

fn validate_full_name(full_name: String) -> Result<String> {
    let trimmed = full_name.trim();

    if trimmed.is_empty() || trimmed.chars().count() > MAX_FULL_NAME_LENGTH {
        return Err(DomainError::ValidationFailed {
            field: "full_name".into(),
            message: format!(
                "full name must contain between 1 and {MAX_FULL_NAME_LENGTH} characters"
            ),
        });
    }

    Ok(trimmed.to_owned())
}
