//! Database models for PostgreSQL.

use chrono::{DateTime, Utc};
use domain::auth::password::PasswordHash;
use domain::error::DomainError;
use domain::identity::email::EmailAddress;
use domain::identity::id::UserId;
use domain::identity::phone::PhoneNumber;
use domain::identity::user::User;
use sqlx::FromRow;
use uuid::Uuid;

/// User record as stored in the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRecord> for User {
    type Error = DomainError;

    /// Rows are re-validated on the way in; a row that no longer satisfies
    /// the domain rules is reported rather than loaded.
    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        let phone = record.phone.map(PhoneNumber::parse).transpose()?;

        User::builder()
            .id(UserId::from(record.id))
            .email(EmailAddress::parse(&record.email)?)
            .password(PasswordHash::parse(record.password_hash)?)
            .full_name(record.full_name)
            .phone(phone)
            .role(record.role.parse()?)
            .active(record.is_active)
            .verified(record.is_verified)
            .timestamps(record.created_at, record.updated_at)
            .build(record.updated_at)
    }
}

impl From<&User> for UserRecord {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            email: user.email().to_string(),
            password_hash: user.password().as_str().to_owned(),
            full_name: user.full_name().map(str::to_owned),
            phone: user.phone().map(ToString::to_string),
            role: user.role().as_str().to_owned(),
            is_active: user.is_active(),
            is_verified: user.is_verified(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}
