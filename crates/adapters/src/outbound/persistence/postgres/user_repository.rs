//! PostgreSQL implementation for user repository.

use application::error::{ApplicationError, Result, ToInternal};
use application::ports::outbound::UserRepository;
use async_trait::async_trait;
use domain::identity::email::EmailAddress;
use domain::identity::id::UserId;
use domain::identity::user::User;
use sqlx::PgPool;
use sqlx::postgres::PgQueryResult;

use super::models::UserRecord;

/// PostgreSQL user repository.
///
/// Email uniqueness is enforced by the `users_email_key` constraint.
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new [`PgUserRepository`].
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a unique violation to `AlreadyExists`, anything else to `Internal`.
fn write_error(err: sqlx::Error) -> ApplicationError {
    let unique_violation = matches!(
        &err,
        sqlx::Error::Database(db) if db.is_unique_violation()
    );

    if unique_violation {
        ApplicationError::AlreadyExists
    } else {
        ApplicationError::internal(err)
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> Result<()> {
        let record = UserRecord::from(user);

        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, password_hash, full_name, phone, role,
                is_active, is_verified, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(record.id)
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(&record.full_name)
        .bind(&record.phone)
        .bind(&record.role)
        .bind(record.is_active)
        .bind(record.is_verified)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        Ok(())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT
                id, email, password_hash, full_name, phone, role,
                is_active, is_verified, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .catch()?;

        record.map(User::try_from).transpose().catch()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT
                id, email, password_hash, full_name, phone, role,
                is_active, is_verified, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .catch()?;

        record.map(User::try_from).transpose().catch()
    }

    async fn update(&self, user: &User) -> Result<()> {
        let record = UserRecord::from(user);

        let result: PgQueryResult = sqlx::query(
            r#"
            UPDATE users
            SET
                email = $2,
                password_hash = $3,
                full_name = $4,
                phone = $5,
                role = $6,
                is_active = $7,
                is_verified = $8,
                updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(record.id)
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(&record.full_name)
        .bind(&record.phone)
        .bind(&record.role)
        .bind(record.is_active)
        .bind(record.is_verified)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        if result.rows_affected() == 0 {
            return Err(ApplicationError::UserNotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<bool> {
        let result: PgQueryResult =
            sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(id.as_uuid())
                .execute(&self.pool)
                .await
                .catch()?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await
        .catch()
    }
}
