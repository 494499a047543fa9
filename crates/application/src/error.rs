//! Application-level errors.

use domain::error::DomainError;

pub type Result<T> = std::result::Result<T, ApplicationError>;

/// Errors that can occur in the application layer.
///
/// Every variant but [`ApplicationError::Internal`] is a domain outcome the
/// caller can act on. `Internal` is an infrastructure failure (lost
/// connection, broken hasher parameters...) and must never be reported as
/// one of the others.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("user already exists")]
    AlreadyExists,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("account is deactivated")]
    AccountDeactivated,
    #[error("invalid or expired token")]
    Token,
    #[error("user not found")]
    UserNotFound,

    #[error("internal server error")]
    Internal(Box<dyn std::error::Error + Send + Sync>),
}

impl ApplicationError {
    pub fn internal<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Internal(Box::new(err))
    }
}

pub trait ToInternal<T> {
    fn catch(self) -> Result<T>;
}

impl<T, E> ToInternal<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn catch(self) -> Result<T> {
        self.map_err(|e| ApplicationError::Internal(Box::new(e)))
    }
}
