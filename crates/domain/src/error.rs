//! Custom error handler for domain (core).

pub type Result<T> = std::result::Result<T, DomainError>;

/// Enum representing custom domain errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("invalid email formatting")]
    InvalidEmailFormat,
    #[error("invalid user identifier")]
    InvalidIdFormat,
    #[error(
        "phone must contain between 10 and 15 digits with an optional leading '+'"
    )]
    InvalidPhoneFormat,
    #[error("unknown role '{0}'")]
    InvalidRole(String),

    #[error("password must contain at least {min_length} characters")]
    WeakPassword { min_length: usize },
    #[error("password must contain at most {max_length} characters")]
    PasswordTooLong { max_length: usize },
    #[error("password hash is not a valid PHC string")]
    InvalidPasswordHash,

    #[error("{field}: {message}")]
    ValidationFailed { field: String, message: String },
    #[error("`updated_at` cannot be earlier than `created_at`")]
    InvalidTimestamps,
}

impl DomainError {
    /// Name of the input field the error relates to.
    pub fn field(&self) -> &str {
        match self {
            DomainError::InvalidEmailFormat => "email",
            DomainError::InvalidIdFormat => "id",
            DomainError::InvalidPhoneFormat => "phone",
            DomainError::InvalidRole(_) => "role",
            DomainError::WeakPassword { .. }
            | DomainError::PasswordTooLong { .. }
            | DomainError::InvalidPasswordHash => "password",
            DomainError::ValidationFailed { field, .. } => field,
            DomainError::InvalidTimestamps => "updated_at",
        }
    }
}
