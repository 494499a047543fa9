//! Interfaces for cryptographic operations.

use domain::auth::password::{Password, PasswordHash};

use crate::error::Result;

/// Port for password hashing operations.
pub trait PasswordHasher: Send + Sync {
    /// Hash a password with a fresh random salt.
    ///
    /// Two calls with the same password return different hashes.
    fn hash(&self, password: &Password) -> Result<PasswordHash>;

    /// Verify a plaintext against a stored hash.
    ///
    /// Never fails: a malformed hash simply does not match.
    fn verify(&self, plaintext: &str, hash: &PasswordHash) -> bool;
}
