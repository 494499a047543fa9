//! Cryptographic adapters.

mod argon2;

pub use argon2::Argon2PasswordHasher;
