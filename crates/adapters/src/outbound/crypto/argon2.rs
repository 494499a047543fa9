//! Argon2id password hasher implementation.

use application::error::{Result, ToInternal};
use application::ports::outbound::PasswordHasher;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as Argon2PasswordHasherTrait,
    PasswordVerifier, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use domain::auth::password::{Password, PasswordHash as DomainPasswordHash};
use rand::rngs::OsRng;

const OUTPUT_LENGTH: usize = 32;

/// Argon2id password hasher adapter.
///
/// Verification reads the parameters encoded in the stored hash, so hashes
/// produced under older settings keep working after a cost change.
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Create a new Argon2 hasher with custom parameters.
    ///
    /// `memory_cost` is in KiB.
    pub fn new(
        memory_cost: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self> {
        let params = Params::new(
            memory_cost,
            iterations,
            parallelism,
            Some(OUTPUT_LENGTH),
        )
        .catch()?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &Password) -> Result<DomainPasswordHash> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .catch()?;

        Ok(DomainPasswordHash::parse(hash.to_string())?)
    }

    fn verify(&self, plaintext: &str, hash: &DomainPasswordHash) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash.as_str()) else {
            return false;
        };

        // Constant-time comparison happens inside `verify_password`.
        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed_hash)
            .is_ok()
    }
}
