//! Authentification domain.

pub mod password;
pub mod token;
