//! These traits define what the application can do.

pub mod account;
pub mod auth;
pub mod create_account;
pub mod refresh_token;

pub use account::*;
pub use auth::*;
pub use create_account::*;
pub use refresh_token::*;
