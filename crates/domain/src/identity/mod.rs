//! Identity domain.

pub mod account;
pub mod email;
pub mod id;
pub mod phone;
pub mod role;
pub mod user;
