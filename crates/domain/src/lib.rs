//! Core business types of the storefront account service.
//!
//! Nothing in this crate performs I/O. Values are validated when they are
//! built, so holding one means it is well-formed.

#![forbid(unsafe_code)]

pub mod auth;
pub mod error;
pub mod identity;
