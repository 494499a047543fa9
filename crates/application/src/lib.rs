//! Use cases of the account service and the ports they depend on.

#![forbid(unsafe_code)]

pub mod dto;
pub mod error;
pub mod ports;
pub mod usecases;
