//! Infrastructure implementations of the application ports.

#![forbid(unsafe_code)]

pub mod outbound;
