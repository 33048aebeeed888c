//! `konsut-core`: shared building blocks for the access-control crates.
//!
//! This crate contains **pure** primitives (no IO, no logging setup).

pub mod error;
pub mod id;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::UserId;
pub use value_object::ValueObject;
