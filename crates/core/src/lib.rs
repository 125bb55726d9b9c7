//! `slicecheck-core` — domain primitives shared by handlers and the harness.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{EntityId, create_id};
