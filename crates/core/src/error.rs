//! Domain error model.

use serde::Serialize;
use thiserror::Error;

/// Result type used by command handlers.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level failure signaled by a command handler.
///
/// Keep this focused on deterministic, business/domain failures. Harness
/// failures (malformed fixtures, assertion mismatches) live in the harness crate.
///
/// Serializes as `{"kind": "rule_violation", "message": "..."}` so replay
/// reports keep the kind of a failure next to its message.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum DomainError {
    /// A command breaches a rule observable from history (e.g. a duplicate name).
    #[error("domain rule violated: {0}")]
    RuleViolation(String),

    /// A command payload failed validation (e.g. empty name).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    pub fn rule_violation(msg: impl Into<String>) -> Self {
        Self::RuleViolation(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// The human-readable message, without the kind prefix used by `Display`.
    ///
    /// Expected-failure checkpoints compare against this value.
    pub fn message(&self) -> &str {
        match self {
            DomainError::RuleViolation(msg) | DomainError::Validation(msg) => msg,
        }
    }
}
