use slicecheck_core::DomainResult;

use crate::DomainEvent;

/// Decides a single event from history and a command (command handler contract).
///
/// Handlers must be **pure**:
///
/// - `history` is read-only; nothing is appended or mutated
/// - no hidden state: identical `(history, command)` yields identical output
/// - domain rules are checked against `history` and violations are returned as
///   `DomainError`, never panicked
///
/// Any `Fn(&[DomainEvent<P>], &C) -> DomainResult<DomainEvent<P>>` is a handler,
/// so plain functions register directly.
pub trait CommandHandler<P, C>: Send + Sync {
    fn handle(&self, history: &[DomainEvent<P>], command: &C) -> DomainResult<DomainEvent<P>>;
}

impl<P, C, F> CommandHandler<P, C> for F
where
    F: Fn(&[DomainEvent<P>], &C) -> DomainResult<DomainEvent<P>> + Send + Sync,
{
    fn handle(&self, history: &[DomainEvent<P>], command: &C) -> DomainResult<DomainEvent<P>> {
        self(history, command)
    }
}
