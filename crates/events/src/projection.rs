use crate::DomainEvent;

/// Folds a history into a read-side state value (state projector contract).
///
/// Projectors are pure and deterministic: the same history always projects to
/// an equal state, and the history is never modified. Read models built this way
/// are **disposable**; events are the source of truth.
pub trait StateProjector<P, S>: Send + Sync {
    fn project(&self, history: &[DomainEvent<P>]) -> S;
}

impl<P, S, F> StateProjector<P, S> for F
where
    F: Fn(&[DomainEvent<P>]) -> S + Send + Sync,
{
    fn project(&self, history: &[DomainEvent<P>]) -> S {
        self(history)
    }
}
