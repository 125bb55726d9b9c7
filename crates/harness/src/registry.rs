//! Explicit collection of slices handed to the engine.

use crate::slice::ReplaySlice;

/// Slices to replay, in registration order.
///
/// Built once at start-up and passed to `ReplayEngine::run`; there is no
/// process-wide registry.
#[derive(Default)]
pub struct SliceRegistry {
    slices: Vec<Box<dyn ReplaySlice>>,
}

impl core::fmt::Debug for SliceRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.slices.iter().map(|s| s.name())).finish()
    }
}

impl SliceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, slice: impl ReplaySlice + 'static) -> Self {
        self.push(slice);
        self
    }

    pub fn push(&mut self, slice: impl ReplaySlice + 'static) {
        self.slices.push(Box::new(slice));
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Timelines across all registered slices.
    pub fn timeline_count(&self) -> usize {
        self.slices.iter().map(|s| s.timeline_count()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(dyn ReplaySlice + 'static)> {
        self.slices.iter().map(|s| s.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|s| s.name()).collect()
    }
}
