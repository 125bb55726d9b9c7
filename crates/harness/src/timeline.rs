//! Timelines and the per-timeline replay state machine.

use serde::{Deserialize, Serialize};

use slicecheck_events::{DomainEvent, EventPayload};

use crate::checkpoint::CheckpointFixture;
use crate::report::{CheckpointFailure, Verdict};

/// One ordered test scenario: checkpoints that share a single history.
///
/// The history itself is not stored here; the engine creates it empty for each
/// replay and drops it when the timeline ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "P: EventPayload + Deserialize<'de>, C: Deserialize<'de>, S: Deserialize<'de>"))]
pub struct Timeline<P, C, S> {
    name: String,
    checkpoints: Vec<CheckpointFixture<P, C, S>>,
}

impl<P, C, S> Timeline<P, C, S> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            checkpoints: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn checkpoints(&self) -> &[CheckpointFixture<P, C, S>] {
        &self.checkpoints
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Append a raw fixture (possibly malformed).
    pub fn checkpoint(mut self, fixture: CheckpointFixture<P, C, S>) -> Self {
        self.checkpoints.push(fixture);
        self
    }

    pub fn expect_event(self, command: C, event: DomainEvent<P>) -> Self {
        self.checkpoint(CheckpointFixture::succeeds(command, event))
    }

    pub fn expect_error(self, command: C, message: impl Into<String>) -> Self {
        self.checkpoint(CheckpointFixture::fails(command, message))
    }

    pub fn expect_state(self, state: S) -> Self {
        self.checkpoint(CheckpointFixture::state(state))
    }
}

/// Lifecycle of one timeline replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineState {
    Init,
    Running,
    Passed,
    Failed,
}

impl TimelineState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TimelineState::Passed | TimelineState::Failed)
    }

    pub fn can_transition_to(self, next: TimelineState) -> bool {
        use TimelineState::*;
        matches!(
            (self, next),
            (Init, Running) | (Init, Passed) | (Running, Running) | (Running, Passed) | (Running, Failed)
        )
    }
}

/// Tracks a timeline replay through `Init → Running → {Passed, Failed}`.
///
/// Terminal states are sticky: once passed or failed, `dispatch` refuses to
/// start another checkpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineRun {
    state: TimelineState,
    executed: usize,
    failure: Option<CheckpointFailure>,
}

impl Default for TimelineRun {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineRun {
    pub fn new() -> Self {
        Self {
            state: TimelineState::Init,
            executed: 0,
            failure: None,
        }
    }

    pub fn state(&self) -> TimelineState {
        self.state
    }

    /// Number of checkpoints dispatched so far, the failing one included.
    pub fn executed(&self) -> usize {
        self.executed
    }

    fn transition(&mut self, next: TimelineState) -> bool {
        if !self.state.can_transition_to(next) {
            tracing::warn!(from = ?self.state, to = ?next, "illegal timeline transition");
            return false;
        }
        self.state = next;
        true
    }

    /// Enter (or stay in) `Running` before executing a checkpoint.
    ///
    /// Returns `false` if the timeline has already finished.
    pub fn dispatch(&mut self) -> bool {
        if !self.transition(TimelineState::Running) {
            return false;
        }
        self.executed += 1;
        true
    }

    pub fn fail(&mut self, failure: CheckpointFailure) {
        if self.transition(TimelineState::Failed) {
            self.failure = Some(failure);
        }
    }

    /// Close the run. A run that has not failed passes.
    pub fn finish(mut self) -> (Verdict, usize) {
        if !self.state.is_terminal() {
            self.transition(TimelineState::Passed);
        }
        let verdict = match self.failure {
            Some(failure) => Verdict::Failed(failure),
            None => Verdict::Passed,
        };
        (verdict, self.executed)
    }
}
