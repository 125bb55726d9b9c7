//! Timeline replay: fold checkpoints over a private history and assert outcomes.
//!
//! ```text
//! for each slice, for each timeline:
//!   history = []
//!   for each checkpoint:
//!     CommandSuccess  handler(history, command) details == expected details
//!                     → history += expected event
//!     CommandFailure  handler(history, command) fails with the expected message
//!     StateQuery      projector(history) == expected state
//!     first failure   → timeline Failed, remaining checkpoints skipped
//!   drop history
//! ```
//!
//! A failure ends only its own timeline; other timelines and slices replay
//! regardless. Appending the *expected* event (not the handler's return value)
//! keeps later checkpoints working against the fixture's shape.

use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use slicecheck_events::{Command, DetailProjection, DomainEvent, EventPayload};

use crate::checkpoint::{Checkpoint, CheckpointFixture};
use crate::config::ReplayConfig;
use crate::error::{FailureKind, MismatchSubject, StructuralError, to_json};
use crate::registry::SliceRegistry;
use crate::report::{CheckpointFailure, RunReport, SliceReport, TimelineReport, Verdict};
use crate::slice::{Slice, SliceSubject};
use crate::timeline::{Timeline, TimelineRun};

/// Replays every slice of a registry.
#[derive(Debug, Clone, Default)]
pub struct ReplayEngine {
    config: ReplayConfig,
}

impl ReplayEngine {
    pub fn new(config: ReplayConfig) -> Self {
        Self { config }
    }

    /// Engine configured from `SLICECHECK_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(ReplayConfig::from_env())
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    pub fn run(&self, registry: &SliceRegistry) -> RunReport {
        info!(
            slices = registry.len(),
            timelines = registry.timeline_count(),
            parallel = self.config.parallel,
            "replaying slices"
        );

        let slices = if self.config.parallel {
            std::thread::scope(|scope| {
                let handles: Vec<_> = registry
                    .iter()
                    .map(|slice| scope.spawn(move || slice.replay()))
                    .collect();
                handles
                    .into_iter()
                    .map(|handle| match handle.join() {
                        Ok(report) => report,
                        // Same outcome as a panicking handler in sequential mode.
                        Err(panic) => std::panic::resume_unwind(panic),
                    })
                    .collect()
            })
        } else {
            registry.iter().map(|slice| slice.replay()).collect()
        };

        let report = RunReport { slices };
        let (passed, failed) = report.counts();
        info!(passed, failed, "replay finished");
        report
    }
}

/// Replay all timelines of one slice, each from an empty history.
pub fn replay_slice<P, C, S>(slice: &Slice<P, C, S>) -> SliceReport
where
    P: EventPayload,
    C: Command,
    S: PartialEq + Serialize + core::fmt::Debug,
{
    let _span = info_span!("slice", slice = slice.name()).entered();
    let timelines = slice
        .timelines()
        .iter()
        .map(|timeline| replay_timeline(slice.subject(), timeline))
        .collect();
    SliceReport {
        slice: slice.name().to_string(),
        timelines,
    }
}

/// Replay one timeline. Stops at the first failing checkpoint.
pub fn replay_timeline<P, C, S>(
    subject: &SliceSubject<P, C, S>,
    timeline: &Timeline<P, C, S>,
) -> TimelineReport
where
    P: EventPayload,
    C: Command,
    S: PartialEq + Serialize + core::fmt::Debug,
{
    let _span = info_span!("timeline", timeline = timeline.name()).entered();

    let mut run = TimelineRun::new();
    let mut history: Vec<DomainEvent<P>> = Vec::new();

    for (index, fixture) in timeline.checkpoints().iter().enumerate() {
        if !run.dispatch() {
            break;
        }
        match check(subject, &history, fixture) {
            Ok(Some(expected_event)) => {
                debug!(checkpoint = index, event = expected_event.event_name(), "appending expected event");
                history.push(expected_event.clone());
            }
            Ok(None) => debug!(checkpoint = index, "checkpoint held"),
            Err(kind) => {
                warn!(checkpoint = index, failure = %kind, "checkpoint failed");
                run.fail(CheckpointFailure { index, kind });
                break;
            }
        }
    }

    let (verdict, executed) = run.finish();
    match &verdict {
        Verdict::Passed => info!(checkpoints = executed, "timeline passed"),
        Verdict::Failed(failure) => info!(checkpoints = executed, %failure, "timeline failed"),
    }

    TimelineReport {
        timeline: timeline.name().to_string(),
        verdict,
        checkpoints_executed: executed,
        checkpoints_total: timeline.len(),
    }
}

/// Run one checkpoint against the current history.
///
/// On success returns the event to append, if any. History is only read here.
fn check<'f, P, C, S>(
    subject: &SliceSubject<P, C, S>,
    history: &[DomainEvent<P>],
    fixture: &'f CheckpointFixture<P, C, S>,
) -> Result<Option<&'f DomainEvent<P>>, FailureKind>
where
    P: EventPayload,
    C: Command,
    S: PartialEq + Serialize + core::fmt::Debug,
{
    let checkpoint = fixture.checkpoint()?;
    debug!(kind = %checkpoint.kind(), history = history.len(), "dispatching checkpoint");

    match checkpoint {
        Checkpoint::CommandSuccess {
            command,
            expected_event,
        } => {
            let handler = subject.handler.as_deref().ok_or(StructuralError::NoHandler)?;
            let expected = expected_event.details();
            debug!(
                command = command.command_type(),
                "expecting event {}",
                expected.event_type
            );

            match handler.handle(history, command) {
                Ok(actual) => {
                    let actual = actual.details();
                    if actual == expected {
                        Ok(Some(expected_event))
                    } else {
                        Err(FailureKind::mismatch(MismatchSubject::Event, &expected, &actual))
                    }
                }
                Err(error) => Err(FailureKind::UnexpectedFailure {
                    expected: to_json(&expected),
                    error,
                }),
            }
        }
        Checkpoint::CommandFailure {
            command,
            expected_error,
        } => {
            let handler = subject.handler.as_deref().ok_or(StructuralError::NoHandler)?;
            debug!(
                command = command.command_type(),
                "expecting failure {expected_error:?}"
            );

            match handler.handle(history, command) {
                Err(err) if err.message() == expected_error => Ok(None),
                Err(err) => Err(FailureKind::wrong_error(expected_error, err)),
                Ok(event) => Err(FailureKind::UnexpectedSuccess {
                    expected_error: expected_error.to_string(),
                    actual: to_json(&event.details()),
                }),
            }
        }
        Checkpoint::StateQuery { expected_state } => {
            let projector = subject
                .projector
                .as_deref()
                .ok_or(StructuralError::NoProjector)?;

            let actual = projector.project(history);
            if &actual == expected_state {
                Ok(None)
            } else {
                Err(FailureKind::mismatch(MismatchSubject::State, expected_state, &actual))
            }
        }
    }
}
