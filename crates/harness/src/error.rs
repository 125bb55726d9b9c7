//! Failure taxonomy of a replayed checkpoint.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use slicecheck_core::DomainError;

use crate::report::FieldDiff;

/// The checkpoint fixture itself is malformed.
///
/// This is a broken test, not a failing handler: it is never recovered and is
/// reported before the handler or projector runs.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralError {
    #[error("command checkpoint sets both an expected event and an expected error")]
    AmbiguousOutcome,

    #[error("command checkpoint sets neither an expected event nor an expected error")]
    MissingOutcome,

    #[error("command checkpoint also carries an expected state")]
    CommandWithState,

    #[error("expected event or error without a command")]
    OutcomeWithoutCommand,

    #[error("checkpoint has no command and no expected state")]
    Empty,

    #[error("command checkpoint in a slice without a command handler")]
    NoHandler,

    #[error("state query in a slice without a state projector")]
    NoProjector,
}

/// What an assertion mismatch was comparing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchSubject {
    Event,
    State,
    ErrorMessage,
}

impl core::fmt::Display for MismatchSubject {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            MismatchSubject::Event => "event",
            MismatchSubject::State => "state",
            MismatchSubject::ErrorMessage => "error message",
        };
        f.write_str(s)
    }
}

/// Why a checkpoint failed. Any of these ends the enclosing timeline only.
#[derive(Debug, Error, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    #[error("malformed checkpoint: {error}")]
    Structural {
        #[from]
        error: StructuralError,
    },

    /// Actual event details, state, or error message differ from the fixture.
    ///
    /// For error messages, `error` holds the failure the handler signaled.
    #[error("{subject} mismatch ({} differing field(s))", .diff.len())]
    Mismatch {
        subject: MismatchSubject,
        expected: Value,
        actual: Value,
        diff: Vec<FieldDiff>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<DomainError>,
    },

    /// An expected-failure checkpoint whose handler returned an event.
    #[error("expected failure {expected_error:?} did not occur")]
    UnexpectedSuccess { expected_error: String, actual: Value },

    /// An expected-event checkpoint whose handler rejected the command.
    #[error("expected an event but the handler failed: {error}")]
    UnexpectedFailure { expected: Value, error: DomainError },
}

impl FailureKind {
    pub fn mismatch(
        subject: MismatchSubject,
        expected: &impl Serialize,
        actual: &impl Serialize,
    ) -> Self {
        let expected = to_json(expected);
        let actual = to_json(actual);
        let diff = crate::report::diff(&expected, &actual);
        Self::Mismatch {
            subject,
            expected,
            actual,
            diff,
            error: None,
        }
    }

    /// The handler failed, but not with the expected message.
    pub fn wrong_error(expected_error: &str, error: DomainError) -> Self {
        let expected = Value::from(expected_error);
        let actual = Value::from(error.message());
        let diff = crate::report::diff(&expected, &actual);
        Self::Mismatch {
            subject: MismatchSubject::ErrorMessage,
            expected,
            actual,
            diff,
            error: Some(error),
        }
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, FailureKind::Structural { .. })
    }
}

/// Render a fixture value for a report. Values that cannot be represented as
/// JSON are reported by their serializer error instead.
pub(crate) fn to_json(value: &impl Serialize) -> Value {
    serde_json::to_value(value)
        .unwrap_or_else(|e| Value::String(format!("<unserializable: {e}>")))
}
