//! Checkpoints: one expected interaction within a timeline.

use serde::{Deserialize, Serialize};

use slicecheck_events::{DomainEvent, EventPayload};

use crate::error::StructuralError;

/// A checkpoint as written in a fixture.
///
/// Every field is optional so that malformed fixtures stay representable (and
/// deserializable); [`CheckpointFixture::checkpoint`] validates the shape at
/// replay time. Prefer the typed constructors, which are always well formed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "P: EventPayload + Deserialize<'de>, C: Deserialize<'de>, S: Deserialize<'de>"))]
pub struct CheckpointFixture<P, C, S> {
    pub command: Option<C>,
    pub event: Option<DomainEvent<P>>,
    pub error: Option<String>,
    pub state: Option<S>,
}

/// A validated checkpoint, borrowing from its fixture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Checkpoint<'a, P, C, S> {
    /// The handler must return an event whose details equal `expected_event`'s.
    CommandSuccess {
        command: &'a C,
        expected_event: &'a DomainEvent<P>,
    },
    /// The handler must fail with exactly this message.
    CommandFailure {
        command: &'a C,
        expected_error: &'a str,
    },
    /// The projector must return a state equal to `expected_state`.
    StateQuery { expected_state: &'a S },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointKind {
    CommandSuccess,
    CommandFailure,
    StateQuery,
}

impl core::fmt::Display for CheckpointKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            CheckpointKind::CommandSuccess => "command_success",
            CheckpointKind::CommandFailure => "command_failure",
            CheckpointKind::StateQuery => "state_query",
        };
        f.write_str(s)
    }
}

impl<P, C, S> Checkpoint<'_, P, C, S> {
    pub fn kind(&self) -> CheckpointKind {
        match self {
            Checkpoint::CommandSuccess { .. } => CheckpointKind::CommandSuccess,
            Checkpoint::CommandFailure { .. } => CheckpointKind::CommandFailure,
            Checkpoint::StateQuery { .. } => CheckpointKind::StateQuery,
        }
    }
}

impl<P, C, S> CheckpointFixture<P, C, S> {
    /// `command` must produce an event matching `event`.
    pub fn succeeds(command: C, event: DomainEvent<P>) -> Self {
        Self {
            command: Some(command),
            event: Some(event),
            error: None,
            state: None,
        }
    }

    /// `command` must be rejected with `message`.
    pub fn fails(command: C, message: impl Into<String>) -> Self {
        Self {
            command: Some(command),
            event: None,
            error: Some(message.into()),
            state: None,
        }
    }

    /// The projected state must equal `state`.
    pub fn state(state: S) -> Self {
        Self {
            command: None,
            event: None,
            error: None,
            state: Some(state),
        }
    }

    /// Validate the fixture's shape.
    ///
    /// A command checkpoint carries exactly one of event/error and no state; a
    /// state query carries a state and nothing else.
    pub fn checkpoint(&self) -> Result<Checkpoint<'_, P, C, S>, StructuralError> {
        match (&self.command, &self.event, &self.error, &self.state) {
            (Some(_), _, _, Some(_)) => Err(StructuralError::CommandWithState),
            (Some(command), Some(expected_event), None, None) => Ok(Checkpoint::CommandSuccess {
                command,
                expected_event,
            }),
            (Some(command), None, Some(expected_error), None) => Ok(Checkpoint::CommandFailure {
                command,
                expected_error,
            }),
            (Some(_), Some(_), Some(_), None) => Err(StructuralError::AmbiguousOutcome),
            (Some(_), None, None, None) => Err(StructuralError::MissingOutcome),
            (None, Some(_), _, _) | (None, _, Some(_), _) => {
                Err(StructuralError::OutcomeWithoutCommand)
            }
            (None, None, None, Some(expected_state)) => {
                Ok(Checkpoint::StateQuery { expected_state })
            }
            (None, None, None, None) => Err(StructuralError::Empty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use slicecheck_events::{EventPayload, Tags};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Pinged;

    impl EventPayload for Pinged {
        fn event_name(&self) -> &'static str {
            "pinged"
        }

        fn tags(&self) -> Tags {
            Tags::new()
        }
    }

    type Fixture = CheckpointFixture<Pinged, &'static str, u32>;

    fn pinged() -> DomainEvent<Pinged> {
        DomainEvent::new(Pinged)
    }

    #[test]
    fn typed_constructors_are_well_formed() {
        let ok = Fixture::succeeds("ping", pinged());
        assert_eq!(ok.checkpoint().unwrap().kind(), CheckpointKind::CommandSuccess);

        let err = Fixture::fails("ping", "nope");
        match err.checkpoint().unwrap() {
            Checkpoint::CommandFailure {
                command,
                expected_error,
            } => {
                assert_eq!(*command, "ping");
                assert_eq!(expected_error, "nope");
            }
            other => panic!("Expected CommandFailure, got {other:?}"),
        }

        let query = Fixture::state(3);
        assert_eq!(
            query.checkpoint().unwrap(),
            Checkpoint::StateQuery { expected_state: &3 }
        );
    }

    #[test]
    fn both_event_and_error_is_ambiguous() {
        let mut fixture = Fixture::succeeds("ping", pinged());
        fixture.error = Some("nope".into());
        assert_eq!(fixture.checkpoint(), Err(StructuralError::AmbiguousOutcome));
    }

    #[test]
    fn command_without_outcome_is_missing_one() {
        let fixture = Fixture {
            command: Some("ping"),
            event: None,
            error: None,
            state: None,
        };
        assert_eq!(fixture.checkpoint(), Err(StructuralError::MissingOutcome));
    }

    #[test]
    fn state_query_must_not_carry_a_command() {
        let mut fixture = Fixture::state(1);
        fixture.command = Some("ping");
        assert_eq!(fixture.checkpoint(), Err(StructuralError::CommandWithState));
    }

    #[test]
    fn outcome_without_command_is_rejected() {
        let mut fixture = Fixture::state(1);
        fixture.event = Some(pinged());
        assert_eq!(
            fixture.checkpoint(),
            Err(StructuralError::OutcomeWithoutCommand)
        );

        let fixture = Fixture {
            command: None,
            event: None,
            error: Some("nope".into()),
            state: None,
        };
        assert_eq!(
            fixture.checkpoint(),
            Err(StructuralError::OutcomeWithoutCommand)
        );
    }

    #[test]
    fn empty_fixture_is_rejected() {
        let fixture = Fixture {
            command: None,
            event: None,
            error: None,
            state: None,
        };
        assert_eq!(fixture.checkpoint(), Err(StructuralError::Empty));
    }

    #[test]
    fn fixtures_deserialize_with_missing_fields() {
        let fixture: CheckpointFixture<Pinged, String, u32> =
            serde_json::from_value(json!({ "command": "ping", "error": "nope" })).unwrap();
        assert_eq!(
            fixture.checkpoint().unwrap().kind(),
            CheckpointKind::CommandFailure
        );
    }
}
