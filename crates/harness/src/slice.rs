//! Slices: the code under test plus its timelines.

use serde::Serialize;

use slicecheck_events::{Command, CommandHandler, EventPayload, StateProjector};

use crate::report::SliceReport;
use crate::timeline::Timeline;

/// The function(s) a slice exercises.
///
/// Command checkpoints need a handler; state queries need a projector. A slice
/// may carry both so that a projector can be queried over a history built by
/// commands.
pub struct SliceSubject<P, C, S> {
    pub(crate) handler: Option<Box<dyn CommandHandler<P, C>>>,
    pub(crate) projector: Option<Box<dyn StateProjector<P, S>>>,
}

impl<P, C, S> core::fmt::Debug for SliceSubject<P, C, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SliceSubject")
            .field("handler", &self.has_handler())
            .field("projector", &self.has_projector())
            .finish()
    }
}

impl<P, C, S> SliceSubject<P, C, S> {
    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    pub fn has_projector(&self) -> bool {
        self.projector.is_some()
    }
}

#[derive(Debug)]
pub struct Slice<P, C, S> {
    name: String,
    subject: SliceSubject<P, C, S>,
    timelines: Vec<Timeline<P, C, S>>,
}

impl<P, C> Slice<P, C, ()>
where
    P: EventPayload,
{
    /// A slice exercising a command handler.
    pub fn command(name: impl Into<String>, handler: impl CommandHandler<P, C> + 'static) -> Self {
        Self::from_subject(
            name,
            SliceSubject {
                handler: Some(Box::new(handler)),
                projector: None,
            },
        )
    }
}

impl<P, S> Slice<P, (), S>
where
    P: EventPayload,
{
    /// A slice exercising a state projector over an empty history.
    pub fn view(name: impl Into<String>, projector: impl StateProjector<P, S> + 'static) -> Self {
        Self::from_subject(
            name,
            SliceSubject {
                handler: None,
                projector: Some(Box::new(projector)),
            },
        )
    }
}

impl<P, C, S> Slice<P, C, S>
where
    P: EventPayload,
{
    /// A slice whose history is built by `handler` and inspected by `projector`.
    pub fn command_and_view(
        name: impl Into<String>,
        handler: impl CommandHandler<P, C> + 'static,
        projector: impl StateProjector<P, S> + 'static,
    ) -> Self {
        Self::from_subject(
            name,
            SliceSubject {
                handler: Some(Box::new(handler)),
                projector: Some(Box::new(projector)),
            },
        )
    }

    fn from_subject(name: impl Into<String>, subject: SliceSubject<P, C, S>) -> Self {
        Self {
            name: name.into(),
            subject,
            timelines: Vec::new(),
        }
    }
}

impl<P, C, S> Slice<P, C, S> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subject(&self) -> &SliceSubject<P, C, S> {
        &self.subject
    }

    pub fn timelines(&self) -> &[Timeline<P, C, S>] {
        &self.timelines
    }

    pub fn timeline(mut self, timeline: Timeline<P, C, S>) -> Self {
        self.timelines.push(timeline);
        self
    }
}

/// A slice with its types erased, as stored in a registry.
pub trait ReplaySlice: Send + Sync {
    fn name(&self) -> &str;

    fn timeline_count(&self) -> usize;

    /// Replay every timeline of the slice, each on a fresh history.
    fn replay(&self) -> SliceReport;
}

impl<P, C, S> ReplaySlice for Slice<P, C, S>
where
    P: EventPayload,
    C: Command,
    S: PartialEq + Serialize + core::fmt::Debug + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn timeline_count(&self) -> usize {
        self.timelines.len()
    }

    fn replay(&self) -> SliceReport {
        crate::engine::replay_slice(self)
    }
}
