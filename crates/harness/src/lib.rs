//! `slicecheck-harness` — replays slices (command handlers and state projectors)
//! through scripted timelines and reports a verdict per timeline.

pub mod checkpoint;
pub mod config;
pub mod engine;
pub mod error;
pub mod registry;
pub mod report;
pub mod slice;
pub mod timeline;

pub use checkpoint::{Checkpoint, CheckpointFixture, CheckpointKind};
pub use config::{ConfigError, ReplayConfig};
pub use engine::{ReplayEngine, replay_slice, replay_timeline};
pub use error::{FailureKind, MismatchSubject, StructuralError};
pub use registry::SliceRegistry;
pub use report::{CheckpointFailure, FieldDiff, RunReport, SliceReport, TimelineReport, Verdict};
pub use slice::{ReplaySlice, Slice, SliceSubject};
pub use timeline::{Timeline, TimelineRun, TimelineState};
