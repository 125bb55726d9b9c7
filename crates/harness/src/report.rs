//! Replay results handed to an external runner.
//!
//! Reports are plain data (`Serialize`); formatting, console output and exit
//! codes are the runner's business.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;

use crate::error::FailureKind;

/// The first failing checkpoint of a timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckpointFailure {
    /// Zero-based position of the checkpoint within its timeline.
    pub index: usize,
    #[serde(flatten)]
    pub kind: FailureKind,
}

impl core::fmt::Display for CheckpointFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "checkpoint {}: {}", self.index, self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    Passed,
    Failed(CheckpointFailure),
}

impl Verdict {
    pub fn is_passed(&self) -> bool {
        matches!(self, Verdict::Passed)
    }

    pub fn failure(&self) -> Option<&CheckpointFailure> {
        match self {
            Verdict::Passed => None,
            Verdict::Failed(failure) => Some(failure),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineReport {
    pub timeline: String,
    pub verdict: Verdict,
    /// Checkpoints dispatched, the failing one included.
    pub checkpoints_executed: usize,
    pub checkpoints_total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliceReport {
    pub slice: String,
    pub timelines: Vec<TimelineReport>,
}

impl SliceReport {
    pub fn passed(&self) -> bool {
        self.timelines.iter().all(|t| t.verdict.is_passed())
    }

    pub fn timeline(&self, name: &str) -> Option<&TimelineReport> {
        self.timelines.iter().find(|t| t.timeline == name)
    }
}

/// Result of replaying a whole registry, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    pub slices: Vec<SliceReport>,
}

impl RunReport {
    pub fn passed(&self) -> bool {
        self.slices.iter().all(SliceReport::passed)
    }

    pub fn slice(&self, name: &str) -> Option<&SliceReport> {
        self.slices.iter().find(|s| s.slice == name)
    }

    /// Failed timelines with the name of their slice.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &TimelineReport)> {
        self.slices.iter().flat_map(|s| {
            s.timelines
                .iter()
                .filter(|t| !t.verdict.is_passed())
                .map(move |t| (s.slice.as_str(), t))
        })
    }

    /// `(passed, failed)` timeline counts.
    pub fn counts(&self) -> (usize, usize) {
        let failed = self.failures().count();
        let total: usize = self.slices.iter().map(|s| s.timelines.len()).sum();
        (total - failed, failed)
    }
}

/// One differing location between an expected and an actual value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDiff {
    /// JSON pointer (RFC 6901) to the location; `""` is the root.
    pub path: String,
    /// `None` when the location only exists on the actual side.
    pub expected: Option<Value>,
    /// `None` when the location only exists on the expected side.
    pub actual: Option<Value>,
}

/// Structural diff of two JSON values: objects by key, arrays by index, leaves by value.
pub fn diff(expected: &Value, actual: &Value) -> Vec<FieldDiff> {
    let mut out = Vec::new();
    diff_at(String::new(), Some(expected), Some(actual), &mut out);
    out
}

fn diff_at(path: String, expected: Option<&Value>, actual: Option<&Value>, out: &mut Vec<FieldDiff>) {
    match (expected, actual) {
        (Some(Value::Object(e)), Some(Value::Object(a))) => {
            let keys: BTreeSet<&String> = e.keys().chain(a.keys()).collect();
            for key in keys {
                diff_at(
                    format!("{path}/{}", escape(key)),
                    e.get(key.as_str()),
                    a.get(key.as_str()),
                    out,
                );
            }
        }
        (Some(Value::Array(e)), Some(Value::Array(a))) => {
            for i in 0..e.len().max(a.len()) {
                diff_at(format!("{path}/{i}"), e.get(i), a.get(i), out);
            }
        }
        (e, a) if e != a => out.push(FieldDiff {
            path,
            expected: e.cloned(),
            actual: a.cloned(),
        }),
        _ => {}
    }
}

fn escape(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}
