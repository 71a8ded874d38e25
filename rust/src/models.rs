//! Core data types for schedule recalculation.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Opaque task identifier as issued by the task store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier of the project that scopes a recalculation run.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProjectId(pub String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Date constraint attached to a task.
///
/// Storage may hold constraint kinds the engine does not interpret; those are
/// kept verbatim in `Other` and behave like `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ConstraintType {
    #[default]
    None,
    MustStartOn,
    StartNoEarlierThan,
    Other(String),
}

impl ConstraintType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "NONE",
            Self::MustStartOn => "MUST_START_ON",
            Self::StartNoEarlierThan => "START_NO_EARLIER_THAN",
            Self::Other(s) => s,
        }
    }
}

impl ConstraintType {
    /// Constraint kind as read from storage; a missing kind is `None`.
    pub fn from_stored(kind: Option<&str>) -> Self {
        kind.and_then(|k| k.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for ConstraintType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "" | "NONE" => Self::None,
            "MUST_START_ON" => Self::MustStartOn,
            "START_NO_EARLIER_THAN" => Self::StartNoEarlierThan,
            _ => Self::Other(s.to_string()),
        })
    }
}

impl fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Precedence relation between a predecessor and its successor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DependencyType {
    /// Finish-to-Start
    #[default]
    FS,
    /// Start-to-Start
    SS,
    /// Finish-to-Finish
    FF,
    /// Start-to-Finish
    SF,
    /// Stored kind the engine does not understand; contributes nothing.
    Other(String),
}

impl DependencyType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::FS => "FS",
            Self::SS => "SS",
            Self::FF => "FF",
            Self::SF => "SF",
            Self::Other(s) => s,
        }
    }
}

impl FromStr for DependencyType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "FS" => Self::FS,
            "SS" => Self::SS,
            "FF" => Self::FF,
            "SF" => Self::SF,
            _ => Self::Other(s.to_string()),
        })
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A predecessor edge as loaded from the store, owned by the successor task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Predecessor {
    pub task_id: TaskId,
    pub dep_type: DependencyType,
    /// Signed day offset; negative values are lead time.
    pub lag_days: i64,
}

impl Predecessor {
    /// Edge as read from storage, with the dependency kind still a string.
    pub fn from_stored(task_id: impl Into<String>, kind: &str, lag_days: i64) -> Self {
        let dep_type: DependencyType = kind.parse().unwrap_or_default();
        Self::new(task_id, dep_type, lag_days)
    }

    pub fn new(task_id: impl Into<String>, dep_type: DependencyType, lag_days: i64) -> Self {
        Self {
            task_id: TaskId::new(task_id),
            dep_type,
            lag_days,
        }
    }
}

/// A schedulable task together with its predecessor edges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskRecord {
    pub id: TaskId,
    pub duration_days: u32,
    pub is_milestone: bool,
    pub constraint_type: ConstraintType,
    pub constraint_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub predecessors: Vec<Predecessor>,
}

impl TaskRecord {
    /// Unconstrained, unscheduled task with no predecessors.
    pub fn new(id: impl Into<String>, duration_days: u32) -> Self {
        Self {
            id: TaskId::new(id),
            duration_days,
            is_milestone: false,
            constraint_type: ConstraintType::None,
            constraint_date: None,
            start_date: None,
            end_date: None,
            predecessors: Vec::new(),
        }
    }

    /// Days the task spans: `max(duration, 0)` for milestones, at least 1 otherwise.
    ///
    /// A milestone stored with duration 0 is a point in time (`start == end`);
    /// only non-milestones are floored to one day.
    pub fn effective_duration(&self) -> u32 {
        if self.is_milestone {
            self.duration_days
        } else {
            self.duration_days.max(1)
        }
    }
}

/// Computed dates for one task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledDates {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A pending write-back of computed dates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateUpdate {
    pub task_id: TaskId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Caller-facing outcome of a recalculation run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecalcSummary {
    /// Tasks written back (or that would be written, in dry-run mode).
    pub updated_count: usize,
    /// Tasks that made it into the topological order.
    pub ordered_count: usize,
    /// Non-archived tasks loaded for the project.
    pub total_count: usize,
    /// Tasks in or downstream of a dependency cycle, left untouched.
    pub skipped_task_ids: Vec<TaskId>,
}

impl RecalcSummary {
    pub fn has_skipped(&self) -> bool {
        !self.skipped_task_ids.is_empty()
    }
}
