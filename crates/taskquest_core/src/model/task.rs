//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record owned by a single user.
//! - Fix the difficulty-to-XP award table applied at creation time.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `xp_value` is assigned once at creation and never re-derived,
//!   so later changes to the award table do not affect existing rows.
//! - `completed_at` is `Some` exactly when `completed` is true.

use super::now_epoch_ms;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a task record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = Uuid;

/// Opaque identity of the owning user.
///
/// Issued by the external auth layer; this crate never mints one.
pub type UserId = Uuid;

/// Effort tier chosen when a task is created.
///
/// Determines the fixed XP award; nothing else in the system keys off it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Fixed XP award for tasks created at this difficulty.
    pub fn xp_value(self) -> i64 {
        match self {
            Self::Easy => 5,
            Self::Medium => 10,
            Self::Hard => 20,
        }
    }
}

/// Validation failures for task records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    NilTaskId,
    NilUserId,
    EmptyTitle,
    /// `xp_value` must stay a positive award.
    NonPositiveXp(i64),
    /// `completed` and `completed_at` must agree.
    CompletionMismatch {
        completed: bool,
        has_timestamp: bool,
    },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilTaskId => write!(f, "task id must not be the nil uuid"),
            Self::NilUserId => write!(f, "task owner id must not be the nil uuid"),
            Self::EmptyTitle => write!(f, "task title must not be blank"),
            Self::NonPositiveXp(value) => {
                write!(f, "task xp_value must be positive, got {value}")
            }
            Self::CompletionMismatch {
                completed,
                has_timestamp,
            } => write!(
                f,
                "completed={completed} does not agree with completion timestamp present={has_timestamp}"
            ),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable global ID used for completion, deletion and auditing.
    pub id: TaskId,
    /// Owning user; issued externally and treated as opaque here.
    pub user_id: UserId,
    /// Free-form title text.
    pub title: String,
    /// Effort tier chosen at creation.
    pub difficulty: Difficulty,
    /// XP award fixed at creation from the difficulty table.
    pub xp_value: i64,
    /// Whether the task has been completed.
    pub completed: bool,
    /// Completion instant in epoch milliseconds; set exactly once.
    pub completed_at: Option<i64>,
    /// Creation instant in epoch milliseconds.
    pub created_at: i64,
}

impl Task {
    /// Creates a new open task with a generated stable ID.
    ///
    /// `xp_value` is taken from the difficulty award table here and is
    /// never recomputed afterwards.
    pub fn new(user_id: UserId, title: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            difficulty,
            xp_value: difficulty.xp_value(),
            completed: false,
            completed_at: None,
            created_at: now_epoch_ms(),
        }
    }

    /// Creates a task with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(
        id: TaskId,
        user_id: UserId,
        title: impl Into<String>,
        difficulty: Difficulty,
    ) -> Result<Self, TaskValidationError> {
        if id.is_nil() {
            return Err(TaskValidationError::NilTaskId);
        }
        let mut task = Self::new(user_id, title, difficulty);
        task.id = id;
        Ok(task)
    }

    /// Checks record-level invariants.
    ///
    /// Repository write paths call this before SQL mutations, and read
    /// paths call it on every row decoded from storage.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_nil() {
            return Err(TaskValidationError::NilTaskId);
        }
        if self.user_id.is_nil() {
            return Err(TaskValidationError::NilUserId);
        }
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        if self.xp_value <= 0 {
            return Err(TaskValidationError::NonPositiveXp(self.xp_value));
        }
        if self.completed != self.completed_at.is_some() {
            return Err(TaskValidationError::CompletionMismatch {
                completed: self.completed,
                has_timestamp: self.completed_at.is_some(),
            });
        }
        Ok(())
    }

    /// Returns whether this task still shows up in the active listing.
    pub fn is_active(&self) -> bool {
        !self.completed
    }
}
