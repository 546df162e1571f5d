//! Profile domain model and display metric derivations.
//!
//! # Responsibility
//! - Define the per-user progress record (XP, level, streaks, daily goal).
//! - Derive display metrics as pure methods with no stored state.
//!
//! # Invariants
//! - One profile per user; `id` equals the external user identity.
//! - `total_xp` never goes negative; `daily_goal` stays positive.
//! - Streak fields are carried and surfaced but never advanced here;
//!   their maintenance is owned by an external process.

use super::now_epoch_ms;
use super::task::UserId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Daily goal assigned to freshly seeded profiles.
pub const DEFAULT_DAILY_GOAL: i64 = 3;

/// Validation failures for profile records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileValidationError {
    NilUserId,
    NegativeTotalXp(i64),
    NonPositiveLevel(i64),
    NonPositiveDailyGoal(i64),
    NegativeTasksCompletedToday(i64),
    NegativeStreak(i64),
}

impl Display for ProfileValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilUserId => write!(f, "profile id must not be the nil uuid"),
            Self::NegativeTotalXp(value) => {
                write!(f, "profile total_xp must be non-negative, got {value}")
            }
            Self::NonPositiveLevel(value) => {
                write!(f, "profile level must be positive, got {value}")
            }
            Self::NonPositiveDailyGoal(value) => {
                write!(f, "profile daily_goal must be positive, got {value}")
            }
            Self::NegativeTasksCompletedToday(value) => write!(
                f,
                "profile tasks_completed_today must be non-negative, got {value}"
            ),
            Self::NegativeStreak(value) => {
                write!(f, "profile streak counters must be non-negative, got {value}")
            }
        }
    }
}

impl Error for ProfileValidationError {}

/// Per-user progress record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// External user identity; doubles as the row key.
    pub id: UserId,
    /// Sign-up email carried for display and support lookups.
    pub email: String,
    /// Optional display name shown in greetings.
    pub display_name: Option<String>,
    /// Lifetime XP; grows only through task completion.
    pub total_xp: i64,
    /// Persisted level, recomputed from `total_xp` on every completion.
    pub level: i64,
    /// Consecutive-day completion count. Displayed, never advanced here.
    pub current_streak: i64,
    /// Best streak ever reached. Displayed, never advanced here.
    pub longest_streak: i64,
    /// ISO calendar date of the last completion, maintained externally.
    pub last_completion_date: Option<String>,
    /// Target completions per day for the progress indicator.
    pub daily_goal: i64,
    /// Completions counted today; the daily reset is owned externally.
    pub tasks_completed_today: i64,
    /// Creation instant in epoch milliseconds.
    pub created_at: i64,
}

impl Profile {
    /// Seeds a fresh profile for a newly signed-up user.
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            display_name: None,
            total_xp: 0,
            level: 1,
            current_streak: 0,
            longest_streak: 0,
            last_completion_date: None,
            daily_goal: DEFAULT_DAILY_GOAL,
            tasks_completed_today: 0,
            created_at: now_epoch_ms(),
        }
    }

    /// Checks record-level invariants.
    ///
    /// Applied on repository writes and on every row read back, so
    /// corrupted persisted state surfaces instead of being masked.
    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        if self.id.is_nil() {
            return Err(ProfileValidationError::NilUserId);
        }
        if self.total_xp < 0 {
            return Err(ProfileValidationError::NegativeTotalXp(self.total_xp));
        }
        if self.level < 1 {
            return Err(ProfileValidationError::NonPositiveLevel(self.level));
        }
        if self.daily_goal < 1 {
            return Err(ProfileValidationError::NonPositiveDailyGoal(self.daily_goal));
        }
        if self.tasks_completed_today < 0 {
            return Err(ProfileValidationError::NegativeTasksCompletedToday(
                self.tasks_completed_today,
            ));
        }
        if self.current_streak < 0 {
            return Err(ProfileValidationError::NegativeStreak(self.current_streak));
        }
        if self.longest_streak < 0 {
            return Err(ProfileValidationError::NegativeStreak(self.longest_streak));
        }
        Ok(())
    }

    /// XP earned within the current level.
    ///
    /// The level span is 100 XP, so this value doubles as the percent of
    /// progress toward the next level.
    pub fn xp_progress(&self) -> i64 {
        self.total_xp % 100
    }

    /// XP still missing to reach the next level.
    ///
    /// Computed from the persisted `level`, matching what the progress
    /// bar shows even after an external correction.
    pub fn xp_to_next_level(&self) -> i64 {
        self.level * 100 - self.total_xp
    }

    /// Percent of the daily goal reached, clamped to 100.
    pub fn daily_goal_percent(&self) -> f64 {
        let percent = self.tasks_completed_today as f64 / self.daily_goal as f64 * 100.0;
        percent.min(100.0)
    }

    /// Whether today's completions already cover the daily goal.
    pub fn daily_goal_met(&self) -> bool {
        self.tasks_completed_today >= self.daily_goal
    }
}
