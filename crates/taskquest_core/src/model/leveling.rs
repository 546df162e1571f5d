//! Leveling rule applied when a task is completed.
//!
//! # Responsibility
//! - Map (current profile, completed task XP) to the updated progress
//!   fields in one pure function.
//!
//! # Invariants
//! - Only `total_xp`, `level` and `tasks_completed_today` change.
//!   Streak fields, the daily goal and the last completion date are
//!   left exactly as they are.
//! - `level` always equals `total_xp / 100 + 1` after a grant.

use super::profile::Profile;

/// XP span covered by one level.
pub const XP_PER_LEVEL: i64 = 100;

/// Progress fields written back after a successful completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub total_xp: i64,
    pub level: i64,
    pub tasks_completed_today: i64,
}

/// Level reached at the given lifetime XP.
///
/// Integer floor division: 0..=99 is level 1, 100..=199 is level 2.
pub fn level_for_xp(total_xp: i64) -> i64 {
    total_xp / XP_PER_LEVEL + 1
}

/// Applies one completed task's award to the profile snapshot.
pub fn grant_completion(profile: &Profile, xp_value: i64) -> ProgressUpdate {
    let total_xp = profile.total_xp + xp_value;
    ProgressUpdate {
        total_xp,
        level: level_for_xp(total_xp),
        tasks_completed_today: profile.tasks_completed_today + 1,
    }
}
