//! Core domain logic for TaskQuest.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::leveling::{grant_completion, level_for_xp, ProgressUpdate, XP_PER_LEVEL};
pub use model::profile::{Profile, ProfileValidationError, DEFAULT_DAILY_GOAL};
pub use model::task::{Difficulty, Task, TaskId, TaskValidationError, UserId};
pub use repo::profile_repo::{ProfileRepository, SqliteProfileRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskCompletion, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use service::profile_service::{ProfileService, ProfileServiceError, StatsOverview};
pub use service::task_service::{CompletionView, TaskService, TaskServiceError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
