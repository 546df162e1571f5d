//! Task use-case service.
//!
//! # Responsibility
//! - Provide create/list/delete/complete entry points for display
//!   callers.
//! - Apply the difficulty-to-XP mapping exactly once, at creation.
//! - Return fresh store snapshots after completion so callers never
//!   patch local state by hand.
//!
//! # Invariants
//! - Titles are trimmed and must not be blank.
//! - Service APIs never bypass repository validation/persistence
//!   contracts.

use crate::model::profile::Profile;
use crate::model::task::{Difficulty, Task, TaskId, UserId};
use crate::repo::task_repo::{TaskCompletion, TaskRepository};
use crate::repo::RepoError;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Title is empty after trimming.
    BlankTitle,
    /// Target task does not exist.
    TaskNotFound(TaskId),
    /// Target task was already completed; no XP is granted twice.
    TaskAlreadyCompleted(TaskId),
    /// The owner has no profile row; the completion was rolled back.
    ProfileNotFound(UserId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "task title must not be blank"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::TaskAlreadyCompleted(id) => write!(f, "task already completed: {id}"),
            Self::ProfileNotFound(id) => write!(f, "profile not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::TaskNotFound(id) => Self::TaskNotFound(id),
            RepoError::TaskAlreadyCompleted(id) => Self::TaskAlreadyCompleted(id),
            RepoError::ProfileNotFound(id) => Self::ProfileNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Refreshed view returned after a successful completion.
///
/// Carries everything a display caller re-renders: the completed task,
/// the owner's updated profile and the refetched active list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionView {
    pub task: Task,
    pub profile: Profile,
    pub active_tasks: Vec<Task>,
}

/// Use-case service wrapper for task operations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a new open task for the user.
    ///
    /// # Contract
    /// - The title is trimmed; blank titles are rejected.
    /// - `xp_value` is fixed from the difficulty table here and never
    ///   recomputed later.
    /// - Returns the created stable task ID.
    pub fn add_task(
        &self,
        user_id: UserId,
        title: &str,
        difficulty: Difficulty,
    ) -> Result<TaskId, TaskServiceError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TaskServiceError::BlankTitle);
        }

        let task = Task::new(user_id, title, difficulty);
        let id = self.repo.create_task(&task)?;
        info!(
            "event=task_create module=service status=ok task_id={id} difficulty={:?} xp={}",
            difficulty, task.xp_value
        );
        Ok(id)
    }

    /// Lists the user's open tasks, newest first.
    pub fn active_tasks(&self, user_id: UserId) -> Result<Vec<Task>, TaskServiceError> {
        Ok(self.repo.list_active_tasks(user_id)?)
    }

    /// Gets one task by stable ID.
    pub fn get_task(&self, id: TaskId) -> Result<Option<Task>, TaskServiceError> {
        Ok(self.repo.get_task(id)?)
    }

    /// Permanently removes one task. Completion state does not matter;
    /// a deleted task never reappears in any listing.
    pub fn delete_task(&self, id: TaskId) -> Result<(), TaskServiceError> {
        self.repo.delete_task(id)?;
        info!("event=task_delete module=service status=ok task_id={id}");
        Ok(())
    }

    /// Completes one task and grants its XP in a single atomic step,
    /// then refetches the active list for display.
    pub fn complete_task(&mut self, id: TaskId) -> Result<CompletionView, TaskServiceError> {
        let TaskCompletion { task, profile } = match self.repo.complete_task(id) {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(
                    "event=task_complete module=service status=error task_id={id} error={err}"
                );
                return Err(err.into());
            }
        };

        info!(
            "event=task_complete module=service status=ok task_id={id} xp={} total_xp={} level={}",
            task.xp_value, profile.total_xp, profile.level
        );

        let active_tasks = self.repo.list_active_tasks(task.user_id)?;
        Ok(CompletionView {
            task,
            profile,
            active_tasks,
        })
    }
}
