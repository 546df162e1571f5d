//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over per-user `tasks` rows.
//! - Own the completion transaction that marks a task done and grants
//!   XP against the owner's profile in one atomic step.
//!
//! # Invariants
//! - Write paths call `Task::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `completed_at` is written exactly once; repeat completions fail
//!   with `TaskAlreadyCompleted` and grant nothing.
//! - The completion transaction commits the task flip and the profile
//!   progress update together or not at all.

use crate::model::leveling::grant_completion;
use crate::model::profile::Profile;
use crate::model::task::{Difficulty, Task, TaskId, UserId};
use crate::repo::profile_repo::{load_profile, PROFILE_COLUMNS};
use crate::repo::{ensure_connection_migrated, ensure_table_with_columns, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, TransactionBehavior};
use uuid::Uuid;

const TASK_COLUMNS: &[&str] = &[
    "id",
    "user_id",
    "title",
    "difficulty",
    "xp_value",
    "completed",
    "completed_at",
    "created_at",
];

const TASK_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    difficulty,
    xp_value,
    completed,
    completed_at,
    created_at
FROM tasks";

/// Refreshed snapshots returned by a successful completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCompletion {
    /// The completed task with its completion timestamp set.
    pub task: Task,
    /// The owner's profile after the XP grant.
    pub profile: Profile,
}

/// Repository interface for task CRUD and completion operations.
pub trait TaskRepository {
    /// Persists one task and returns its stable id.
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    /// Gets one task by stable id.
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Lists the owner's open tasks, newest first.
    fn list_active_tasks(&self, user_id: UserId) -> RepoResult<Vec<Task>>;
    /// Permanently removes one task, completed or not.
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
    /// Marks one task completed and grants its XP atomically.
    fn complete_task(&mut self, id: TaskId) -> RepoResult<TaskCompletion>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// The completion transaction also touches `profiles`, so both
    /// tables are part of the readiness check.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_migrated(conn)?;
        ensure_table_with_columns(conn, "tasks", TASK_COLUMNS)?;
        ensure_table_with_columns(conn, "profiles", PROFILE_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (
                id,
                user_id,
                title,
                difficulty,
                xp_value,
                completed,
                completed_at,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                task.id.to_string(),
                task.user_id.to_string(),
                task.title.as_str(),
                difficulty_to_db(task.difficulty),
                task.xp_value,
                bool_to_int(task.completed),
                task.completed_at,
                task.created_at,
            ],
        )?;

        Ok(task.id)
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        load_task(self.conn, id)
    }

    fn list_active_tasks(&self, user_id: UserId) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE user_id = ?1
               AND completed = 0
             ORDER BY created_at DESC, id ASC;"
        ))?;

        let mut rows = stmt.query([user_id.to_string()])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }

        Ok(())
    }

    fn complete_task(&mut self, id: TaskId) -> RepoResult<TaskCompletion> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(task) = load_task(&tx, id)? else {
            return Err(RepoError::TaskNotFound(id));
        };
        if task.completed {
            return Err(RepoError::TaskAlreadyCompleted(id));
        }

        tx.execute(
            "UPDATE tasks
             SET
                completed = 1,
                completed_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1
               AND completed = 0;",
            [id.to_string()],
        )?;

        // The owner's profile is read inside the same transaction; a
        // missing row rolls everything back and the task stays open.
        let Some(profile) = load_profile(&tx, task.user_id)? else {
            return Err(RepoError::ProfileNotFound(task.user_id));
        };

        let update = grant_completion(&profile, task.xp_value);
        tx.execute(
            "UPDATE profiles
             SET
                total_xp = ?2,
                level = ?3,
                tasks_completed_today = ?4
             WHERE id = ?1;",
            params![
                profile.id.to_string(),
                update.total_xp,
                update.level,
                update.tasks_completed_today,
            ],
        )?;

        let Some(task) = load_task(&tx, id)? else {
            return Err(RepoError::TaskNotFound(id));
        };
        let Some(profile) = load_profile(&tx, task.user_id)? else {
            return Err(RepoError::ProfileNotFound(task.user_id));
        };

        tx.commit()?;
        Ok(TaskCompletion { task, profile })
    }
}

/// Loads one task row on any migrated connection or transaction.
fn load_task(conn: &Connection, id: TaskId) -> RepoResult<Option<Task>> {
    let mut stmt = conn.prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_task_row(row)?));
    }
    Ok(None)
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{id_text}` in tasks.id")))?;

    let user_id_text: String = row.get("user_id")?;
    let user_id = Uuid::parse_str(&user_id_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{user_id_text}` in tasks.user_id"
        ))
    })?;

    let difficulty_text: String = row.get("difficulty")?;
    let difficulty = parse_difficulty(&difficulty_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid difficulty `{difficulty_text}` in tasks.difficulty"
        ))
    })?;

    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in tasks.completed"
            )));
        }
    };

    let task = Task {
        id,
        user_id,
        title: row.get("title")?,
        difficulty,
        xp_value: row.get("xp_value")?,
        completed,
        completed_at: row.get("completed_at")?,
        created_at: row.get("created_at")?,
    };
    task.validate()?;
    Ok(task)
}

fn difficulty_to_db(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "easy",
        Difficulty::Medium => "medium",
        Difficulty::Hard => "hard",
    }
}

fn parse_difficulty(value: &str) -> Option<Difficulty> {
    match value {
        "easy" => Some(Difficulty::Easy),
        "medium" => Some(Difficulty::Medium),
        "hard" => Some(Difficulty::Hard),
        _ => None,
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
