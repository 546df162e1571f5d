//! Profile repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide read/seed/settings APIs over per-user `profiles` rows.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate the full record before SQL mutations.
//! - Progress fields (`total_xp`, `level`, `tasks_completed_today`) are
//!   written only by the completion transaction in the task repository.

use crate::model::profile::{Profile, ProfileValidationError};
use crate::model::task::UserId;
use crate::repo::{ensure_connection_migrated, ensure_table_with_columns, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

pub(crate) const PROFILE_COLUMNS: &[&str] = &[
    "id",
    "email",
    "display_name",
    "total_xp",
    "level",
    "current_streak",
    "longest_streak",
    "last_completion_date",
    "daily_goal",
    "tasks_completed_today",
    "created_at",
];

const PROFILE_SELECT_SQL: &str = "SELECT
    id,
    email,
    display_name,
    total_xp,
    level,
    current_streak,
    longest_streak,
    last_completion_date,
    daily_goal,
    tasks_completed_today,
    created_at
FROM profiles";

/// Repository interface for profile read/seed/settings operations.
pub trait ProfileRepository {
    /// Seeds one profile row at signup time and returns its identity.
    fn create_profile(&self, profile: &Profile) -> RepoResult<UserId>;
    /// Gets one profile by user identity.
    fn get_profile(&self, id: UserId) -> RepoResult<Option<Profile>>;
    /// Replaces the display name shown in greetings.
    fn set_display_name(&self, id: UserId, display_name: Option<&str>) -> RepoResult<()>;
    /// Replaces the daily completion goal. Must stay positive.
    fn set_daily_goal(&self, id: UserId, daily_goal: i64) -> RepoResult<()>;
}

/// SQLite-backed profile repository.
pub struct SqliteProfileRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProfileRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_migrated(conn)?;
        ensure_table_with_columns(conn, "profiles", PROFILE_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl ProfileRepository for SqliteProfileRepository<'_> {
    fn create_profile(&self, profile: &Profile) -> RepoResult<UserId> {
        profile.validate()?;

        self.conn.execute(
            "INSERT INTO profiles (
                id,
                email,
                display_name,
                total_xp,
                level,
                current_streak,
                longest_streak,
                last_completion_date,
                daily_goal,
                tasks_completed_today,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
            params![
                profile.id.to_string(),
                profile.email.as_str(),
                profile.display_name.as_deref(),
                profile.total_xp,
                profile.level,
                profile.current_streak,
                profile.longest_streak,
                profile.last_completion_date.as_deref(),
                profile.daily_goal,
                profile.tasks_completed_today,
                profile.created_at,
            ],
        )?;

        Ok(profile.id)
    }

    fn get_profile(&self, id: UserId) -> RepoResult<Option<Profile>> {
        load_profile(self.conn, id)
    }

    fn set_display_name(&self, id: UserId, display_name: Option<&str>) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE profiles SET display_name = ?2 WHERE id = ?1;",
            params![id.to_string(), display_name],
        )?;

        if changed == 0 {
            return Err(RepoError::ProfileNotFound(id));
        }

        Ok(())
    }

    fn set_daily_goal(&self, id: UserId, daily_goal: i64) -> RepoResult<()> {
        if daily_goal < 1 {
            return Err(ProfileValidationError::NonPositiveDailyGoal(daily_goal).into());
        }

        let changed = self.conn.execute(
            "UPDATE profiles SET daily_goal = ?2 WHERE id = ?1;",
            params![id.to_string(), daily_goal],
        )?;

        if changed == 0 {
            return Err(RepoError::ProfileNotFound(id));
        }

        Ok(())
    }
}

/// Loads one profile row on any migrated connection or transaction.
///
/// Shared with the completion transaction in the task repository.
pub(crate) fn load_profile(conn: &Connection, id: UserId) -> RepoResult<Option<Profile>> {
    let mut stmt = conn.prepare(&format!("{PROFILE_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_profile_row(row)?));
    }
    Ok(None)
}

pub(crate) fn parse_profile_row(row: &Row<'_>) -> RepoResult<Profile> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in profiles.id"))
    })?;

    let profile = Profile {
        id,
        email: row.get("email")?,
        display_name: row.get("display_name")?,
        total_xp: row.get("total_xp")?,
        level: row.get("level")?,
        current_streak: row.get("current_streak")?,
        longest_streak: row.get("longest_streak")?,
        last_completion_date: row.get("last_completion_date")?,
        daily_goal: row.get("daily_goal")?,
        tasks_completed_today: row.get("tasks_completed_today")?,
        created_at: row.get("created_at")?,
    };
    profile.validate()?;
    Ok(profile)
}
