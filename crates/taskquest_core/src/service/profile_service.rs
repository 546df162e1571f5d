//! Profile use-case service.
//!
//! # Responsibility
//! - Seed profiles at signup time and serve settings updates.
//! - Package the profile with its derived display metrics into one
//!   read model for stats rendering.
//!
//! # Invariants
//! - Progress fields are never written here; only the completion
//!   transaction advances them.
//! - Daily goals stay positive.

use crate::model::profile::{Profile, ProfileValidationError};
use crate::model::task::UserId;
use crate::repo::profile_repo::ProfileRepository;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for profile use-cases.
#[derive(Debug)]
pub enum ProfileServiceError {
    /// Target profile does not exist.
    ProfileNotFound(UserId),
    /// Daily goal must stay a positive target.
    InvalidDailyGoal(i64),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ProfileServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProfileNotFound(id) => write!(f, "profile not found: {id}"),
            Self::InvalidDailyGoal(value) => {
                write!(f, "daily goal must be positive, got {value}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProfileServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ProfileServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::ProfileNotFound(id) => Self::ProfileNotFound(id),
            RepoError::ProfileValidation(ProfileValidationError::NonPositiveDailyGoal(goal)) => {
                Self::InvalidDailyGoal(goal)
            }
            other => Self::Repo(other),
        }
    }
}

/// Read model bundling profile fields with the derived display metrics.
///
/// Everything here is recomputed from the profile snapshot on each
/// call; nothing is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsOverview {
    pub display_name: Option<String>,
    pub level: i64,
    pub total_xp: i64,
    /// XP earned within the current level; doubles as the percent of
    /// progress toward the next one.
    pub xp_progress: i64,
    pub xp_to_next_level: i64,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub tasks_completed_today: i64,
    pub daily_goal: i64,
    pub daily_goal_percent: f64,
    pub daily_goal_met: bool,
}

impl From<&Profile> for StatsOverview {
    fn from(profile: &Profile) -> Self {
        Self {
            display_name: profile.display_name.clone(),
            level: profile.level,
            total_xp: profile.total_xp,
            xp_progress: profile.xp_progress(),
            xp_to_next_level: profile.xp_to_next_level(),
            current_streak: profile.current_streak,
            longest_streak: profile.longest_streak,
            tasks_completed_today: profile.tasks_completed_today,
            daily_goal: profile.daily_goal,
            daily_goal_percent: profile.daily_goal_percent(),
            daily_goal_met: profile.daily_goal_met(),
        }
    }
}

/// Use-case service wrapper for profile operations.
pub struct ProfileService<P: ProfileRepository> {
    repo: P,
}

impl<P: ProfileRepository> ProfileService<P> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: P) -> Self {
        Self { repo }
    }

    /// Seeds the profile row for a freshly signed-up user.
    ///
    /// # Contract
    /// - Starts at level 1 with zero XP and the default daily goal.
    /// - Returns the persisted snapshot.
    pub fn register_profile(
        &self,
        id: UserId,
        email: impl Into<String>,
        display_name: Option<&str>,
    ) -> Result<Profile, ProfileServiceError> {
        let mut profile = Profile::new(id, email);
        profile.display_name = display_name.map(str::to_string);
        self.repo.create_profile(&profile)?;
        Ok(profile)
    }

    /// Gets the user's profile snapshot.
    pub fn profile(&self, id: UserId) -> Result<Profile, ProfileServiceError> {
        self.repo
            .get_profile(id)?
            .ok_or(ProfileServiceError::ProfileNotFound(id))
    }

    /// Gets the stats read model for display rendering.
    pub fn overview(&self, id: UserId) -> Result<StatsOverview, ProfileServiceError> {
        let profile = self.profile(id)?;
        Ok(StatsOverview::from(&profile))
    }

    /// Replaces the display name shown in greetings.
    pub fn set_display_name(
        &self,
        id: UserId,
        display_name: Option<&str>,
    ) -> Result<(), ProfileServiceError> {
        self.repo.set_display_name(id, display_name)?;
        Ok(())
    }

    /// Replaces the daily completion goal. Rejects non-positive values.
    pub fn set_daily_goal(&self, id: UserId, daily_goal: i64) -> Result<(), ProfileServiceError> {
        if daily_goal < 1 {
            return Err(ProfileServiceError::InvalidDailyGoal(daily_goal));
        }
        self.repo.set_daily_goal(id, daily_goal)?;
        Ok(())
    }
}
