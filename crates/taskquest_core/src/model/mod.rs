//! Domain model for tasks, profiles and the leveling rule.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep XP/level arithmetic in one pure, storage-free place.
//!
//! # Invariants
//! - Every domain object is identified by a stable UUID.
//! - `xp_value` is fixed at task creation and never re-derived.

use std::time::{SystemTime, UNIX_EPOCH};

pub mod leveling;
pub mod profile;
pub mod task;

/// Current wall-clock time in Unix epoch milliseconds.
///
/// Clock regressions before the epoch are treated as instant zero
/// instead of panicking.
pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
