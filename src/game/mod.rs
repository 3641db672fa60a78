//! Gamification arithmetic
//!
//! Pure projections of the task list, recomputed on every change and never
//! stored:
//! - `xp`: experience, level and progress toward the next level
//! - `week`: the weekly "boss bar" of tasks due this week
//! - `events`: edge-triggered level-up and boss-defeated signals
//! - `stats`: dashboard counters

mod events;
mod stats;
mod week;
mod xp;

pub use events::{BossDefeated, BossTracker, LevelUp, detect_level_up};
pub use stats::DashboardStats;
pub use week::{BossBar, WeekStart, week_window, weekly_objectives};
pub use xp::{
    Experience, XP_PER_LEVEL, XP_PER_PRIORITY, compute_level, compute_progress, compute_xp,
    xp_for_task,
};
