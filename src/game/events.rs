use super::week::BossBar;
use super::xp::{compute_level, xp_for_task};
use crate::quest::Task;

/// The player climbed at least one level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub from: u64,
    pub to: u64,
}

/// Every task due this week has just been completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BossDefeated {
    /// Number of weekly tasks that made up the boss
    pub max: usize,
}

/// Check whether toggling `task` crosses a level threshold.
///
/// `xp_before` is the player's XP before the toggle and `now_complete` the
/// task's new state. Only completion can level up; un-completing a task never
/// produces a signal, not even a level-down.
pub fn detect_level_up(xp_before: u64, task: &Task, now_complete: bool) -> Option<LevelUp> {
    if !now_complete {
        return None;
    }
    let from = compute_level(xp_before);
    let to = compute_level(xp_before + xp_for_task(task));
    (to > from).then_some(LevelUp { from, to })
}

/// Remembers the last boss health seen so a defeat fires once, on the
/// transition to zero, rather than every time the bar happens to be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BossTracker {
    previous: Option<usize>,
}

impl BossTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking from an already displayed bar
    pub fn starting_at(bar: &BossBar) -> Self {
        Self {
            previous: Some(bar.current),
        }
    }

    /// Record a freshly computed bar and report a defeat edge.
    ///
    /// The first observation only primes the tracker.
    pub fn observe(&mut self, bar: &BossBar) -> Option<BossDefeated> {
        let previous = self.previous.replace(bar.current)?;
        if previous > 0 && bar.current == 0 && bar.max > 0 {
            Some(BossDefeated { max: bar.max })
        } else {
            None
        }
    }

    /// Forget the last observation (e.g. when another player signs in)
    pub fn reset(&mut self) {
        self.previous = None;
    }
}
