use crate::quest::Task;
use chrono::{DateTime, TimeZone};

/// Counters shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Open tasks due on the same local day as now
    pub due_today: usize,
}

impl DashboardStats {
    pub fn from_tasks<Tz: TimeZone>(tasks: &[Task], now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();

        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.is_complete).count();
        let due_today = tasks
            .iter()
            .filter(|t| !t.is_complete)
            .filter(|t| {
                t.due_at(&tz)
                    .is_some_and(|due| due.with_timezone(&tz).date_naive() == today)
            })
            .count();

        Self {
            total,
            completed,
            pending: total - completed,
            due_today,
        }
    }

    /// Share of completed tasks, rounded to a whole percent (0 with no tasks)
    pub fn completion_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.completed as f64 / self.total as f64 * 100.0).round() as u32
    }
}
