use crate::quest::Task;

/// XP earned per nether star of a completed task
pub const XP_PER_PRIORITY: u64 = 100;
/// XP needed to climb one level
pub const XP_PER_LEVEL: u64 = 1000;

/// XP a task is worth once completed
pub fn xp_for_task(task: &Task) -> u64 {
    u64::from(task.effective_priority()) * XP_PER_PRIORITY
}

/// Total XP of the completed tasks
pub fn compute_xp<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> u64 {
    tasks
        .into_iter()
        .filter(|t| t.is_complete)
        .map(xp_for_task)
        .sum()
}

/// Level for an XP total; level 1 starts at 0 XP
pub fn compute_level(xp: u64) -> u64 {
    xp / XP_PER_LEVEL + 1
}

/// Fraction of the current level already earned, in `[0, 1)`
pub fn compute_progress(xp: u64) -> f64 {
    (xp % XP_PER_LEVEL) as f64 / XP_PER_LEVEL as f64
}

/// Experience summary shown in the hotbar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Experience {
    pub total_xp: u64,
    pub level: u64,
    pub progress: f64,
}

impl Experience {
    pub fn from_xp(total_xp: u64) -> Self {
        Self {
            total_xp,
            level: compute_level(total_xp),
            progress: compute_progress(total_xp),
        }
    }

    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        Self::from_xp(compute_xp(tasks))
    }

    /// XP total at which the next level starts
    pub fn next_level_xp(&self) -> u64 {
        self.level * XP_PER_LEVEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quest::TaskCategory;

    fn task(priority: Option<u32>, done: bool) -> Task {
        Task {
            id: "t".to_string(),
            user_id: None,
            subject_id: None,
            title: "Task".to_string(),
            description: String::new(),
            due_date: "2024-05-15T12:00:00Z".to_string(),
            category: TaskCategory::Homework,
            priority,
            is_complete: done,
            created_at: None,
        }
    }

    #[test]
    fn test_missing_priority_counts_as_one() {
        assert_eq!(compute_xp(&[task(None, true)]), 100);
        assert_eq!(compute_xp(&[task(Some(0), true)]), 100);
    }

    #[test]
    fn test_only_completed_tasks_count() {
        let tasks = vec![task(Some(5), true), task(Some(3), false), task(Some(2), true)];
        assert_eq!(compute_xp(&tasks), 700);
        assert_eq!(compute_xp(std::iter::empty::<&Task>()), 0);
    }

    #[test]
    fn test_levels() {
        assert_eq!(compute_level(0), 1);
        assert_eq!(compute_level(999), 1);
        assert_eq!(compute_level(1000), 2);
        assert_eq!(compute_level(2500), 3);
    }

    #[test]
    fn test_progress() {
        assert_eq!(compute_progress(0), 0.0);
        assert_eq!(compute_progress(1000), 0.0);
        assert_eq!(compute_progress(2500), 0.5);
        for xp in (0..5000).step_by(50) {
            let p = compute_progress(xp);
            assert!((0.0..1.0).contains(&p));
        }
    }

    #[test]
    fn test_experience_summary() {
        let exp = Experience::from_xp(2300);
        assert_eq!(exp.level, 3);
        assert!((exp.progress - 0.3).abs() < 1e-9);
        assert_eq!(exp.next_level_xp(), 3000);
    }
}
