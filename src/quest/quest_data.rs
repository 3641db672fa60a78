use super::profile::{LeaderboardEntry, Profile, User, rank_entries};
use super::subject::Subject;
use super::task::{Task, TaskPatch};
use crate::game;
use serde::{Deserialize, Serialize};

/// Everything the local store keeps on disk
///
/// This is the offline mirror of the hosted tables plus the persisted login.
/// Vectors keep insertion order so the TOML file diffs cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestData {
    /// Format version for the TOML file (current: 1)
    pub format_version: u32,
    /// The signed-in player, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<User>,
    pub profiles: Vec<Profile>,
    pub subjects: Vec<Subject>,
    pub tasks: Vec<Task>,
}

impl Default for QuestData {
    fn default() -> Self {
        Self {
            format_version: 1,
            session: None,
            profiles: Vec::new(),
            subjects: Vec::new(),
            tasks: Vec::new(),
        }
    }
}

impl QuestData {
    /// Create a new empty QuestData instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks owned by a player, in stored order
    pub fn tasks_for(&self, user_id: &str) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| t.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect()
    }

    pub fn find_task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn add_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Replace a stored task with the same id, or append it
    pub fn upsert_task(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
    }

    /// Apply a partial update and return the updated task
    pub fn update_task(&mut self, id: &str, patch: &TaskPatch) -> Option<Task> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        patch.apply(task);
        Some(task.clone())
    }

    pub fn remove_task(&mut self, id: &str) -> Option<Task> {
        let pos = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(pos))
    }

    /// Swap a player's cached tasks for a fresh copy from the backend
    pub fn replace_tasks_for(&mut self, user_id: &str, tasks: Vec<Task>) {
        self.tasks.retain(|t| t.user_id.as_deref() != Some(user_id));
        self.tasks.extend(tasks);
    }

    pub fn subjects_for(&self, user_id: &str) -> Vec<Subject> {
        self.subjects
            .iter()
            .filter(|s| s.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect()
    }

    pub fn find_subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    pub fn add_subject(&mut self, subject: Subject) {
        self.subjects.push(subject);
    }

    /// Remove a subject; tasks that pointed at it lose their subject.
    pub fn remove_subject(&mut self, id: &str) -> Option<Subject> {
        let pos = self.subjects.iter().position(|s| s.id == id)?;
        for task in self.tasks.iter_mut() {
            if task.subject_id.as_deref() == Some(id) {
                task.subject_id = None;
            }
        }
        Some(self.subjects.remove(pos))
    }

    pub fn replace_subjects_for(&mut self, user_id: &str, subjects: Vec<Subject>) {
        self.subjects
            .retain(|s| s.user_id.as_deref() != Some(user_id));
        self.subjects.extend(subjects);
    }

    pub fn find_profile_by_username(&self, username: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.username == username)
    }

    pub fn find_profile_mut(&mut self, id: &str) -> Option<&mut Profile> {
        self.profiles.iter_mut().find(|p| p.id == id)
    }

    /// Replace a stored profile with the same id, or append it
    pub fn upsert_profile(&mut self, profile: Profile) {
        match self.profiles.iter_mut().find(|p| p.id == profile.id) {
            Some(existing) => *existing = profile,
            None => self.profiles.push(profile),
        }
    }

    /// Leaderboard computed from the locally known players and their tasks
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self
            .profiles
            .iter()
            .map(|profile| {
                let owned: Vec<&Task> = self
                    .tasks
                    .iter()
                    .filter(|t| t.user_id.as_deref() == Some(profile.id.as_str()))
                    .collect();
                LeaderboardEntry {
                    user_id: profile.id.clone(),
                    username: profile.username.clone(),
                    total_completed: owned.iter().filter(|t| t.is_complete).count() as u64,
                    total_xp: game::compute_xp(owned.iter().copied()),
                    last_seen: profile.last_seen.clone(),
                    rank: None,
                }
            })
            .collect();
        rank_entries(&mut entries);
        entries
    }
}
