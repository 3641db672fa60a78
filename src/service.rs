//! Data access for the signed-in player
//!
//! [`TaskService`] is the one place that decides between the hosted backend and
//! the local TOML store. While a backend is configured and has not failed, every
//! operation goes to the backend first and the result is mirrored into the local
//! store. The first remote failure switches the service to offline mode for the
//! rest of the session; that call and every later one is served locally.

use crate::backend::{Backend, RestBackend};
use crate::config::Config;
use crate::error::{Result, TasCraftError};
use crate::quest::{
    LeaderboardEntry, NewSubject, NewTask, QuestData, Subject, SubjectIcon, Task, TaskPatch, User,
    rank_entries, with_demo_players,
};
use crate::storage::Storage;
use chrono::{SecondsFormat, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Current time in the format the backend uses for timestamps
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub struct TaskService {
    backend: Option<Box<dyn Backend>>,
    offline: bool,
    pub(crate) storage: Storage,
    pub(crate) data: QuestData,
}

impl TaskService {
    /// Open the local store and connect the backend named in `config`, if any.
    pub fn open(config: &Config) -> anyhow::Result<Self> {
        let backend: Option<Box<dyn Backend>> = config
            .backend
            .as_ref()
            .map(|b| Box::new(RestBackend::new(b)) as Box<dyn Backend>);
        if backend.is_none() {
            info!("no backend configured, using the local store only");
        }
        Self::with_backend(Storage::new(&config.data_file), backend, config.offline)
    }

    pub fn with_backend(
        storage: Storage,
        backend: Option<Box<dyn Backend>>,
        offline: bool,
    ) -> anyhow::Result<Self> {
        let data = storage.load()?;
        Ok(Self {
            backend,
            offline,
            storage,
            data,
        })
    }

    /// True when operations are served by the local store
    pub fn is_offline(&self) -> bool {
        self.offline || self.backend.is_none()
    }

    pub fn data(&self) -> &QuestData {
        &self.data
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn current_user(&self) -> Option<&User> {
        self.data.session.as_ref()
    }

    pub fn require_user(&self) -> Result<User> {
        self.current_user().cloned().ok_or(TasCraftError::NotSignedIn)
    }

    /// Cached tasks of the signed-in player (no remote round-trip)
    pub fn cached_tasks(&self) -> Result<Vec<Task>> {
        let user = self.require_user()?;
        Ok(self.data.tasks_for(&user.id))
    }

    /// Cached subjects of the signed-in player (no remote round-trip)
    pub fn cached_subjects(&self) -> Result<Vec<Subject>> {
        let user = self.require_user()?;
        Ok(self.data.subjects_for(&user.id))
    }

    pub(crate) fn remote(&self) -> Option<&dyn Backend> {
        if self.offline {
            return None;
        }
        self.backend.as_deref()
    }

    /// Handle a failed remote call: remote failures switch to offline mode,
    /// anything else is handed back to the caller.
    pub(crate) fn fall_back(&mut self, operation: &str, error: TasCraftError) -> Result<()> {
        if !error.is_remote_failure() {
            return Err(error);
        }
        warn!(operation, %error, "backend unavailable, switching to offline mode");
        self.offline = true;
        Ok(())
    }

    pub(crate) fn save(&self) -> Result<()> {
        self.storage.save(&self.data)?;
        Ok(())
    }

    /// Record activity of the signed-in player. Remote errors are not reported.
    async fn touch_last_seen(&mut self, user_id: &str) {
        let now = timestamp_now();
        if let Some(profile) = self.data.find_profile_mut(user_id) {
            profile.last_seen = Some(now.clone());
        }
        if let Some(backend) = self.remote() {
            let result = backend.touch_last_seen(user_id, &now).await;
            if let Err(e) = result {
                let _ = self.fall_back("touch_last_seen", e);
            }
        }
    }

    pub async fn fetch_tasks(&mut self) -> Result<Vec<Task>> {
        let user = self.require_user()?;
        if let Some(backend) = self.remote() {
            match backend.fetch_tasks(&user.id).await {
                Ok(tasks) => {
                    debug!(count = tasks.len(), "fetched tasks");
                    self.data.replace_tasks_for(&user.id, tasks.clone());
                    self.save()?;
                    return Ok(tasks);
                }
                Err(e) => self.fall_back("fetch_tasks", e)?,
            }
        }
        Ok(self.data.tasks_for(&user.id))
    }

    pub async fn add_task(&mut self, mut new: NewTask) -> Result<Task> {
        let user = self.require_user()?;
        new.user_id = Some(user.id.clone());

        let mut created = None;
        if let Some(backend) = self.remote() {
            match backend.insert_task(&new).await {
                Ok(task) => created = Some(task),
                Err(e) => self.fall_back("add_task", e)?,
            }
        }

        let task = match created {
            Some(task) => {
                self.data.upsert_task(task.clone());
                task
            }
            None => {
                let task = Task::from_new(new, Uuid::new_v4().to_string(), timestamp_now());
                self.data.add_task(task.clone());
                task
            }
        };
        self.touch_last_seen(&user.id).await;
        self.save()?;
        info!(id = %task.id, title = %task.title, "task added");
        Ok(task)
    }

    /// Apply a partial update to one of the player's tasks.
    pub async fn update_task(&mut self, id: &str, patch: &TaskPatch) -> Result<Task> {
        let user = self.require_user()?;
        let owned = self
            .data
            .find_task(id)
            .is_some_and(|t| t.user_id.as_deref() == Some(user.id.as_str()));

        let mut updated = None;
        if let Some(backend) = self.remote() {
            match backend.update_task(id, patch).await {
                Ok(task) => updated = Some(task),
                Err(e) => self.fall_back("update_task", e)?,
            }
        }

        let task = match updated {
            Some(task) => {
                self.data.upsert_task(task.clone());
                task
            }
            None if owned => self
                .data
                .update_task(id, patch)
                .ok_or_else(|| TasCraftError::task_not_found(id))?,
            None => return Err(TasCraftError::task_not_found(id)),
        };
        self.touch_last_seen(&user.id).await;
        self.save()?;
        debug!(id, "task updated");
        Ok(task)
    }

    /// Flip the completion flag of a task and return the updated task.
    pub async fn toggle_task(&mut self, id: &str) -> Result<Task> {
        let user = self.require_user()?;
        let current = self
            .data
            .find_task(id)
            .filter(|t| t.user_id.as_deref() == Some(user.id.as_str()))
            .map(|t| t.is_complete)
            .ok_or_else(|| TasCraftError::task_not_found(id))?;
        self.update_task(id, &TaskPatch::completion(!current)).await
    }

    pub async fn delete_task(&mut self, id: &str) -> Result<Task> {
        let user = self.require_user()?;
        let owned = self
            .data
            .find_task(id)
            .filter(|t| t.user_id.as_deref() == Some(user.id.as_str()))
            .cloned()
            .ok_or_else(|| TasCraftError::task_not_found(id))?;

        if let Some(backend) = self.remote() {
            let result = backend.delete_task(id).await;
            if let Err(e) = result {
                self.fall_back("delete_task", e)?;
            }
        }
        self.data.remove_task(id);
        self.touch_last_seen(&user.id).await;
        self.save()?;
        info!(id, "task deleted");
        Ok(owned)
    }

    pub async fn fetch_subjects(&mut self) -> Result<Vec<Subject>> {
        let user = self.require_user()?;
        if let Some(backend) = self.remote() {
            match backend.fetch_subjects(&user.id).await {
                Ok(subjects) => {
                    debug!(count = subjects.len(), "fetched subjects");
                    self.data.replace_subjects_for(&user.id, subjects.clone());
                    self.save()?;
                    return Ok(subjects);
                }
                Err(e) => self.fall_back("fetch_subjects", e)?,
            }
        }
        Ok(self.data.subjects_for(&user.id))
    }

    /// Create a subject. Without an explicit color the next palette color is used.
    pub async fn add_subject(
        &mut self,
        name: &str,
        icon: SubjectIcon,
        color: Option<String>,
    ) -> Result<Subject> {
        let user = self.require_user()?;
        let name = name.trim();
        if name.is_empty() {
            return Err(TasCraftError::InvalidInput(
                "Subject name cannot be empty".to_string(),
            ));
        }
        let color = color.unwrap_or_else(|| {
            NewSubject::palette_color(self.data.subjects_for(&user.id).len())
        });
        let new = NewSubject {
            user_id: Some(user.id.clone()),
            name: name.to_string(),
            color,
            icon,
        };

        let mut created = None;
        if let Some(backend) = self.remote() {
            match backend.insert_subject(&new).await {
                Ok(subject) => created = Some(subject),
                Err(e) => self.fall_back("add_subject", e)?,
            }
        }
        let subject =
            created.unwrap_or_else(|| Subject::from_new(new, Uuid::new_v4().to_string()));
        self.data.add_subject(subject.clone());
        self.save()?;
        info!(id = %subject.id, name = %subject.name, "subject added");
        Ok(subject)
    }

    /// Delete a subject; its tasks stay but lose their subject.
    pub async fn delete_subject(&mut self, id: &str) -> Result<Subject> {
        let user = self.require_user()?;
        let owned = self
            .data
            .find_subject(id)
            .is_some_and(|s| s.user_id.as_deref() == Some(user.id.as_str()));
        if !owned {
            return Err(TasCraftError::subject_not_found(id));
        }

        if let Some(backend) = self.remote() {
            let result = backend.delete_subject(id).await;
            if let Err(e) = result {
                self.fall_back("delete_subject", e)?;
            }
        }
        let subject = self
            .data
            .remove_subject(id)
            .ok_or_else(|| TasCraftError::subject_not_found(id))?;
        self.save()?;
        info!(id, "subject deleted");
        Ok(subject)
    }

    /// Leaderboard rows, best first. Offline, it is computed from local players.
    pub async fn fetch_leaderboard(&mut self) -> Result<Vec<LeaderboardEntry>> {
        if let Some(backend) = self.remote() {
            match backend.fetch_leaderboard().await {
                Ok(mut entries) => {
                    if entries.iter().any(|e| e.rank.is_none()) {
                        rank_entries(&mut entries);
                    }
                    return Ok(entries);
                }
                Err(e) => self.fall_back("fetch_leaderboard", e)?,
            }
        }
        Ok(with_demo_players(self.data.leaderboard(), &timestamp_now()))
    }

    /// Send a shout to every player. Returns false when there is nobody to send it to.
    pub async fn broadcast_shout(&mut self, message: &str) -> bool {
        let Some(backend) = self.remote() else {
            return false;
        };
        match backend.broadcast_shout(message).await {
            Ok(()) => true,
            Err(e) => {
                let _ = self.fall_back("broadcast_shout", e);
                false
            }
        }
    }
}
