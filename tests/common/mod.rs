//! Common test utilities for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tascraft::backend::Backend;
use tascraft::error::{Result, TasCraftError};
use tascraft::quest::{
    LeaderboardEntry, NewSubject, NewTask, Profile, Subject, Task, TaskCategory, TaskPatch,
};
use tascraft::{Config, Storage, TasCraftServer, TaskService, WeekStart};
use tempfile::{NamedTempFile, TempDir};

/// Create a local-only server with temporary storage
pub fn get_test_server() -> (TasCraftServer, NamedTempFile) {
    let temp_file = NamedTempFile::new().unwrap();
    let server = TasCraftServer::new(Config::local(temp_file.path())).unwrap();
    (server, temp_file)
}

/// Extract the id from responses like "Quest added: Essay (id: <id>, ...)"
pub fn extract_id_from_response(response: &str) -> String {
    let start = response.find("id: ").expect("response has an id") + 4;
    let rest = &response[start..];
    let end = rest.find([',', ')']).unwrap_or(rest.len());
    rest[..end].trim().to_string()
}

pub fn new_task(title: &str, due_date: &str) -> NewTask {
    NewTask {
        user_id: None,
        subject_id: None,
        title: title.to_string(),
        description: String::new(),
        due_date: due_date.to_string(),
        category: TaskCategory::Homework,
        priority: Some(1),
        is_complete: false,
    }
}

/// What the in-memory backend has received
#[derive(Debug, Default)]
pub struct RemoteState {
    pub tasks: Vec<Task>,
    pub subjects: Vec<Subject>,
    pub profiles: Vec<Profile>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub shouts: Vec<String>,
    pub touched: Vec<String>,
    /// Every call fails with HTTP 503 while set
    pub down: bool,
    pub calls: usize,
    next_id: usize,
}

/// In-memory stand-in for the hosted backend
#[derive(Clone, Default)]
pub struct MockBackend {
    pub state: Arc<Mutex<RemoteState>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_down(&self, down: bool) {
        self.state.lock().unwrap().down = down;
    }

    pub fn calls(&self) -> usize {
        self.state.lock().unwrap().calls
    }

    fn begin(&self) -> Result<std::sync::MutexGuard<'_, RemoteState>> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        if state.down {
            return Err(TasCraftError::Backend {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }
        Ok(state)
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn fetch_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        let state = self.begin()?;
        Ok(state
            .tasks
            .iter()
            .filter(|t| t.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect())
    }

    async fn insert_task(&self, task: &NewTask) -> Result<Task> {
        let mut state = self.begin()?;
        state.next_id += 1;
        let created = Task::from_new(
            task.clone(),
            format!("remote-{}", state.next_id),
            "2024-05-01T00:00:00.000Z".to_string(),
        );
        state.tasks.push(created.clone());
        Ok(created)
    }

    async fn update_task(&self, id: &str, patch: &TaskPatch) -> Result<Task> {
        let mut state = self.begin()?;
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TasCraftError::task_not_found(id))?;
        patch.apply(task);
        Ok(task.clone())
    }

    async fn delete_task(&self, id: &str) -> Result<()> {
        let mut state = self.begin()?;
        state.tasks.retain(|t| t.id != id);
        Ok(())
    }

    async fn fetch_subjects(&self, user_id: &str) -> Result<Vec<Subject>> {
        let state = self.begin()?;
        Ok(state
            .subjects
            .iter()
            .filter(|s| s.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect())
    }

    async fn insert_subject(&self, subject: &NewSubject) -> Result<Subject> {
        let mut state = self.begin()?;
        state.next_id += 1;
        let created = Subject::from_new(subject.clone(), format!("shelf-{}", state.next_id));
        state.subjects.push(created.clone());
        Ok(created)
    }

    async fn delete_subject(&self, id: &str) -> Result<()> {
        let mut state = self.begin()?;
        state.subjects.retain(|s| s.id != id);
        for task in state.tasks.iter_mut() {
            if task.subject_id.as_deref() == Some(id) {
                task.subject_id = None;
            }
        }
        Ok(())
    }

    async fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        let state = self.begin()?;
        Ok(state.leaderboard.clone())
    }

    async fn find_profile(&self, username: &str) -> Result<Option<Profile>> {
        let state = self.begin()?;
        Ok(state
            .profiles
            .iter()
            .find(|p| p.username == username)
            .cloned())
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<()> {
        let mut state = self.begin()?;
        state.profiles.push(profile.clone());
        Ok(())
    }

    async fn touch_last_seen(&self, user_id: &str, _at: &str) -> Result<()> {
        let mut state = self.begin()?;
        state.touched.push(user_id.to_string());
        Ok(())
    }

    async fn broadcast_shout(&self, message: &str) -> Result<()> {
        let mut state = self.begin()?;
        state.shouts.push(message.to_string());
        Ok(())
    }
}

/// Service backed by `backend` and a save file inside `dir`
pub fn service_with(dir: &TempDir, backend: &MockBackend) -> TaskService {
    let storage = Storage::new(dir.path().join("tascraft.toml"));
    TaskService::with_backend(storage, Some(Box::new(backend.clone())), false).unwrap()
}

/// Server over a mock backend
pub fn server_with(dir: &TempDir, backend: &MockBackend) -> TasCraftServer {
    TasCraftServer::with_service(service_with(dir, backend), WeekStart::Sunday)
}
