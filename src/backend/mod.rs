//! Remote backend seam
//!
//! The hosted backend-as-a-service owns the `tasks`, `subjects` and `profiles`
//! tables, the computed `leaderboard` view and the realtime broadcast channel.
//! TasCraft only talks to it through this narrow request/response interface.

mod rest;

use crate::error::Result;
use crate::quest::{LeaderboardEntry, NewSubject, NewTask, Profile, Subject, Task, TaskPatch};
use async_trait::async_trait;

pub use rest::RestBackend;

/// Realtime channel every player listens on
pub const SHOUT_CHANNEL: &str = "global-room";
/// Broadcast event name for shouts
pub const SHOUT_EVENT: &str = "shout";

#[async_trait]
pub trait Backend: Send + Sync {
    /// Tasks of a player, ordered by due date
    async fn fetch_tasks(&self, user_id: &str) -> Result<Vec<Task>>;

    async fn insert_task(&self, task: &NewTask) -> Result<Task>;

    async fn update_task(&self, id: &str, patch: &TaskPatch) -> Result<Task>;

    async fn delete_task(&self, id: &str) -> Result<()>;

    async fn fetch_subjects(&self, user_id: &str) -> Result<Vec<Subject>>;

    async fn insert_subject(&self, subject: &NewSubject) -> Result<Subject>;

    async fn delete_subject(&self, id: &str) -> Result<()>;

    /// Rows of the leaderboard view, as sorted by the backend
    async fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>>;

    async fn find_profile(&self, username: &str) -> Result<Option<Profile>>;

    async fn insert_profile(&self, profile: &Profile) -> Result<()>;

    /// Record player activity (`last_seen`, RFC 3339)
    async fn touch_last_seen(&self, user_id: &str, at: &str) -> Result<()>;

    /// Send a shout to every player on [`SHOUT_CHANNEL`]
    async fn broadcast_shout(&self, message: &str) -> Result<()>;
}
