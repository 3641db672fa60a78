//! Account handlers: sign up, sign in, sign out

use crate::TasCraftServer;
use crate::game::{BossTracker, Experience};
use crate::service::TaskService;
use crate::validation::public_error;
use mcp_attr::Result as McpResult;

impl TasCraftServer {
    pub async fn handle_sign_up(&self, username: String) -> McpResult<String> {
        let mut service = self.service.lock().await;
        service.sign_up(&username).await.map_err(public_error)?;
        self.enter_world(&mut service, "Welcome").await
    }

    pub async fn handle_sign_in(&self, username: String) -> McpResult<String> {
        let mut service = self.service.lock().await;
        service.sign_in(&username).await.map_err(public_error)?;
        self.enter_world(&mut service, "Welcome back").await
    }

    pub async fn handle_sign_out(&self) -> McpResult<String> {
        let mut service = self.service.lock().await;
        let previous = service.sign_out().map_err(public_error)?;
        drop(service);

        self.hud.lock().await.boss.reset();
        Ok(match previous {
            Some(user) => format!("Signed out {}", user.username),
            None => "Nobody is signed in".to_string(),
        })
    }

    /// Load the player's quest log and start tracking the weekly boss from it.
    async fn enter_world(&self, service: &mut TaskService, greeting: &str) -> McpResult<String> {
        let user = service.require_user().map_err(public_error)?;
        let tasks = service.fetch_tasks().await.map_err(public_error)?;
        let subjects = service.fetch_subjects().await.map_err(public_error)?;

        let bar = self.boss_bar(&tasks);
        self.hud.lock().await.boss = BossTracker::starting_at(&bar);

        let xp = Experience::from_tasks(&tasks);
        let mut result = format!(
            "{}, {}! Level {} ({} XP). {} quest(s) and {} subject(s) loaded.",
            greeting,
            user.username,
            xp.level,
            xp.total_xp,
            tasks.len(),
            subjects.len()
        );
        if service.is_offline() {
            result.push_str("\nPlaying offline: changes are kept in the local save file.");
        }
        Ok(result)
    }
}
