//! MCP tool handlers for the TasCraft server
//!
//! One file per tool family. The `#[tool]` methods in the crate root only
//! delegate to the `handle_*` methods defined here.

pub mod account;
pub mod calculator;
pub mod status;
pub mod subjects;
pub mod tasks;

use crate::TasCraftServer;
use crate::game::{BossBar, BossDefeated, LevelUp, weekly_objectives};
use crate::quest::Task;
use crate::service::TaskService;
use crate::validation::{invalid_params, public_error};
use chrono::Local;
use mcp_attr::Result as McpResult;

impl TasCraftServer {
    /// Boss bar of the current local week
    pub(crate) fn boss_bar(&self, tasks: &[Task]) -> BossBar {
        weekly_objectives(tasks, &Local::now(), self.week_start)
    }

    /// Feed the latest task list to the boss tracker.
    pub(crate) async fn observe_boss(&self, tasks: &[Task]) -> Option<BossDefeated> {
        let bar = self.boss_bar(tasks);
        self.hud.lock().await.boss.observe(&bar)
    }

    pub(crate) fn ensure_subject(service: &TaskService, subject_id: &str) -> McpResult<()> {
        let subjects = service.cached_subjects().map_err(public_error)?;
        if subjects.iter().any(|s| s.id == subject_id) {
            return Ok(());
        }
        Err(invalid_params(format!(
            "Subject '{}' does not exist. Use list_subjects to see available subjects.",
            subject_id
        )))
    }
}

pub(crate) fn level_up_line(level_up: LevelUp) -> String {
    format!("LEVEL UP! Level {} -> {}", level_up.from, level_up.to)
}

pub(crate) fn boss_defeated_line(defeated: BossDefeated) -> String {
    format!(
        "Weekly boss defeated! All {} quest(s) due this week are complete.",
        defeated.max
    )
}
