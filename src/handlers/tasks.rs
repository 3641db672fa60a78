//! Quest handlers: add, update, toggle, delete and list tasks

use super::{boss_defeated_line, level_up_line};
use crate::TasCraftServer;
use crate::board::{self, SortOption, TaskFilter};
use crate::game::{compute_xp, detect_level_up, xp_for_task};
use crate::quest::{MIN_PRIORITY, NewTask, TaskCategory, TaskPatch, due_date_from_parts};
use crate::shout::gained_xp_message;
use crate::validation::{
    clearable, invalid_params, parse_choice, parse_priority, public_error, required,
};
use chrono::{Local, Utc};
use mcp_attr::Result as McpResult;

impl TasCraftServer {
    #[allow(clippy::too_many_arguments)]
    pub async fn handle_add_task(
        &self,
        title: String,
        due_date: String,
        due_time: Option<String>,
        description: Option<String>,
        category: Option<String>,
        priority: Option<u32>,
        subject_id: Option<String>,
    ) -> McpResult<String> {
        let title = required("Title", &title)?;
        let category: TaskCategory = parse_choice(category.as_deref())?;
        let priority = parse_priority(priority)?.unwrap_or(MIN_PRIORITY);
        let due_date =
            due_date_from_parts(&due_date, due_time.as_deref(), &Local).map_err(public_error)?;
        let subject_id = subject_id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let mut service = self.service.lock().await;
        if let Some(ref id) = subject_id {
            Self::ensure_subject(&service, id)?;
        }
        let task = service
            .add_task(NewTask {
                user_id: None,
                subject_id,
                title,
                description: description.unwrap_or_default().trim().to_string(),
                due_date,
                category,
                priority: Some(priority),
                is_complete: false,
            })
            .await
            .map_err(public_error)?;
        let tasks = service.cached_tasks().map_err(public_error)?;
        drop(service);

        let mut result = format!(
            "Quest added: {} (id: {}, worth {} XP)",
            task.title,
            task.id,
            xp_for_task(&task)
        );
        if let Some(defeated) = self.observe_boss(&tasks).await {
            result.push('\n');
            result.push_str(&boss_defeated_line(defeated));
        }
        Ok(result)
    }

    /// Partial update; `""` clears the subject link.
    #[allow(clippy::too_many_arguments)]
    pub async fn handle_update_task(
        &self,
        id: String,
        title: Option<String>,
        description: Option<String>,
        due_date: Option<String>,
        due_time: Option<String>,
        category: Option<String>,
        priority: Option<u32>,
        subject_id: Option<String>,
    ) -> McpResult<String> {
        let mut patch = TaskPatch::default();
        if let Some(title) = title {
            patch.title = Some(required("Title", &title)?);
        }
        if let Some(description) = description {
            patch.description = Some(description.trim().to_string());
        }
        match (due_date, due_time) {
            (Some(date), time) => {
                patch.due_date = Some(
                    due_date_from_parts(&date, time.as_deref(), &Local).map_err(public_error)?,
                );
            }
            (None, Some(_)) => {
                return Err(invalid_params("due_time can only be changed together with due_date"));
            }
            (None, None) => {}
        }
        if let Some(category) = category {
            patch.category = Some(category.parse().map_err(invalid_params)?);
        }
        patch.priority = parse_priority(priority)?;
        patch.subject_id = clearable(subject_id);

        if patch.is_empty() {
            return Err(invalid_params(format!(
                "Nothing to update for quest '{}'. Provide at least one field.",
                id
            )));
        }

        let mut service = self.service.lock().await;
        if let Some(Some(ref subject)) = patch.subject_id {
            Self::ensure_subject(&service, subject)?;
        }
        let task = service
            .update_task(id.trim(), &patch)
            .await
            .map_err(public_error)?;
        let tasks = service.cached_tasks().map_err(public_error)?;
        drop(service);

        let mut result = format!("Quest updated: {} (id: {})", task.title, task.id);
        if let Some(defeated) = self.observe_boss(&tasks).await {
            result.push('\n');
            result.push_str(&boss_defeated_line(defeated));
        }
        Ok(result)
    }

    /// Flip completion and report XP, level-up, shout and boss events.
    pub async fn handle_toggle_task(&self, id: String) -> McpResult<String> {
        let mut service = self.service.lock().await;
        let user = service.require_user().map_err(public_error)?;
        let xp_before = compute_xp(&service.cached_tasks().map_err(public_error)?);

        let task = service.toggle_task(id.trim()).await.map_err(public_error)?;
        let xp = xp_for_task(&task);

        let mut lines = Vec::new();
        let mut shout = None;
        if task.is_complete {
            lines.push(format!("Quest complete: {} (+{} XP)", task.title, xp));
            if let Some(level_up) = detect_level_up(xp_before, &task, true) {
                lines.push(level_up_line(level_up));
            }
            let message = gained_xp_message(&user.username);
            if service.broadcast_shout(&message).await {
                lines.push(format!("Shouted to all players: {}", message));
            }
            shout = Some(message);
        } else {
            lines.push(format!("Quest reopened: {} (-{} XP)", task.title, xp));
        }

        let tasks = service.cached_tasks().map_err(public_error)?;
        drop(service);

        if let Some(message) = shout {
            self.hud.lock().await.shouts.post(message, Utc::now());
        }
        if let Some(defeated) = self.observe_boss(&tasks).await {
            lines.push(boss_defeated_line(defeated));
        }
        Ok(lines.join("\n"))
    }

    pub async fn handle_delete_task(&self, id: String) -> McpResult<String> {
        let mut service = self.service.lock().await;
        let task = service.delete_task(id.trim()).await.map_err(public_error)?;
        let tasks = service.cached_tasks().map_err(public_error)?;
        drop(service);

        let mut result = format!("Quest deleted: {} (id: {})", task.title, task.id);
        if let Some(defeated) = self.observe_boss(&tasks).await {
            result.push('\n');
            result.push_str(&boss_defeated_line(defeated));
        }
        Ok(result)
    }

    pub async fn handle_list_tasks(
        &self,
        filter: Option<String>,
        sort: Option<String>,
        subject_id: Option<String>,
    ) -> McpResult<String> {
        let filter: TaskFilter = parse_choice(filter.as_deref())?;
        let sort: SortOption = parse_choice(sort.as_deref())?;
        let subject_id = subject_id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let mut service = self.service.lock().await;
        let tasks = service.fetch_tasks().await.map_err(public_error)?;
        let subjects = service.cached_subjects().map_err(public_error)?;
        drop(service);

        let heading = board::heading(&subjects, subject_id.as_deref());
        let mut tasks = board::filter_tasks(tasks, filter, subject_id.as_deref());
        board::sort_tasks(&mut tasks, sort, &Local);
        Ok(board::format_tasks(&heading, &tasks, &subjects, &Local))
    }
}
