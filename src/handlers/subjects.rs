//! Subject handlers: the bookshelf

use crate::TasCraftServer;
use crate::board;
use crate::quest::SubjectIcon;
use crate::validation::{parse_choice, public_error, required};
use mcp_attr::Result as McpResult;

impl TasCraftServer {
    pub async fn handle_add_subject(
        &self,
        name: String,
        icon: Option<String>,
        color: Option<String>,
    ) -> McpResult<String> {
        let name = required("Subject name", &name)?;
        let icon: SubjectIcon = parse_choice(icon.as_deref())?;
        let color = color
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let mut service = self.service.lock().await;
        let subject = service
            .add_subject(&name, icon, color)
            .await
            .map_err(public_error)?;
        Ok(format!(
            "Subject added: {} (id: {}, {}, {})",
            subject.name, subject.id, subject.icon, subject.color
        ))
    }

    /// Delete a subject; its quests are kept without a subject.
    pub async fn handle_delete_subject(&self, id: String) -> McpResult<String> {
        let id = id.trim();
        let mut service = self.service.lock().await;
        let detached = service
            .cached_tasks()
            .map_err(public_error)?
            .iter()
            .filter(|t| t.subject_id.as_deref() == Some(id))
            .count();
        let subject = service.delete_subject(id).await.map_err(public_error)?;
        Ok(format!(
            "Subject deleted: {} ({} quest(s) moved to All Quests)",
            subject.name, detached
        ))
    }

    pub async fn handle_list_subjects(&self) -> McpResult<String> {
        let mut service = self.service.lock().await;
        let subjects = service.fetch_subjects().await.map_err(public_error)?;
        let tasks = service.cached_tasks().map_err(public_error)?;
        Ok(board::format_subjects(&subjects, &tasks))
    }
}
