use super::{Backend, SHOUT_CHANNEL, SHOUT_EVENT};
use crate::config::BackendConfig;
use crate::error::{Result, TasCraftError};
use crate::quest::{LeaderboardEntry, NewSubject, NewTask, Profile, Subject, Task, TaskPatch};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

/// Backend over the hosted service's REST (PostgREST) and realtime broadcast endpoints
pub struct RestBackend {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestBackend {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn broadcast_url(&self) -> String {
        format!("{}/realtime/v1/api/broadcast", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", self.api_key.as_str())
            .bearer_auth(&self.api_key)
    }

    /// Ask the backend to echo written rows back
    fn returning(request: RequestBuilder) -> RequestBuilder {
        request.header("Prefer", "return=representation")
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), %message, "backend request failed");
        Err(TasCraftError::Backend {
            status: status.as_u16(),
            message,
        })
    }

    async fn rows<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Vec<T>> {
        let response = self.send(request).await?;
        Ok(response.json::<Vec<T>>().await?)
    }

    async fn single<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        kind: &'static str,
        id: &str,
    ) -> Result<T> {
        self.rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| TasCraftError::NotFound {
                kind,
                id: id.to_string(),
            })
    }
}

fn eq(value: &str) -> String {
    format!("eq.{}", value)
}

#[async_trait]
impl Backend for RestBackend {
    async fn fetch_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        let owner = eq(user_id);
        let request = self.client.get(self.table_url("tasks")).query(&[
            ("select", "*"),
            ("user_id", owner.as_str()),
            ("order", "due_date.asc"),
        ]);
        self.rows(request).await
    }

    async fn insert_task(&self, task: &NewTask) -> Result<Task> {
        let request = Self::returning(self.client.post(self.table_url("tasks"))).json(&[task]);
        self.single(request, "Task", &task.title).await
    }

    async fn update_task(&self, id: &str, patch: &TaskPatch) -> Result<Task> {
        let filter = eq(id);
        let request = Self::returning(self.client.patch(self.table_url("tasks")))
            .query(&[("id", filter.as_str())])
            .json(patch);
        self.single(request, "Task", id).await
    }

    async fn delete_task(&self, id: &str) -> Result<()> {
        let filter = eq(id);
        let request = self
            .client
            .delete(self.table_url("tasks"))
            .query(&[("id", filter.as_str())]);
        self.send(request).await?;
        Ok(())
    }

    async fn fetch_subjects(&self, user_id: &str) -> Result<Vec<Subject>> {
        let owner = eq(user_id);
        let request = self
            .client
            .get(self.table_url("subjects"))
            .query(&[("select", "*"), ("user_id", owner.as_str())]);
        self.rows(request).await
    }

    async fn insert_subject(&self, subject: &NewSubject) -> Result<Subject> {
        let request =
            Self::returning(self.client.post(self.table_url("subjects"))).json(&[subject]);
        self.single(request, "Subject", &subject.name).await
    }

    async fn delete_subject(&self, id: &str) -> Result<()> {
        let filter = eq(id);
        let request = self
            .client
            .delete(self.table_url("subjects"))
            .query(&[("id", filter.as_str())]);
        self.send(request).await?;
        Ok(())
    }

    async fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        let request = self
            .client
            .get(self.table_url("leaderboard"))
            .query(&[("select", "*")]);
        self.rows(request).await
    }

    async fn find_profile(&self, username: &str) -> Result<Option<Profile>> {
        let name = eq(username);
        let request = self
            .client
            .get(self.table_url("profiles"))
            .query(&[("select", "*"), ("username", name.as_str())]);
        let profiles: Vec<Profile> = self.rows(request).await?;
        Ok(profiles.into_iter().next())
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<()> {
        let request = self
            .client
            .post(self.table_url("profiles"))
            .header("Prefer", "return=minimal")
            .json(&[profile]);
        self.send(request).await?;
        Ok(())
    }

    async fn touch_last_seen(&self, user_id: &str, at: &str) -> Result<()> {
        let filter = eq(user_id);
        let request = self
            .client
            .patch(self.table_url("profiles"))
            .query(&[("id", filter.as_str())])
            .json(&json!({ "last_seen": at }));
        self.send(request).await?;
        Ok(())
    }

    async fn broadcast_shout(&self, message: &str) -> Result<()> {
        let body = json!({
            "messages": [{
                "topic": SHOUT_CHANNEL,
                "event": SHOUT_EVENT,
                "payload": { "message": message },
            }]
        });
        let request = self.client.post(self.broadcast_url()).json(&body);
        self.send(request).await?;
        Ok(())
    }
}
