//! Username-only accounts
//!
//! There are no passwords. A profile is created once per username and signing in
//! just looks it up: first on the backend, then among the profiles in the local
//! store. The session survives restarts because it is saved with the quest log.

use crate::error::{Result, TasCraftError};
use crate::quest::{Profile, User, validate_username};
use crate::service::{TaskService, timestamp_now};
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

/// Profile ids look like `user_<unix millis>_<9 random chars>`.
pub fn new_profile_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("user_{}_{}", Utc::now().timestamp_millis(), &suffix[..9])
}

impl TaskService {
    /// Create a profile and sign in as it.
    pub async fn sign_up(&mut self, username: &str) -> Result<User> {
        let username = username.trim();
        validate_username(username)?;
        if self.data.find_profile_by_username(username).is_some() {
            return Err(TasCraftError::UsernameTaken);
        }

        if let Some(backend) = self.remote() {
            match backend.find_profile(username).await {
                Ok(Some(_)) => return Err(TasCraftError::UsernameTaken),
                Ok(None) => {}
                Err(e) => self.fall_back("sign_up", e)?,
            }
        }

        let profile = Profile {
            id: new_profile_id(),
            username: username.to_string(),
            created_at: Some(timestamp_now()),
            last_seen: None,
        };
        if let Some(backend) = self.remote() {
            let result = backend.insert_profile(&profile).await;
            if let Err(e) = result {
                self.fall_back("sign_up", e)?;
            }
        }
        self.data.upsert_profile(profile.clone());
        let user = self.start_session(&profile)?;
        info!(username, id = %user.id, "profile created");
        Ok(user)
    }

    /// Sign in with an existing username.
    pub async fn sign_in(&mut self, username: &str) -> Result<User> {
        let username = username.trim();
        validate_username(username)?;

        if let Some(backend) = self.remote() {
            match backend.find_profile(username).await {
                Ok(Some(profile)) => {
                    self.data.upsert_profile(profile.clone());
                    let user = self.start_session(&profile)?;
                    info!(username, "signed in");
                    return Ok(user);
                }
                Ok(None) => debug!(username, "no remote profile, checking local profiles"),
                Err(e) => self.fall_back("sign_in", e)?,
            }
        }

        let profile = self
            .data
            .find_profile_by_username(username)
            .cloned()
            .ok_or(TasCraftError::UnknownUser)?;
        let user = self.start_session(&profile)?;
        info!(username, "signed in from local profile");
        Ok(user)
    }

    /// End the session. Returns the player that was signed in, if any.
    pub fn sign_out(&mut self) -> Result<Option<User>> {
        let previous = self.data.session.take();
        self.save()?;
        if let Some(user) = &previous {
            info!(username = %user.username, "signed out");
        }
        Ok(previous)
    }

    fn start_session(&mut self, profile: &Profile) -> Result<User> {
        let user = User::from_profile(profile);
        self.data.session = Some(user.clone());
        self.save()?;
        Ok(user)
    }
}
