use crate::error::{Result, TasCraftError};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest priority ("nether stars") a task can carry
pub const MIN_PRIORITY: u32 = 1;
/// Highest priority ("nether stars") a task can carry
pub const MAX_PRIORITY: u32 = 5;

/// Kind of quest
///
/// Serialized with the capitalized names the hosted tables store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskCategory {
    #[default]
    Homework,
    Exam,
    Project,
    Personal,
}

impl FromStr for TaskCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "homework" => Ok(TaskCategory::Homework),
            "exam" => Ok(TaskCategory::Exam),
            "project" => Ok(TaskCategory::Project),
            "personal" => Ok(TaskCategory::Personal),
            _ => Err(format!(
                "Invalid category '{}'. Valid options are: Homework, Exam, Project, Personal",
                s
            )),
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskCategory::Homework => "Homework",
            TaskCategory::Exam => "Exam",
            TaskCategory::Project => "Project",
            TaskCategory::Personal => "Personal",
        };
        f.write_str(name)
    }
}

/// A quest on the to-do list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Subject (book) this task belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// ISO-8601 date-time string, as stored by the backend
    pub due_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: TaskCategory,
    /// 1-5; absent or 0 counts as 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Task {
    /// Priority used for XP and sorting: a missing or zero priority counts as 1.
    pub fn effective_priority(&self) -> u32 {
        self.priority.filter(|p| *p > 0).unwrap_or(MIN_PRIORITY)
    }

    /// Parse the due date, reading zone-less values in `tz`.
    ///
    /// Returns `None` for unparseable dates.
    pub fn due_at<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Utc>> {
        super::due::parse_due_date(&self.due_date, tz)
    }

    /// Build a task from an insert request, as the local store does when the
    /// remote backend is not in use.
    pub fn from_new(new: NewTask, id: String, created_at: String) -> Self {
        Self {
            id,
            user_id: new.user_id,
            subject_id: new.subject_id,
            title: new.title,
            description: new.description,
            due_date: new.due_date,
            category: new.category,
            priority: Some(new.priority.filter(|p| *p > 0).unwrap_or(MIN_PRIORITY)),
            is_complete: new.is_complete,
            created_at: Some(created_at),
        }
    }
}

/// Backend rows may carry `null` in columns that have a default.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Insert request for a new task (id and creation time are assigned by the store)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTask {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub subject_id: Option<String>,
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub category: TaskCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    pub is_complete: bool,
}

/// Partial update of a task
///
/// `None` leaves a field untouched. `subject_id: Some(None)` detaches the task
/// from its subject and is sent to the backend as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<TaskCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_complete: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<Option<String>>,
}

impl TaskPatch {
    /// Patch that only flips the completion flag
    pub fn completion(is_complete: bool) -> Self {
        Self {
            is_complete: Some(is_complete),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, task: &mut Task) {
        if let Some(ref title) = self.title {
            task.title = title.clone();
        }
        if let Some(ref description) = self.description {
            task.description = description.clone();
        }
        if let Some(ref due_date) = self.due_date {
            task.due_date = due_date.clone();
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(priority) = self.priority {
            task.priority = Some(priority);
        }
        if let Some(is_complete) = self.is_complete {
            task.is_complete = is_complete;
        }
        if let Some(ref subject_id) = self.subject_id {
            task.subject_id = subject_id.clone();
        }
    }
}

/// Check a priority given by a caller
pub fn validate_priority(priority: u32) -> Result<u32> {
    if (MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
        Ok(priority)
    } else {
        Err(TasCraftError::InvalidInput(format!(
            "Invalid priority {}. Use {} to {} nether stars.",
            priority, MIN_PRIORITY, MAX_PRIORITY
        )))
    }
}
