//! Quest board: filtering, sorting and text rendering of the task list

use crate::quest::{Subject, Task};
use chrono::{DateTime, TimeZone, Utc};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Completion filter of the list view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl TaskFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Pending => !task.is_complete,
            TaskFilter::Completed => task.is_complete,
        }
    }
}

impl FromStr for TaskFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(TaskFilter::All),
            "pending" => Ok(TaskFilter::Pending),
            "completed" => Ok(TaskFilter::Completed),
            _ => Err(format!(
                "Invalid filter '{}'. Valid options are: all, pending, completed",
                s
            )),
        }
    }
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskFilter::All => f.write_str("all"),
            TaskFilter::Pending => f.write_str("pending"),
            TaskFilter::Completed => f.write_str("completed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    /// Earliest due date first
    #[default]
    DateAsc,
    DateDesc,
    TitleAsc,
    PriorityDesc,
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date-asc" => Ok(SortOption::DateAsc),
            "date-desc" => Ok(SortOption::DateDesc),
            "title-asc" => Ok(SortOption::TitleAsc),
            "priority-desc" => Ok(SortOption::PriorityDesc),
            _ => Err(format!(
                "Invalid sort '{}'. Valid options are: date-asc, date-desc, title-asc, priority-desc",
                s
            )),
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOption::DateAsc => f.write_str("date-asc"),
            SortOption::DateDesc => f.write_str("date-desc"),
            SortOption::TitleAsc => f.write_str("title-asc"),
            SortOption::PriorityDesc => f.write_str("priority-desc"),
        }
    }
}

/// Keep the tasks matching the completion filter and, if given, the subject.
pub fn filter_tasks(tasks: Vec<Task>, filter: TaskFilter, subject_id: Option<&str>) -> Vec<Task> {
    tasks
        .into_iter()
        .filter(|t| filter.matches(t))
        .filter(|t| subject_id.is_none_or(|id| t.subject_id.as_deref() == Some(id)))
        .collect()
}

/// Stable sort; tasks whose due date cannot be read go last for both date orders.
pub fn sort_tasks<Tz: TimeZone>(tasks: &mut [Task], sort: SortOption, tz: &Tz) {
    match sort {
        SortOption::DateAsc => tasks.sort_by(|a, b| by_due(a, b, tz, false)),
        SortOption::DateDesc => tasks.sort_by(|a, b| by_due(a, b, tz, true)),
        SortOption::TitleAsc => tasks.sort_by_key(|t| t.title.to_lowercase()),
        SortOption::PriorityDesc => {
            tasks.sort_by(|a, b| b.effective_priority().cmp(&a.effective_priority()))
        }
    }
}

fn by_due<Tz: TimeZone>(a: &Task, b: &Task, tz: &Tz, descending: bool) -> Ordering {
    match (a.due_at(tz), b.due_at(tz)) {
        (Some(x), Some(y)) if descending => y.cmp(&x),
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Title of the list view for the selected subject
pub fn heading(subjects: &[Subject], selected: Option<&str>) -> String {
    match selected {
        None => "All Quests".to_string(),
        Some(id) => subjects
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| "Unknown Quest".to_string()),
    }
}

fn format_due<Tz: TimeZone>(task: &Task, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    match task.due_at(tz) {
        Some(due) => due.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string(),
        None => task.due_date.clone(),
    }
}

/// Render one task as a checklist line with its detail lines
pub fn format_task<Tz: TimeZone>(task: &Task, subjects: &[Subject], tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    let check = if task.is_complete { "x" } else { " " };
    let mut result = format!(
        "- [{}] {} (id: {}, {}, priority {}, due {})\n",
        check,
        task.title,
        task.id,
        task.category,
        task.effective_priority(),
        format_due(task, tz)
    );
    if let Some(ref subject_id) = task.subject_id {
        let name = subjects
            .iter()
            .find(|s| &s.id == subject_id)
            .map(|s| s.name.as_str())
            .unwrap_or("Unknown Quest");
        result.push_str(&format!("  Subject: {}\n", name));
    }
    if !task.description.is_empty() {
        result.push_str(&format!("  Notes: {}\n", task.description));
    }
    result
}

pub fn format_tasks<Tz: TimeZone>(
    heading: &str,
    tasks: &[Task],
    subjects: &[Subject],
    tz: &Tz,
) -> String
where
    Tz::Offset: fmt::Display,
{
    if tasks.is_empty() {
        return format!("{}\n\nNo quests found", heading);
    }

    let mut result = format!("{} ({} quest(s)):\n\n", heading, tasks.len());
    for task in tasks {
        result.push_str(&format_task(task, subjects, tz));
    }
    result
}

pub fn format_subjects(subjects: &[Subject], tasks: &[Task]) -> String {
    if subjects.is_empty() {
        return "No subjects yet".to_string();
    }

    let mut result = format!("{} subject(s):\n\n", subjects.len());
    for subject in subjects {
        let count = tasks
            .iter()
            .filter(|t| t.subject_id.as_deref() == Some(subject.id.as_str()))
            .count();
        result.push_str(&format!(
            "- [{}] {} ({}, {}, {} quest(s))\n",
            subject.id, subject.name, subject.icon, subject.color, count
        ));
    }
    result
}

/// Tasks due at or after `now` that are still open, soonest first
pub fn upcoming<Tz: TimeZone>(tasks: &[Task], now: &DateTime<Tz>) -> Vec<Task> {
    let tz = now.timezone();
    let now = now.with_timezone(&Utc);
    let mut open: Vec<Task> = tasks
        .iter()
        .filter(|t| !t.is_complete)
        .filter(|t| t.due_at(&tz).is_some_and(|due| due >= now))
        .cloned()
        .collect();
    sort_tasks(&mut open, SortOption::DateAsc, &tz);
    open
}
