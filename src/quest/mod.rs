//! TasCraft domain records
//!
//! - `task`: quests (tasks) with their category, priority and due date
//! - `subject`: books on the bookshelf that group tasks
//! - `profile`: players, the signed-in user and leaderboard rows
//! - `due`: due-date parsing and construction
//! - `quest_data`: the container persisted by the local store

mod due;
mod profile;
mod quest_data;
mod subject;
mod task;

pub use due::{DEFAULT_DUE_TIME, due_date_from_parts, parse_due_date};
pub use profile::{
    IDLE_AFTER_HOURS, LeaderboardEntry, Profile, User, demo_players, rank_entries,
    validate_username, with_demo_players,
};
pub use quest_data::QuestData;
pub use subject::{NewSubject, SUBJECT_COLORS, Subject, SubjectIcon};
pub use task::{
    MAX_PRIORITY, MIN_PRIORITY, NewTask, Task, TaskCategory, TaskPatch, validate_priority,
};
