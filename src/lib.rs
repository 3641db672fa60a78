//! TasCraft MCP Server Library
//!
//! TasCraft is a gamified to-do list: completing quests (tasks) earns XP,
//! XP raises the player's level, tasks due this week form a "boss" to defeat,
//! and players compare themselves on a shared leaderboard. A small crafting
//! table calculator comes along for homework.
//!
//! # Architecture
//!
//! - **MCP Layer**: `TasCraftServer` - tools returning plain-text renderings
//! - **Domain Layer**: `quest` records, `game` arithmetic, the `calculator`
//! - **Data Layer**: `TaskService` - hosted backend first, local TOML store as
//!   the offline fallback
//!
//! # Example
//!
//! ```no_run
//! use tascraft::{Config, TasCraftServer};
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let server = TasCraftServer::new(Config::local("tascraft.toml"))?;
//!     // Use server with MCP stdio transport...
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod backend;
pub mod board;
pub mod calculator;
pub mod config;
pub mod error;
pub mod game;
pub mod handlers;
pub mod quest;
pub mod service;
pub mod shout;
pub mod storage;
pub mod validation;

use anyhow::Result;
use mcp_attr::Result as McpResult;
use mcp_attr::server::{McpServer, mcp_server};
use tokio::sync::Mutex;

// Re-export commonly used types
pub use calculator::{Keypad, evaluate};
pub use config::{BackendConfig, Config};
pub use error::TasCraftError;
pub use game::{BossBar, Experience, WeekStart};
pub use quest::{QuestData, Subject, Task, TaskCategory, User};
pub use service::TaskService;
pub use storage::Storage;

/// Per-session screen state that is not part of the quest log
#[derive(Debug, Default)]
pub(crate) struct Hud {
    pub(crate) boss: game::BossTracker,
    pub(crate) shouts: shout::ShoutBoard,
    pub(crate) keypad: Keypad,
}

/// MCP Server handler for TasCraft
pub struct TasCraftServer {
    pub(crate) service: Mutex<TaskService>,
    pub(crate) hud: Mutex<Hud>,
    pub(crate) week_start: WeekStart,
}

impl TasCraftServer {
    /// Create a server from resolved configuration
    ///
    /// # Example
    /// ```no_run
    /// # use tascraft::{Config, TasCraftServer};
    /// # use anyhow::Result;
    /// # fn main() -> Result<()> {
    /// let server = TasCraftServer::new(Config::local("tascraft.toml"))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: Config) -> Result<Self> {
        let service = TaskService::open(&config)?;
        Ok(Self::with_service(service, config.week_start))
    }

    pub fn with_service(service: TaskService, week_start: WeekStart) -> Self {
        Self {
            service: Mutex::new(service),
            hud: Mutex::new(Hud::default()),
            week_start,
        }
    }
}

/// TasCraft: a block-world themed quest log for students.
///
/// Every task is a **quest** with a due date, a category (Homework, Exam,
/// Project, Personal) and a priority of 1-5 nether stars. Completing a quest
/// earns 100 XP per star; every 1000 XP is a level. Quests due in the current
/// week make up the **weekly boss**, defeated when all of them are complete.
/// **Subjects** group quests like books on a shelf.
///
/// Start with sign_up (new player) or sign_in. Quest and subject IDs are shown
/// in every listing.
#[mcp_server]
impl McpServer for TasCraftServer {
    /// **New player**: Create a username-only profile and sign in. Username: 3+ characters, no '@'.
    #[tool]
    pub async fn sign_up(
        &self,
        /// Username (e.g., "steve")
        username: String,
    ) -> McpResult<String> {
        self.handle_sign_up(username).await
    }

    /// **Sign in**: Continue as an existing player and load their quest log.
    #[tool]
    pub async fn sign_in(
        &self,
        /// Username of an existing profile
        username: String,
    ) -> McpResult<String> {
        self.handle_sign_in(username).await
    }

    /// **Sign out**: End the session stored in the save file.
    #[tool]
    pub async fn sign_out(&self) -> McpResult<String> {
        self.handle_sign_out().await
    }

    /// **New quest**: Add a task. Due date is YYYY-MM-DD, time HH:MM (default 23:59, local time).
    #[allow(clippy::too_many_arguments)]
    #[tool]
    pub async fn add_task(
        &self,
        /// Title: what needs doing
        title: String,
        /// Due date: YYYY-MM-DD
        due_date: String,
        /// Due time: HH:MM (optional, default 23:59)
        due_time: Option<String>,
        /// Notes (optional)
        description: Option<String>,
        /// Category: Homework/Exam/Project/Personal (optional, default Homework)
        category: Option<String>,
        /// Priority: 1-5 nether stars (optional, default 1)
        priority: Option<u32>,
        /// Subject ID from list_subjects (optional)
        subject_id: Option<String>,
    ) -> McpResult<String> {
        self.handle_add_task(
            title,
            due_date,
            due_time,
            description,
            category,
            priority,
            subject_id,
        )
        .await
    }

    /// **Edit quest**: Change quest details. Only the given fields change.
    /// **Tip**: subject_id "" removes the quest from its subject.
    #[allow(clippy::too_many_arguments)]
    #[tool]
    pub async fn update_task(
        &self,
        /// Quest ID
        id: String,
        /// New title (optional)
        title: Option<String>,
        /// New notes (optional)
        description: Option<String>,
        /// New due date YYYY-MM-DD (optional)
        due_date: Option<String>,
        /// New due time HH:MM, together with due_date (optional)
        due_time: Option<String>,
        /// New category: Homework/Exam/Project/Personal (optional)
        category: Option<String>,
        /// New priority 1-5 (optional)
        priority: Option<u32>,
        /// Subject ID, ""=none (optional)
        subject_id: Option<String>,
    ) -> McpResult<String> {
        self.handle_update_task(
            id,
            title,
            description,
            due_date,
            due_time,
            category,
            priority,
            subject_id,
        )
        .await
    }

    /// **Complete quest**: Toggle a quest between done and open. Reports XP gained, level-ups and boss defeats.
    #[tool]
    pub async fn toggle_task(
        &self,
        /// Quest ID
        id: String,
    ) -> McpResult<String> {
        self.handle_toggle_task(id).await
    }

    /// **Delete quest**: Permanently remove a quest.
    #[tool]
    pub async fn delete_task(
        &self,
        /// Quest ID
        id: String,
    ) -> McpResult<String> {
        self.handle_delete_task(id).await
    }

    /// **Quest log**: List quests with optional filter, sort and subject.
    #[tool]
    pub async fn list_tasks(
        &self,
        /// Filter: all/pending/completed (optional, default all)
        filter: Option<String>,
        /// Sort: date-asc/date-desc/title-asc/priority-desc (optional, default date-asc)
        sort: Option<String>,
        /// Only quests of this subject ID (optional)
        subject_id: Option<String>,
    ) -> McpResult<String> {
        self.handle_list_tasks(filter, sort, subject_id).await
    }

    /// **New subject**: Add a book to the bookshelf to group quests.
    #[tool]
    pub async fn add_subject(
        &self,
        /// Subject name (e.g., "Math")
        name: String,
        /// Icon: book/sword/pickaxe/potion/redstone (optional, default book)
        icon: Option<String>,
        /// Color as #rrggbb (optional, next palette color by default)
        color: Option<String>,
    ) -> McpResult<String> {
        self.handle_add_subject(name, icon, color).await
    }

    /// **Delete subject**: Remove a subject. Its quests are kept without a subject.
    #[tool]
    pub async fn delete_subject(
        &self,
        /// Subject ID
        id: String,
    ) -> McpResult<String> {
        self.handle_delete_subject(id).await
    }

    /// **Bookshelf**: List subjects with their quest counts.
    #[tool]
    pub async fn list_subjects(&self) -> McpResult<String> {
        self.handle_list_subjects().await
    }

    /// **HUD**: Level, XP bar, weekly boss, dashboard counters and the latest shout.
    #[tool]
    pub async fn status(&self) -> McpResult<String> {
        self.handle_status().await
    }

    /// **Leaderboard**: Players ranked by XP. Players not seen for a day are marked idle.
    #[tool]
    pub async fn leaderboard(&self) -> McpResult<String> {
        self.handle_leaderboard().await
    }

    /// **Crafting table**: Evaluate a flat expression with + - * / (multiplication and division first).
    /// Anything invalid gives "Err".
    #[tool]
    pub async fn calculate(
        &self,
        /// Expression (e.g., "2+3*4")
        expression: String,
    ) -> McpResult<String> {
        self.handle_calculate(expression).await
    }

    /// **Crafting table keypad**: Press keys on the calculator. Digits, '.', + - * / (or x), '=' evaluates,
    /// 'C' clears, '<' deletes one character. The keypad keeps its state between calls.
    #[tool]
    pub async fn calculator(
        &self,
        /// Key sequence (e.g., "12+3=")
        keys: String,
    ) -> McpResult<String> {
        self.handle_calculator(keys).await
    }
}
