//! Status (HUD) and leaderboard handlers

use crate::TasCraftServer;
use crate::board;
use crate::game::{BossBar, DashboardStats, Experience, compute_level};
use crate::quest::LeaderboardEntry;
use crate::validation::public_error;
use chrono::{DateTime, Local, Utc};
use mcp_attr::Result as McpResult;

const BAR_WIDTH: usize = 20;

fn progress_bar(progress: f64) -> String {
    let filled = ((progress * BAR_WIDTH as f64).floor() as usize).min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

fn format_boss(bar: &BossBar) -> String {
    if bar.max == 0 {
        "Weekly boss: no quests due this week".to_string()
    } else if bar.is_defeated() {
        format!("Weekly boss: defeated ({} / {} quests done)", bar.max, bar.max)
    } else {
        format!("Weekly boss: {} / {} HP remaining", bar.current, bar.max)
    }
}

pub(crate) fn format_leaderboard(
    entries: &[LeaderboardEntry],
    me: Option<&str>,
    now: DateTime<Utc>,
) -> String {
    if entries.is_empty() {
        return "Leaderboard is empty".to_string();
    }

    let mut result = "Leaderboard:\n\n".to_string();
    for (index, entry) in entries.iter().enumerate() {
        let rank = entry.rank.unwrap_or(index as u32 + 1);
        result.push_str(&format!(
            "#{} {} - {} XP (Level {}), {} quest(s) completed",
            rank,
            entry.username,
            entry.total_xp,
            compute_level(entry.total_xp),
            entry.total_completed
        ));
        if entry.is_idle(now) {
            result.push_str(" [idle]");
        }
        if me == Some(entry.user_id.as_str()) {
            result.push_str(" (you)");
        }
        result.push('\n');
    }
    result
}

impl TasCraftServer {
    pub async fn handle_status(&self) -> McpResult<String> {
        let service = self.service.lock().await;
        let user = service.require_user().map_err(public_error)?;
        let tasks = service.cached_tasks().map_err(public_error)?;
        let offline = service.is_offline();
        drop(service);

        let now = Local::now();
        let xp = Experience::from_tasks(&tasks);
        let bar = self.boss_bar(&tasks);
        let stats = DashboardStats::from_tasks(&tasks, &now);

        let mut result = format!(
            "Player: {} ({})\n",
            user.username,
            if offline { "offline" } else { "online" }
        );
        result.push_str(&format!(
            "Level {} | XP: {} / {}\n{} {}%\n",
            xp.level,
            xp.total_xp,
            xp.next_level_xp(),
            progress_bar(xp.progress),
            (xp.progress * 100.0).floor()
        ));
        result.push_str(&format_boss(&bar));
        result.push('\n');
        result.push_str(&format!(
            "Quests: {} total, {} completed, {} pending, {} due today ({}% complete)\n",
            stats.total,
            stats.completed,
            stats.pending,
            stats.due_today,
            stats.completion_percent()
        ));

        let upcoming = board::upcoming(&tasks, &now);
        if let Some(next) = upcoming.first() {
            result.push_str(&format!("Next up: {} (id: {})\n", next.title, next.id));
        }

        let hud = self.hud.lock().await;
        if let Some(shout) = hud.shouts.current(Utc::now()) {
            result.push_str(&format!("Shout: {}\n", shout));
        }
        Ok(result)
    }

    pub async fn handle_leaderboard(&self) -> McpResult<String> {
        let mut service = self.service.lock().await;
        let entries = service.fetch_leaderboard().await.map_err(public_error)?;
        let me = service.current_user().map(|u| u.id.clone());
        Ok(format_leaderboard(&entries, me.as_deref(), Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0), format!("[{}]", "-".repeat(20)));
        assert_eq!(
            progress_bar(0.25),
            format!("[{}{}]", "#".repeat(5), "-".repeat(15))
        );
    }

    #[test]
    fn test_format_boss() {
        assert_eq!(
            format_boss(&BossBar { current: 0, max: 0 }),
            "Weekly boss: no quests due this week"
        );
        assert_eq!(
            format_boss(&BossBar { current: 2, max: 5 }),
            "Weekly boss: 2 / 5 HP remaining"
        );
        assert!(format_boss(&BossBar { current: 0, max: 3 }).contains("defeated"));
    }

    #[test]
    fn test_format_leaderboard() {
        let now = Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap();
        let entries = vec![
            LeaderboardEntry {
                user_id: "user_1".to_string(),
                username: "steve".to_string(),
                total_completed: 5,
                total_xp: 1300,
                last_seen: Some("2024-05-15T10:00:00Z".to_string()),
                rank: Some(1),
            },
            LeaderboardEntry {
                user_id: "user_2".to_string(),
                username: "alex".to_string(),
                total_completed: 1,
                total_xp: 200,
                last_seen: None,
                rank: None,
            },
        ];
        let text = format_leaderboard(&entries, Some("user_1"), now);
        assert!(text.contains("#1 steve - 1300 XP (Level 2), 5 quest(s) completed (you)"));
        assert!(text.contains("#2 alex - 200 XP (Level 1), 1 quest(s) completed [idle]"));
        assert_eq!(format_leaderboard(&[], None, now), "Leaderboard is empty");
    }
}
