use crate::error::{Result, TasCraftError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hours without activity after which a player is shown as idle on the leaderboard
pub const IDLE_AFTER_HOURS: i64 = 24;

/// A player profile (one row of the `profiles` table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<String>,
}

/// The signed-in player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl User {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            id: profile.id.clone(),
            username: profile.username.clone(),
            email: format!("{}@tascraft.local", profile.username),
        }
    }
}

/// One row of the leaderboard view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub username: String,
    pub total_completed: u64,
    pub total_xp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

impl LeaderboardEntry {
    /// A player is idle when never seen, or last seen more than a day ago.
    pub fn is_idle(&self, now: DateTime<Utc>) -> bool {
        let Some(ref last_seen) = self.last_seen else {
            return true;
        };
        match DateTime::parse_from_rfc3339(last_seen) {
            Ok(seen) => (now - seen.with_timezone(&Utc)).num_hours() > IDLE_AFTER_HOURS,
            Err(_) => true,
        }
    }
}

/// Sort entries by XP (highest first, ties keep their order) and number them from 1.
pub fn rank_entries(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| b.total_xp.cmp(&a.total_xp));
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = Some(index as u32 + 1);
    }
}

/// The famous players who keep an offline leaderboard company.
///
/// `seen_at` is used as their last-seen time, except for Alex who has been
/// away since 2023.
pub fn demo_players(seen_at: &str) -> Vec<LeaderboardEntry> {
    let demo = |user_id: &str, username: &str, completed: u64, xp: u64, seen: &str| {
        LeaderboardEntry {
            user_id: user_id.to_string(),
            username: username.to_string(),
            total_completed: completed,
            total_xp: xp,
            last_seen: Some(seen.to_string()),
            rank: None,
        }
    };
    vec![
        demo("notch", "Notch", 999, 99900, seen_at),
        demo("jeb", "jeb_", 50, 5000, seen_at),
        demo("alex", "Alex", 10, 1000, "2023-01-01T00:00:00Z"),
    ]
}

/// Add the demo players whose username is still free, then rank everyone.
pub fn with_demo_players(
    mut entries: Vec<LeaderboardEntry>,
    seen_at: &str,
) -> Vec<LeaderboardEntry> {
    for player in demo_players(seen_at) {
        if !entries.iter().any(|e| e.username == player.username) {
            entries.push(player);
        }
    }
    rank_entries(&mut entries);
    entries
}

/// Usernames need at least three characters and must not look like an email.
pub fn validate_username(username: &str) -> Result<()> {
    if username.chars().count() < 3 {
        return Err(TasCraftError::InvalidInput(
            "Username must be at least 3 characters.".to_string(),
        ));
    }
    if username.contains('@') {
        return Err(TasCraftError::InvalidInput(
            "Please enter a Username, not an email.".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(name: &str, xp: u64, last_seen: Option<&str>) -> LeaderboardEntry {
        LeaderboardEntry {
            user_id: name.to_lowercase(),
            username: name.to_string(),
            total_completed: xp / 100,
            total_xp: xp,
            last_seen: last_seen.map(str::to_string),
            rank: None,
        }
    }

    #[test]
    fn test_user_email() {
        let profile = Profile {
            id: "user_1".to_string(),
            username: "steve".to_string(),
            created_at: None,
            last_seen: None,
        };
        assert_eq!(User::from_profile(&profile).email, "steve@tascraft.local");
    }

    #[test]
    fn test_rank_entries() {
        let mut entries = vec![
            entry("Alex", 1000, None),
            entry("Notch", 99900, None),
            entry("Jeb", 5000, None),
            entry("Herobrine", 1000, None),
        ];
        rank_entries(&mut entries);
        let names: Vec<_> = entries.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, vec!["Notch", "Jeb", "Alex", "Herobrine"]);
        assert_eq!(entries[0].rank, Some(1));
        assert_eq!(entries[3].rank, Some(4));
    }

    #[test]
    fn test_demo_players_join_local_ones() {
        let local = vec![entry("steve", 1200, None), entry("Notch", 10, None)];
        let board = with_demo_players(local, "2024-05-15T11:00:00Z");
        let names: Vec<_> = board.iter().map(|e| e.username.as_str()).collect();
        // a local Notch keeps the name; the famous one stays out
        assert_eq!(names, vec!["jeb_", "steve", "Alex", "Notch"]);
        assert_eq!(board[2].rank, Some(3));

        let now = Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap();
        assert!(!board[0].is_idle(now));
        assert!(board[2].is_idle(now));
    }

    #[test]
    fn test_is_idle() {
        let now = Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap();
        assert!(entry("a", 0, None).is_idle(now));
        assert!(!entry("a", 0, Some("2024-05-15T11:00:00Z")).is_idle(now));
        assert!(!entry("a", 0, Some("2024-05-14T11:30:00Z")).is_idle(now));
        assert!(entry("a", 0, Some("2024-05-13T12:00:00Z")).is_idle(now));
        assert!(entry("a", 0, Some("garbage")).is_idle(now));
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("steve").is_ok());
        assert!(validate_username("al").is_err());
        assert!(validate_username("steve@mojang.com").is_err());
    }
}
