//! Shouts: short broadcast notices shown to every player for a few seconds

use chrono::{DateTime, Utc};
use std::time::Duration;

/// How long a shout stays on screen
pub const SHOUT_TTL: Duration = Duration::from_secs(4);

/// Message broadcast when a player completes a task
pub fn gained_xp_message(username: &str) -> String {
    format!("{} just gained XP!", username)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shout {
    pub message: String,
    pub posted_at: DateTime<Utc>,
}

/// The most recent shout; a newer one replaces it.
#[derive(Debug, Clone, Default)]
pub struct ShoutBoard {
    latest: Option<Shout>,
}

impl ShoutBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&mut self, message: impl Into<String>, now: DateTime<Utc>) {
        self.latest = Some(Shout {
            message: message.into(),
            posted_at: now,
        });
    }

    /// The shout still on screen at `now`
    pub fn current(&self, now: DateTime<Utc>) -> Option<&str> {
        self.latest
            .as_ref()
            .filter(|s| {
                (now - s.posted_at)
                    .to_std()
                    .is_ok_and(|elapsed| elapsed < SHOUT_TTL)
            })
            .map(|s| s.message.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_message() {
        assert_eq!(gained_xp_message("steve"), "steve just gained XP!");
    }

    #[test]
    fn test_shout_expires() {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap();
        let mut board = ShoutBoard::new();
        assert_eq!(board.current(t0), None);

        board.post("alex just gained XP!", t0);
        assert_eq!(board.current(t0), Some("alex just gained XP!"));
        assert_eq!(
            board.current(t0 + Duration::milliseconds(3999)),
            Some("alex just gained XP!")
        );
        assert_eq!(board.current(t0 + Duration::seconds(4)), None);
    }

    #[test]
    fn test_newer_shout_replaces() {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap();
        let mut board = ShoutBoard::new();
        board.post("alex just gained XP!", t0);
        board.post("steve just gained XP!", t0 + Duration::seconds(3));
        assert_eq!(
            board.current(t0 + Duration::seconds(5)),
            Some("steve just gained XP!")
        );
    }
}
