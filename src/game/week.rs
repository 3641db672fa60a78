use crate::quest::Task;
use chrono::{DateTime, Datelike, Duration, TimeZone, Utc, Weekday};
use std::fmt;
use std::str::FromStr;

/// First day of the calendar week used by the boss bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    fn days_into_week(self, day: Weekday) -> u32 {
        match self {
            WeekStart::Sunday => day.num_days_from_sunday(),
            WeekStart::Monday => day.num_days_from_monday(),
        }
    }
}

impl FromStr for WeekStart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sunday" | "sun" => Ok(WeekStart::Sunday),
            "monday" | "mon" => Ok(WeekStart::Monday),
            _ => Err(format!(
                "Invalid week start '{}'. Valid options are: sunday, monday",
                s
            )),
        }
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekStart::Sunday => f.write_str("sunday"),
            WeekStart::Monday => f.write_str("monday"),
        }
    }
}

/// Weekly objectives: tasks due this week, and how many are still open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BossBar {
    /// Open tasks due this week (the boss's remaining health)
    pub current: usize,
    /// All tasks due this week
    pub max: usize,
}

impl BossBar {
    pub fn is_defeated(&self) -> bool {
        self.max > 0 && self.current == 0
    }
}

/// `[start, end)` of the calendar week containing `now`, in `now`'s zone.
///
/// `None` only when local midnight does not exist at a week boundary.
pub fn week_window<Tz: TimeZone>(
    now: &DateTime<Tz>,
    week_start: WeekStart,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let today = now.date_naive();
    let first_day = today - Duration::days(i64::from(week_start.days_into_week(today.weekday())));
    let next_first_day = first_day + Duration::days(7);

    let tz = now.timezone();
    let start = tz
        .from_local_datetime(&first_day.and_hms_opt(0, 0, 0)?)
        .earliest()?;
    let end = tz
        .from_local_datetime(&next_first_day.and_hms_opt(0, 0, 0)?)
        .earliest()?;

    Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}

/// Count the tasks due in the current week; unparseable due dates are skipped.
pub fn weekly_objectives<Tz: TimeZone>(
    tasks: &[Task],
    now: &DateTime<Tz>,
    week_start: WeekStart,
) -> BossBar {
    let Some((start, end)) = week_window(now, week_start) else {
        return BossBar::default();
    };

    let tz = now.timezone();
    let weekly: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.due_at(&tz).is_some_and(|due| start <= due && due < end))
        .collect();

    BossBar {
        current: weekly.iter().filter(|t| !t.is_complete).count(),
        max: weekly.len(),
    }
}
