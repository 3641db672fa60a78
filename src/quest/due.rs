use crate::error::{Result, TasCraftError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};

/// Time of day used when a due date is given without one
pub const DEFAULT_DUE_TIME: &str = "23:59";

const NAIVE_DATE_TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parse a stored due date.
///
/// Accepts RFC 3339, zone-less date-times and bare dates (midnight). Zone-less
/// values are read in `tz`. Returns `None` for anything else.
pub fn parse_due_date<Tz: TimeZone>(value: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Build the stored due date from a form-style date and time.
///
/// `date` is `YYYY-MM-DD` (or a full RFC 3339 value, which is normalized);
/// `time` is `HH:MM`, defaulting to 23:59. The local date-time is read in `tz`
/// and stored as an RFC 3339 UTC string with millisecond precision.
pub fn due_date_from_parts<Tz: TimeZone>(date: &str, time: Option<&str>, tz: &Tz) -> Result<String> {
    let date = date.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Ok(to_stored(dt.with_timezone(&Utc)));
    }

    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
        TasCraftError::InvalidInput(format!(
            "Invalid date format '{}'. Use YYYY-MM-DD (e.g., '2025-03-15')",
            date
        ))
    })?;

    let time = time.map(str::trim).filter(|t| !t.is_empty()).unwrap_or(DEFAULT_DUE_TIME);
    let clock = NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| {
        TasCraftError::InvalidInput(format!(
            "Invalid time format '{}'. Use HH:MM (e.g., '18:30')",
            time
        ))
    })?;

    let local = tz.from_local_datetime(&day.and_time(clock)).earliest().ok_or_else(|| {
        TasCraftError::InvalidInput(format!("{} {} does not exist in the local time zone", date, time))
    })?;

    Ok(to_stored(local.with_timezone(&Utc)))
}

fn to_stored(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_parse_rfc3339() {
        assert_eq!(
            parse_due_date("2024-05-15T23:59:00.000Z", &Utc),
            Some(utc(2024, 5, 15, 23, 59))
        );
        assert_eq!(
            parse_due_date("2024-05-15T23:59:00+02:00", &Utc),
            Some(utc(2024, 5, 15, 21, 59))
        );
    }

    #[test]
    fn test_parse_naive_values_use_zone() {
        let tz = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(
            parse_due_date("2024-05-15T10:00:00", &tz),
            Some(utc(2024, 5, 15, 9, 0))
        );
        assert_eq!(parse_due_date("2024-05-15T10:00", &tz), Some(utc(2024, 5, 15, 9, 0)));
        assert_eq!(parse_due_date("2024-05-15", &tz), Some(utc(2024, 5, 14, 23, 0)));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse_due_date("tomorrow", &Utc), None);
        assert_eq!(parse_due_date("", &Utc), None);
        assert_eq!(parse_due_date("2024-13-40", &Utc), None);
    }

    #[test]
    fn test_from_parts_default_time() {
        assert_eq!(
            due_date_from_parts("2024-05-15", None, &Utc).unwrap(),
            "2024-05-15T23:59:00.000Z"
        );
    }

    #[test]
    fn test_from_parts_with_time_and_zone() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(
            due_date_from_parts("2024-05-15", Some("18:30"), &tz).unwrap(),
            "2024-05-15T23:30:00.000Z"
        );
    }

    #[test]
    fn test_from_parts_rfc3339_passthrough() {
        assert_eq!(
            due_date_from_parts("2024-05-15T08:00:00+02:00", None, &Utc).unwrap(),
            "2024-05-15T06:00:00.000Z"
        );
    }

    #[test]
    fn test_from_parts_invalid() {
        assert!(due_date_from_parts("15/05/2024", None, &Utc).is_err());
        assert!(due_date_from_parts("2024-05-15", Some("25:00"), &Utc).is_err());
    }
}
