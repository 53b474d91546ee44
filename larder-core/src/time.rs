//! Time utilities: the single string-to-date boundary, and timezone-aware
//! fire-time computation.
//!
//! Dates enter this engine as strings exactly once (export rows, config).
//! They are parsed here into calendar values and never re-parsed downstream,
//! so repeated string construction can't introduce timezone drift.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Parse a stored date like "2026-08-04" into a calendar date.
/// RFC3339 instants are accepted too and truncated to their UTC date.
pub fn parse_entry_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc).date_naive());
    }

    anyhow::bail!("invalid date '{s}': expected YYYY-MM-DD or RFC3339")
}

/// Parse a wall-clock time like "22:00".
pub fn parse_wall_clock(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|e| anyhow::anyhow!("invalid time '{s}': {e}"))
}

/// Today's calendar date in the given timezone.
pub fn local_today(tz: Tz, now_utc: DateTime<Utc>) -> NaiveDate {
    now_utc.with_timezone(&tz).date_naive()
}

/// Current wall-clock time in the given timezone.
pub fn local_time_of_day(tz: Tz, now_utc: DateTime<Utc>) -> NaiveTime {
    now_utc.with_timezone(&tz).time()
}

/// Next occurrence of `hour:minute` local time strictly after `now_utc`,
/// returned as UTC. Ambiguous local times (DST fall-back) resolve to the
/// earliest instant; a local time skipped by spring-forward is an error,
/// which callers treat as "no valid delivery time" and skip the send.
pub fn next_local_occurrence(
    hour: u32,
    minute: u32,
    tz: Tz,
    now_utc: DateTime<Utc>,
) -> Result<DateTime<Utc>> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| anyhow::anyhow!("invalid time of day: {hour:02}:{minute:02}"))?;

    let local_now = now_utc.with_timezone(&tz);
    let mut day = local_now.date_naive();

    if local_now.time() >= time {
        day = day.succ_opt().ok_or_else(|| anyhow::anyhow!("date overflow"))?;
    }

    let candidate = tz
        .from_local_datetime(&day.and_time(time))
        .earliest()
        .ok_or_else(|| anyhow::anyhow!("invalid local time (DST?): {day} {time} {tz}"))?;

    Ok(candidate.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_plain_date() {
        let d = parse_entry_date("2026-08-04").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2026, 8, 4).unwrap());
    }

    #[test]
    fn truncates_rfc3339_instant() {
        let d = parse_entry_date("2026-08-04T18:30:00+00:00").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2026, 8, 4).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_entry_date("next tuesday").is_err());
    }

    #[test]
    fn next_occurrence_rolls_to_tomorrow_when_passed() {
        let tz: Tz = "America/Chicago".parse().unwrap();
        // 2026-02-20 18:00 Chicago = 2026-02-21 00:00 UTC (CST, UTC-6)
        let now = Utc.with_ymd_and_hms(2026, 2, 21, 0, 0, 0).unwrap();

        let fire = next_local_occurrence(9, 0, tz, now).unwrap();
        assert_eq!(fire.to_rfc3339(), "2026-02-21T15:00:00+00:00");

        let fire = next_local_occurrence(8, 0, tz, now).unwrap();
        assert_eq!(fire.to_rfc3339(), "2026-02-21T14:00:00+00:00");
    }

    #[test]
    fn next_occurrence_same_day_when_ahead() {
        let tz: Tz = "America/Chicago".parse().unwrap();
        // 06:00 Chicago
        let now = Utc.with_ymd_and_hms(2026, 2, 20, 12, 0, 0).unwrap();
        let fire = next_local_occurrence(9, 30, tz, now).unwrap();
        assert_eq!(fire.to_rfc3339(), "2026-02-20T15:30:00+00:00");
    }
}
