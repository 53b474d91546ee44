//! User-scoped notification settings.
//!
//! Persisted outside this core (config file, app storage). Malformed values
//! fall back to the documented defaults instead of failing a scheduling run.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::time::parse_wall_clock;

/// Delivery cadence preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    Realtime,
    Daily,
    TwiceDaily,
    Custom,
}

/// A wall-clock window during which urgent sends are suppressed.
/// The window may wrap past midnight (e.g. 22:00-07:00).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuietHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl QuietHours {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Parse "22:00-07:00".
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        let (a, b) = s
            .split_once('-')
            .ok_or_else(|| anyhow::anyhow!("invalid quiet hours '{s}': expected HH:MM-HH:MM"))?;
        Ok(Self::new(parse_wall_clock(a)?, parse_wall_clock(b)?))
    }

    /// Modular containment: start == end means an empty window.
    pub fn contains(&self, t: NaiveTime) -> bool {
        if self.start <= self.end {
            self.start <= t && t < self.end
        } else {
            t >= self.start || t < self.end
        }
    }
}

/// Default delivery hours. The source data gives no evidence these were
/// tuned; they are plain defaults the user (or adaptive pattern) overrides.
pub const DEFAULT_WARNING_HOUR: u32 = 10;
pub const DEFAULT_SOON_HOUR: u32 = 9;
pub const DEFAULT_MORNING_HOUR: u32 = 8;
pub const DEFAULT_EVENING_HOUR: u32 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Master switch; when false no notification of any kind is scheduled.
    pub enabled: bool,

    pub critical_alerts: bool,
    pub warning_alerts: bool,
    pub soon_alerts: bool,

    pub meal_suggestions: bool,
    pub morning_digest: bool,
    pub evening_planning: bool,

    pub quiet_hours: Option<QuietHours>,
    pub frequency: Frequency,

    /// Local hour for warning-tier deliveries (adaptive pattern may override).
    pub warning_hour: u32,
    /// Local hour for soon-tier deliveries.
    pub soon_hour: u32,
    /// Local hour for the recurring morning digest.
    pub morning_hour: u32,
    /// Local hour for the recurring evening planning reminder.
    pub evening_hour: u32,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            critical_alerts: true,
            warning_alerts: true,
            soon_alerts: true,
            meal_suggestions: false,
            morning_digest: true,
            evening_planning: false,
            quiet_hours: None,
            frequency: Frequency::Daily,
            warning_hour: DEFAULT_WARNING_HOUR,
            soon_hour: DEFAULT_SOON_HOUR,
            morning_hour: DEFAULT_MORNING_HOUR,
            evening_hour: DEFAULT_EVENING_HOUR,
        }
    }
}

impl NotificationSettings {
    /// Replace out-of-range hour values with the documented defaults.
    /// Never fails; a malformed settings object degrades, it doesn't abort.
    pub fn sanitized(mut self) -> Self {
        if self.warning_hour > 23 {
            self.warning_hour = DEFAULT_WARNING_HOUR;
        }
        if self.soon_hour > 23 {
            self.soon_hour = DEFAULT_SOON_HOUR;
        }
        if self.morning_hour > 23 {
            self.morning_hour = DEFAULT_MORNING_HOUR;
        }
        if self.evening_hour > 23 {
            self.evening_hour = DEFAULT_EVENING_HOUR;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn quiet_hours_plain_window() {
        let qh = QuietHours::new(t(13, 0), t(15, 0));
        assert!(!qh.contains(t(12, 59)));
        assert!(qh.contains(t(13, 0)));
        assert!(qh.contains(t(14, 30)));
        assert!(!qh.contains(t(15, 0)));
    }

    #[test]
    fn quiet_hours_wraps_past_midnight() {
        let qh = QuietHours::new(t(22, 0), t(7, 0));
        assert!(qh.contains(t(23, 30)));
        assert!(qh.contains(t(2, 0)));
        assert!(qh.contains(t(6, 59)));
        assert!(!qh.contains(t(7, 0)));
        assert!(!qh.contains(t(12, 0)));
        assert!(qh.contains(t(22, 0)));
    }

    #[test]
    fn quiet_hours_parse_round_trip() {
        let qh = QuietHours::parse("22:00-07:00").unwrap();
        assert_eq!(qh.start, t(22, 0));
        assert_eq!(qh.end, t(7, 0));
        assert!(QuietHours::parse("bedtime").is_err());
    }

    #[test]
    fn empty_window_contains_nothing() {
        let qh = QuietHours::new(t(9, 0), t(9, 0));
        assert!(!qh.contains(t(9, 0)));
        assert!(!qh.contains(t(12, 0)));
    }

    #[test]
    fn settings_round_trip_through_json() {
        let settings = NotificationSettings {
            quiet_hours: Some(QuietHours::parse("22:00-07:00").unwrap()),
            frequency: Frequency::TwiceDaily,
            meal_suggestions: true,
            ..Default::default()
        };

        let json = serde_json::to_string(&settings).unwrap();
        let back: NotificationSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn sanitize_restores_defaults_for_bad_hours() {
        let settings = NotificationSettings {
            warning_hour: 99,
            soon_hour: 24,
            ..Default::default()
        }
        .sanitized();

        assert_eq!(settings.warning_hour, DEFAULT_WARNING_HOUR);
        assert_eq!(settings.soon_hour, DEFAULT_SOON_HOUR);
    }
}
