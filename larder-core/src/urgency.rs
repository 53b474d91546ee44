//! Expiry urgency classification.
//!
//! The tier boundaries here are the business rule the rest of the engine
//! hangs off: bucketing, notification cadence and UI grouping all key on the
//! tier. Comparison is at calendar-day granularity; both dates are taken as
//! midnight-truncated `NaiveDate`s so time-of-day can never shift an item
//! across a boundary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::item::InventoryItem;

/// Discrete urgency tiers, most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyTier {
    /// Expired, or expires today.
    Critical,
    /// Expires in 1-2 days.
    Warning,
    /// Expires in 3-7 days.
    Soon,
    /// Expires in 8+ days, or no expiry set.
    Safe,
}

impl UrgencyTier {
    /// Severity-weighted badge number for notification surfaces.
    /// Not a literal unread count.
    pub fn badge_weight(&self) -> u32 {
        match self {
            UrgencyTier::Critical => 3,
            UrgencyTier::Warning => 2,
            UrgencyTier::Soon => 1,
            UrgencyTier::Safe => 0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UrgencyTier::Critical => "critical",
            UrgencyTier::Warning => "warning",
            UrgencyTier::Soon => "soon",
            UrgencyTier::Safe => "safe",
        }
    }
}

/// Presentation constants per tier. Stable so that UI and notification
/// grouping stay consistent; the exact values are display detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierStyle {
    pub color: &'static str,
    pub background: &'static str,
    pub border: &'static str,
}

impl UrgencyTier {
    pub fn style(&self) -> TierStyle {
        match self {
            UrgencyTier::Critical => TierStyle {
                color: "#d32f2f",
                background: "#fdecea",
                border: "#f5c6c2",
            },
            UrgencyTier::Warning => TierStyle {
                color: "#ef6c00",
                background: "#fff3e0",
                border: "#ffd9a8",
            },
            UrgencyTier::Soon => TierStyle {
                color: "#f9a825",
                background: "#fffde7",
                border: "#fff0a6",
            },
            UrgencyTier::Safe => TierStyle {
                color: "#2e7d32",
                background: "#e8f5e9",
                border: "#c3e6c5",
            },
        }
    }
}

/// Derived urgency snapshot for one item at one evaluation instant.
/// Recomputed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrgencyInfo {
    pub tier: UrgencyTier,
    /// Signed days until expiry; negative = past due. `None` when the item
    /// has no expiry date (treated as unbounded).
    pub days_until_expiry: Option<i64>,
    pub description: String,
}

/// Classify an optional expiry date against `today`.
///
/// Boundary table (inclusive):
/// - `< 0`  -> critical ("expired N days ago")
/// - `== 0` -> critical ("expires today")
/// - `1..=2` -> warning
/// - `3..=7` -> soon
/// - `> 7`  -> safe (day count shown up to 30 days out)
pub fn classify(expiry: Option<NaiveDate>, today: NaiveDate) -> UrgencyInfo {
    let expiry = match expiry {
        Some(d) => d,
        None => {
            return UrgencyInfo {
                tier: UrgencyTier::Safe,
                days_until_expiry: None,
                description: "No expiry date set".to_string(),
            };
        }
    };

    let days = (expiry - today).num_days();

    let (tier, description) = if days < 0 {
        let ago = -days;
        let desc = if ago == 1 {
            "Expired 1 day ago".to_string()
        } else {
            format!("Expired {ago} days ago")
        };
        (UrgencyTier::Critical, desc)
    } else if days == 0 {
        (UrgencyTier::Critical, "Expires today".to_string())
    } else if days <= 2 {
        let desc = if days == 1 {
            "Expires tomorrow".to_string()
        } else {
            format!("Expires in {days} days")
        };
        (UrgencyTier::Warning, desc)
    } else if days <= 7 {
        (UrgencyTier::Soon, format!("Expires in {days} days"))
    } else if days <= 30 {
        (UrgencyTier::Safe, format!("Expires in {days} days"))
    } else {
        (UrgencyTier::Safe, "Fresh".to_string())
    };

    UrgencyInfo {
        tier,
        days_until_expiry: Some(days),
        description,
    }
}

/// Classify an item directly. Caller is responsible for filtering out
/// consumed/archived items first (`InventoryItem::is_active`).
pub fn classify_item(item: &InventoryItem, today: NaiveDate) -> UrgencyInfo {
    classify(item.expiry, today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn boundary_table_holds_exactly() {
        let today = day(2026, 8, 4);

        let tier_at = |offset: i64| classify(Some(today + chrono::Duration::days(offset)), today).tier;

        assert_eq!(tier_at(-1), UrgencyTier::Critical);
        assert_eq!(tier_at(0), UrgencyTier::Critical);
        assert_eq!(tier_at(1), UrgencyTier::Warning);
        assert_eq!(tier_at(2), UrgencyTier::Warning);
        assert_eq!(tier_at(3), UrgencyTier::Soon);
        assert_eq!(tier_at(7), UrgencyTier::Soon);
        assert_eq!(tier_at(8), UrgencyTier::Safe);
    }

    #[test]
    fn no_expiry_is_safe_and_unbounded() {
        let info = classify(None, day(2026, 8, 4));
        assert_eq!(info.tier, UrgencyTier::Safe);
        assert_eq!(info.days_until_expiry, None);
        assert!(info.description.contains("No expiry"));
    }

    #[test]
    fn expires_today_description() {
        let today = day(2026, 8, 4);
        let info = classify(Some(today), today);
        assert_eq!(info.tier, UrgencyTier::Critical);
        assert_eq!(info.description, "Expires today");
        assert_eq!(info.days_until_expiry, Some(0));
    }

    #[test]
    fn ten_days_out_mentions_day_count() {
        let today = day(2026, 8, 4);
        let info = classify(Some(day(2026, 8, 14)), today);
        assert_eq!(info.tier, UrgencyTier::Safe);
        assert!(info.description.contains("10 days"));
    }

    #[test]
    fn far_future_is_generic_fresh() {
        let today = day(2026, 8, 4);
        let info = classify(Some(day(2026, 12, 24)), today);
        assert_eq!(info.tier, UrgencyTier::Safe);
        assert_eq!(info.description, "Fresh");
    }

    #[test]
    fn classification_is_deterministic() {
        let today = day(2026, 8, 4);
        let expiry = Some(day(2026, 8, 6));
        assert_eq!(classify(expiry, today), classify(expiry, today));
    }

    #[test]
    fn badge_weights_per_tier() {
        assert_eq!(UrgencyTier::Critical.badge_weight(), 3);
        assert_eq!(UrgencyTier::Warning.badge_weight(), 2);
        assert_eq!(UrgencyTier::Soon.badge_weight(), 1);
        assert_eq!(UrgencyTier::Safe.badge_weight(), 0);
    }
}
