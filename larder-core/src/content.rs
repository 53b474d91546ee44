//! Notification content builders.
//!
//! Pure composition of title/body/category/payload from items and their
//! urgency. Nothing here schedules or persists; the scheduler in
//! `larder-notify` decides when (and whether) any of this fires.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::item::InventoryItem;
use crate::urgency::{UrgencyInfo, UrgencyTier};

/// Routing tag attached to every notification so the OS surface can offer
/// category-appropriate action buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationCategory {
    ExpiryCritical,
    ExpiryWarning,
    ExpirySoon,
    MealSuggestion,
    MorningDigest,
    EveningPlanning,
}

impl NotificationCategory {
    pub const ALL: [NotificationCategory; 6] = [
        NotificationCategory::ExpiryCritical,
        NotificationCategory::ExpiryWarning,
        NotificationCategory::ExpirySoon,
        NotificationCategory::MealSuggestion,
        NotificationCategory::MorningDigest,
        NotificationCategory::EveningPlanning,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            NotificationCategory::ExpiryCritical => "expiry-critical",
            NotificationCategory::ExpiryWarning => "expiry-warning",
            NotificationCategory::ExpirySoon => "expiry-soon",
            NotificationCategory::MealSuggestion => "meal-suggestion",
            NotificationCategory::MorningDigest => "morning-digest",
            NotificationCategory::EveningPlanning => "evening-planning",
        }
    }

    pub fn for_tier(tier: UrgencyTier) -> Option<NotificationCategory> {
        match tier {
            UrgencyTier::Critical => Some(NotificationCategory::ExpiryCritical),
            UrgencyTier::Warning => Some(NotificationCategory::ExpiryWarning),
            UrgencyTier::Soon => Some(NotificationCategory::ExpirySoon),
            UrgencyTier::Safe => None,
        }
    }
}

/// Structured payload carried with a notification and echoed back by the OS
/// when the user taps an action button.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationData {
    pub item_id: Option<String>,
    pub item_name: Option<String>,
    pub tier: Option<UrgencyTier>,
    pub count: Option<usize>,
    /// Stamped at delivery by the notifier backend; used to derive response
    /// time when an action comes back.
    pub sent_at_utc: Option<DateTime<Utc>>,
}

/// A fully composed notification, ready to hand to a scheduling backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    pub category: NotificationCategory,
    pub data: NotificationData,
    /// Severity-weighted badge number, not an unread count.
    pub badge: u32,
}

fn tier_emoji(tier: UrgencyTier) -> &'static str {
    match tier {
        UrgencyTier::Critical => "\u{1F6A8}", // 🚨
        UrgencyTier::Warning => "\u{26A0}\u{FE0F}", // ⚠️
        UrgencyTier::Soon => "\u{23F0}",      // ⏰
        UrgencyTier::Safe => "\u{2705}",      // ✅
    }
}

fn tier_phrase(tier: UrgencyTier) -> &'static str {
    match tier {
        UrgencyTier::Critical => "needs attention now",
        UrgencyTier::Warning => "expires soon",
        UrgencyTier::Soon => "is coming up",
        UrgencyTier::Safe => "is fresh",
    }
}

/// Compose an expiry notification for one classified item.
pub fn build_expiry_notification(item: &InventoryItem, info: &UrgencyInfo) -> NotificationContent {
    let category =
        NotificationCategory::for_tier(info.tier).unwrap_or(NotificationCategory::ExpirySoon);

    NotificationContent {
        title: format!("{} {} {}", tier_emoji(info.tier), item.name, tier_phrase(info.tier)),
        body: format!(
            "{} in the {}. {}.",
            item.quantity_label(),
            item.location.label(),
            info.description.trim_end_matches('.'),
        ),
        category,
        data: NotificationData {
            item_id: Some(item.id.clone()),
            item_name: Some(item.name.clone()),
            tier: Some(info.tier),
            count: None,
            sent_at_utc: None,
        },
        badge: info.tier.badge_weight(),
    }
}

/// Morning digest: counts of items needing attention today.
pub fn build_morning_digest(critical: usize, warning: usize) -> NotificationContent {
    let body = match (critical, warning) {
        (c, 0) => format!("{c} item(s) expire today or are already past due."),
        (0, w) => format!("{w} item(s) expire within the next 2 days."),
        (c, w) => format!(
            "{c} item(s) expire today or are past due, {w} more within 2 days."
        ),
    };

    NotificationContent {
        title: "\u{2600}\u{FE0F} Morning fridge check".to_string(),
        body,
        category: NotificationCategory::MorningDigest,
        data: NotificationData {
            count: Some(critical + warning),
            ..Default::default()
        },
        badge: (critical + warning).min(3) as u32,
    }
}

/// Evening planning reminder: how many items expire tomorrow.
pub fn build_evening_planning(tomorrow: usize) -> NotificationContent {
    NotificationContent {
        title: "\u{1F319} Plan tomorrow's meals".to_string(),
        body: format!("{tomorrow} item(s) expire tomorrow. Plan them into a meal tonight."),
        category: NotificationCategory::EveningPlanning,
        data: NotificationData {
            count: Some(tomorrow),
            ..Default::default()
        },
        badge: 1,
    }
}
