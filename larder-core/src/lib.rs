//! larder-core: pure domain logic for the Larder food-inventory engine.
//!
//! Everything in this crate is side-effect free and safe to re-evaluate at
//! any frequency: urgency classification, waste bucketing and notification
//! content are recomputed fresh from item snapshots on every call.

pub mod content;
pub mod item;
pub mod pattern;
pub mod settings;
pub mod time;
pub mod urgency;
pub mod waste;

pub use content::{
    build_evening_planning, build_expiry_notification, build_morning_digest, NotificationCategory,
    NotificationContent, NotificationData,
};
pub use item::{InventoryItem, StorageLocation};
pub use pattern::UserNotificationPattern;
pub use settings::{Frequency, NotificationSettings, QuietHours};
pub use time::{local_today, next_local_occurrence, parse_entry_date};
pub use urgency::{classify, classify_item, UrgencyInfo, UrgencyTier};
pub use waste::{
    bucketize_waste, change_percent, group_wasted_by_name, Bucket, Granularity, ItemFilters,
    PeriodRange, WasteGroup,
};
