//! Abstract OS notification facility.
//!
//! The engine never talks to a platform notification API directly; it goes
//! through this trait so the scheduler is testable and the platform binding
//! (APNs-backed, console, recording mock) is swappable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use larder_core::content::{NotificationCategory, NotificationContent};

/// Failure taxonomy for the notification boundary. None of these cross the
/// scheduler's public surface; the scheduler logs and degrades.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification permission denied")]
    PermissionDenied,

    #[error("scheduling failed: {0}")]
    Scheduling(String),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("unknown action id: {0}")]
    UnknownAction(String),
}

/// When a scheduled notification should fire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Trigger {
    /// Deliver as soon as possible.
    Immediate,
    /// Fire once at an absolute instant.
    At(DateTime<Utc>),
    /// Fire once after a delay.
    AfterSeconds(i64),
    /// Repeat every day at a local wall-clock time.
    Daily { hour: u32, minute: u32 },
}

/// One action button offered on a notification category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDef {
    pub id: String,
    pub title: String,
    pub destructive: bool,
}

/// A composed notification plus its fire policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub content: NotificationContent,
    pub trigger: Trigger,
}

/// The OS-level notification surface, abstracted.
///
/// All calls are fire-and-forget from the scheduler's point of view: a run
/// awaits each call for ordering, never for delivery confirmation.
#[async_trait]
pub trait Notifier: Send {
    /// Ask the user for notification permission. `Ok(false)` is a normal
    /// outcome, not an error.
    async fn request_permission(&mut self) -> Result<bool, NotifyError>;

    /// Register a category and its action buttons with the OS surface.
    async fn register_category(
        &mut self,
        category: NotificationCategory,
        actions: Vec<ActionDef>,
    ) -> Result<(), NotifyError>;

    /// Schedule one notification.
    async fn schedule(&mut self, request: NotificationRequest) -> Result<(), NotifyError>;

    /// Cancel everything previously scheduled by this app.
    async fn cancel_all(&mut self) -> Result<(), NotifyError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_core::content::NotificationData;

    // Requests cross a serialization boundary on real platform backends;
    // triggers have to survive the trip intact.
    #[test]
    fn request_round_trips_through_json() {
        let request = NotificationRequest {
            content: NotificationContent {
                title: "\u{1F6A8} Milk needs attention now".to_string(),
                body: "1 l in the fridge. Expires today.".to_string(),
                category: NotificationCategory::ExpiryCritical,
                data: NotificationData {
                    item_id: Some("i1".to_string()),
                    ..Default::default()
                },
                badge: 3,
            },
            trigger: Trigger::Daily { hour: 8, minute: 30 },
        };

        let json = serde_json::to_string(&request).unwrap();
        let back: NotificationRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);

        let immediate = serde_json::to_string(&Trigger::Immediate).unwrap();
        assert_eq!(
            serde_json::from_str::<Trigger>(&immediate).unwrap(),
            Trigger::Immediate
        );
    }
}
