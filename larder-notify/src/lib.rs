//! larder-notify: the notification scheduling service.
//!
//! Consumes classified inventory snapshots plus user settings and turns
//! them into schedule calls against an abstract OS notification surface.
//! Fails soft everywhere: a denied permission or a rejected call degrades
//! to skipped notifications, never to an error at the public boundary.

pub mod actions;
pub mod meals;
pub mod notifier;
pub mod scheduler;
pub mod testing;

pub use actions::{actions_for, InventoryStore, NotificationAction};
pub use meals::{build_meal_notification, BasicMealPlanner, MealPlanner, MealSlot, MealSuggestion};
pub use notifier::{ActionDef, NotificationRequest, Notifier, NotifyError, Trigger};
pub use scheduler::{NotificationScheduler, ScheduleOutcome};
