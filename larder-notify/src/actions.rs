//! Notification action identifiers and their dispatch surface.
//!
//! The valid action set is a closed enum: the OS hands back a string id, we
//! parse it once at the boundary, and an id outside the set is an explicit
//! miss the scheduler logs and ignores.

use async_trait::async_trait;

use larder_core::content::NotificationCategory;

use crate::notifier::ActionDef;

/// Every action button the app registers, across all categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationAction {
    MarkUsed,
    ExtendExpiry,
    ViewRecipes,
    ViewRecipe,
    Dismiss,
    OpenCalendar,
    ViewExpiring,
}

impl NotificationAction {
    pub const ALL: [NotificationAction; 7] = [
        NotificationAction::MarkUsed,
        NotificationAction::ExtendExpiry,
        NotificationAction::ViewRecipes,
        NotificationAction::ViewRecipe,
        NotificationAction::Dismiss,
        NotificationAction::OpenCalendar,
        NotificationAction::ViewExpiring,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            NotificationAction::MarkUsed => "mark-used",
            NotificationAction::ExtendExpiry => "extend-expiry",
            NotificationAction::ViewRecipes => "view-recipes",
            NotificationAction::ViewRecipe => "view-recipe",
            NotificationAction::Dismiss => "dismiss",
            NotificationAction::OpenCalendar => "open-calendar",
            NotificationAction::ViewExpiring => "view-expiring",
        }
    }

    pub fn from_id(id: &str) -> Option<NotificationAction> {
        Self::ALL.iter().copied().find(|a| a.id() == id)
    }

    pub fn title(&self) -> &'static str {
        match self {
            NotificationAction::MarkUsed => "Mark used",
            NotificationAction::ExtendExpiry => "Extend expiry",
            NotificationAction::ViewRecipes => "View recipes",
            NotificationAction::ViewRecipe => "View recipe",
            NotificationAction::Dismiss => "Dismiss",
            NotificationAction::OpenCalendar => "Open calendar",
            NotificationAction::ViewExpiring => "View expiring",
        }
    }

    fn def(&self) -> ActionDef {
        ActionDef {
            id: self.id().to_string(),
            title: self.title().to_string(),
            destructive: matches!(self, NotificationAction::MarkUsed),
        }
    }
}

/// Action buttons registered per notification category.
pub fn actions_for(category: NotificationCategory) -> Vec<ActionDef> {
    let actions: &[NotificationAction] = match category {
        NotificationCategory::ExpiryCritical
        | NotificationCategory::ExpiryWarning
        | NotificationCategory::ExpirySoon => &[
            NotificationAction::MarkUsed,
            NotificationAction::ExtendExpiry,
            NotificationAction::ViewRecipes,
        ],
        NotificationCategory::MealSuggestion => {
            &[NotificationAction::ViewRecipe, NotificationAction::Dismiss]
        }
        NotificationCategory::MorningDigest | NotificationCategory::EveningPlanning => &[
            NotificationAction::OpenCalendar,
            NotificationAction::ViewExpiring,
        ],
    };

    actions.iter().map(|a| a.def()).collect()
}

/// Mutation surface of the (out-of-scope) inventory data source, as used by
/// action handlers.
#[async_trait]
pub trait InventoryStore: Send {
    async fn update_quantity(&mut self, item_id: &str, quantity: f64) -> anyhow::Result<()>;
    async fn mark_used(&mut self, item_id: &str) -> anyhow::Result<()>;
    async fn extend_expiry(&mut self, item_id: &str, days: i64) -> anyhow::Result<()>;
    async fn delete(&mut self, item_id: &str) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for action in NotificationAction::ALL {
            assert_eq!(NotificationAction::from_id(action.id()), Some(action));
        }
        assert_eq!(NotificationAction::from_id("snooze-forever"), None);
    }

    #[test]
    fn expiry_categories_offer_mark_used() {
        let defs = actions_for(NotificationCategory::ExpiryCritical);
        assert!(defs.iter().any(|d| d.id == "mark-used"));
        assert!(defs.iter().any(|d| d.id == "view-recipes"));
    }

    #[test]
    fn meal_category_offers_dismiss() {
        let defs = actions_for(NotificationCategory::MealSuggestion);
        assert_eq!(defs.len(), 2);
        assert!(defs.iter().any(|d| d.id == "dismiss"));
    }
}
