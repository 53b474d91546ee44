//! Meal suggestion seam and a basic deterministic planner.
//!
//! The real suggestion engine lives outside this crate; the scheduler only
//! needs "best suggestion for a meal slot". `BasicMealPlanner` ranks by
//! urgency so the soonest-expiring items get cooked first.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use larder_core::content::{NotificationCategory, NotificationContent, NotificationData};
use larder_core::item::InventoryItem;

/// The three daily meal notification slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Morning,
    Midday,
    Evening,
}

impl MealSlot {
    pub const ALL: [MealSlot; 3] = [MealSlot::Morning, MealSlot::Midday, MealSlot::Evening];

    /// Local delivery hour for this slot.
    pub fn hour(&self) -> u32 {
        match self {
            MealSlot::Morning => 8,
            MealSlot::Midday => 12,
            MealSlot::Evening => 18,
        }
    }

    pub fn meal_name(&self) -> &'static str {
        match self {
            MealSlot::Morning => "breakfast",
            MealSlot::Midday => "lunch",
            MealSlot::Evening => "dinner",
        }
    }
}

/// A suggested meal referencing concrete inventory items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealSuggestion {
    pub title: String,
    pub item_ids: Vec<String>,
    pub item_names: Vec<String>,
}

/// Meal-suggestion generator seam (external collaborator).
pub trait MealPlanner: Send {
    fn suggest_meals(&self, items: &[InventoryItem], max: usize) -> Vec<MealSuggestion>;

    fn best_for_slot(
        &self,
        items: &[InventoryItem],
        slot: MealSlot,
        today: NaiveDate,
    ) -> Option<MealSuggestion>;
}

/// Deterministic fallback planner: bundle the most urgent active items with
/// an expiry into one use-it-up suggestion per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicMealPlanner;

impl BasicMealPlanner {
    /// Active items with an expiry, soonest first; name tie-break for
    /// deterministic output.
    fn ranked<'a>(items: &'a [InventoryItem]) -> Vec<&'a InventoryItem> {
        let mut ranked: Vec<&InventoryItem> = items
            .iter()
            .filter(|i| i.is_active() && i.expiry.is_some())
            .collect();
        ranked.sort_by(|a, b| a.expiry.cmp(&b.expiry).then_with(|| a.name.cmp(&b.name)));
        ranked
    }

    fn bundle(picked: &[&InventoryItem], meal_name: &str) -> MealSuggestion {
        let names: Vec<String> = picked.iter().map(|i| i.name.clone()).collect();
        MealSuggestion {
            title: format!("Use-it-up {}: {}", meal_name, names.join(", ")),
            item_ids: picked.iter().map(|i| i.id.clone()).collect(),
            item_names: names,
        }
    }
}

impl MealPlanner for BasicMealPlanner {
    fn suggest_meals(&self, items: &[InventoryItem], max: usize) -> Vec<MealSuggestion> {
        let ranked = Self::ranked(items);
        ranked
            .chunks(3)
            .take(max)
            .map(|chunk| Self::bundle(chunk, "meal"))
            .collect()
    }

    fn best_for_slot(
        &self,
        items: &[InventoryItem],
        slot: MealSlot,
        today: NaiveDate,
    ) -> Option<MealSuggestion> {
        let ranked = Self::ranked(items);

        // Only suggest when something actually needs using within a week;
        // a fridge full of long-dated items gets no meal nags.
        let usable: Vec<&InventoryItem> = ranked
            .into_iter()
            .filter(|i| match i.expiry {
                Some(e) => (0..=7).contains(&(e - today).num_days()),
                None => false,
            })
            .take(3)
            .collect();

        if usable.is_empty() {
            return None;
        }

        Some(Self::bundle(&usable, slot.meal_name()))
    }
}

/// Compose the notification for one slot's suggestion.
pub fn build_meal_notification(slot: MealSlot, suggestion: &MealSuggestion) -> NotificationContent {
    NotificationContent {
        title: format!("\u{1F37D}\u{FE0F} {} idea", capitalize(slot.meal_name())),
        body: format!(
            "{} — uses {}.",
            suggestion.title,
            suggestion.item_names.join(", ")
        ),
        category: NotificationCategory::MealSuggestion,
        data: NotificationData {
            item_id: suggestion.item_ids.first().cloned(),
            count: Some(suggestion.item_ids.len()),
            ..Default::default()
        },
        badge: 0,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item(id: &str, name: &str, expiry: NaiveDate) -> InventoryItem {
        InventoryItem::new(id, name, Utc::now()).with_expiry(expiry)
    }

    #[test]
    fn best_for_slot_prefers_soonest_expiry() {
        let today = day(2026, 8, 4);
        let items = vec![
            item("i1", "Cheese", day(2026, 8, 9)),
            item("i2", "Milk", day(2026, 8, 4)),
            item("i3", "Yogurt", day(2026, 8, 5)),
        ];

        let s = BasicMealPlanner
            .best_for_slot(&items, MealSlot::Evening, today)
            .unwrap();
        assert_eq!(s.item_names[0], "Milk");
        assert!(s.title.contains("dinner"));
    }

    #[test]
    fn long_dated_inventory_yields_no_suggestion() {
        let today = day(2026, 8, 4);
        let items = vec![item("i1", "Canned Beans", day(2027, 1, 1))];
        assert!(
            BasicMealPlanner
                .best_for_slot(&items, MealSlot::Midday, today)
                .is_none()
        );
    }

    #[test]
    fn expired_items_are_not_suggested() {
        let today = day(2026, 8, 4);
        let items = vec![item("i1", "Sour Milk", day(2026, 8, 1))];
        assert!(
            BasicMealPlanner
                .best_for_slot(&items, MealSlot::Morning, today)
                .is_none()
        );
    }

    #[test]
    fn suggest_meals_respects_max() {
        let today = day(2026, 8, 5);
        let items: Vec<InventoryItem> = (0..12)
            .map(|i| item(&format!("i{i}"), &format!("Item{i:02}"), today))
            .collect();

        let meals = BasicMealPlanner.suggest_meals(&items, 2);
        assert_eq!(meals.len(), 2);
        assert_eq!(meals[0].item_ids.len(), 3);
    }
}
