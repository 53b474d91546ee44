//! Inventory item model.
//!
//! Items are owned by the app's persistence layer; this crate receives them
//! as snapshots and only classifies/aggregates. Quantity edits, consume and
//! archive transitions all happen upstream.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Where an item physically lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageLocation {
    Fridge,
    Shelf,
    Freezer,
    Pantry,
}

impl StorageLocation {
    pub fn label(&self) -> &'static str {
        match self {
            StorageLocation::Fridge => "fridge",
            StorageLocation::Shelf => "shelf",
            StorageLocation::Freezer => "freezer",
            StorageLocation::Pantry => "pantry",
        }
    }
}

impl std::str::FromStr for StorageLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fridge" => Ok(StorageLocation::Fridge),
            "shelf" => Ok(StorageLocation::Shelf),
            "freezer" => Ok(StorageLocation::Freezer),
            "pantry" => Ok(StorageLocation::Pantry),
            other => Err(format!("unknown storage location: {other}")),
        }
    }
}

/// One physical entry of a food item in storage.
///
/// Items are never hard-deleted by the app; they are consumed or archived so
/// waste history stays queryable. Either flag removes the item from urgency
/// and notification consideration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,

    /// Never negative.
    pub quantity: f64,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub location: StorageLocation,

    /// Calendar date only; `None` means no expiry is tracked for this item.
    pub expiry: Option<NaiveDate>,

    pub added_at_utc: DateTime<Utc>,

    pub archived: bool,
    pub consumed: bool,
}

impl InventoryItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, added_at_utc: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity: 1.0,
            unit: None,
            category: None,
            location: StorageLocation::Fridge,
            expiry: None,
            added_at_utc,
            archived: false,
            consumed: false,
        }
    }

    pub fn with_expiry(mut self, expiry: NaiveDate) -> Self {
        self.expiry = Some(expiry);
        self
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = quantity.max(0.0);
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_location(mut self, location: StorageLocation) -> Self {
        self.location = location;
        self
    }

    /// Consumed or archived items are invisible to urgency, waste and
    /// notification paths.
    pub fn is_active(&self) -> bool {
        !self.archived && !self.consumed
    }

    /// "2 pcs" / "0.5 l" / "3" depending on whether a unit is set.
    pub fn quantity_label(&self) -> String {
        match &self.unit {
            Some(u) => format!("{} {}", trim_float(self.quantity), u),
            None => trim_float(self.quantity),
        }
    }
}

fn trim_float(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}
