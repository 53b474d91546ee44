//! Load inventory export rows and lift them into engine items.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use std::path::Path;

use larder_core::item::{InventoryItem, StorageLocation};
use larder_ingest::{parse_inventory_csv, ExportRow, ExportStatus};

fn to_item(row: ExportRow, index: usize, fallback_added: DateTime<Utc>) -> InventoryItem {
    let added_at_utc = row
        .added
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
        .unwrap_or(fallback_added);

    let location = match row.location.as_deref() {
        Some(l) => l.parse().unwrap_or_else(|e: String| {
            tracing::warn!(item = %row.name, "{e}; defaulting to pantry");
            StorageLocation::Pantry
        }),
        None => StorageLocation::Pantry,
    };

    InventoryItem {
        id: row.id.unwrap_or_else(|| format!("row-{index:04}")),
        name: row.name,
        quantity: row.quantity,
        unit: row.unit,
        category: row.category,
        location,
        expiry: row.expiry,
        added_at_utc,
        archived: row.status == ExportStatus::Archived,
        consumed: row.status == ExportStatus::Consumed,
    }
}

/// Parse an inventory CSV export into engine items.
pub fn load_items(path: &Path) -> Result<Vec<InventoryItem>> {
    if !path.exists() {
        bail!("inventory export not found: {} (pass --csv <path>)", path.display());
    }

    let rows = parse_inventory_csv(path).with_context(|| format!("parsing {}", path.display()))?;
    let now = Utc::now();

    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| to_item(row, i, now))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn row_conversion_maps_status_and_location() {
        let row = ExportRow {
            id: None,
            name: "Milk".to_string(),
            quantity: 1.0,
            unit: Some("l".to_string()),
            location: Some("fridge".to_string()),
            category: Some("Dairy".to_string()),
            expiry: NaiveDate::from_ymd_opt(2026, 8, 4),
            added: NaiveDate::from_ymd_opt(2026, 7, 28),
            status: ExportStatus::Consumed,
        };

        let item = to_item(row, 7, Utc::now());
        assert_eq!(item.id, "row-0007");
        assert_eq!(item.location, StorageLocation::Fridge);
        assert!(item.consumed);
        assert!(!item.archived);
        assert!(!item.is_active());
    }
}
