//! Waste reporting pipeline: filter items, detect waste, aggregate into
//! calendar buckets for charts.
//!
//! Everything here is pure and recomputed per render. All comparisons use
//! midnight-truncated calendar dates, so same-day items can't land in
//! adjacent buckets.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::item::{InventoryItem, StorageLocation};

/// Reporting period granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Week,
    Month,
    Year,
}

/// Half-open date interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodRange {
    pub fn contains(&self, d: NaiveDate) -> bool {
        self.start <= d && d < self.end
    }
}

/// One chart slice with its wasted-item count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub count: usize,
}

impl Bucket {
    fn contains(&self, d: NaiveDate) -> bool {
        self.start <= d && d < self.end
    }
}

/// Optional report filters. Absent fields are pass-through; values are
/// normalized (trimmed, lowercased) before matching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemFilters {
    pub location: Option<StorageLocation>,
    pub search: Option<String>,
    pub categories: Option<Vec<String>>,
}

impl ItemFilters {
    pub fn matches(&self, item: &InventoryItem) -> bool {
        if let Some(loc) = self.location {
            if item.location != loc {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let needle = search.trim().to_lowercase();
            if !needle.is_empty() && !item.name.to_lowercase().contains(&needle) {
                return false;
            }
        }

        if let Some(allowed) = &self.categories {
            if !allowed.is_empty() {
                let category = match &item.category {
                    Some(c) => c.trim().to_lowercase(),
                    None => return false,
                };
                if !allowed.iter().any(|a| a.trim().to_lowercase() == category) {
                    return false;
                }
            }
        }

        true
    }
}

/// True iff the item's expiry date is strictly before today and the item is
/// still active. Items with no expiry date are never wasted.
pub fn is_wasted(item: &InventoryItem, today: NaiveDate) -> bool {
    match item.expiry {
        Some(expiry) => item.is_active() && expiry < today,
        None => false,
    }
}

pub fn apply_filters<'a>(items: &'a [InventoryItem], filters: &ItemFilters) -> Vec<&'a InventoryItem> {
    items.iter().filter(|i| filters.matches(i)).collect()
}

/// The current period containing `today`, half-open.
///
/// - week: Monday of the ISO week through next Monday
/// - month: first of the month through first of next month
/// - year: Jan 1 through next Jan 1
pub fn period_range(granularity: Granularity, today: NaiveDate) -> PeriodRange {
    match granularity {
        Granularity::Week => {
            let start = today - Duration::days(today.weekday().num_days_from_monday() as i64);
            PeriodRange {
                start,
                end: start + Duration::days(7),
            }
        }
        Granularity::Month => {
            let start = first_of_month(today.year(), today.month());
            PeriodRange {
                start,
                end: first_of_next_month(today.year(), today.month()),
            }
        }
        Granularity::Year => PeriodRange {
            start: NaiveDate::from_ymd_opt(today.year(), 1, 1).expect("jan 1 exists"),
            end: NaiveDate::from_ymd_opt(today.year() + 1, 1, 1).expect("jan 1 exists"),
        },
    }
}

/// The period immediately preceding `range` at the same granularity.
pub fn previous_range(range: &PeriodRange, granularity: Granularity) -> PeriodRange {
    match granularity {
        Granularity::Week => PeriodRange {
            start: range.start - Duration::days(7),
            end: range.start,
        },
        Granularity::Month => {
            let (y, m) = previous_month(range.start.year(), range.start.month());
            PeriodRange {
                start: first_of_month(y, m),
                end: range.start,
            }
        }
        Granularity::Year => PeriodRange {
            start: NaiveDate::from_ymd_opt(range.start.year() - 1, 1, 1).expect("jan 1 exists"),
            end: range.start,
        },
    }
}

/// Zero-count buckets subdividing the current period: one per day for
/// week/month, one per month for year.
pub fn buckets(granularity: Granularity, today: NaiveDate) -> Vec<Bucket> {
    let range = period_range(granularity, today);
    let mut out = Vec::new();

    match granularity {
        Granularity::Week => {
            let mut day = range.start;
            while day < range.end {
                out.push(Bucket {
                    label: day.format("%a").to_string(),
                    start: day,
                    end: day + Duration::days(1),
                    count: 0,
                });
                day = day + Duration::days(1);
            }
        }
        Granularity::Month => {
            let mut day = range.start;
            while day < range.end {
                out.push(Bucket {
                    label: day.day().to_string(),
                    start: day,
                    end: day + Duration::days(1),
                    count: 0,
                });
                day = day + Duration::days(1);
            }
        }
        Granularity::Year => {
            for m in 1..=12u32 {
                let start = first_of_month(today.year(), m);
                out.push(Bucket {
                    label: start.format("%b").to_string(),
                    start,
                    end: first_of_next_month(today.year(), m),
                    count: 0,
                });
            }
        }
    }

    out
}

/// Apply filters, keep wasted items whose expiry falls inside the current
/// period, and increment exactly one bucket per item.
pub fn bucketize_waste(
    items: &[InventoryItem],
    granularity: Granularity,
    filters: &ItemFilters,
    today: NaiveDate,
) -> Vec<Bucket> {
    let range = period_range(granularity, today);
    let mut out = buckets(granularity, today);

    for item in apply_filters(items, filters) {
        if !is_wasted(item, today) {
            continue;
        }
        let Some(expiry) = item.expiry else { continue };
        if !range.contains(expiry) {
            continue;
        }
        if let Some(bucket) = out.iter_mut().find(|b| b.contains(expiry)) {
            bucket.count += 1;
        }
    }

    out
}

/// Wasted quantity aggregated by (trimmed) item name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteGroup {
    pub name: String,
    pub total_quantity: f64,
    pub occurrences: usize,
    pub item_ids: Vec<String>,
}

/// Group wasted items by name over an arbitrary caller-supplied range.
/// Sorted by total quantity desc, then occurrences desc, then name asc.
pub fn group_wasted_by_name(
    items: &[InventoryItem],
    range: &PeriodRange,
    filters: &ItemFilters,
    today: NaiveDate,
) -> Vec<WasteGroup> {
    let mut groups: Vec<WasteGroup> = Vec::new();

    for item in apply_filters(items, filters) {
        if !is_wasted(item, today) {
            continue;
        }
        let Some(expiry) = item.expiry else { continue };
        if !range.contains(expiry) {
            continue;
        }

        let name = item.name.trim().to_string();
        let quantity = item.quantity.max(0.0);

        match groups.iter_mut().find(|g| g.name == name) {
            Some(g) => {
                g.total_quantity += quantity;
                g.occurrences += 1;
                g.item_ids.push(item.id.clone());
            }
            None => groups.push(WasteGroup {
                name,
                total_quantity: quantity,
                occurrences: 1,
                item_ids: vec![item.id.clone()],
            }),
        }
    }

    groups.sort_by(|a, b| {
        b.total_quantity
            .total_cmp(&a.total_quantity)
            .then_with(|| b.occurrences.cmp(&a.occurrences))
            .then_with(|| a.name.cmp(&b.name))
    });

    groups
}

/// Percentage change of `current` relative to `previous`, with the
/// denominator floored at 1 so an empty previous period never divides by
/// zero. Rounded to the nearest integer; may be negative.
pub fn change_percent(current: f64, previous: f64) -> i64 {
    let denominator = previous.max(1.0);
    (((current - previous) / denominator) * 100.0).round() as i64
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("first of month exists")
}

fn first_of_next_month(year: i32, month: u32) -> NaiveDate {
    if month == 12 {
        first_of_month(year + 1, 1)
    } else {
        first_of_month(year, month + 1)
    }
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}
