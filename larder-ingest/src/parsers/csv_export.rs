//! Parse the mobile app's CSV inventory export into typed rows.
//!
//! Exports carry a preamble (export timestamp, app version) before the
//! header, then:
//! Id,Name,Quantity,Location,Category,Expiry,Added,Status
//!
//! Quantity is a compound field like "2 pcs" or "0.5 l"; the unit part is
//! optional. Date columns are YYYY-MM-DD and may be blank.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::io::Read;
use std::path::Path;

use crate::types::{ExportRow, ExportStatus};

fn parse_date_opt(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn opt(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() { None } else { Some(s.to_string()) }
}

/// Parse a compound quantity like "2 pcs", "0.5 l" or "3".
/// Returns (quantity, unit); malformed values degrade to quantity 1.
fn parse_quantity(re: &Regex, s: &str) -> (f64, Option<String>) {
    match re.captures(s.trim()) {
        Some(caps) => {
            let qty: f64 = caps["qty"].replace(',', ".").parse().unwrap_or(1.0);
            let unit = caps.name("unit").map(|m| m.as_str().trim().to_string());
            (qty.max(0.0), unit.filter(|u| !u.is_empty()))
        }
        None => (1.0, None),
    }
}

/// Parse an inventory CSV export from a reader, returning all valid rows.
/// Skips the preamble and header automatically; rows missing a name are
/// dropped.
pub fn parse_inventory_reader<R: Read>(reader: R) -> Result<Vec<ExportRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(reader);

    let qty_re = Regex::new(r"^(?P<qty>\d+(?:[.,]\d+)?)\s*(?P<unit>\S.*)?$")?;

    let mut rows = Vec::new();
    let mut header_found = false;

    for result in rdr.records() {
        let record = result?;

        if !header_found {
            let looks_like_header = record.len() >= 2
                && record.get(0).is_some_and(|c| c.trim().eq_ignore_ascii_case("id"))
                && record.get(1).is_some_and(|c| c.trim().eq_ignore_ascii_case("name"));
            if looks_like_header {
                header_found = true;
            }
            continue;
        }

        let get = |i: usize| record.get(i).unwrap_or("");

        let name = get(1).trim().to_string();
        if name.is_empty() {
            continue;
        }

        let (quantity, unit) = parse_quantity(&qty_re, get(2));

        rows.push(ExportRow {
            id: opt(get(0)),
            name,
            quantity,
            unit,
            location: opt(get(3)),
            category: opt(get(4)),
            expiry: parse_date_opt(get(5)),
            added: parse_date_opt(get(6)),
            status: ExportStatus::parse(get(7)),
        });
    }

    if !header_found {
        anyhow::bail!("no inventory header row found (expected Id,Name,Quantity,...)");
    }

    Ok(rows)
}

/// Parse an inventory CSV export file.
pub fn parse_inventory_csv(path: impl AsRef<Path>) -> Result<Vec<ExportRow>> {
    let file = std::fs::File::open(path.as_ref())
        .with_context(|| format!("opening {}", path.as_ref().display()))?;
    parse_inventory_reader(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Larder export,2026-08-01T09:00:00Z
App version,2.4.1

Id,Name,Quantity,Location,Category,Expiry,Added,Status
a1,Milk,1 l,fridge,Dairy,2026-08-04,2026-07-28,active
a2,Eggs,6 pcs,fridge,,2026-08-10,2026-07-30,active
a3,Old Bread,0.5 loaf,shelf,Bakery,2026-07-20,2026-07-15,consumed
a4,Salt,1,pantry,Staples,,,active
";

    #[test]
    fn parses_rows_after_preamble() {
        let rows = parse_inventory_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(rows.len(), 4);

        assert_eq!(rows[0].id.as_deref(), Some("a1"));
        assert_eq!(rows[0].name, "Milk");
        assert_eq!(rows[0].quantity, 1.0);
        assert_eq!(rows[0].unit.as_deref(), Some("l"));
        assert_eq!(
            rows[0].expiry,
            Some(NaiveDate::from_ymd_opt(2026, 8, 4).unwrap())
        );
        assert_eq!(rows[0].status, ExportStatus::Active);
    }

    #[test]
    fn compound_quantity_variants() {
        let rows = parse_inventory_reader(SAMPLE.as_bytes()).unwrap();

        assert_eq!(rows[1].quantity, 6.0);
        assert_eq!(rows[1].unit.as_deref(), Some("pcs"));

        assert_eq!(rows[2].quantity, 0.5);
        assert_eq!(rows[2].unit.as_deref(), Some("loaf"));

        assert_eq!(rows[3].quantity, 1.0);
        assert_eq!(rows[3].unit, None);
    }

    #[test]
    fn blank_columns_become_none() {
        let rows = parse_inventory_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(rows[1].category, None);
        assert_eq!(rows[3].expiry, None);
        assert_eq!(rows[3].added, None);
    }

    #[test]
    fn consumed_status_is_kept_not_dropped() {
        let rows = parse_inventory_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(rows[2].status, ExportStatus::Consumed);
    }

    #[test]
    fn missing_header_is_an_error() {
        let err = parse_inventory_reader("just,some,random\nrows,here,now\n".as_bytes());
        assert!(err.is_err());
    }
}
