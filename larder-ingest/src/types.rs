//! Normalized output of inventory export parsers (app-version agnostic).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Row lifecycle state as written by the app's export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportStatus {
    Active,
    Consumed,
    Archived,
}

impl ExportStatus {
    /// Unknown status strings degrade to `Active` rather than dropping the
    /// row; exports from older app versions leave the column blank.
    pub fn parse(s: &str) -> ExportStatus {
        match s.trim().to_lowercase().as_str() {
            "consumed" | "used" => ExportStatus::Consumed,
            "archived" | "deleted" => ExportStatus::Archived,
            _ => ExportStatus::Active,
        }
    }
}

/// One normalized inventory row parsed from an export file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    /// Missing in older exports; consumers assign a positional id.
    pub id: Option<String>,
    pub name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub expiry: Option<NaiveDate>,
    pub added: Option<NaiveDate>,
    pub status: ExportStatus,
}
