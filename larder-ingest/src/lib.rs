//! larder-ingest: inventory export parsing (CSV) into normalized rows.
//!
//! Standalone by design: this crate knows about export file shapes, not
//! about the engine's domain types. Conversion into `larder-core` items
//! happens at the consumer.

pub mod parsers;
pub mod types;

pub use parsers::csv_export::parse_inventory_csv;
pub use types::{ExportRow, ExportStatus};
