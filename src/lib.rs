//! pdp-feed - storefront product-feed exporter
//!
//! Scrapes product detail pages from a single e-commerce storefront,
//! recovers the embedded script data block by pattern matching, and writes
//! the records as a semicolon-delimited feed file for the TSUM catalog
//! importer.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export the main entry points for library consumers
pub use application::export::{ExportReport, FeedExporter, read_links};
pub use domain::product::{ProductData, ProductRecord, Variant};
pub use infrastructure::config::{AppConfig, ConfigManager};
