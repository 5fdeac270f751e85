//! Domain module - entities of the product feed
//!
//! Contains the intermediate extraction result recovered from a product
//! page and the fixed-schema output record consumed by the importer.

pub mod product;

// Re-export commonly used items
pub use product::{ProductData, ProductRecord, Variant};
