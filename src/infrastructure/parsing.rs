//! Product-page parsing infrastructure
//!
//! Two collaborators make up the extraction pipeline: the
//! [`ProductDataParser`] recovers raw fields from the embedded script data
//! block, and the [`RecordBuilder`] maps them (plus derived values) onto the
//! fixed importer schema.

pub mod error;
pub mod product_data_parser;
pub mod record_builder;

// Re-export public types
pub use error::{ParsingError, ParsingResult};
pub use product_data_parser::ProductDataParser;
pub use record_builder::RecordBuilder;
