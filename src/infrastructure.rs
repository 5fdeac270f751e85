//! Infrastructure layer for fetching, parsing, configuration and feed output
//!
//! External collaborators of the export flow: the HTTP fetcher, the
//! product-page parsers, the configuration file, and the delimited feed
//! sink.

pub mod config;
pub mod csv_export;
pub mod http_client;
pub mod parsing;

// Re-export commonly used items
pub use config::{AppConfig, ConfigManager, ExportConfig, FetchConfig, SiteConfig};
pub use http_client::{HttpClient, HttpClientConfig};
pub use parsing::{ParsingError, ParsingResult, ProductDataParser, RecordBuilder};
