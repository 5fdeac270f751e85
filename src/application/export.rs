//! Batch export flow: links file in, importer feed out
//!
//! URLs are processed strictly one at a time in input order with a fixed
//! pause between fetches. Failures of individual URLs are logged and
//! recorded as placeholders so the batch keeps its 1:1 correspondence with
//! the input; the feed is written once, after the whole batch.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::domain::product::ProductRecord;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::csv_export;
use crate::infrastructure::http_client::{HttpClient, HttpClientConfig};
use crate::infrastructure::parsing::{ParsingResult, ProductDataParser, RecordBuilder};

/// Summary of one export run
#[derive(Debug, Clone)]
pub struct ExportReport {
    /// URLs processed (successes plus failures)
    pub processed: usize,
    /// Records extracted
    pub succeeded: usize,
    /// URLs skipped after a fetch or extraction failure
    pub failed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Read product URLs from a links file, one per line.
///
/// Blank lines and `#` comments are skipped. A missing or unreadable file
/// is a warning and an empty list, not an error.
pub fn read_links(path: &Path) -> Vec<String> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Failed to read links file {:?}: {}", path, e);
            return Vec::new();
        }
    };

    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Orchestrates the fetch -> extract -> build -> write pipeline
pub struct FeedExporter {
    config: AppConfig,
    client: HttpClient,
    parser: ProductDataParser,
    builder: RecordBuilder,
}

impl FeedExporter {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = HttpClient::new(HttpClientConfig::from_fetch_config(&config.fetch))
            .context("Failed to create HTTP client")?;
        let parser = ProductDataParser::new().context("Failed to compile extraction patterns")?;
        let builder =
            RecordBuilder::new(&config.site.origin).context("Failed to compile record builder")?;

        Ok(Self {
            config,
            client,
            parser,
            builder,
        })
    }

    /// Fetch one product page and build its record.
    ///
    /// Any failure (network, status, missing data block) is logged and
    /// reported as `None`; the caller keeps going with the next URL.
    pub async fn export_url(&self, url: &str) -> Option<ProductRecord> {
        let page = match self.client.fetch_html_string(url).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Failed to fetch {}: {}", url, e);
                return None;
            }
        };

        match self.parser.extract(&page) {
            Ok(data) => {
                let record = self.builder.build(&data, &page, Some(url));
                info!("Extracted record for {}: {}", url, record.name);
                Some(record)
            }
            Err(e) => {
                warn!("No product data in {}: {}", url, e);
                None
            }
        }
    }

    /// Process a batch of URLs in input order.
    ///
    /// Returns one entry per input URL (`None` marks a failure) so callers
    /// can correlate output positions with input lines, plus a run summary.
    /// A fixed pause separates consecutive fetches, but not the last one.
    pub async fn run(&self, urls: &[String]) -> (Vec<Option<ProductRecord>>, ExportReport) {
        let started_at = Utc::now();
        let mut records: Vec<Option<ProductRecord>> = Vec::with_capacity(urls.len());

        for (index, url) in urls.iter().enumerate() {
            info!("[{}/{}] Processing {}", index + 1, urls.len(), url);
            records.push(self.export_url(url).await);

            if index + 1 < urls.len() {
                tokio::time::sleep(Duration::from_millis(self.config.fetch.request_delay_ms))
                    .await;
            }
        }

        let succeeded = records.iter().flatten().count();
        let report = ExportReport {
            processed: urls.len(),
            succeeded,
            failed: urls.len() - succeeded,
            started_at,
            finished_at: Utc::now(),
        };

        (records, report)
    }

    /// Read the configured links file, process every URL, and write the
    /// feed file (fresh, not appended). The complete-flow entry point used
    /// by the CLI's default mode.
    pub async fn export_to_file(&self) -> Result<ExportReport> {
        let links = read_links(&self.config.export.links_file);
        if links.is_empty() {
            warn!(
                "No links to process in {:?}",
                self.config.export.links_file
            );
            let now = Utc::now();
            return Ok(ExportReport {
                processed: 0,
                succeeded: 0,
                failed: 0,
                started_at: now,
                finished_at: now,
            });
        }

        let (records, report) = self.run(&links).await;
        csv_export::write_feed(&self.config.export.output_file, &records, false)?;
        Ok(report)
    }

    /// Build a record from an already-saved product page, without any
    /// network I/O. The URL column is recovered from the page itself (the
    /// browser's saved-from marker or the canonical link).
    pub fn parse_saved_html(&self, page: &str) -> ParsingResult<ProductRecord> {
        let data = self.parser.extract(page)?;
        Ok(self.builder.build(&data, page, None))
    }

    /// [`Self::parse_saved_html`] for a page stored on disk.
    pub fn parse_saved_page(&self, path: &Path) -> Result<ProductRecord> {
        let page = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read saved page {:?}", path))?;
        self.parse_saved_html(&page)
            .with_context(|| format!("Failed to extract product data from {:?}", path))
    }

    /// The configuration this exporter was built with
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
