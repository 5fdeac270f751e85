//! CLI entry point for the pdp-feed exporter
//!
//! Default mode reads the links file and writes the feed file; the `clean`
//! mode re-runs only the defensive quote-stripping pass over an existing
//! feed file.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use pdp_feed_lib::application::export::FeedExporter;
use pdp_feed_lib::infrastructure::config::ConfigManager;
use pdp_feed_lib::infrastructure::csv_export;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ConfigManager::new().load().await?;

    if std::env::args().nth(1).as_deref() == Some("clean") {
        let output = &config.export.output_file;
        match csv_export::clean_feed_file(output) {
            Ok(true) => println!("✓ Cleaned quote characters from {}", output.display()),
            Ok(false) => println!("File {} not found", output.display()),
            Err(e) => eprintln!("Failed to clean {}: {}", output.display(), e),
        }
        return Ok(());
    }

    let output_file = config.export.output_file.clone();
    let links_file = config.export.links_file.clone();

    let exporter = FeedExporter::new(config)?;
    let report = exporter.export_to_file().await?;

    println!();
    if report.processed == 0 {
        println!("No links to process in {}", links_file.display());
    } else if report.succeeded > 0 {
        println!(
            "✓ Export finished: {}/{} pages in {}s, output in {}",
            report.succeeded,
            report.processed,
            (report.finished_at - report.started_at).num_seconds(),
            output_file.display()
        );
    } else {
        println!("✗ No pages could be processed");
    }

    Ok(())
}
