//! Delimited feed output in the TSUM importer format
//!
//! The importer consumes semicolon-delimited rows with a fixed 14-column
//! header and no field quoting. Containment is escape-based: every field is
//! cleared of the three quote characters that corrupt the format, literal
//! delimiters inside values are backslash-escaped, and a full-file second
//! pass covers quote characters that entered through delimiter-unaware
//! paths. The quote stripping is lossy (apostrophes in product names are
//! deleted); the importer requires it.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::domain::product::ProductRecord;

/// Field delimiter of the importer format.
pub const FIELD_DELIMITER: &str = ";";

const UTF8_BOM: &str = "\u{feff}";

/// The characters the importer cannot tolerate inside a field: both ASCII
/// quotes and the right double quotation mark.
const FORBIDDEN_CHARS: [char; 3] = ['"', '\'', '\u{201d}'];

/// Remove the forbidden quote characters from a field value.
pub fn strip_quotes(value: &str) -> String {
    value
        .chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c))
        .collect()
}

/// Field containment is escape-based, not quote-based: after the quote
/// strip, any literal delimiter (and the escape character itself) inside a
/// value is prefixed with a backslash.
fn sanitize_field(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in strip_quotes(value).chars() {
        if c == '\\' || FIELD_DELIMITER.contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Write records to the feed file.
///
/// `None` entries (failed URLs) are skipped. With `append` set and an
/// existing target, rows are added without rewriting the header; otherwise
/// the file is created fresh with the UTF-8 byte-order marker and the
/// header row. Finishes with the defensive [`clean_feed_file`] pass.
pub fn write_feed(path: &Path, records: &[Option<ProductRecord>], append: bool) -> Result<()> {
    if records.is_empty() {
        warn!("No records to write to {:?}", path);
        return Ok(());
    }

    let continue_existing = append && path.exists();

    let mut out = String::new();
    if !continue_existing {
        out.push_str(UTF8_BOM);
        out.push_str(&ProductRecord::COLUMNS.join(FIELD_DELIMITER));
        out.push('\n');
    }

    let mut written = 0usize;
    for record in records.iter().flatten() {
        let row: Vec<String> = record.values().iter().map(|v| sanitize_field(v)).collect();
        out.push_str(&row.join(FIELD_DELIMITER));
        out.push('\n');
        written += 1;
    }

    if continue_existing {
        let mut file = OpenOptions::new()
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open feed file {:?} for append", path))?;
        file.write_all(out.as_bytes())
            .with_context(|| format!("Failed to append to feed file {:?}", path))?;
    } else {
        fs::write(path, &out).with_context(|| format!("Failed to write feed file {:?}", path))?;
    }

    info!("Saved {} records to {:?}", written, path);

    // Best-effort: a failed clean pass must not discard the batch that was
    // just written.
    if let Err(e) = clean_feed_file(path) {
        warn!("Defensive clean pass failed for {:?}: {}", path, e);
    }
    Ok(())
}

/// Defensive second pass: re-read the feed file, strip the forbidden quote
/// characters from every line, and rewrite it in place.
///
/// Returns `false` (with a warning) when the file does not exist.
pub fn clean_feed_file(path: &Path) -> Result<bool> {
    if !path.exists() {
        warn!("Feed file {:?} not found, nothing to clean", path);
        return Ok(false);
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read feed file {:?}", path))?;

    let mut cleaned = strip_quotes(&raw);
    if !cleaned.starts_with(UTF8_BOM) {
        cleaned.insert_str(0, UTF8_BOM);
    }

    fs::write(path, cleaned).with_context(|| format!("Failed to rewrite feed file {:?}", path))?;

    info!("Cleaned quote characters from {:?}", path);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_exactly_the_three_forbidden_characters() {
        assert_eq!(strip_quotes(r#"Papa "Don't" Preach”"#), "Papa Dont Preach");
        assert_eq!(strip_quotes("untouched; value"), "untouched; value");
    }

    #[test]
    fn left_double_quote_and_backtick_pass_through() {
        // Only the three known-problematic characters are removed.
        assert_eq!(strip_quotes("\u{201c}ok\u{2018}`"), "\u{201c}ok\u{2018}`");
    }

    #[test]
    fn delimiters_inside_fields_are_escaped() {
        assert_eq!(sanitize_field("a;b"), "a\\;b");
        assert_eq!(sanitize_field("back\\slash"), "back\\\\slash");
        assert_eq!(sanitize_field("plain"), "plain");
    }
}
