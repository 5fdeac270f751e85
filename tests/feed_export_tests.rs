//! Tests for the feed sink: layout, append semantics and quote stripping

use std::fs;
use std::path::PathBuf;

use pdp_feed_lib::domain::product::ProductRecord;
use pdp_feed_lib::infrastructure::csv_export::{clean_feed_file, write_feed};
use tempfile::TempDir;

const BOM: &str = "\u{feff}";

fn feed_path(dir: &TempDir) -> PathBuf {
    dir.path().join("feed.csv")
}

fn record(name: &str, url: &str) -> ProductRecord {
    ProductRecord {
        url: url.to_string(),
        id: "7461205016811".to_string(),
        name: name.to_string(),
        brand: "Papa Dont Preach".to_string(),
        article: "PDP-GWN-01".to_string(),
        image2: "https://cdn.x/a.jpg".to_string(),
        ext_images: "https://cdn.x/b.jpg,https://cdn.x/c.jpg".to_string(),
        description: "Silk gown".to_string(),
        sizes: "XS,S,M".to_string(),
        category: "Gowns".to_string(),
        id2: "0b0af43a-6eb1-4df0-b647-47fbca4b1a7e".to_string(),
        ..ProductRecord::default()
    }
}

#[test]
fn fresh_write_has_bom_header_and_rows() {
    let dir = TempDir::new().unwrap();
    let path = feed_path(&dir);

    let records = vec![
        Some(record("Gown One", "https://shop.example/products/one")),
        Some(record("Gown Two", "https://shop.example/products/two")),
    ];
    write_feed(&path, &records, false).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with(BOM));

    let lines: Vec<&str> = contents.trim_start_matches(BOM).lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "URL;ID;Name;Brand;Article;Gender;Image2;Ext Images;Description;Sizes;Color;Category;ID2;Combine"
    );
    assert!(lines[1].starts_with("https://shop.example/products/one;"));
    assert_eq!(lines[1].split(';').count(), 14);
}

#[test]
fn append_mode_writes_the_header_only_once() {
    let dir = TempDir::new().unwrap();
    let path = feed_path(&dir);

    let first = vec![
        Some(record("A", "https://shop.example/a")),
        Some(record("B", "https://shop.example/b")),
    ];
    let second = vec![Some(record("C", "https://shop.example/c"))];

    write_feed(&path, &first, false).unwrap();
    write_feed(&path, &second, true).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.trim_start_matches(BOM).lines().collect();
    assert_eq!(lines.len(), 4);

    let header_count = lines.iter().filter(|line| line.starts_with("URL;")).count();
    assert_eq!(header_count, 1);
}

#[test]
fn append_to_a_missing_file_still_creates_the_header() {
    let dir = TempDir::new().unwrap();
    let path = feed_path(&dir);

    write_feed(&path, &[Some(record("A", "https://shop.example/a"))], true).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.trim_start_matches(BOM).lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("URL;"));
}

#[test]
fn quote_characters_never_survive_the_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = feed_path(&dir);

    let mut dirty = record("Papa \"Don't\" Preach\u{201d} Gown", "https://shop.example/q");
    dirty.description = "He said \u{201d}wow\u{201d}, then 'left'".to_string();

    write_feed(&path, &[Some(dirty)], false).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert!(!contents.contains('"'));
    assert!(!contents.contains('\''));
    assert!(!contents.contains('\u{201d}'));
    assert!(contents.contains("Papa Dont Preach Gown"));
}

#[test]
fn failed_urls_are_excluded_from_the_feed() {
    let dir = TempDir::new().unwrap();
    let path = feed_path(&dir);

    let records = vec![
        Some(record("A", "https://shop.example/a")),
        None,
        Some(record("C", "https://shop.example/c")),
        None,
    ];
    write_feed(&path, &records, false).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.trim_start_matches(BOM).lines().collect();
    // Header plus the two successful records; placeholders leave no row.
    assert_eq!(lines.len(), 3);
}

#[test]
fn empty_batch_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let path = feed_path(&dir);

    write_feed(&path, &[], false).unwrap();
    assert!(!path.exists());
}

#[test]
fn clean_pass_strips_quotes_from_existing_files() {
    let dir = TempDir::new().unwrap();
    let path = feed_path(&dir);

    fs::write(
        &path,
        "\u{feff}URL;ID;Name\nhttps://x;1;\"Quo'ted\u{201d}\"\n",
    )
    .unwrap();

    assert!(clean_feed_file(&path).unwrap());

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with(BOM));
    assert!(contents.contains("https://x;1;Quoted"));
    assert!(!contents.contains('"'));
    assert!(!contents.contains('\''));
}

#[test]
fn clean_pass_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = feed_path(&dir);

    write_feed(&path, &[Some(record("A", "https://shop.example/a"))], false).unwrap();
    let after_first = fs::read_to_string(&path).unwrap();

    clean_feed_file(&path).unwrap();
    let after_second = fs::read_to_string(&path).unwrap();
    assert_eq!(after_first, after_second);
}

#[test]
fn clean_pass_reports_missing_files() {
    let dir = TempDir::new().unwrap();
    let path = feed_path(&dir);
    assert!(!clean_feed_file(&path).unwrap());
    assert!(!path.exists());
}
