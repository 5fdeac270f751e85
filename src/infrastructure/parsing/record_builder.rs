//! Mapping of extracted fields onto the fixed importer schema
//!
//! Combines the extracted [`ProductData`] with derived values (normalized
//! image URLs, deduplicated size list, generated row identifier, best-effort
//! description) into one [`ProductRecord`]. No field is validated or
//! rejected; missing source data empties a column, never removes it.

use regex::{Regex, RegexBuilder};
use scraper::{Html, Selector};
use tracing::debug;
use uuid::Uuid;

use super::error::{ParsingError, ParsingResult};
use crate::domain::product::{ProductData, ProductRecord};

/// Builds importer records for one storefront.
///
/// The storefront origin is injected so the builder can be reused across
/// stores that share the markup conventions.
pub struct RecordBuilder {
    origin: String,
    saved_from_marker: Regex,
    swym_product_block: Regex,
    canonical_link: Selector,
    meta_description: Selector,
    og_description: Selector,
}

impl RecordBuilder {
    pub fn new(origin: impl Into<String>) -> ParsingResult<Self> {
        let mut origin = origin.into();
        while origin.ends_with('/') {
            origin.pop();
        }

        Ok(Self {
            origin,
            saved_from_marker: Self::pattern(r"saved from url=\([^)]+\)(https://[^\s]+)")?,
            swym_product_block: Self::dotall(
                r"window\.SwymProductInfo\.product\s*=\s*(\{.*?\});",
            )?,
            canonical_link: Self::selector(r#"link[rel="canonical"]"#)?,
            meta_description: Self::selector(r#"meta[name="description"]"#)?,
            og_description: Self::selector(r#"meta[property="og:description"]"#)?,
        })
    }

    fn pattern(pattern: &str) -> ParsingResult<Regex> {
        Regex::new(pattern).map_err(|e| ParsingError::invalid_pattern(pattern, e))
    }

    fn dotall(pattern: &str) -> ParsingResult<Regex> {
        RegexBuilder::new(pattern)
            .dot_matches_new_line(true)
            .build()
            .map_err(|e| ParsingError::invalid_pattern(pattern, e))
    }

    fn selector(selector: &str) -> ParsingResult<Selector> {
        Selector::parse(selector).map_err(|e| ParsingError::invalid_selector(selector, e))
    }

    /// Build one record from extracted fields and the page they came from.
    ///
    /// `url` is the caller-supplied page URL when the page was fetched over
    /// the network; saved pages pass `None` and the URL is recovered from
    /// the page itself.
    pub fn build(&self, data: &ProductData, page: &str, url: Option<&str>) -> ProductRecord {
        let document = Html::parse_document(page);

        let (image2, ext_images) = self.map_images(&data.images);

        ProductRecord {
            url: self.resolve_url(url, page, &document),
            id: data.product_id.clone().unwrap_or_default(),
            name: data.title.clone().unwrap_or_default(),
            brand: data.vendor.clone().unwrap_or_default(),
            article: data
                .variants
                .first()
                .map(|variant| variant.sku.clone())
                .unwrap_or_default(),
            // No source signal exists for gender or color on these pages.
            gender: String::new(),
            image2,
            ext_images,
            description: self.extract_description(page, &document),
            sizes: self.join_sizes(data),
            color: String::new(),
            category: data.product_type.clone().unwrap_or_default(),
            id2: Uuid::new_v4().to_string(),
            // Reserved importer column.
            combine: String::new(),
        }
    }

    /// Caller URL, then the browser "saved from url=(...)" marker, then the
    /// canonical link element, then empty.
    fn resolve_url(&self, url: Option<&str>, page: &str, document: &Html) -> String {
        if let Some(url) = url {
            if !url.is_empty() {
                return url.to_string();
            }
        }

        if let Some(captures) = self.saved_from_marker.captures(page) {
            if let Some(m) = captures.get(1) {
                return m.as_str().to_string();
            }
        }

        document
            .select(&self.canonical_link)
            .next()
            .and_then(|element| element.value().attr("href"))
            .unwrap_or_default()
            .to_string()
    }

    /// First image becomes `Image2`; the 2nd and 3rd are comma-joined into
    /// `Ext Images`; anything past the 3rd is discarded.
    fn map_images(&self, images: &[String]) -> (String, String) {
        let image2 = images
            .first()
            .map(|image| self.absolutize(image))
            .unwrap_or_default();

        let ext_images = match images.len() {
            0 | 1 => String::new(),
            2 => self.absolutize(&images[1]),
            _ => format!("{},{}", self.absolutize(&images[1]), self.absolutize(&images[2])),
        };

        (image2, ext_images)
    }

    /// Rewrite protocol-relative and site-relative image URLs to absolute
    /// ones; already-absolute URLs pass through unchanged.
    fn absolutize(&self, url: &str) -> String {
        if let Some(rest) = url.strip_prefix("//") {
            format!("https://{}", rest)
        } else if url.starts_with('/') {
            format!("{}{}", self.origin, url)
        } else {
            url.to_string()
        }
    }

    /// Deduplicated, order-preserving join of variant display labels.
    fn join_sizes(&self, data: &ProductData) -> String {
        let mut sizes: Vec<&str> = Vec::new();
        for variant in &data.variants {
            let label = variant.public_title.as_str();
            if !label.is_empty() && !sizes.contains(&label) {
                sizes.push(label);
            }
        }
        sizes.join(",")
    }

    /// Best-effort description: the structured wishlist-widget blob first,
    /// then the meta description, then the Open Graph description.
    fn extract_description(&self, page: &str, document: &Html) -> String {
        if let Some(description) = self.swym_description(page) {
            return description;
        }

        if let Some(content) = self.meta_content(document, &self.meta_description) {
            return content;
        }

        self.meta_content(document, &self.og_description)
            .unwrap_or_default()
    }

    /// The `window.SwymProductInfo.product` assignment is real JSON, so it
    /// is parsed structurally; its `description` field carries markup that
    /// is stripped to whitespace-joined plain text.
    fn swym_description(&self, page: &str) -> Option<String> {
        let block = self
            .swym_product_block
            .captures(page)
            .and_then(|captures| captures.get(1))?
            .as_str()
            .replace("\\/", "/");

        let product: serde_json::Value = match serde_json::from_str(&block) {
            Ok(value) => value,
            Err(e) => {
                debug!("SwymProductInfo blob is not parseable JSON: {}", e);
                return None;
            }
        };

        let description_html = product.get("description")?.as_str()?;
        if description_html.is_empty() {
            return None;
        }

        let text = strip_markup(description_html);
        if text.is_empty() { None } else { Some(text) }
    }

    fn meta_content(&self, document: &Html, selector: &Selector) -> Option<String> {
        document
            .select(selector)
            .next()
            .and_then(|element| element.value().attr("content"))
            .filter(|content| !content.is_empty())
            .map(|content| content.to_string())
    }
}

/// Strip tags from an HTML fragment, joining the text nodes with single
/// spaces and collapsing surrounding whitespace.
fn strip_markup(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment
        .root_element()
        .text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
