//! Pattern-based field extraction from storefront product pages
//!
//! The storefront embeds a script-assigned object (`KiwiSizing.data = {...};`)
//! carrying the structured product attributes. No real script-object parser
//! is available for that literal, so each field is recovered independently
//! with a literal-key pattern over the full page text: the scans are
//! order-independent and a field whose pattern does not match is simply
//! absent, not an error.
//!
//! First match wins, even when the key text appears inside an unrelated
//! string elsewhere on the page. Downstream output depends on that behavior;
//! keep it.

use regex::{Regex, RegexBuilder};
use tracing::debug;

use super::error::{ParsingError, ParsingResult};
use crate::domain::product::{ProductData, Variant};

/// Extracts [`ProductData`] from raw product-page text.
pub struct ProductDataParser {
    /// Gate: the page must carry the embedded data block at all.
    data_block: Regex,
    product_id: Regex,
    title: Regex,
    vendor: Regex,
    product_type: Regex,
    images_block: Regex,
    quoted_string: Regex,
    variants_block: Regex,
    variant_entry: Regex,
}

impl ProductDataParser {
    pub fn new() -> ParsingResult<Self> {
        Ok(Self {
            data_block: Self::dotall(r"KiwiSizing\.data\s*=\s*(\{.*?\});")?,
            product_id: Self::pattern(r#"product:\s*"([^"]+)""#)?,
            title: Self::pattern(r#"title:\s*"([^"]+)""#)?,
            vendor: Self::pattern(r#"vendor:\s*"([^"]+)""#)?,
            product_type: Self::pattern(r#"type:\s*"([^"]+)""#)?,
            images_block: Self::dotall(r"images:\s*\[(.*?)\]")?,
            quoted_string: Self::pattern(r#""([^"]+)""#)?,
            variants_block: Self::dotall(r"variants:\s*\[(.*?)\]")?,
            variant_entry: Self::pattern(
                r#"\{"id":\d+.*?"public_title":"([^"]+)".*?"sku":"([^"]+)""#,
            )?,
        })
    }

    fn pattern(pattern: &str) -> ParsingResult<Regex> {
        Regex::new(pattern).map_err(|e| ParsingError::invalid_pattern(pattern, e))
    }

    /// Compile a pattern whose `.` must also cross line boundaries
    /// (the embedded block spans multiple script lines).
    fn dotall(pattern: &str) -> ParsingResult<Regex> {
        RegexBuilder::new(pattern)
            .dot_matches_new_line(true)
            .build()
            .map_err(|e| ParsingError::invalid_pattern(pattern, e))
    }

    /// Extract product fields from raw page text.
    ///
    /// Fails only when no plausible data block exists at all; individual
    /// missing fields are recorded as absent.
    pub fn extract(&self, page: &str) -> ParsingResult<ProductData> {
        if !self.data_block.is_match(page) {
            return Err(ParsingError::DataBlockNotFound);
        }

        let data = ProductData {
            product_id: self.first_capture(&self.product_id, page),
            title: self.first_capture(&self.title, page),
            vendor: self.first_capture(&self.vendor, page),
            product_type: self.first_capture(&self.product_type, page),
            images: self.extract_images(page),
            variants: self.extract_variants(page),
        };

        debug!(
            "Extracted product fields: id={:?}, {} images, {} variants",
            data.product_id,
            data.images.len(),
            data.variants.len()
        );

        Ok(data)
    }

    fn first_capture(&self, regex: &Regex, page: &str) -> Option<String> {
        regex
            .captures(page)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// All quoted strings inside the bounds of the `images:[...]` literal,
    /// with escaped path separators unescaped.
    fn extract_images(&self, page: &str) -> Vec<String> {
        let Some(block) = self
            .images_block
            .captures(page)
            .and_then(|captures| captures.get(1))
        else {
            return Vec::new();
        };

        self.quoted_string
            .captures_iter(block.as_str())
            .filter_map(|captures| captures.get(1))
            .map(|m| m.as_str().replace("\\/", "/"))
            .collect()
    }

    /// Repeated `{"id":<digits> ... "public_title":"..." ... "sku":"..."}`
    /// fragments inside the `variants:[...]` literal.
    fn extract_variants(&self, page: &str) -> Vec<Variant> {
        let Some(block) = self
            .variants_block
            .captures(page)
            .and_then(|captures| captures.get(1))
        else {
            return Vec::new();
        };

        self.variant_entry
            .captures_iter(block.as_str())
            .map(|captures| Variant {
                public_title: captures[1].to_string(),
                sku: captures[2].to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PAGE: &str = r#"<html><head></head><body>
<script>
  KiwiSizing.data = {
    product: "7461205016811",
    title: "Ivory Embellished Gown",
    vendor: "Papa Dont Preach",
    type: "Gowns",
    images: ["\/\/cdn.shopify.com\/s\/files\/1\/gown-front.jpg","\/\/cdn.shopify.com\/s\/files\/1\/gown-back.jpg"],
  };
</script>
<script>
  var product = { variants: [{"id":42163417023723,"price":129500,"public_title":"XS","sku":"PDP-GWN-01"},{"id":42163417056491,"price":129500,"public_title":"S","sku":"PDP-GWN-01"}] };
</script>
</body></html>"#;

    #[test]
    fn extracts_all_fields_from_sample_page() {
        let parser = ProductDataParser::new().unwrap();
        let data = parser.extract(SAMPLE_PAGE).unwrap();

        assert_eq!(data.product_id.as_deref(), Some("7461205016811"));
        assert_eq!(data.title.as_deref(), Some("Ivory Embellished Gown"));
        assert_eq!(data.vendor.as_deref(), Some("Papa Dont Preach"));
        assert_eq!(data.product_type.as_deref(), Some("Gowns"));
        assert_eq!(
            data.images,
            vec![
                "//cdn.shopify.com/s/files/1/gown-front.jpg",
                "//cdn.shopify.com/s/files/1/gown-back.jpg"
            ]
        );
        assert_eq!(
            data.variants,
            vec![
                Variant {
                    public_title: "XS".into(),
                    sku: "PDP-GWN-01".into()
                },
                Variant {
                    public_title: "S".into(),
                    sku: "PDP-GWN-01".into()
                },
            ]
        );
    }

    #[test]
    fn page_without_data_block_is_an_error() {
        let parser = ProductDataParser::new().unwrap();
        let result = parser.extract("<html><body>plain page</body></html>");
        assert!(matches!(result, Err(ParsingError::DataBlockNotFound)));
    }

    #[test]
    fn missing_fields_are_absent_not_errors() {
        let parser = ProductDataParser::new().unwrap();
        let page = r#"<script>KiwiSizing.data = { title: "Lone Title" };</script>"#;
        let data = parser.extract(page).unwrap();

        assert_eq!(data.title.as_deref(), Some("Lone Title"));
        assert!(data.product_id.is_none());
        assert!(data.vendor.is_none());
        assert!(data.images.is_empty());
        assert!(data.variants.is_empty());
    }

    #[test]
    fn first_match_wins_for_repeated_keys() {
        let parser = ProductDataParser::new().unwrap();
        let page = concat!(
            r#"<script>KiwiSizing.data = { title: "First" };</script>"#,
            r#"<script>var other = { title: "Second" };</script>"#,
        );
        let data = parser.extract(page).unwrap();
        assert_eq!(data.title.as_deref(), Some("First"));
    }

    #[test]
    fn variant_fragments_without_sku_are_skipped() {
        let parser = ProductDataParser::new().unwrap();
        let page = concat!(
            "<script>KiwiSizing.data = { product: \"1\" };</script>",
            r#"<script>var product = { variants: [{"id":1,"public_title":"M","sku":"A-1"},{"id":2,"title":"no size"}] };</script>"#,
        );
        let data = parser.extract(page).unwrap();
        assert_eq!(data.variants.len(), 1);
        assert_eq!(data.variants[0].sku, "A-1");
    }
}
