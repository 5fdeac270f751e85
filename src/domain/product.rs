use serde::{Deserialize, Serialize};

/// One purchasable size/SKU combination listed on a product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Display label shown in the size selector (e.g. "S", "UK 8").
    pub public_title: String,
    /// Stock keeping unit for this size.
    pub sku: String,
}

/// Fields recovered from a product page before record mapping.
///
/// Every field is best-effort: the extractor records what the page yields
/// and leaves the rest absent. Only the complete absence of the embedded
/// data block is an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductData {
    /// Site-local product identifier.
    pub product_id: Option<String>,
    /// Product display name.
    pub title: Option<String>,
    /// Brand / vendor name.
    pub vendor: Option<String>,
    /// Product category as the site classifies it.
    pub product_type: Option<String>,
    /// Ordered image URLs, possibly protocol- or site-relative.
    pub images: Vec<String>,
    /// Ordered size/SKU variants.
    pub variants: Vec<Variant>,
}

/// One output row in the TSUM importer schema.
///
/// All fourteen columns are always present; missing source data empties a
/// value, it never removes the column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub url: String,
    pub id: String,
    pub name: String,
    pub brand: String,
    pub article: String,
    pub gender: String,
    pub image2: String,
    pub ext_images: String,
    pub description: String,
    pub sizes: String,
    pub color: String,
    pub category: String,
    pub id2: String,
    pub combine: String,
}

impl ProductRecord {
    /// Column names in the order the importer expects them.
    pub const COLUMNS: [&'static str; 14] = [
        "URL",
        "ID",
        "Name",
        "Brand",
        "Article",
        "Gender",
        "Image2",
        "Ext Images",
        "Description",
        "Sizes",
        "Color",
        "Category",
        "ID2",
        "Combine",
    ];

    /// Field values in [`Self::COLUMNS`] order.
    pub fn values(&self) -> [&str; 14] {
        [
            &self.url,
            &self.id,
            &self.name,
            &self.brand,
            &self.article,
            &self.gender,
            &self.image2,
            &self.ext_images,
            &self.description,
            &self.sizes,
            &self.color,
            &self.category,
            &self.id2,
            &self.combine,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_match_column_order() {
        let record = ProductRecord {
            url: "u".into(),
            id: "i".into(),
            name: "n".into(),
            brand: "b".into(),
            article: "a".into(),
            gender: String::new(),
            image2: "img".into(),
            ext_images: "e1,e2".into(),
            description: "d".into(),
            sizes: "S,M".into(),
            color: String::new(),
            category: "c".into(),
            id2: "x".into(),
            combine: String::new(),
        };

        let values = record.values();
        assert_eq!(values.len(), ProductRecord::COLUMNS.len());
        assert_eq!(values[0], "u");
        assert_eq!(values[4], "a");
        assert_eq!(values[7], "e1,e2");
        assert_eq!(values[13], "");
    }

    #[test]
    fn default_record_has_all_columns_empty() {
        let record = ProductRecord::default();
        assert!(record.values().iter().all(|v| v.is_empty()));
    }
}
