//! Product catalog
//!
//! The catalog is the fixed list of purchasable products plus the pricing
//! constants applied to them. It is loaded once at startup and shared
//! read-only for the life of the process.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a three-layer resolution:
//! 1. Explicit path (`--catalog` flag or `HOMEPLAN_CATALOG`)
//! 2. Override in data dir (~/.local/share/homeplan/config/catalog.toml)
//! 3. Embedded defaults (compiled into binary)

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::store;
use crate::variant;

/// Embedded default catalog (compiled into binary)
const DEFAULT_CATALOG: &str = include_str!("../../../config/catalog.toml");

/// Environment variable pointing at a catalog file
pub const CATALOG_ENV: &str = "HOMEPLAN_CATALOG";

/// Upper bound on a product's cadence: one shipment a day
pub const MAX_SHIPMENTS_PER_YEAR: u32 = 365;

/// How a product scales with the household
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    /// One formula per demographic group present (women, men, kids)
    HygieneVariant,
    /// One unit per household regardless of composition
    Fixed,
}

impl ProductCategory {
    /// Infer the category from a product name
    pub fn infer(name: &str) -> Self {
        if variant::qualifies_by_name(name) {
            Self::HygieneVariant
        } else {
            Self::Fixed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HygieneVariant => "hygiene_variant",
            Self::Fixed => "fixed",
        }
    }
}

/// A purchasable product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub name: String,
    /// Canonical URL; may hold alternatives joined by " OR "
    pub url: Option<String>,
    pub unit_price: f64,
    /// Shipments per year, including the month 1 shipment
    pub shipments_per_year: u32,
    pub category: ProductCategory,
}

impl Product {
    /// Store key derived from the first URL, if any
    pub fn store(&self) -> Option<String> {
        store::store_key(self.url.as_deref())
    }

    /// Case-insensitive match against the product name
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

/// Pricing constants applied to every plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Multiplies the product subtotal to produce tax
    pub tax_rate: f64,
    /// Cost of one shipment from one store
    pub shipping_per_shipment: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: 0.07,
            shipping_per_shipment: 5.99,
        }
    }
}

impl PricingConfig {
    /// Reject negative or non-finite constants
    pub fn validate(&self) -> Result<()> {
        if !self.tax_rate.is_finite() || self.tax_rate < 0.0 {
            return Err(Error::Config(format!(
                "tax_rate must be a non-negative number, got {}",
                self.tax_rate
            )));
        }
        if !self.shipping_per_shipment.is_finite() || self.shipping_per_shipment < 0.0 {
            return Err(Error::Config(format!(
                "shipping_per_shipment must be a non-negative number, got {}",
                self.shipping_per_shipment
            )));
        }
        Ok(())
    }
}

/// The immutable product catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    pricing: PricingConfig,
    source: CatalogSource,
}

/// Where a catalog was loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Embedded,
    File(PathBuf),
    Inline,
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Embedded => write!(f, "embedded default"),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Inline => write!(f, "inline"),
        }
    }
}

impl Catalog {
    /// Load using the standard resolution order
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        if let Ok(path) = std::env::var(CATALOG_ENV) {
            if !path.trim().is_empty() {
                return Self::from_file(Path::new(path.trim()));
            }
        }

        if let Some(path) = default_catalog_path() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Self::embedded()
    }

    /// The catalog compiled into the binary
    pub fn embedded() -> Result<Self> {
        let mut catalog = Self::from_toml(DEFAULT_CATALOG)?;
        catalog.source = CatalogSource::Embedded;
        Ok(catalog)
    }

    /// Load a catalog file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read catalog {}: {}", path.display(), e))
        })?;
        let mut catalog = Self::from_toml(&content)?;
        catalog.source = CatalogSource::File(path.to_path_buf());
        info!(path = %path.display(), products = catalog.len(), "Loaded catalog override");
        Ok(catalog)
    }

    /// Parse a catalog from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawCatalog = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid catalog TOML: {}", e)))?;

        let pricing = match raw.pricing {
            Some(p) => {
                let defaults = PricingConfig::default();
                PricingConfig {
                    tax_rate: p.tax_rate.unwrap_or(defaults.tax_rate),
                    shipping_per_shipment: p
                        .shipping_per_shipment
                        .unwrap_or(defaults.shipping_per_shipment),
                }
            }
            None => PricingConfig::default(),
        };

        let products = raw
            .products
            .into_iter()
            .map(|p| {
                let url = p.url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty());
                let category = p
                    .category
                    .unwrap_or_else(|| ProductCategory::infer(&p.name));
                Product {
                    name: p.name.trim().to_string(),
                    url,
                    unit_price: p.unit_price,
                    shipments_per_year: p.shipments_per_year,
                    category,
                }
            })
            .collect();

        Self::new(products, pricing)
    }

    /// Build a catalog from already-constructed products
    pub fn new(products: Vec<Product>, pricing: PricingConfig) -> Result<Self> {
        pricing.validate()?;

        let mut seen = HashSet::new();
        for product in &products {
            if product.name.is_empty() {
                return Err(Error::InvalidData("Product name cannot be empty".into()));
            }
            if !seen.insert(product.name.to_lowercase()) {
                return Err(Error::InvalidData(format!(
                    "Duplicate product name: {}",
                    product.name
                )));
            }
            if !product.unit_price.is_finite() || product.unit_price < 0.0 {
                return Err(Error::InvalidData(format!(
                    "Product {} has invalid unit price {}",
                    product.name, product.unit_price
                )));
            }
            if product.shipments_per_year > MAX_SHIPMENTS_PER_YEAR {
                return Err(Error::InvalidData(format!(
                    "Product {} ships {} times per year, limit is {}",
                    product.name, product.shipments_per_year, MAX_SHIPMENTS_PER_YEAR
                )));
            }
        }

        Ok(Self {
            products,
            pricing,
            source: CatalogSource::Inline,
        })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn pricing(&self) -> PricingConfig {
        self.pricing
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Find a product by case-insensitive name
    pub fn get(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name_matches(name))
    }
}

/// Default catalog override path
pub fn default_catalog_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("homeplan").join("config").join("catalog.toml"))
}

/// Raw catalog structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawCatalog {
    pricing: Option<RawPricing>,
    #[serde(default)]
    products: Vec<RawProduct>,
}

#[derive(Debug, Deserialize)]
struct RawPricing {
    tax_rate: Option<f64>,
    shipping_per_shipment: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawProduct {
    name: String,
    url: Option<String>,
    unit_price: f64,
    shipments_per_year: u32,
    category: Option<ProductCategory>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalog_parses() {
        let catalog = Catalog::embedded().unwrap();
        assert!(!catalog.is_empty());
        assert_eq!(catalog.source(), &CatalogSource::Embedded);
        assert_eq!(catalog.pricing().tax_rate, 0.07);

        let shampoo = catalog.get("shampoo").unwrap();
        assert_eq!(shampoo.unit_price, 14.0);
        assert_eq!(shampoo.shipments_per_year, 4);
        assert_eq!(shampoo.category, ProductCategory::HygieneVariant);
    }

    #[test]
    fn test_category_inferred_when_missing() {
        let catalog = Catalog::from_toml(
            r#"
[[products]]
name = "Bar Shampoo"
unit_price = 9.0
shipments_per_year = 2

[[products]]
name = "Dish Soap"
unit_price = 8.5
shipments_per_year = 6
"#,
        )
        .unwrap();

        assert_eq!(
            catalog.get("bar shampoo").unwrap().category,
            ProductCategory::HygieneVariant
        );
        assert_eq!(
            catalog.get("Dish Soap").unwrap().category,
            ProductCategory::Fixed
        );
        assert_eq!(catalog.pricing(), PricingConfig::default());
    }

    #[test]
    fn test_explicit_category_wins() {
        let catalog = Catalog::from_toml(
            r#"
[[products]]
name = "Shampoo Brush"
unit_price = 7.0
shipments_per_year = 1
category = "fixed"
"#,
        )
        .unwrap();
        assert_eq!(
            catalog.get("Shampoo Brush").unwrap().category,
            ProductCategory::Fixed
        );
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = Catalog::from_toml(
            r#"
[[products]]
name = "Shampoo"
unit_price = 14.0
shipments_per_year = 4

[[products]]
name = "SHAMPOO"
unit_price = 12.0
shipments_per_year = 4
"#,
        );
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_negative_price_rejected() {
        let result = Catalog::from_toml(
            r#"
[[products]]
name = "Soap"
unit_price = -1.0
shipments_per_year = 4
"#,
        );
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_excessive_cadence_rejected() {
        let products = ["https://a.com/soap", "https://b.com/soap"]
            .iter()
            .enumerate()
            .map(|(i, url)| Product {
                name: format!("Soap {}", i),
                url: Some(url.to_string()),
                unit_price: 1.0,
                shipments_per_year: u32::MAX,
                category: ProductCategory::Fixed,
            })
            .collect();
        let result = Catalog::new(products, PricingConfig::default());
        assert!(matches!(result, Err(Error::InvalidData(_))));

        let result = Catalog::from_toml(
            r#"
[[products]]
name = "Daily Wipes"
unit_price = 2.0
shipments_per_year = 366
"#,
        );
        assert!(matches!(result, Err(Error::InvalidData(_))));

        let catalog = Catalog::from_toml(
            r#"
[[products]]
name = "Daily Wipes"
unit_price = 2.0
shipments_per_year = 365
"#,
        )
        .unwrap();
        assert_eq!(catalog.products()[0].shipments_per_year, MAX_SHIPMENTS_PER_YEAR);
    }

    #[test]
    fn test_invalid_pricing_rejected() {
        let result = Catalog::from_toml(
            r#"
[pricing]
tax_rate = -0.5
"#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_blank_url_becomes_none() {
        let catalog = Catalog::from_toml(
            r#"
[[products]]
name = "Wraps"
url = "   "
unit_price = 18.0
shipments_per_year = 1
"#,
        )
        .unwrap();
        let wraps = catalog.get("wraps").unwrap();
        assert!(wraps.url.is_none());
        assert!(wraps.store().is_none());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        fs::write(
            &path,
            r#"
[pricing]
tax_rate = 0.1
shipping_per_shipment = 4.0

[[products]]
name = "Soap"
url = "https://soap.example/bar"
unit_price = 5.0
shipments_per_year = 2
"#,
        )
        .unwrap();

        let catalog = Catalog::load(Some(&path)).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.pricing().tax_rate, 0.1);
        assert_eq!(catalog.source(), &CatalogSource::File(path.clone()));
        assert_eq!(
            catalog.get("soap").unwrap().store().as_deref(),
            Some("soap.example")
        );
    }

    #[test]
    fn test_load_missing_file_errors() {
        let result = Catalog::from_file(Path::new("/nonexistent/catalog.toml"));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
