//! Catalog command implementation

use std::path::Path;

use anyhow::{bail, Result};
use homeplan_core::catalog::{Catalog, Product};
use homeplan_core::summary::money;

use super::load_engine;
use super::plan::truncate;

/// List products, or show a single product by name
pub fn cmd_catalog(catalog: Option<&Path>, name: Option<&str>) -> Result<()> {
    let engine = load_engine(catalog)?;
    print!("{}", render_catalog(engine.catalog(), name)?);
    Ok(())
}

pub fn render_catalog(catalog: &Catalog, name: Option<&str>) -> Result<String> {
    match name {
        Some(name) => match catalog.get(name) {
            Some(product) => Ok(render_product(product)),
            None => bail!("Product not found: {}", name),
        },
        None => {
            let mut out = format!(
                "{:<28} {:>10} {:>9}  {:<15}  {}\n",
                "PRODUCT", "PRICE", "SHIP/YR", "CATEGORY", "STORE"
            );
            out.push_str(&format!("{}\n", "-".repeat(80)));
            for product in catalog.products() {
                out.push_str(&format!(
                    "{:<28} {:>10} {:>9}  {:<15}  {}\n",
                    truncate(&product.name, 28),
                    money(product.unit_price),
                    product.shipments_per_year,
                    product.category.as_str(),
                    product.store().unwrap_or_else(|| "-".to_string())
                ));
            }
            let pricing = catalog.pricing();
            out.push_str(&format!(
                "\n{} products ({}), tax {:.2}%, shipping {} per shipment\n",
                catalog.len(),
                catalog.source(),
                pricing.tax_rate * 100.0,
                money(pricing.shipping_per_shipment)
            ));
            Ok(out)
        }
    }
}

fn render_product(product: &Product) -> String {
    format!(
        "Name:               {}\nCategory:           {}\nUnit price:         {}\nShipments per year: {}\nStore:              {}\nURL:                {}\n",
        product.name,
        product.category.as_str(),
        money(product.unit_price),
        product.shipments_per_year,
        product.store().unwrap_or_else(|| "-".to_string()),
        product.url.as_deref().unwrap_or("-")
    )
}
