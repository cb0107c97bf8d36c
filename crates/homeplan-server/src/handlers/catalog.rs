//! Catalog browsing handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use homeplan_core::catalog::{PricingConfig, Product, ProductCategory};

use crate::{AppError, AppState};

/// A catalog product with its derived store
#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    pub name: String,
    pub url: Option<String>,
    pub store: Option<String>,
    pub category: ProductCategory,
    pub unit_price: f64,
    pub shipments_per_year: u32,
}

impl From<&Product> for CatalogEntry {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            url: product.url.clone(),
            store: product.store(),
            category: product.category,
            unit_price: product.unit_price,
            shipments_per_year: product.shipments_per_year,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub pricing: PricingConfig,
    pub products: Vec<CatalogEntry>,
}

/// GET /catalog - List every product in catalog order
pub async fn list_catalog(State(state): State<Arc<AppState>>) -> Json<CatalogResponse> {
    let catalog = state.engine.catalog();
    Json(CatalogResponse {
        pricing: catalog.pricing(),
        products: catalog.products().iter().map(CatalogEntry::from).collect(),
    })
}

/// GET /catalog/:name - Look up one product (case-insensitive)
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<CatalogEntry>, AppError> {
    state
        .engine
        .catalog()
        .get(&name)
        .map(|p| Json(CatalogEntry::from(p)))
        .ok_or_else(|| AppError::not_found("Product not found"))
}
