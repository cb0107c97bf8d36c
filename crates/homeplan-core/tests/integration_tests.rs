//! Integration tests for homeplan-core
//!
//! These tests exercise the full quiz -> plan workflow against the embedded
//! catalog and against small hand-built catalogs.

use std::collections::HashMap;
use std::sync::Arc;

use homeplan_core::{
    catalog::{Catalog, PricingConfig, Product, ProductCategory},
    pricing::{round2, PricingEngine, MONTH_ONE_LABEL, REST_OF_YEAR_LABEL},
    profile::QuizAnswers,
    summary::FALLBACK_HOUSEHOLD_SENTENCE,
};

fn embedded_engine() -> PricingEngine {
    PricingEngine::new(Arc::new(Catalog::embedded().expect("embedded catalog parses")))
}

fn product(name: &str, url: Option<&str>, price: f64, shipments: u32) -> Product {
    Product {
        name: name.to_string(),
        url: url.map(str::to_string),
        unit_price: price,
        shipments_per_year: shipments,
        category: ProductCategory::infer(name),
    }
}

fn engine_with(products: Vec<Product>) -> PricingEngine {
    let catalog = Catalog::new(products, PricingConfig::default()).expect("valid catalog");
    PricingEngine::new(Arc::new(catalog))
}

fn query(pairs: &[(&str, &str)]) -> QuizAnswers {
    let params: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    QuizAnswers::from_params(&params)
}

// =============================================================================
// Worked examples
// =============================================================================

#[test]
fn test_single_woman_shampoo() {
    let engine = engine_with(vec![product(
        "Shampoo",
        Some("https://shop.cleanroots.co/shampoo"),
        14.0,
        4,
    )]);
    let plan = engine.plan(&query(&[("females_13_plus", "1")]));

    let first = &plan.first_month.products[0];
    assert_eq!(first.variants, 1);
    assert_eq!(first.line_total, 14.0);

    let rest = &plan.rest_of_year.products[0];
    assert_eq!(rest.remaining_shipments, 3);
    assert_eq!(rest.line_total, 42.0);
    assert_eq!(rest.year_total, 56.0);

    assert_eq!(plan.year_totals.subtotal, 56.0);
    assert_eq!(plan.year_totals.tax, 3.92);
    assert_eq!(plan.year_totals.shipping, round2(4.0 * 5.99));
    assert_eq!(plan.year_totals.grand_total, round2(56.0 + 3.92 + 23.96));
}

#[test]
fn test_wont_use_excludes_toilet_paper() {
    let plan = embedded_engine().plan(&query(&[("wontUse", "Toilet Paper")]));

    assert!(plan.meta.wont_use.contains("toilet paper"));
    assert!(plan
        .first_month
        .products
        .iter()
        .all(|p| p.name != "Toilet Paper"));
    assert!(plan
        .rest_of_year
        .products
        .iter()
        .all(|p| p.name != "Toilet Paper"));
    assert!(!plan.meta.store_shipments.contains_key("bambooroll.com"));
}

#[test]
fn test_empty_query_uses_fallback() {
    let plan = embedded_engine().plan(&QuizAnswers::default());

    assert_eq!(plan.meta.household_size, 0);
    assert!(plan.summary.starts_with(FALLBACK_HOUSEHOLD_SENTENCE));
    for item in &plan.first_month.products {
        assert_eq!(item.variants, 1, "{} should have one variant", item.name);
    }
}

// =============================================================================
// Invariants over the embedded catalog
// =============================================================================

#[test]
fn test_embedded_catalog_store_consolidation() {
    let plan = embedded_engine().plan(&query(&[("females_13_plus", "2")]));
    let stores = &plan.meta.store_shipments;

    assert_eq!(stores.get("shop.cleanroots.co"), Some(&4));
    // Toothpaste (6) and Deodorant (4) share a store
    assert_eq!(stores.get("earthsmile.com"), Some(&6));
    assert_eq!(stores.get("greenhearth.com"), Some(&6));
    assert_eq!(stores.get("bambooroll.com"), Some(&6));
    assert_eq!(stores.get("purepour.com"), Some(&4));
    assert_eq!(stores.len(), 5);

    assert_eq!(plan.total_shipments(), 26);
    assert_eq!(plan.year_totals.shipping, round2(26.0 * 5.99));
    assert_eq!(plan.first_month.shipping, round2(5.0 * 5.99));
    assert_eq!(
        plan.rest_of_year.shipping,
        round2(plan.year_totals.shipping - plan.first_month.shipping)
    );
}

#[test]
fn test_informational_products_are_not_priced() {
    let plan = embedded_engine().plan(&QuizAnswers::default());
    assert_eq!(plan.meta.informational_products, vec!["Healthy Home Guide"]);
    assert!(plan
        .first_month
        .products
        .iter()
        .all(|p| p.name != "Healthy Home Guide"));
    assert!(!plan.meta.store_shipments.contains_key("healthyhome.example"));
}

#[test]
fn test_first_month_never_exceeds_year() {
    let engine = embedded_engine();
    for (f, m, k) in [("0", "0", "0"), ("1", "0", "0"), ("2", "3", "4"), ("0", "1", "2")] {
        let plan = engine.plan(&query(&[
            ("females_13_plus", f),
            ("males_13_plus", m),
            ("kids_0_12", k),
        ]));
        assert!(plan.first_month.subtotal <= plan.year_totals.subtotal);
        // Water Filter Pitcher ships once, everything else refills
        assert!(plan.first_month.subtotal < plan.year_totals.subtotal);
    }
}

#[test]
fn test_one_shot_catalog_has_equal_subtotals() {
    let engine = engine_with(vec![
        product("Water Filter Pitcher", Some("https://purepour.com/p"), 39.0, 1),
        product("Beeswax Food Wraps", None, 18.0, 1),
    ]);
    let plan = engine.plan(&QuizAnswers::default());

    assert_eq!(plan.first_month.subtotal, plan.year_totals.subtotal);
    assert_eq!(plan.rest_of_year.subtotal, 0.0);
    assert_eq!(plan.rest_of_year.average_monthly, 0.0);
    assert_eq!(plan.meta.store_shipments.len(), 1);
}

#[test]
fn test_variant_products_scale_with_groups() {
    let plan = embedded_engine().plan(&query(&[
        ("females_13_plus", "1"),
        ("males_13_plus", "1"),
        ("kids_0_12", "1"),
    ]));

    for item in &plan.first_month.products {
        let expected = match item.category {
            ProductCategory::HygieneVariant => 3,
            ProductCategory::Fixed => 1,
        };
        assert_eq!(item.variants, expected, "{}", item.name);
    }
}

#[test]
fn test_schedule_labels_and_amounts() {
    let plan = embedded_engine().plan(&query(&[("kids_0_12", "2")]));

    assert_eq!(plan.schedule.len(), 2);
    assert_eq!(plan.schedule[0].label, MONTH_ONE_LABEL);
    assert_eq!(plan.schedule[0].amount, plan.first_month.total);
    assert_eq!(plan.schedule[1].label, REST_OF_YEAR_LABEL);
    assert_eq!(plan.schedule[1].amount, plan.rest_of_year.average_monthly);
}

#[test]
fn test_plan_is_idempotent() {
    let engine = embedded_engine();
    let answers = query(&[
        ("females_13_plus", "1"),
        ("kids_0_12", "3"),
        ("wontUse", "Dish Soap, deodorant"),
        ("topConcerns", "fragrance"),
        ("scent_laundry", "unscented"),
    ]);

    let a = serde_json::to_string(&engine.plan(&answers)).unwrap();
    let b = serde_json::to_string(&engine.plan(&answers)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_serialized_shape() {
    let plan = embedded_engine().plan(&query(&[
        ("males_13_plus", "1"),
        ("wantToAdd", "Air purifier"),
        ("scent_body", "citrus"),
    ]));
    let json = serde_json::to_value(&plan).unwrap();

    for key in ["summary", "year_totals", "first_month", "rest_of_year", "schedule", "meta"] {
        assert!(json.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(json["meta"]["wantToAdd"], "Air purifier");
    assert_eq!(json["meta"]["scent_preferences"]["scent_body"], "citrus");
    assert!(json["meta"]["wontUse"].as_array().unwrap().is_empty());
    assert!(json["rest_of_year"]["products"][0]
        .get("remaining_shipments")
        .is_some());
}

#[test]
fn test_oversized_household_is_clamped() {
    let plan = embedded_engine().plan(&query(&[("females_13_plus", "100000")]));
    assert_eq!(plan.meta.females_13_plus, 50);
    assert_eq!(plan.meta.household_size, 50);
}

#[test]
fn test_catalog_override_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.toml");
    std::fs::write(
        &path,
        r#"
[pricing]
tax_rate = 0.1
shipping_per_shipment = 2.0

[[products]]
name = "Dish Soap"
url = "https://greenhearth.com/dish"
unit_price = 10.0
shipments_per_year = 2
"#,
    )
    .unwrap();

    let catalog = Catalog::load(Some(&path)).unwrap();
    let plan = PricingEngine::new(Arc::new(catalog)).plan(&QuizAnswers::default());

    assert_eq!(plan.year_totals.subtotal, 20.0);
    assert_eq!(plan.year_totals.tax, 2.0);
    assert_eq!(plan.year_totals.shipping, 4.0);
    assert_eq!(plan.year_totals.grand_total, 26.0);
}
