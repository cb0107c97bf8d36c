//! Pricing and shipping allocation engine
//!
//! Turns the catalog, a household profile and an exclusion list into a
//! first-year cost plan:
//!
//! - Month 1 buys one shipment of every included product (times its variant
//!   multiplier).
//! - Months 2-12 cover the remaining `shipments_per_year - 1` refills.
//! - Shipping is charged per store per shipment, where a store ships as often
//!   as its most frequently refilled product.
//!
//! Every named monetary aggregate is rounded to cents when it is computed, not
//! at the end, so totals match penny-for-penny what customers see on the
//! storefront. One consequence: `first_month.subtotal + rest_of_year.subtotal`
//! can differ from `year_totals.subtotal` by float representation only, since
//! the rest-of-year subtotal is derived by subtraction.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::catalog::{Catalog, ProductCategory};
use crate::profile::{ExclusionSet, QuizAnswers};
use crate::summary::{self, SummaryInput};
use crate::variant;

/// Months covered by the rest-of-year window (months 2 through 12)
pub const REST_OF_YEAR_MONTHS: f64 = 11.0;

/// Schedule label for the stock-up month
pub const MONTH_ONE_LABEL: &str = "Month 1";

/// Schedule label for the refill months
pub const REST_OF_YEAR_LABEL: &str = "Months 2-12 (average per month)";

/// Round a currency amount to cents
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Store hostname -> shipments per year needed from that store
pub type StoreShipments = BTreeMap<String, u32>;

/// A product as bought in month 1
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FirstMonthItem {
    pub name: String,
    pub url: Option<String>,
    pub store: Option<String>,
    pub category: ProductCategory,
    /// Formulas bought (1 for fixed products)
    pub variants: u32,
    pub quantity: u32,
    pub unit_price: f64,
    pub line_total: f64,
}

/// A product's refills over months 2-12
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestOfYearItem {
    pub name: String,
    pub store: Option<String>,
    pub category: ProductCategory,
    pub variants: u32,
    pub shipments_per_year: u32,
    pub remaining_shipments: u32,
    pub quantity_per_shipment: u32,
    pub unit_price: f64,
    pub line_total: f64,
    /// Month 1 plus refills for this product
    pub year_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub shipping: f64,
    pub grand_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FirstMonth {
    pub products: Vec<FirstMonthItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub shipping: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestOfYear {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub average_monthly: f64,
    pub shipping: f64,
    pub products: Vec<RestOfYearItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleEntry {
    pub label: String,
    pub amount: f64,
}

/// Echo of the resolved inputs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanMeta {
    pub females_13_plus: u32,
    pub males_13_plus: u32,
    pub kids_0_12: u32,
    pub household_size: u32,
    pub has_women: bool,
    pub has_men: bool,
    pub has_kids: bool,
    #[serde(rename = "wontUse")]
    pub wont_use: ExclusionSet,
    #[serde(rename = "wantToAdd")]
    pub want_to_add: String,
    #[serde(rename = "topConcerns")]
    pub top_concerns: String,
    pub scent_preferences: BTreeMap<String, String>,
    pub store_shipments: StoreShipments,
    /// Included products with no shipments (never priced)
    pub informational_products: Vec<String>,
    pub tax_rate: f64,
    pub shipping_per_shipment: f64,
}

/// The full first-year plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanResult {
    pub summary: String,
    pub year_totals: YearTotals,
    pub first_month: FirstMonth,
    pub rest_of_year: RestOfYear,
    pub schedule: Vec<ScheduleEntry>,
    pub meta: PlanMeta,
}

impl PlanResult {
    /// Total shipments per year across all stores
    pub fn total_shipments(&self) -> u32 {
        self.meta.store_shipments.values().sum()
    }
}

/// Stateless plan calculator over a shared catalog
#[derive(Debug, Clone)]
pub struct PricingEngine {
    catalog: Arc<Catalog>,
}

impl PricingEngine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Compute the first-year plan for one quiz submission
    pub fn plan(&self, quiz: &QuizAnswers) -> PlanResult {
        let pricing = self.catalog.pricing();
        let profile = quiz.profile;

        let mut first_items = Vec::new();
        let mut rest_items = Vec::new();
        let mut informational = Vec::new();
        let mut stores = StoreShipments::new();

        // Running sums stay unrounded until the loop ends
        let mut yearly_subtotal = 0.0;
        let mut first_month_subtotal = 0.0;

        for product in self.catalog.products() {
            if quiz.exclusions.contains(&product.name) {
                continue;
            }

            let shipments = product.shipments_per_year;
            if shipments == 0 {
                informational.push(product.name.clone());
                continue;
            }

            let variants = variant::multiplier(product.category, &profile);
            let remaining = shipments.saturating_sub(1);

            let initial_cost = round2(variants as f64 * product.unit_price);
            let refills_cost = round2(remaining as f64 * product.unit_price * variants as f64);
            let year_cost = round2(initial_cost + refills_cost);

            yearly_subtotal += year_cost;
            first_month_subtotal += initial_cost;

            let store = product.store();
            if let Some(ref key) = store {
                let entry = stores.entry(key.clone()).or_insert(0);
                *entry = (*entry).max(shipments);
            }

            first_items.push(FirstMonthItem {
                name: product.name.clone(),
                url: product.url.clone(),
                store: store.clone(),
                category: product.category,
                variants,
                quantity: variants,
                unit_price: product.unit_price,
                line_total: initial_cost,
            });

            rest_items.push(RestOfYearItem {
                name: product.name.clone(),
                store,
                category: product.category,
                variants,
                shipments_per_year: shipments,
                remaining_shipments: remaining,
                quantity_per_shipment: variants,
                unit_price: product.unit_price,
                line_total: refills_cost,
                year_total: year_cost,
            });
        }

        let yearly_subtotal = round2(yearly_subtotal);
        let first_month_subtotal = round2(first_month_subtotal);

        let total_shipments: u32 = stores.values().sum();
        let shipping_year = round2(total_shipments as f64 * pricing.shipping_per_shipment);
        // Month 1 assumes exactly one shipment per store
        let first_month_shipping = round2(stores.len() as f64 * pricing.shipping_per_shipment);
        let rest_shipping = round2(shipping_year - first_month_shipping);

        let year_tax = round2(yearly_subtotal * pricing.tax_rate);
        let grand_total = round2(round2(yearly_subtotal + year_tax) + shipping_year);

        let first_month_tax = round2(first_month_subtotal * pricing.tax_rate);
        let first_month_total = round2(first_month_subtotal + first_month_tax);

        let rest_subtotal = round2(yearly_subtotal - first_month_subtotal);
        let rest_tax = round2(rest_subtotal * pricing.tax_rate);
        let rest_total = round2(rest_subtotal + rest_tax);
        let average_monthly = if rest_total > 0.0 {
            round2(rest_total / REST_OF_YEAR_MONTHS)
        } else {
            0.0
        };

        debug!(
            household_size = profile.household_size(),
            excluded = quiz.exclusions.len(),
            products = first_items.len(),
            stores = stores.len(),
            grand_total,
            "Computed plan"
        );

        let summary = summary::render(&SummaryInput {
            profile: &profile,
            want_to_add: &quiz.want_to_add,
            top_concerns: &quiz.top_concerns,
            grand_total,
            year_tax,
            shipping_year,
            total_shipments,
            first_month_total,
            average_monthly,
        });

        PlanResult {
            summary,
            year_totals: YearTotals {
                subtotal: yearly_subtotal,
                tax: year_tax,
                shipping: shipping_year,
                grand_total,
            },
            first_month: FirstMonth {
                products: first_items,
                subtotal: first_month_subtotal,
                tax: first_month_tax,
                total: first_month_total,
                shipping: first_month_shipping,
            },
            rest_of_year: RestOfYear {
                subtotal: rest_subtotal,
                tax: rest_tax,
                total: rest_total,
                average_monthly,
                shipping: rest_shipping,
                products: rest_items,
            },
            schedule: vec![
                ScheduleEntry {
                    label: MONTH_ONE_LABEL.to_string(),
                    amount: first_month_total,
                },
                ScheduleEntry {
                    label: REST_OF_YEAR_LABEL.to_string(),
                    amount: average_monthly,
                },
            ],
            meta: PlanMeta {
                females_13_plus: profile.females_adult,
                males_13_plus: profile.males_adult,
                kids_0_12: profile.kids,
                household_size: profile.household_size(),
                has_women: profile.has_women(),
                has_men: profile.has_men(),
                has_kids: profile.has_kids(),
                wont_use: quiz.exclusions.clone(),
                want_to_add: quiz.want_to_add.clone(),
                top_concerns: quiz.top_concerns.clone(),
                scent_preferences: quiz.scent_preferences.clone(),
                store_shipments: stores,
                informational_products: informational,
                tax_rate: pricing.tax_rate,
                shipping_per_shipment: pricing.shipping_per_shipment,
            },
        }
    }
}
