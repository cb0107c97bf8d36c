//! Template summary formatter
//!
//! Renders the plan's headline numbers as a short paragraph. Deterministic:
//! the same inputs always produce the same text.

use crate::profile::HouseholdProfile;

/// Sentence used when the household composition is unknown
pub const FALLBACK_HOUSEHOLD_SENTENCE: &str =
    "We built a starter plan sized for a single household.";

/// Numbers and passthrough text the summary is built from
#[derive(Debug, Clone, Copy)]
pub struct SummaryInput<'a> {
    pub profile: &'a HouseholdProfile,
    pub want_to_add: &'a str,
    pub top_concerns: &'a str,
    pub grand_total: f64,
    pub year_tax: f64,
    pub shipping_year: f64,
    pub total_shipments: u32,
    pub first_month_total: f64,
    pub average_monthly: f64,
}

/// Render the summary paragraph
pub fn render(input: &SummaryInput<'_>) -> String {
    let mut sentences = vec![household_sentence(input.profile)];

    sentences.push(format!(
        "Your estimated first-year total is {}, including {} tax and {} shipping across {} store {}.",
        money(input.grand_total),
        money(input.year_tax),
        money(input.shipping_year),
        input.total_shipments,
        plural(input.total_shipments, "shipment", "shipments"),
    ));

    if input.first_month_total > 0.0 {
        sentences.push(format!(
            "Month 1 comes to {} before shipping.",
            money(input.first_month_total)
        ));
    }

    if input.average_monthly > 0.0 {
        sentences.push(format!(
            "Months 2-12 average about {} per month.",
            money(input.average_monthly)
        ));
    }

    if !input.top_concerns.trim().is_empty() {
        sentences.push(format!(
            "You mentioned these concerns: {}.",
            input.top_concerns
        ));
    }

    if !input.want_to_add.trim().is_empty() {
        sentences.push(format!("You also want to add: {}.", input.want_to_add));
    }

    sentences.join(" ")
}

fn household_sentence(profile: &HouseholdProfile) -> String {
    if profile.household_size() == 0 {
        return FALLBACK_HOUSEHOLD_SENTENCE.to_string();
    }

    let mut parts = Vec::new();
    if profile.females_adult > 0 {
        parts.push(format!(
            "{} adult {}",
            profile.females_adult,
            plural(profile.females_adult, "woman", "women")
        ));
    }
    if profile.males_adult > 0 {
        parts.push(format!(
            "{} adult {}",
            profile.males_adult,
            plural(profile.males_adult, "man", "men")
        ));
    }
    if profile.kids > 0 {
        parts.push(format!(
            "{} {}",
            profile.kids,
            plural(profile.kids, "child", "children")
        ));
    }

    format!(
        "This plan covers a household of {}: {}.",
        profile.household_size(),
        join_list(&parts)
    )
}

/// "a", "a and b", "a, b and c"
fn join_list(parts: &[String]) -> String {
    match parts {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

fn plural<'a>(n: u32, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}

/// Format a currency amount with two decimals
pub fn money(amount: f64) -> String {
    format!("${:.2}", amount)
}
