//! Plan command implementation

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use homeplan_core::narrative::{
    narrative_timeout_from_env, Narrative, NarrativeClient, NarrativeRequest,
};
use homeplan_core::pricing::PlanResult;
use homeplan_core::profile::QuizAnswers;
use homeplan_core::summary::money;

use super::load_engine;

/// Compute a plan from `key=value` quiz answers and print it
pub async fn cmd_plan(
    catalog: Option<&Path>,
    params: &[(String, String)],
    json: bool,
    narrative: bool,
) -> Result<()> {
    let engine = load_engine(catalog)?;
    let answers = QuizAnswers::from_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    let plan = engine.plan(&answers);

    let narrative = if narrative {
        let quiz: BTreeMap<String, String> = params.iter().cloned().collect();
        let client = NarrativeClient::from_env();
        Some(
            client
                .narrate_with_fallback(
                    &NarrativeRequest {
                        quiz: &quiz,
                        plan: Some(&plan),
                    },
                    narrative_timeout_from_env(),
                )
                .await,
        )
    } else {
        None
    };

    if json {
        println!("{}", plan_json(&plan, narrative.as_ref())?);
    } else {
        print!("{}", render_plan(&plan));
        if let Some(ref n) = narrative {
            print!("{}", render_narrative(n));
        }
    }

    Ok(())
}

/// Plan as pretty JSON, with the narrative merged in when present
pub fn plan_json(plan: &PlanResult, narrative: Option<&Narrative>) -> Result<String> {
    let mut value = serde_json::to_value(plan)?;
    if let (Some(n), Some(obj)) = (narrative, value.as_object_mut()) {
        obj.insert("narrative".to_string(), serde_json::to_value(n)?);
    }
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Human-readable plan
pub fn render_plan(plan: &PlanResult) -> String {
    let mut out = String::new();

    out.push_str(&plan.summary);
    out.push_str("\n\n");

    out.push_str("Month 1\n");
    out.push_str(&format!(
        "  {:<28} {:>4} {:>10} {:>10}\n",
        "PRODUCT", "QTY", "UNIT", "TOTAL"
    ));
    for item in &plan.first_month.products {
        out.push_str(&format!(
            "  {:<28} {:>4} {:>10} {:>10}\n",
            truncate(&item.name, 28),
            item.quantity,
            money(item.unit_price),
            money(item.line_total)
        ));
    }
    out.push_str(&format!(
        "  Subtotal {}  Tax {}  Shipping {}\n\n",
        money(plan.first_month.subtotal),
        money(plan.first_month.tax),
        money(plan.first_month.shipping)
    ));

    out.push_str("Months 2-12\n");
    for item in plan
        .rest_of_year
        .products
        .iter()
        .filter(|i| i.remaining_shipments > 0)
    {
        out.push_str(&format!(
            "  {:<28} {:>2} x {:<2} {:>10}\n",
            truncate(&item.name, 28),
            item.remaining_shipments,
            item.quantity_per_shipment,
            money(item.line_total)
        ));
    }
    out.push_str(&format!(
        "  Subtotal {}  Tax {}  Shipping {}\n\n",
        money(plan.rest_of_year.subtotal),
        money(plan.rest_of_year.tax),
        money(plan.rest_of_year.shipping)
    ));

    if !plan.meta.store_shipments.is_empty() {
        out.push_str("Shipments per year\n");
        for (store, shipments) in &plan.meta.store_shipments {
            out.push_str(&format!("  {:<28} {:>4}\n", store, shipments));
        }
        out.push('\n');
    }

    for entry in &plan.schedule {
        out.push_str(&format!("{:<32} {:>10}\n", entry.label, money(entry.amount)));
    }
    out.push_str(&format!(
        "{:<32} {:>10}\n",
        "First-year total",
        money(plan.year_totals.grand_total)
    ));

    out
}

/// Human-readable narrative; empty when the backend returned nothing
pub fn render_narrative(narrative: &Narrative) -> String {
    if narrative.is_empty() {
        return "\n(no narrative available)\n".to_string();
    }

    let mut out = String::from("\nNarrative\n");
    if !narrative.summary.is_empty() {
        out.push_str(&format!("  {}\n", narrative.summary));
    }
    for (i, step) in narrative.priority_steps.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, step));
    }
    for category in &narrative.categories {
        out.push_str(&format!(
            "  {}: {}\n",
            category.name,
            category.recommendations.join(", ")
        ));
    }
    out
}

/// Truncate on a char boundary, marking the cut with "..."
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
