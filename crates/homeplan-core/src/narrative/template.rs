//! Template narrative backend
//!
//! Builds the narrative from the computed plan alone: no network, no model.
//! Used when no language model is configured.

use async_trait::async_trait;

use crate::catalog::ProductCategory;
use crate::error::Result;
use crate::pricing::PlanResult;
use crate::summary::money;

use super::types::{Narrative, NarrativeCategory, NarrativeRequest};
use super::NarrativeBackend;

/// How many products make the priority list
const PRIORITY_STEPS: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct TemplateBackend;

impl TemplateBackend {
    pub fn new() -> Self {
        Self
    }

    /// Narrative for a computed plan
    pub fn narrate_plan(plan: &PlanResult) -> Narrative {
        let mut by_cost: Vec<_> = plan.rest_of_year.products.iter().collect();
        // Stable sort keeps catalog order for ties
        by_cost.sort_by(|a, b| b.year_total.total_cmp(&a.year_total));

        let priority_steps = by_cost
            .iter()
            .take(PRIORITY_STEPS)
            .map(|item| {
                format!(
                    "Switch to {} first ({} for the year)",
                    item.name,
                    money(item.year_total)
                )
            })
            .collect();

        let mut categories = Vec::new();
        for (category, name, reason) in [
            (
                ProductCategory::HygieneVariant,
                "Personal care",
                "Each group in your household gets its own formula",
            ),
            (
                ProductCategory::Fixed,
                "Home essentials",
                "One supply covers the whole household",
            ),
        ] {
            let recommendations: Vec<String> = plan
                .first_month
                .products
                .iter()
                .filter(|p| p.category == category)
                .map(|p| p.name.clone())
                .collect();
            if !recommendations.is_empty() {
                categories.push(NarrativeCategory {
                    name: name.to_string(),
                    reason: reason.to_string(),
                    recommendations,
                });
            }
        }

        Narrative {
            summary: plan.summary.clone(),
            priority_steps,
            categories,
        }
    }
}

#[async_trait]
impl NarrativeBackend for TemplateBackend {
    async fn narrate(&self, request: &NarrativeRequest<'_>) -> Result<Narrative> {
        Ok(request.plan.map(Self::narrate_plan).unwrap_or_default())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn model(&self) -> &str {
        "template"
    }

    fn host(&self) -> &str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use super::*;
    use crate::catalog::Catalog;
    use crate::pricing::PricingEngine;
    use crate::profile::QuizAnswers;

    fn plan() -> PlanResult {
        let engine = PricingEngine::new(Arc::new(Catalog::embedded().unwrap()));
        engine.plan(&QuizAnswers::from_pairs([("females_13_plus", "1")]))
    }

    #[test]
    fn test_priority_steps_are_costliest_products() {
        let plan = plan();
        let narrative = TemplateBackend::narrate_plan(&plan);

        assert_eq!(narrative.summary, plan.summary);
        assert_eq!(narrative.priority_steps.len(), PRIORITY_STEPS);

        let max = plan
            .rest_of_year
            .products
            .iter()
            .max_by(|a, b| a.year_total.total_cmp(&b.year_total))
            .unwrap();
        assert!(narrative.priority_steps[0].contains(&max.name));
    }

    #[test]
    fn test_categories_split_by_product_category() {
        let narrative = TemplateBackend::narrate_plan(&plan());
        let names: Vec<_> = narrative.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Personal care", "Home essentials"]);
        assert!(narrative.categories[0]
            .recommendations
            .contains(&"Shampoo".to_string()));
    }

    #[tokio::test]
    async fn test_narrate_without_plan_is_empty() {
        let quiz = BTreeMap::new();
        let narrative = TemplateBackend::new()
            .narrate(&NarrativeRequest {
                quiz: &quiz,
                plan: None,
            })
            .await
            .unwrap();
        assert!(narrative.is_empty());
    }
}
