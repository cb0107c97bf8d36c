//! Plan handler

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;

use homeplan_core::narrative::{Narrative, NarrativeRequest};
use homeplan_core::pricing::PlanResult;
use homeplan_core::profile::QuizAnswers;

use crate::{AppError, AppState};

/// Query flag that turns the narrative call off
pub const NARRATIVE_PARAM: &str = "narrative";

/// Plan plus the optional narrative, serialized as one flat object
#[derive(Debug, Serialize)]
pub struct PlanResponse {
    #[serde(flatten)]
    pub plan: PlanResult,
    pub narrative: Narrative,
}

/// GET /plan - Compute the first-year plan for a quiz submission
///
/// Unknown parameters are ignored; malformed counts are treated as 0.
pub async fn get_plan(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let want_narrative = params
        .get(NARRATIVE_PARAM)
        .map_or(true, |v| !is_disabled(v));

    let answers = QuizAnswers::from_params(&params);
    let plan = state.engine.plan(&answers);

    let narrative = if want_narrative {
        let quiz: BTreeMap<String, String> = params
            .into_iter()
            .filter(|(k, _)| k != NARRATIVE_PARAM)
            .collect();
        state
            .narrator
            .narrate_with_fallback(
                &NarrativeRequest {
                    quiz: &quiz,
                    plan: Some(&plan),
                },
                state.config.narrative_timeout,
            )
            .await
    } else {
        Narrative::default()
    };

    let body = serde_json::to_value(PlanResponse { plan, narrative })?;
    Ok(Json(body))
}

fn is_disabled(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "false" | "0" | "no" | "off"
    )
}
