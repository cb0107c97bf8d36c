//! JSON parsing helpers for narrative backend responses
//!
//! Models often wrap their JSON in prose or code fences, so the outermost
//! `{...}` block is extracted before deserializing.

use crate::error::{Error, Result};

use super::types::Narrative;

/// Maximum raw response length echoed into error messages
const RAW_PREVIEW_LEN: usize = 200;

/// Parse a narrative from a model response
pub fn parse_narrative(response: &str) -> Result<Narrative> {
    let response = response.trim();
    let start = response.find('{');
    let end = response.rfind('}');

    match (start, end) {
        (Some(s), Some(e)) if s < e => {
            let json_str = &response[s..=e];
            serde_json::from_str(json_str).map_err(|e| {
                Error::InvalidData(format!(
                    "Invalid narrative JSON from model: {} | Raw: {}",
                    e,
                    preview(json_str)
                ))
            })
        }
        _ => Err(Error::InvalidData(format!(
            "No JSON found in model response | Raw: {}",
            preview(response)
        ))),
    }
}

fn preview(s: &str) -> String {
    if s.chars().count() > RAW_PREVIEW_LEN {
        format!("{}...", s.chars().take(RAW_PREVIEW_LEN).collect::<String>())
    } else {
        s.to_string()
    }
}
