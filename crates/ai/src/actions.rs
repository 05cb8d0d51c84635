//! `summarize` / `plan` action dispatch.

use std::str::FromStr;
use std::sync::LazyLock;

use flux_core::error::CoreError;
use regex::Regex;
use serde::Serialize;

use crate::client::TextGenerator;

/// Number of steps a plan is cut to.
pub const PLAN_STEP_COUNT: usize = 3;

/// Leading list marker of a plan line: bullets, `1.` / `1)` numbering, or
/// `Step 1:` prefixes.
static STEP_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[-*•]\s*|\d+\s*[.)]\s*|step\s*\d+\s*[:.)-]?\s*)")
        .expect("step marker regex is valid")
});

/// A recognised AI action tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiAction {
    Summarize,
    Plan,
}

impl FromStr for AiAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summarize" => Ok(AiAction::Summarize),
            "plan" => Ok(AiAction::Plan),
            other => Err(CoreError::InvalidAction(format!(
                "Unknown AI action '{other}'"
            ))),
        }
    }
}

/// Result of an action: free text for `summarize`, steps for `plan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AiOutput {
    Summary(String),
    Plan(Vec<String>),
}

/// Run `action` on `content`.
pub async fn dispatch(generator: &dyn TextGenerator, action: AiAction, content: &str) -> AiOutput {
    match action {
        AiAction::Summarize => AiOutput::Summary(summarize(generator, content).await),
        AiAction::Plan => AiOutput::Plan(plan(generator, content).await),
    }
}

/// Summarize `content`. A failed generation yields its inline error text.
pub async fn summarize(generator: &dyn TextGenerator, content: &str) -> String {
    let prompt = format!("Summarize the following text concisely:\n\n{content}");
    match generator.generate_text(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "Summarize failed, returning inline error");
            e.degraded_message().to_string()
        }
    }
}

/// Break `goal` into at most three steps.
///
/// Falls back to [`template_plan`] when generation fails or the reply has
/// no recognisable list items.
pub async fn plan(generator: &dyn TextGenerator, goal: &str) -> Vec<String> {
    let prompt = format!(
        "Break down the following goal into {PLAN_STEP_COUNT} actionable steps:\n\n{goal}"
    );
    match generator.generate_text(&prompt).await {
        Ok(reply) => {
            let steps = parse_plan_steps(&reply);
            if steps.is_empty() {
                tracing::debug!("Plan reply had no list items, using template");
                template_plan(goal)
            } else {
                steps
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Plan generation failed, using template");
            template_plan(goal)
        }
    }
}

/// Extract list items from a generated plan, markers stripped.
///
/// Only lines carrying a list marker count, so preambles such as
/// "Here are three steps:" are skipped.
pub fn parse_plan_steps(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(str::trim)
        .filter_map(|line| {
            let marker = STEP_MARKER.find(line)?;
            let step = line[marker.end()..].trim().trim_matches('*').trim();
            (!step.is_empty()).then(|| step.to_string())
        })
        .take(PLAN_STEP_COUNT)
        .collect()
}

/// The fixed three-phase breakdown used when no real plan is available.
pub fn template_plan(goal: &str) -> Vec<String> {
    let head: String = goal.chars().take(10).collect();
    vec![
        format!("Phase 1: Research {head}..."),
        "Phase 2: Implement core logic".to_string(),
        "Phase 3: Verify and Launch".to_string(),
    ]
}
