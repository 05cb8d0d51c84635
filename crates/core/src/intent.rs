//! Heuristic intent detection over note content.
//!
//! A single pass over the text proposes at most one task-list conversion and
//! at most one scheduling suggestion. This is keyword matching, not a model:
//! the same input always yields the same intents, and the note itself is
//! never modified.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Confidence attached to a task-list conversion.
pub const CONVERT_TO_TASKS_CONFIDENCE: f64 = 0.9;

/// Confidence attached to a scheduling suggestion.
pub const SCHEDULE_EVENT_CONFIDENCE: f64 = 0.7;

/// Words that mark a note as something to put on the calendar.
pub const SCHEDULING_KEYWORDS: &[&str] = &[
    "tomorrow",
    "next week",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Leading list markers (`- [ ]`, `-`, `[]`) or the first `todo:` tag.
static TASK_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^-\s*\[\s*\]\s*|^-\s*|^\[\s*\]\s*|todo:\s*").expect("valid task marker regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntentType {
    ConvertToTasks,
    ScheduleEvent,
}

/// Data carried by an intent, shaped by its type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IntentPayload {
    Tasks { tasks: Vec<String> },
    Schedule { original_text: String },
}

/// A suggested transformation of a note.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Intent {
    #[serde(rename = "type")]
    pub intent_type: IntentType,
    pub confidence: f64,
    pub payload: IntentPayload,
    pub description: String,
}

/// Propose intents for `content`.
///
/// Task conversion is reported before scheduling when both apply.
pub fn detect_intents(content: &str) -> Vec<Intent> {
    let mut intents = Vec::with_capacity(2);

    let tasks: Vec<String> = content
        .split('\n')
        .filter(|line| looks_like_task(line))
        .map(strip_task_marker)
        .collect();

    if !tasks.is_empty() {
        intents.push(Intent {
            intent_type: IntentType::ConvertToTasks,
            confidence: CONVERT_TO_TASKS_CONFIDENCE,
            description: format!("Convert {} lines into tasks", tasks.len()),
            payload: IntentPayload::Tasks { tasks },
        });
    }

    let lowered = content.to_lowercase();
    if SCHEDULING_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        intents.push(Intent {
            intent_type: IntentType::ScheduleEvent,
            confidence: SCHEDULE_EVENT_CONFIDENCE,
            payload: IntentPayload::Schedule {
                original_text: content.to_string(),
            },
            description: "Schedule this as an event".to_string(),
        });
    }

    intents
}

fn looks_like_task(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with("- ")
        || trimmed.starts_with("- [ ]")
        || trimmed.starts_with("[] ")
        || line.to_lowercase().contains("todo:")
}

fn strip_task_marker(line: &str) -> String {
    TASK_MARKER.replace(line.trim(), "").trim().to_string()
}
