//! Availability rules for public booking.
//!
//! Rules are stored as the properties of a user's single `availability`
//! node. Their shape is a convention between the settings page and the
//! booking page; the server only guarantees a default when nothing usable
//! has been saved. Free-slot computation happens on the client.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::node::NodeProperties;

/// Title given to the availability node created on first save.
pub const AVAILABILITY_NODE_TITLE: &str = "Default Availability";

/// Weekly recurring bookable hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityRules {
    /// Short weekday names (`"Mon"`, `"Tue"`, ...).
    pub days: Vec<String>,
    /// Local start of the bookable window, `HH:MM`.
    pub start: String,
    /// Local end of the bookable window, `HH:MM`.
    pub end: String,
}

impl Default for AvailabilityRules {
    /// Monday to Friday, 09:00 to 17:00.
    fn default() -> Self {
        Self {
            days: ["Mon", "Tue", "Wed", "Thu", "Fri"]
                .into_iter()
                .map(String::from)
                .collect(),
            start: "09:00".to_string(),
            end: "17:00".to_string(),
        }
    }
}

impl AvailabilityRules {
    pub fn to_properties(&self) -> NodeProperties {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => NodeProperties::new(),
        }
    }
}

/// Resolve the rules to publish from a stored availability node's properties.
///
/// Only a missing node falls back to the default rules. Once a user has an
/// availability node its properties are returned as stored, even when empty,
/// including keys the server does not interpret (such as `enabled`).
pub fn resolve_rules(saved: Option<NodeProperties>) -> NodeProperties {
    saved.unwrap_or_else(|| AvailabilityRules::default().to_properties())
}

/// Accept a rules payload for saving: it must be a JSON object.
pub fn validate_rules(rules: &serde_json::Value) -> Result<NodeProperties, CoreError> {
    match rules {
        serde_json::Value::Object(map) => Ok(map.clone()),
        _ => Err(CoreError::Validation(
            "Availability rules must be a JSON object".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::parse_properties;
    use serde_json::json;

    #[test]
    fn default_is_weekdays_nine_to_five() {
        let rules = resolve_rules(None);
        assert_eq!(
            serde_json::Value::Object(rules),
            json!({
                "days": ["Mon", "Tue", "Wed", "Thu", "Fri"],
                "start": "09:00",
                "end": "17:00"
            })
        );
    }

    #[test]
    fn saved_rules_are_returned_verbatim() {
        let stored = r#"{"enabled":true,"days":["Sat"],"start":"10:00","end":"12:00"}"#;
        let rules = resolve_rules(Some(parse_properties(Some(stored))));
        assert_eq!(rules["enabled"], json!(true));
        assert_eq!(rules["days"], json!(["Sat"]));
    }

    #[test]
    fn saved_empty_rules_are_not_replaced_by_default() {
        assert!(resolve_rules(Some(parse_properties(Some("{}")))).is_empty());
        assert!(resolve_rules(Some(parse_properties(Some("{oops")))).is_empty());
    }

    #[test]
    fn rules_must_be_an_object() {
        assert!(validate_rules(&json!({"days": []})).is_ok());
        assert!(validate_rules(&json!(["Mon"])).is_err());
        assert!(validate_rules(&json!(null)).is_err());
    }
}
