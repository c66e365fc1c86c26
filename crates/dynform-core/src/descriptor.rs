//! Field descriptors: one entry of a form catalog.
//!
//! Catalog documents use camelCase keys (`defaultValue`, `onChange`), matching
//! what front-end tooling emits. A JSON catalog entry looks like:
//!
//! ```json
//! {
//!   "name": "ageGroup",
//!   "label": "Age group",
//!   "type": "select",
//!   "options": [{ "value": "infant", "label": "Infant" }],
//!   "conditions": { "onChange": "changeAgeRange" }
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize};

use crate::enums::{ConditionHandler, FieldType};

/// Static description of one renderable form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Unique key of the field within its form.
    #[serde(default)]
    pub name: String,

    /// Human-readable caption.
    #[serde(default)]
    pub label: String,

    /// Input kind.
    #[serde(default, rename = "type")]
    pub field_type: FieldType,

    /// Initial value. Numbers and booleans in the document are kept as text.
    #[serde(
        default,
        deserialize_with = "scalar_as_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_value: Option<String>,

    /// Choices for select fields, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,

    /// Derived-value rule attached to this field.
    #[serde(default, alias = "condition", skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Conditions>,
}

/// One choice of a select field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    #[serde(default)]
    pub label: String,
}

impl FieldOption {
    /// Caption to show, falling back to the raw value.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.value
        } else {
            &self.label
        }
    }
}

/// Rules that fire when the owning field changes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conditions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_change: Option<ConditionHandler>,
}

impl FieldDescriptor {
    /// A descriptor with the given name and type; label defaults to the name.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            field_type,
            default_value: None,
            options: Vec::new(),
            conditions: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push(FieldOption {
            value: value.into(),
            label: label.into(),
        });
        self
    }

    pub fn with_on_change(mut self, handler: impl Into<ConditionHandler>) -> Self {
        self.conditions = Some(Conditions {
            on_change: Some(handler.into()),
        });
        self
    }

    /// The handler named by `conditions.onChange`, if any.
    pub fn on_change(&self) -> Option<&ConditionHandler> {
        self.conditions.as_ref().and_then(|c| c.on_change.as_ref())
    }
}

/// Accept a string, number or boolean and keep its textual form.
fn scalar_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    let raw: Option<Scalar> = Option::deserialize(deserializer)?;
    Ok(raw.map(|s| match s {
        Scalar::Text(t) => t,
        Scalar::Int(n) => n.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::Bool(b) => b.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserialize_full_entry() {
        let json = r#"{
            "name": "ageGroup",
            "label": "Age group",
            "type": "select",
            "defaultValue": "adult",
            "options": [{"value": "adult", "label": "Adult"}, {"value": "senior"}],
            "conditions": {"onChange": "changeAgeRange"}
        }"#;
        let d: FieldDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(d.name, "ageGroup");
        assert_eq!(d.field_type, FieldType::Select);
        assert_eq!(d.default_value.as_deref(), Some("adult"));
        assert_eq!(d.options.len(), 2);
        assert_eq!(d.options[1].display_label(), "senior");
        assert_eq!(d.on_change(), Some(&ConditionHandler::ChangeAgeRange));
    }

    #[test]
    fn deserialize_minimal_entry() {
        let d: FieldDescriptor = serde_json::from_str(r#"{"name": "note"}"#).unwrap();
        assert_eq!(d.field_type, FieldType::Text);
        assert_eq!(d.label, "");
        assert!(d.default_value.is_none());
        assert!(d.on_change().is_none());
    }

    #[test]
    fn numeric_default_kept_as_text() {
        let d: FieldDescriptor =
            serde_json::from_str(r#"{"name": "duration", "type": "number", "defaultValue": 5}"#)
                .unwrap();
        assert_eq!(d.default_value.as_deref(), Some("5"));
    }

    #[test]
    fn null_default_is_none() {
        let d: FieldDescriptor =
            serde_json::from_str(r#"{"name": "x", "defaultValue": null}"#).unwrap();
        assert!(d.default_value.is_none());
    }

    #[test]
    fn singular_condition_alias() {
        let d: FieldDescriptor = serde_json::from_str(
            r#"{"name": "endDate", "type": "date", "condition": {"onChange": "updateDuration"}}"#,
        )
        .unwrap();
        assert_eq!(d.on_change(), Some(&ConditionHandler::UpdateDuration));
    }

    #[test]
    fn empty_conditions_object() {
        let d: FieldDescriptor =
            serde_json::from_str(r#"{"name": "x", "conditions": {}}"#).unwrap();
        assert!(d.conditions.is_some());
        assert!(d.on_change().is_none());
    }

    #[test]
    fn serialize_skips_absent_parts() {
        let d = FieldDescriptor::new("startDate", FieldType::Date)
            .with_label("Start date")
            .with_on_change("updateDuration");
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "startDate",
                "label": "Start date",
                "type": "date",
                "conditions": {"onChange": "updateDuration"}
            })
        );
    }
}
