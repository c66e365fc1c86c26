//! The live form model: one control per field, in catalog order.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use dynform_core::descriptor::FieldDescriptor;
use dynform_core::enums::FieldType;
use dynform_core::value::FieldValue;

use crate::form::FormError;

pub const AGE_GROUP: &str = "ageGroup";
pub const AGE_RANGE: &str = "ageRange";
pub const START_DATE: &str = "startDate";
pub const END_DATE: &str = "endDate";
pub const DURATION: &str = "duration";

/// Fields the derived-value handlers read or write. A form always carries
/// them; those the catalog does not declare are added as optional controls
/// of the listed type.
pub const HANDLER_FIELDS: [(&str, FieldType); 5] = [
    (AGE_GROUP, FieldType::Select),
    (AGE_RANGE, FieldType::Text),
    (START_DATE, FieldType::Date),
    (END_DATE, FieldType::Date),
    (DURATION, FieldType::Number),
];

/// Fields only handlers may write: `ageRange` always follows `ageGroup`.
pub const DERIVED_ONLY: [&str; 1] = [AGE_RANGE];

/// A single form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub value: FieldValue,
    pub field_type: FieldType,
    /// Presence is checked by [`FormModel::missing_required`].
    pub required: bool,
}

/// Mapping from field name to control. Names are unique and, once added,
/// never removed or renamed.
#[derive(Debug, Clone, Default)]
pub struct FormModel {
    names: Vec<String>,
    controls: HashMap<String, Control>,
}

impl FormModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a required control for `descriptor`, seeded with its default
    /// value coerced to the field type. Returns `false` and leaves the model
    /// unchanged if a control of that name already exists.
    pub fn add_field(&mut self, descriptor: &FieldDescriptor) -> bool {
        let value = descriptor
            .default_value
            .as_deref()
            .map(|raw| FieldValue::coerce(raw, &descriptor.field_type))
            .unwrap_or_default();
        self.add_control(
            &descriptor.name,
            Control {
                value,
                field_type: descriptor.field_type.clone(),
                required: true,
            },
        )
    }

    /// Register `control` under `name` unless the name is taken.
    pub fn add_control(&mut self, name: &str, control: Control) -> bool {
        if self.controls.contains_key(name) {
            return false;
        }
        self.names.push(name.to_owned());
        self.controls.insert(name.to_owned(), control);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.controls.contains_key(name)
    }

    pub fn control(&self, name: &str) -> Option<&Control> {
        self.controls.get(name)
    }

    /// Current value of `name`, or `None` if there is no such control.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.controls.get(name).map(|c| &c.value)
    }

    /// Replace the value of `name`, returning the previous one.
    pub fn set(&mut self, name: &str, value: FieldValue) -> Result<FieldValue, FormError> {
        let control = self
            .controls
            .get_mut(name)
            .ok_or_else(|| FormError::UnknownField(name.to_owned()))?;
        Ok(std::mem::replace(&mut control.value, value))
    }

    /// Field names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// `(name, control)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Control)> {
        self.names
            .iter()
            .filter_map(|n| self.controls.get(n).map(|c| (n.as_str(), c)))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names of required controls whose value is empty, in order.
    pub fn missing_required(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, c)| c.required && c.value.is_empty())
            .map(|(n, _)| n)
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.missing_required().is_empty()
    }

    /// Ordered `(name, value)` copy of the model.
    pub fn snapshot(&self) -> Vec<(String, FieldValue)> {
        self.iter()
            .map(|(n, c)| (n.to_owned(), c.value.clone()))
            .collect()
    }
}

/// Serializes as a JSON object of name to value, in registration order.
impl Serialize for FormModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, control) in self.iter() {
            map.serialize_entry(name, &control.value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn add_field_seeds_default_by_type() {
        let mut m = FormModel::new();
        assert!(m.add_field(
            &FieldDescriptor::new("startDate", FieldType::Date).with_default("2024-01-01")
        ));
        assert!(m.add_field(&FieldDescriptor::new("duration", FieldType::Number).with_default("5")));
        assert!(m.add_field(&FieldDescriptor::new("note", FieldType::Text)));

        assert_eq!(
            m.get("startDate"),
            Some(&FieldValue::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()))
        );
        assert_eq!(m.get("duration"), Some(&FieldValue::Number(5)));
        assert_eq!(m.get("note"), Some(&FieldValue::Empty));
        assert!(m.control("note").unwrap().required);
    }

    #[test]
    fn names_are_stable_and_unique() {
        let mut m = FormModel::new();
        assert!(m.add_field(&FieldDescriptor::new("a", FieldType::Text).with_default("first")));
        assert!(!m.add_field(&FieldDescriptor::new("a", FieldType::Number).with_default("2")));
        assert_eq!(m.len(), 1);
        assert_eq!(m.get("a"), Some(&FieldValue::text("first")));
        assert_eq!(m.control("a").unwrap().field_type, FieldType::Text);
    }

    #[test]
    fn set_returns_previous_value() {
        let mut m = FormModel::new();
        m.add_field(&FieldDescriptor::new("a", FieldType::Text));
        let prev = m.set("a", FieldValue::text("x")).unwrap();
        assert_eq!(prev, FieldValue::Empty);
        assert_eq!(m.get("a"), Some(&FieldValue::text("x")));
    }

    #[test]
    fn set_unknown_field_fails() {
        let mut m = FormModel::new();
        let err = m.set("ghost", FieldValue::Number(1)).unwrap_err();
        assert!(matches!(err, FormError::UnknownField(ref n) if n == "ghost"));
    }

    #[test]
    fn missing_required_ignores_optional_controls() {
        let mut m = FormModel::new();
        m.add_field(&FieldDescriptor::new("a", FieldType::Text));
        m.add_field(&FieldDescriptor::new("b", FieldType::Number).with_default("0"));
        m.add_control(
            "ageRange",
            Control {
                value: FieldValue::Empty,
                field_type: FieldType::Text,
                required: false,
            },
        );
        assert_eq!(m.missing_required(), vec!["a"]);
        assert!(!m.is_valid());

        m.set("a", FieldValue::text("filled")).unwrap();
        assert!(m.is_valid());
    }

    #[test]
    fn serializes_in_registration_order() {
        let mut m = FormModel::new();
        m.add_field(&FieldDescriptor::new("zeta", FieldType::Text).with_default("z"));
        m.add_field(&FieldDescriptor::new("alpha", FieldType::Number).with_default("1"));
        assert_eq!(
            serde_json::to_string(&m).unwrap(),
            r#"{"zeta":"z","alpha":1}"#
        );
        assert_eq!(m.names().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        assert_eq!(
            m.snapshot(),
            vec![
                ("zeta".to_string(), FieldValue::text("z")),
                ("alpha".to_string(), FieldValue::Number(1)),
            ]
        );
    }
}
