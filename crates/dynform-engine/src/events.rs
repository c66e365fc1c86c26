//! Change events recorded by a form.

use serde::Serialize;

use dynform_core::value::FieldValue;

use crate::handlers::Handler;

/// Who caused a value change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeSource {
    /// A discrete edit of one field (typing, picking a date, selecting).
    User,
    /// A programmatic multi-field patch.
    Patch,
    /// A write made by a derived-value handler. Never notifies listeners.
    Derived(Handler),
}

impl ChangeSource {
    /// `true` for sources that drive propagation.
    pub fn is_driving(self) -> bool {
        !matches!(self, Self::Derived(_))
    }
}

/// One applied value change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub field: String,
    pub previous: FieldValue,
    pub value: FieldValue,
    pub source: ChangeSource,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn derived_is_not_driving() {
        assert!(ChangeSource::User.is_driving());
        assert!(ChangeSource::Patch.is_driving());
        assert!(!ChangeSource::Derived(Handler::UpdateDuration).is_driving());
    }

    #[test]
    fn event_json_shape() {
        let ev = ChangeEvent {
            field: "duration".into(),
            previous: FieldValue::Empty,
            value: FieldValue::Number(9),
            source: ChangeSource::Derived(Handler::UpdateDuration),
        };
        assert_eq!(
            serde_json::to_value(&ev).unwrap(),
            serde_json::json!({
                "field": "duration",
                "previous": "",
                "value": 9,
                "source": {"derived": "updateDuration"}
            })
        );
        assert_eq!(
            serde_json::to_value(ChangeSource::User).unwrap(),
            serde_json::json!("user")
        );
    }
}
