//! Catalog validation rules.
//!
//! A catalog is rejected as a whole on the first structural problem: a form
//! built from a half-valid catalog would silently lose fields.

use std::collections::HashSet;

use crate::descriptor::FieldDescriptor;

/// Error type for catalog validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("field #{index} has no name")]
    NameRequired { index: usize },

    #[error("duplicate field name: {0}")]
    DuplicateName(String),

    #[error("field {name}: unknown type {field_type:?} (expected text, select, date or number)")]
    UnknownFieldType { name: String, field_type: String },
}

/// Validates one descriptor. `index` is its position in the catalog, used
/// only for error messages.
pub fn validate_descriptor(
    descriptor: &FieldDescriptor,
    index: usize,
) -> Result<(), ValidationError> {
    if descriptor.name.trim().is_empty() {
        return Err(ValidationError::NameRequired { index });
    }
    if !descriptor.field_type.is_known() {
        return Err(ValidationError::UnknownFieldType {
            name: descriptor.name.clone(),
            field_type: descriptor.field_type.as_str().to_owned(),
        });
    }
    Ok(())
}

/// Validates every descriptor and checks that names are unique.
pub fn validate_catalog(fields: &[FieldDescriptor]) -> Result<(), ValidationError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(fields.len());
    for (index, field) in fields.iter().enumerate() {
        validate_descriptor(field, index)?;
        if !seen.insert(field.name.as_str()) {
            return Err(ValidationError::DuplicateName(field.name.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::FieldType;
    use pretty_assertions::assert_eq;

    #[test]
    fn valid_catalog_passes() {
        let fields = vec![
            FieldDescriptor::new("ageGroup", FieldType::Select),
            FieldDescriptor::new("startDate", FieldType::Date),
        ];
        assert!(validate_catalog(&fields).is_ok());
    }

    #[test]
    fn empty_catalog_passes() {
        assert!(validate_catalog(&[]).is_ok());
    }

    #[test]
    fn blank_name_rejected() {
        let fields = vec![
            FieldDescriptor::new("a", FieldType::Text),
            FieldDescriptor::new("  ", FieldType::Text),
        ];
        assert_eq!(
            validate_catalog(&fields),
            Err(ValidationError::NameRequired { index: 1 })
        );
    }

    #[test]
    fn duplicate_name_rejected() {
        let fields = vec![
            FieldDescriptor::new("endDate", FieldType::Date),
            FieldDescriptor::new("endDate", FieldType::Text),
        ];
        assert_eq!(
            validate_catalog(&fields),
            Err(ValidationError::DuplicateName("endDate".into()))
        );
    }

    #[test]
    fn unknown_type_rejected() {
        let fields = vec![FieldDescriptor::new("hue", FieldType::from("color"))];
        let err = validate_catalog(&fields).unwrap_err();
        assert!(err.to_string().contains("color"));
    }

    #[test]
    fn unknown_handler_is_not_a_validation_error() {
        let fields =
            vec![FieldDescriptor::new("x", FieldType::Text).with_on_change("doSomethingElse")];
        assert!(validate_catalog(&fields).is_ok());
    }
}
