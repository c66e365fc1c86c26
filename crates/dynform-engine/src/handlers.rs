//! Derived-value handlers.
//!
//! Each handler reads a few fields of the model and computes at most one
//! write. Computing is separated from applying so the form can tag the write
//! with its source before it lands.

use std::fmt;

use serde::{Serialize, Serializer};
use tracing::debug;

use dynform_core::dates::{add_days, difference_in_days};
use dynform_core::enums::{AgeGroup, ConditionHandler};
use dynform_core::value::FieldValue;

use crate::model::{AGE_GROUP, AGE_RANGE, DURATION, END_DATE, START_DATE, FormModel};

/// The closed set of derived-value handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handler {
    /// `ageGroup` -> `ageRange` via the fixed age table.
    ChangeAgeRange,
    /// `endDate - startDate` -> `duration`.
    UpdateDuration,
    /// `startDate + duration` -> `endDate`.
    UpdateEndDate,
}

/// A single field write produced by a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Write {
    pub field: &'static str,
    pub value: FieldValue,
}

impl Handler {
    /// Map a catalog handler name onto a handler. Unknown names resolve to
    /// `None`.
    pub fn resolve(name: &ConditionHandler) -> Option<Self> {
        match name {
            ConditionHandler::ChangeAgeRange => Some(Self::ChangeAgeRange),
            ConditionHandler::UpdateDuration => Some(Self::UpdateDuration),
            ConditionHandler::UpdateEndDate => Some(Self::UpdateEndDate),
            ConditionHandler::Unknown(_) => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ChangeAgeRange => "changeAgeRange",
            Self::UpdateDuration => "updateDuration",
            Self::UpdateEndDate => "updateEndDate",
        }
    }

    /// The field this handler writes.
    pub fn target(self) -> &'static str {
        match self {
            Self::ChangeAgeRange => AGE_RANGE,
            Self::UpdateDuration => DURATION,
            Self::UpdateEndDate => END_DATE,
        }
    }

    /// Compute this handler's write against `model`, or `None` when an input
    /// is missing.
    pub fn compute(self, model: &FormModel) -> Option<Write> {
        let value = match self {
            Self::ChangeAgeRange => age_range(model),
            Self::UpdateDuration => duration(model)?,
            Self::UpdateEndDate => end_date(model)?,
        };
        Some(Write {
            field: self.target(),
            value,
        })
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Handler {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Range string for the current age group. An unset or unrecognised group
/// yields an empty value.
fn age_range(model: &FormModel) -> FieldValue {
    let raw = model
        .get(AGE_GROUP)
        .map(ToString::to_string)
        .unwrap_or_default();
    match raw.parse::<AgeGroup>() {
        Ok(group) => FieldValue::text(group.range()),
        Err(err) => {
            if !raw.is_empty() {
                debug!(%err, "clearing ageRange");
            }
            FieldValue::Empty
        }
    }
}

fn duration(model: &FormModel) -> Option<FieldValue> {
    let start = date_input(model, START_DATE)?;
    let end = date_input(model, END_DATE)?;
    Some(FieldValue::Number(difference_in_days(end, start)))
}

fn end_date(model: &FormModel) -> Option<FieldValue> {
    let start = date_input(model, START_DATE)?;
    let days = model.get(DURATION).and_then(FieldValue::as_number)?;
    let Some(end) = add_days(start, days) else {
        debug!(%start, days, "endDate out of calendar range");
        return None;
    };
    Some(FieldValue::Date(end))
}

fn date_input(model: &FormModel, field: &str) -> Option<chrono::NaiveDate> {
    model.get(field).and_then(FieldValue::as_date)
}
