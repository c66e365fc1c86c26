//! Enum types for the dynform system.
//!
//! String-backed enums read from catalog documents have:
//! - Custom Serialize (as the catalog spelling)
//! - Custom Deserialize (known variants + catch-all fallback variant)
//! - `as_str()`, `is_known()`, `Display` impl
//!
//! [`AgeGroup`] is closed: an unrecognised spelling is not representable.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Macro: defines an enum with known string variants + a fallback(String).
// ---------------------------------------------------------------------------
macro_rules! define_enum {
    (
        $(#[$meta:meta])*
        $name:ident, fallback = $fallback:ident,
        variants: [
            $( ($variant:ident, $str:expr) ),+ $(,)?
        ]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant, )+
            $fallback(String),
        }

        impl $name {
            /// Returns the string representation.
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $str, )+
                    Self::$fallback(s) => s.as_str(),
                }
            }

            /// Returns `true` if this is one of the built-in variants.
            pub fn is_known(&self) -> bool {
                !matches!(self, Self::$fallback(_))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok(Self::from(s))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    $( $str => Self::$variant, )+
                    other => Self::$fallback(other.to_owned()),
                }
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                match s.as_str() {
                    $( $str => Self::$variant, )+
                    _ => Self::$fallback(s),
                }
            }
        }
    };
}

// ===========================================================================
// FieldType
// ===========================================================================

define_enum! {
    /// The input kind a field renders as. Drives value coercion.
    FieldType, fallback = Other,
    variants: [
        (Text, "text"),
        (Select, "select"),
        (Date, "date"),
        (Number, "number"),
    ]
}

impl Default for FieldType {
    fn default() -> Self {
        Self::Text
    }
}

// ===========================================================================
// ConditionHandler
// ===========================================================================

define_enum! {
    /// Handler named by a field's `conditions.onChange` rule.
    ///
    /// Catalogs are plain files, so any spelling is accepted here and
    /// unrecognised names land in `Unknown`. Dispatch treats those as no-ops.
    ConditionHandler, fallback = Unknown,
    variants: [
        (ChangeAgeRange, "changeAgeRange"),
        (UpdateDuration, "updateDuration"),
        (UpdateEndDate, "updateEndDate"),
    ]
}

// ===========================================================================
// AgeGroup
// ===========================================================================

/// Coarse age bucket selected on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    Infant,
    Child,
    Teenager,
    YoungAdult,
    Adult,
    Senior,
}

impl AgeGroup {
    /// Every group, youngest first.
    pub const ALL: [AgeGroup; 6] = [
        Self::Infant,
        Self::Child,
        Self::Teenager,
        Self::YoungAdult,
        Self::Adult,
        Self::Senior,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Infant => "infant",
            Self::Child => "child",
            Self::Teenager => "teenager",
            Self::YoungAdult => "young_adult",
            Self::Adult => "adult",
            Self::Senior => "senior",
        }
    }

    /// The inclusive age range for this group, as shown on the form.
    pub fn range(self) -> &'static str {
        match self {
            Self::Infant => "0-2",
            Self::Child => "3-12",
            Self::Teenager => "13-19",
            Self::YoungAdult => "20-39",
            Self::Adult => "40-59",
            Self::Senior => "60+",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name an [`AgeGroup`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown age group: {0:?}")]
pub struct UnknownAgeGroup(pub String);

impl FromStr for AgeGroup {
    type Err = UnknownAgeGroup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| UnknownAgeGroup(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn field_type_default_is_text() {
        assert_eq!(FieldType::default(), FieldType::Text);
    }

    #[test]
    fn field_type_unknown_is_kept() {
        let t: FieldType = serde_json::from_str(r#""color""#).unwrap();
        assert_eq!(t, FieldType::Other("color".into()));
        assert!(!t.is_known());
        assert_eq!(serde_json::to_string(&t).unwrap(), r#""color""#);
    }

    #[test]
    fn condition_handler_names() {
        assert_eq!(
            ConditionHandler::from("changeAgeRange"),
            ConditionHandler::ChangeAgeRange
        );
        assert_eq!(
            ConditionHandler::from("updateEndDate"),
            ConditionHandler::UpdateEndDate
        );
        let unknown = ConditionHandler::from("doSomethingElse");
        assert_eq!(unknown, ConditionHandler::Unknown("doSomethingElse".into()));
        assert_eq!(unknown.as_str(), "doSomethingElse");
    }

    #[test]
    fn condition_handler_names_are_case_sensitive() {
        assert!(!ConditionHandler::from("changeagerange").is_known());
    }

    #[test]
    fn age_group_ranges() {
        let table: Vec<(&str, &str)> = AgeGroup::ALL
            .iter()
            .map(|g| (g.as_str(), g.range()))
            .collect();
        assert_eq!(
            table,
            vec![
                ("infant", "0-2"),
                ("child", "3-12"),
                ("teenager", "13-19"),
                ("young_adult", "20-39"),
                ("adult", "40-59"),
                ("senior", "60+"),
            ]
        );
    }

    #[test]
    fn age_group_parse() {
        assert_eq!("young_adult".parse::<AgeGroup>(), Ok(AgeGroup::YoungAdult));
        assert_eq!(
            "elder".parse::<AgeGroup>(),
            Err(UnknownAgeGroup("elder".into()))
        );
        assert!("".parse::<AgeGroup>().is_err());
    }

    #[test]
    fn age_group_serde_matches_as_str() {
        for g in AgeGroup::ALL {
            let json = serde_json::to_string(&g).unwrap();
            assert_eq!(json, format!("\"{}\"", g.as_str()));
        }
    }
}
