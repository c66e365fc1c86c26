//! Parse field catalogs (JSON and TOML) and resolve catalog paths.
//!
//! The canonical document is a JSON array of descriptors. A JSON or TOML
//! table with a `fields` array is accepted too, since TOML has no top-level
//! arrays. Every load validates the catalog before returning it.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::descriptor::FieldDescriptor;
use crate::validation::{validate_catalog, ValidationError};

/// A validated, ordered list of field descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub fields: Vec<FieldDescriptor>,

    /// Where this catalog was loaded from (empty for in-memory catalogs).
    pub source: String,
}

/// Errors that can occur while loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid catalog: {0}")]
    Invalid(#[from] ValidationError),

    #[error("catalog '{0}' not found (searched as given, cwd, .dynform/)")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    List(Vec<FieldDescriptor>),
    Table { fields: Vec<FieldDescriptor> },
}

impl Document {
    fn into_fields(self) -> Vec<FieldDescriptor> {
        match self {
            Self::List(fields) | Self::Table { fields } => fields,
        }
    }
}

impl Catalog {
    /// Validate `fields` and wrap them.
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self, CatalogError> {
        validate_catalog(&fields)?;
        Ok(Self {
            fields,
            source: String::new(),
        })
    }

    /// Look up a descriptor by name.
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Parse a catalog from a JSON string.
pub fn parse_json(content: &str) -> Result<Catalog, CatalogError> {
    let doc: Document =
        serde_json::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))?;
    Catalog::new(doc.into_fields())
}

/// Parse a catalog from a TOML string (`[[fields]]` tables).
pub fn parse_toml(content: &str) -> Result<Catalog, CatalogError> {
    let doc: Document = toml::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))?;
    Catalog::new(doc.into_fields())
}

/// Load a catalog from a file path (auto-detect TOML vs JSON by extension).
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let content = std::fs::read_to_string(path)?;
    let mut catalog = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => parse_toml(&content)?,
        Some("json") => parse_json(&content)?,
        // Try JSON first; fall back to TOML only if it is not JSON at all.
        _ => match parse_json(&content) {
            Err(CatalogError::Parse(_)) => parse_toml(&content)?,
            other => other?,
        },
    };
    catalog.source = path.display().to_string();
    Ok(catalog)
}

/// Search for a catalog by name or path.
///
/// Search order:
/// 1. The name as a path (absolute, or relative to `cwd`)
/// 2. `cwd` with `.json` / `.toml` appended
/// 3. `.dynform/` under `cwd` with the same suffixes
pub fn find_catalog(name: &str, cwd: &Path) -> Result<PathBuf, CatalogError> {
    let exact = Path::new(name);
    if exact.is_absolute() && exact.is_file() {
        return Ok(exact.to_path_buf());
    }
    let relative = cwd.join(name);
    if relative.is_file() {
        return Ok(relative);
    }

    let suffixes = [".json", ".toml"];
    let dirs = [cwd.to_path_buf(), cwd.join(".dynform")];
    for dir in &dirs {
        for suffix in &suffixes {
            let candidate = dir.join(format!("{}{}", name, suffix));
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }

    Err(CatalogError::NotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{ConditionHandler, FieldType};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"[
        {"name": "ageGroup", "label": "Age group", "type": "select",
         "options": [{"value": "teenager", "label": "Teenager"}],
         "conditions": {"onChange": "changeAgeRange"}},
        {"name": "startDate", "label": "Start", "type": "date",
         "conditions": {"onChange": "updateDuration"}},
        {"name": "endDate", "label": "End", "type": "date"}
    ]"#;

    #[test]
    fn parse_json_array() {
        let c = parse_json(SAMPLE).unwrap();
        assert_eq!(c.len(), 3);
        assert_eq!(c.fields[0].name, "ageGroup");
        assert_eq!(c.get("startDate").unwrap().field_type, FieldType::Date);
        assert!(c.get("duration").is_none());
        assert_eq!(c.source, "");
    }

    #[test]
    fn parse_json_table() {
        let c = parse_json(r#"{"fields": [{"name": "note"}]}"#).unwrap();
        assert_eq!(c.fields[0].name, "note");
    }

    #[test]
    fn parse_toml_fields() {
        let toml_str = r#"
[[fields]]
name = "ageGroup"
label = "Age group"
type = "select"
options = [{ value = "adult", label = "Adult" }]
conditions = { onChange = "changeAgeRange" }

[[fields]]
name = "duration"
type = "number"
defaultValue = 3
"#;
        let c = parse_toml(toml_str).unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(
            c.fields[0].on_change(),
            Some(&ConditionHandler::ChangeAgeRange)
        );
        assert_eq!(c.fields[1].default_value.as_deref(), Some("3"));
    }

    #[test]
    fn parse_rejects_malformed_json() {
        let err = parse_json("[{").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn parse_rejects_nameless_descriptor() {
        let err = parse_json(r#"[{"label": "No name"}]"#).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Invalid(ValidationError::NameRequired { index: 0 })
        ));
    }

    #[test]
    fn load_sets_source_and_detects_format() {
        let tmp = TempDir::new().unwrap();
        let json_path = tmp.path().join("fields.json");
        std::fs::write(&json_path, SAMPLE).unwrap();
        let c = load_catalog(&json_path).unwrap();
        assert_eq!(c.source, json_path.display().to_string());

        let toml_path = tmp.path().join("fields.cfg");
        std::fs::write(&toml_path, "[[fields]]\nname = \"note\"\n").unwrap();
        let c = load_catalog(&toml_path).unwrap();
        assert_eq!(c.fields[0].name, "note");
    }

    #[test]
    fn load_without_extension_keeps_json_validation_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("fields");
        std::fs::write(&path, r#"[{"name": "a"}, {"name": "a"}]"#).unwrap();
        let err = load_catalog(&path).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Invalid(ValidationError::DuplicateName(ref n)) if n == "a"
        ));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_catalog(&tmp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }

    #[test]
    fn find_catalog_search_order() {
        let tmp = TempDir::new().unwrap();
        let dot = tmp.path().join(".dynform");
        std::fs::create_dir_all(&dot).unwrap();
        std::fs::write(dot.join("booking.toml"), "").unwrap();

        assert_eq!(
            find_catalog("booking", tmp.path()).unwrap(),
            dot.join("booking.toml")
        );

        std::fs::write(tmp.path().join("booking.json"), "[]").unwrap();
        assert_eq!(
            find_catalog("booking", tmp.path()).unwrap(),
            tmp.path().join("booking.json")
        );

        assert!(matches!(
            find_catalog("missing", tmp.path()),
            Err(CatalogError::NotFound(_))
        ));
    }
}
