//! Schema sources: where the registry fetches schemas from.
//!
//! - `InMemorySchemaSource` holds a fixed, replaceable list (tests, embedded
//!   defaults).
//! - `FileSchemaSource` reads TOML or JSON documents from a directory or a
//!   single file. A document holds either one schema or a `schemas` list.
//!
//! Example TOML document:
//!
//! ```toml
//! schemaName = "person"
//!
//! [rules.age]
//! requirementType = "REQUIRED"
//! fieldType = "INT32"
//! typeValidationParams = { min = 0, max = 120 }
//! ```

use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::Deserialize;
use tracing::debug;

use vigil_contracts::{
    error::{VigilError, VigilResult},
    schema::Schema,
};
use vigil_core::SchemaSource;

/// One schema document: a single schema, or several under `schemas`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SchemaDocument {
    Many { schemas: Vec<Schema> },
    One(Schema),
}

impl SchemaDocument {
    fn into_schemas(self) -> Vec<Schema> {
        match self {
            SchemaDocument::Many { schemas } => schemas,
            SchemaDocument::One(schema) => vec![schema],
        }
    }
}

/// Parse a TOML schema document.
///
/// Returns `VigilError::ConfigError` if the TOML is malformed or does not
/// match the schema document shape.
pub fn parse_toml_document(s: &str) -> VigilResult<Vec<Schema>> {
    let document: SchemaDocument = toml::from_str(s).map_err(|e| VigilError::ConfigError {
        reason: format!("failed to parse schema TOML: {}", e),
    })?;
    Ok(document.into_schemas())
}

/// Parse a JSON schema document.
pub fn parse_json_document(s: &str) -> VigilResult<Vec<Schema>> {
    let document: SchemaDocument = serde_json::from_str(s).map_err(|e| VigilError::ConfigError {
        reason: format!("failed to parse schema JSON: {}", e),
    })?;
    Ok(document.into_schemas())
}

// ── In-memory ─────────────────────────────────────────────────────────────────

/// A source backed by a list held in memory.
///
/// `replace` swaps the list, so tests can simulate an upstream change and
/// then exercise `SchemaRegistry::refresh_*`.
#[derive(Debug, Default)]
pub struct InMemorySchemaSource {
    schemas: RwLock<Vec<Schema>>,
}

impl InMemorySchemaSource {
    pub fn new(schemas: Vec<Schema>) -> Self {
        Self {
            schemas: RwLock::new(schemas),
        }
    }

    /// Replace every schema this source serves.
    pub fn replace(&self, schemas: Vec<Schema>) {
        *self.schemas.write() = schemas;
    }

    /// Insert `schema`, replacing any schema with the same name.
    pub fn upsert(&self, schema: Schema) {
        let mut schemas = self.schemas.write();
        schemas.retain(|s| s.schema_name != schema.schema_name);
        schemas.push(schema);
    }

    pub fn remove(&self, name: &str) {
        self.schemas.write().retain(|s| s.schema_name != name);
    }
}

impl SchemaSource for InMemorySchemaSource {
    fn fetch_all(&self) -> VigilResult<Vec<Schema>> {
        Ok(self.schemas.read().clone())
    }

    fn fetch_by_name(&self, name: &str) -> VigilResult<Option<Schema>> {
        Ok(self
            .schemas
            .read()
            .iter()
            .find(|s| s.schema_name == name)
            .cloned())
    }
}

// ── Files ─────────────────────────────────────────────────────────────────────

/// A source that reads `*.toml` and `*.json` schema documents.
///
/// `path` may be a directory (every matching file in it, non-recursive, in
/// file-name order) or a single document. Files are re-read on every fetch.
#[derive(Debug, Clone)]
pub struct FileSchemaSource {
    path: PathBuf,
}

impl FileSchemaSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn document_paths(&self) -> VigilResult<Vec<PathBuf>> {
        if self.path.is_file() {
            return Ok(vec![self.path.clone()]);
        }
        let entries = std::fs::read_dir(&self.path).map_err(|e| VigilError::SchemaSource {
            reason: format!("failed to read schema directory '{}': {}", self.path.display(), e),
        })?;
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| VigilError::SchemaSource {
                reason: format!("failed to list '{}': {}", self.path.display(), e),
            })?;
            let path = entry.path();
            if path.is_file() && document_format(&path).is_some() {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    fn read_document(path: &Path) -> VigilResult<Vec<Schema>> {
        let contents = std::fs::read_to_string(path).map_err(|e| VigilError::SchemaSource {
            reason: format!("failed to read schema file '{}': {}", path.display(), e),
        })?;
        let parsed = match document_format(path) {
            Some(Format::Json) => parse_json_document(&contents),
            Some(Format::Toml) => parse_toml_document(&contents),
            None => Err(VigilError::ConfigError {
                reason: "expected a .toml or .json extension".to_string(),
            }),
        };
        let schemas = parsed.map_err(|e| match e {
            VigilError::ConfigError { reason } => VigilError::ConfigError {
                reason: format!("{}: {}", path.display(), reason),
            },
            other => other,
        })?;
        debug!(file = %path.display(), count = schemas.len(), "schema document read");
        Ok(schemas)
    }
}

impl SchemaSource for FileSchemaSource {
    fn fetch_all(&self) -> VigilResult<Vec<Schema>> {
        let mut schemas = Vec::new();
        for path in self.document_paths()? {
            schemas.extend(Self::read_document(&path)?);
        }
        Ok(schemas)
    }

    fn fetch_by_name(&self, name: &str) -> VigilResult<Option<Schema>> {
        Ok(self.fetch_all()?.into_iter().find(|s| s.schema_name == name))
    }
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Toml,
    Json,
}

fn document_format(path: &Path) -> Option<Format> {
    match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
        "toml" => Some(Format::Toml),
        "json" => Some(Format::Json),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use vigil_contracts::rule::{FieldType, RequirementType};

    use super::*;

    const PERSON_TOML: &str = r#"
schemaName = "person"

[rules.age]
requirementType = "REQUIRED"
fieldType = "INT32"
typeValidationParams = { min = 0, max = 120 }

[rules."address.city"]
requirementType = "CONDITIONAL"
condition = "country == 'US'"
errorMessage = "City is required for US addresses"
"#;

    const MANY_JSON: &str = r#"{
  "schemas": [
    { "schemaName": "a", "rules": { "x": { "requirementType": "REQUIRED" } } },
    { "schemaName": "b", "rules": {} }
  ]
}"#;

    #[test]
    fn parses_single_toml_schema() {
        let schemas = parse_toml_document(PERSON_TOML).unwrap();
        assert_eq!(schemas.len(), 1);
        let person = &schemas[0];
        assert_eq!(person.schema_name, "person");
        let age = person.rule("age").unwrap();
        assert_eq!(age.requirement_type, RequirementType::Required);
        assert_eq!(age.field_type, Some(FieldType::Int32));
        assert_eq!(
            person.rule("address.city").and_then(|r| r.active_condition()),
            Some("country == 'US'")
        );
    }

    #[test]
    fn parses_schema_lists() {
        let names: Vec<String> = parse_json_document(MANY_JSON)
            .unwrap()
            .into_iter()
            .map(|s| s.schema_name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn malformed_documents_are_config_errors() {
        assert!(matches!(
            parse_toml_document("schemaName = "),
            Err(VigilError::ConfigError { .. })
        ));
        assert!(matches!(
            parse_json_document(r#"{ "rules": {} }"#),
            Err(VigilError::ConfigError { .. })
        ));
    }

    #[test]
    fn in_memory_source_tracks_updates() {
        let source = InMemorySchemaSource::new(vec![Schema::new("a")]);
        assert!(source.fetch_by_name("a").unwrap().is_some());

        source.upsert(Schema::new("b"));
        source.remove("a");
        let names: Vec<String> = source.fetch_all().unwrap().into_iter().map(|s| s.schema_name).collect();
        assert_eq!(names, vec!["b"]);
        assert!(source.fetch_by_name("a").unwrap().is_none());
    }

    #[test]
    fn file_source_reads_directory_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b_person.toml"), PERSON_TOML).unwrap();
        std::fs::write(dir.path().join("a_many.json"), MANY_JSON).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a schema").unwrap();

        let source = FileSchemaSource::new(dir.path());
        let names: Vec<String> = source.fetch_all().unwrap().into_iter().map(|s| s.schema_name).collect();
        assert_eq!(names, vec!["a", "b", "person"]);
        assert!(source.fetch_by_name("person").unwrap().is_some());
        assert!(source.fetch_by_name("ghost").unwrap().is_none());
    }

    #[test]
    fn file_source_reads_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("person.toml");
        std::fs::write(&file, PERSON_TOML).unwrap();
        assert_eq!(FileSchemaSource::new(&file).fetch_all().unwrap().len(), 1);
    }

    #[test]
    fn file_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ nope").unwrap();
        match FileSchemaSource::new(dir.path()).fetch_all() {
            Err(VigilError::ConfigError { reason }) => {
                assert!(reason.contains("broken.json"), "reason should name the file: {reason}");
                assert!(
                    reason.contains("failed to parse schema JSON"),
                    "reason should carry the parse error: {reason}"
                );
                assert!(
                    !reason.contains("configuration error"),
                    "reason must not nest another error display: {reason}"
                );
            }
            other => panic!("expected ConfigError, got {other:?}"),
        }

        let missing = FileSchemaSource::new(dir.path().join("missing"));
        assert!(matches!(missing.fetch_all(), Err(VigilError::SchemaSource { .. })));
    }
}
