//! # Document Validation
//!
//! [`SchemaSet`] owns the schema directory for one run. It loads the
//! shared definitions once, composes and compiles each family schema the
//! first time a document of that family is seen, and reuses the compiled
//! validator for the rest of the run.
//!
//! Outcomes come in two layers:
//!
//! - `Err(SchemaError)`: the schema files themselves are unusable. Fatal.
//! - `Ok(Err(ValidationFailure))`: the document does not conform, or the
//!   composed schema is rejected by its metaschema. Recorded and the run
//!   continues.
//!
//! Composed schemas carry no `$schema`, so validators are built for
//! Draft 2020-12. `$ref`s of the form `#/definitions/<name>` resolve
//! inside the composed document.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use jsonschema::{Draft, Validator};
use serde_json::Value;
use testfill_core::read_json_file;

use crate::compose::compose_schema;
use crate::error::SchemaError;
use crate::family::{SchemaFamily, DEFINITIONS_FILE};

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

/// Why a document was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The document broke one or more schema rules.
    Violations(ValidationViolations),
    /// The composed schema could not be compiled.
    InvalidSchema(String),
}

/// A document that did not pass its family schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    /// Schema file as shown to the user, e.g. `JSONSchema/vm-schema.json`.
    pub schema: PathBuf,
    /// Tool-facing path of the rejected document.
    pub file: String,
    /// What went wrong.
    pub reason: FailureReason,
}

impl ValidationFailure {
    /// One line per underlying problem, for display under the headline.
    pub fn details(&self) -> Vec<String> {
        match &self.reason {
            FailureReason::Violations(v) => v.violations().iter().map(ToString::to_string).collect(),
            FailureReason::InvalidSchema(reason) => vec![format!("invalid schema: {reason}")],
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Validation failed: schema {} on {}",
            self.schema.display(),
            self.file
        )
    }
}

/// Success, or the structured reason a document was rejected.
pub type ValidationOutcome = Result<(), ValidationFailure>;

/// Schema files for one run, with lazily compiled validators.
pub struct SchemaSet {
    /// Schema directory on disk.
    schema_dir: PathBuf,
    /// Schema directory as named in messages.
    display_dir: PathBuf,
    definitions: Option<Value>,
    validators: HashMap<&'static str, Result<Validator, String>>,
}

impl fmt::Debug for SchemaSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut compiled: Vec<&str> = self.validators.keys().copied().collect();
        compiled.sort_unstable();
        f.debug_struct("SchemaSet")
            .field("schema_dir", &self.schema_dir)
            .field("display_dir", &self.display_dir)
            .field("definitions_loaded", &self.definitions.is_some())
            .field("compiled", &compiled)
            .finish()
    }
}

impl SchemaSet {
    /// Create a set reading from `schema_dir` and naming files under
    /// `display_dir` in messages.
    ///
    /// Nothing is read until the first call to [`SchemaSet::validate`].
    pub fn new(schema_dir: impl Into<PathBuf>, display_dir: impl Into<PathBuf>) -> Self {
        Self {
            schema_dir: schema_dir.into(),
            display_dir: display_dir.into(),
            definitions: None,
            validators: HashMap::new(),
        }
    }

    /// Schema file path as shown to the user.
    pub fn display_path(&self, file_name: &str) -> PathBuf {
        self.display_dir.join(file_name)
    }

    fn load(&self, file_name: &str) -> Result<Value, SchemaError> {
        let path = self.schema_dir.join(file_name);
        tracing::debug!(schema = %path.display(), "loading schema");
        read_json_file(&path).map_err(|source| SchemaError::Load {
            schema: self.display_path(file_name),
            source,
        })
    }

    fn definitions(&mut self) -> Result<&Value, SchemaError> {
        let defs = match self.definitions.take() {
            Some(defs) => defs,
            None => self.load(DEFINITIONS_FILE)?,
        };
        Ok(self.definitions.insert(defs))
    }

    /// Compose the effective schema for `family`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if either schema file cannot be read or the
    /// pair cannot be composed.
    pub fn composed_schema(&mut self, family: &SchemaFamily) -> Result<Value, SchemaError> {
        let family_schema = self.load(family.schema_file)?;
        let base = self.definitions()?;
        compose_schema(base, &family_schema).map_err(|source| SchemaError::Malformed {
            schema: self.display_path(family.schema_file),
            source,
        })
    }

    fn compile(&mut self, family: &SchemaFamily) -> Result<Result<Validator, String>, SchemaError> {
        let schema = self.composed_schema(family)?;
        let compiled = jsonschema::options()
            .with_draft(Draft::Draft202012)
            .build(&schema)
            .map_err(|e| e.to_string());
        if let Err(reason) = &compiled {
            tracing::warn!(schema = family.schema_file, %reason, "composed schema does not compile");
        }
        Ok(compiled)
    }

    /// Validate `instance`, the document at `file_id`, against `family`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] only when the schema files are unusable. A
    /// non-conforming document is reported through the inner
    /// [`ValidationOutcome`].
    pub fn validate(
        &mut self,
        family: &'static SchemaFamily,
        file_id: &str,
        instance: &Value,
    ) -> Result<ValidationOutcome, SchemaError> {
        let schema = self.display_path(family.schema_file);
        if !self.validators.contains_key(family.schema_file) {
            let compiled = self.compile(family)?;
            self.validators.insert(family.schema_file, compiled);
        }
        let reason = match &self.validators[family.schema_file] {
            Ok(validator) => {
                let violations: Vec<Violation> = validator
                    .iter_errors(instance)
                    .map(|e| Violation {
                        instance_path: e.instance_path.to_string(),
                        schema_path: e.schema_path.to_string(),
                        message: e.to_string(),
                    })
                    .collect();
                if violations.is_empty() {
                    return Ok(Ok(()));
                }
                FailureReason::Violations(ValidationViolations { violations })
            }
            Err(reason) => FailureReason::InvalidSchema(reason.clone()),
        };
        Ok(Err(ValidationFailure {
            schema,
            file: file_id.to_string(),
            reason,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::{resolve_schema, SCHEMA_FAMILIES};
    use serde_json::json;
    use std::fs;
    use std::path::Path;

    fn write(dir: &Path, name: &str, value: &Value) {
        fs::write(dir.join(name), serde_json::to_string_pretty(value).unwrap()).unwrap();
    }

    /// A schema directory where VM tests must be objects with a hex `code`.
    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            DEFINITIONS_FILE,
            &json!({
                "definitions": {
                    "HexData": {"type": "string", "pattern": "^0x[0-9a-f]*$"}
                },
                "patternProperties": {"ignored": false}
            }),
        );
        write(
            dir.path(),
            "vm-schema.json",
            &json!({
                "definitions": {
                    "VMTest": {
                        "type": "object",
                        "required": ["code"],
                        "properties": {"code": {"$ref": "#/definitions/HexData"}}
                    }
                },
                "patternProperties": {"^.*$": {"$ref": "#/definitions/VMTest"}}
            }),
        );
        dir
    }

    fn vm_test() -> &'static SchemaFamily {
        resolve_schema("./VMTests/x.json").unwrap()
    }

    #[test]
    fn conforming_document_passes() {
        let dir = fixture();
        let mut set = SchemaSet::new(dir.path(), "JSONSchema");
        let doc = json!({"add0": {"code": "0x6001"}});
        let outcome = set.validate(vm_test(), "./VMTests/add0.json", &doc).unwrap();
        assert_eq!(outcome, Ok(()));
    }

    #[test]
    fn violating_document_reports_schema_and_file() {
        let dir = fixture();
        let mut set = SchemaSet::new(dir.path(), "JSONSchema");
        let doc = json!({"add0": {"code": "not-hex"}, "add1": {}});
        let failure = set
            .validate(vm_test(), "./VMTests/foo.json", &doc)
            .unwrap()
            .unwrap_err();
        assert_eq!(
            failure.to_string(),
            "Validation failed: schema JSONSchema/vm-schema.json on ./VMTests/foo.json"
        );
        match &failure.reason {
            FailureReason::Violations(v) => {
                assert_eq!(v.len(), 2);
                let paths: Vec<&str> =
                    v.violations().iter().map(|v| v.instance_path.as_str()).collect();
                assert!(paths.contains(&"/add0/code"), "got {paths:?}");
            }
            other => panic!("expected violations, got {other:?}"),
        }
        assert_eq!(failure.details().len(), 2);
    }

    #[test]
    fn compiled_validator_is_reused() {
        let dir = fixture();
        let mut set = SchemaSet::new(dir.path(), "JSONSchema");
        let doc = json!({});
        set.validate(vm_test(), "./VMTests/a.json", &doc).unwrap().unwrap();
        // Removing the files proves the second call hits the cache.
        fs::remove_file(dir.path().join("vm-schema.json")).unwrap();
        fs::remove_file(dir.path().join(DEFINITIONS_FILE)).unwrap();
        set.validate(vm_test(), "./VMTests/b.json", &doc).unwrap().unwrap();
    }

    #[test]
    fn missing_family_schema_is_fatal() {
        let dir = fixture();
        let mut set = SchemaSet::new(dir.path(), "JSONSchema");
        let st = &SCHEMA_FAMILIES[4];
        let err = set.validate(st, "./GeneralStateTests/x.json", &json!({})).unwrap_err();
        match err {
            SchemaError::Load { schema, .. } => {
                assert_eq!(schema, PathBuf::from("JSONSchema/st-schema.json"));
            }
            other => panic!("expected load error, got {other}"),
        }
    }

    #[test]
    fn missing_definitions_file_is_fatal() {
        let dir = fixture();
        fs::remove_file(dir.path().join(DEFINITIONS_FILE)).unwrap();
        let mut set = SchemaSet::new(dir.path(), "JSONSchema");
        let err = set.validate(vm_test(), "./VMTests/x.json", &json!({})).unwrap_err();
        assert!(matches!(err, SchemaError::Load { .. }));
    }

    #[test]
    fn uncompilable_schema_is_a_recorded_failure() {
        let dir = fixture();
        write(
            dir.path(),
            "vm-schema.json",
            &json!({
                "definitions": {},
                "patternProperties": {"^.*$": {"type": 12}}
            }),
        );
        let mut set = SchemaSet::new(dir.path(), "JSONSchema");
        let failure = set
            .validate(vm_test(), "./VMTests/x.json", &json!({"a": 1}))
            .unwrap()
            .unwrap_err();
        assert!(matches!(failure.reason, FailureReason::InvalidSchema(_)));
        assert!(failure.details()[0].starts_with("invalid schema"));
    }

    #[test]
    fn composed_schema_merges_shared_definitions() {
        let dir = fixture();
        let mut set = SchemaSet::new(dir.path(), "JSONSchema");
        let schema = set.composed_schema(vm_test()).unwrap();
        assert!(schema["definitions"].get("HexData").is_some());
        assert!(schema["definitions"].get("VMTest").is_some());
        assert!(schema["patternProperties"].get("ignored").is_none());
    }

    #[test]
    fn violation_display_root() {
        let v = Violation {
            instance_path: String::new(),
            schema_path: "/required".to_string(),
            message: r#""code" is a required property"#.to_string(),
        };
        assert!(v.to_string().starts_with("(root)"));
    }
}
