//! # Command Dispatch
//!
//! Discovers the selected tests once, then applies one per-file action to
//! each in discovery order. Fatal errors propagate with `?` and end the
//! run; recorded errors are folded into the [`RunReport`] and the loop
//! carries on.

use std::fmt;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};

use testfill_core::{format_json_file, list_tests, read_json_file, TestFile};
use testfill_schema::{resolve_schema, SchemaSet};

use crate::report::{self, RecordedError, RunReport};
use crate::resolve_under_root;

/// Test selection shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectArgs {
    /// Path prefixes selecting tests, e.g. `./src/VMTestsFiller` `./VMTests`.
    /// All `.json` files are selected when none are given.
    #[arg(value_name = "TEST_FILE_PREFIX")]
    pub prefixes: Vec<String>,
}

/// The three things testfill can do to a set of tests.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the matching test files.
    List(SelectArgs),
    /// Rewrite the matching files in canonical JSON form.
    Format(SelectArgs),
    /// Check the matching files against their family's JSON schema.
    Validate(SelectArgs),
}

impl Command {
    /// Name used in per-file log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::List(_) => "list",
            Self::Format(_) => "format",
            Self::Validate(_) => "validate",
        }
    }

    /// The test selection for this command.
    pub fn selection(&self) -> &SelectArgs {
        match self {
            Self::List(args) | Self::Format(args) | Self::Validate(args) => args,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a run looks for tests and schemas.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory to walk for tests.
    pub root: PathBuf,
    /// Schema directory on disk.
    pub schema_dir: PathBuf,
    /// Schema directory as named in messages.
    pub schema_display: PathBuf,
}

impl Settings {
    /// Settings for `root`, with `schema_dir` resolved against it when
    /// relative.
    pub fn new(root: impl Into<PathBuf>, schema_dir: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let schema_display = schema_dir.into();
        let schema_dir = resolve_under_root(&schema_display, &root);
        Self {
            root,
            schema_dir,
            schema_display,
        }
    }
}

/// Print one test path.
fn list_one(test: &TestFile) -> Option<RecordedError> {
    println!("{}", test.id);
    None
}

/// Rewrite one test file in canonical form.
fn format_one(test: &TestFile) -> Result<Option<RecordedError>> {
    format_json_file(&test.path).with_context(|| format!("cannot format {}", test.id))?;
    Ok(None)
}

/// Check one test file against its family schema.
fn validate_one(schemas: &mut SchemaSet, test: &TestFile) -> Result<Option<RecordedError>> {
    let Some(family) = resolve_schema(&test.id) else {
        return Ok(Some(RecordedError::UnknownFamily {
            file: test.id.clone(),
        }));
    };
    tracing::debug!(file = %test.id, family = %family, "validating");
    let document =
        read_json_file(&test.path).with_context(|| format!("cannot validate {}", test.id))?;
    let outcome = schemas.validate(family, &test.id, &document)?;
    Ok(outcome.err().map(RecordedError::from))
}

/// Run `command` over every selected test.
///
/// # Errors
///
/// Returns an error on any fatal condition: discovery failure, no tests
/// selected, an unreadable or malformed test file, or unusable schema
/// files. Validation failures are not errors; they are in the returned
/// report.
pub fn run_command(command: &Command, settings: &Settings) -> Result<RunReport> {
    let prefixes = &command.selection().prefixes;
    let tests = list_tests(&settings.root, prefixes.as_slice())
        .with_context(|| format!("cannot search {}", settings.root.display()))?;
    if tests.is_empty() {
        bail!("No tests listed!!!");
    }
    tracing::info!(command = %command, count = tests.len(), "running");

    let mut schemas = SchemaSet::new(&settings.schema_dir, &settings.schema_display);
    let mut report = RunReport::default();

    for test in &tests {
        report::say(format_args!("{command}: {}", test.id));
        let outcome = match command {
            Command::List(_) => list_one(test),
            Command::Format(_) => format_one(test)?,
            Command::Validate(_) => validate_one(&mut schemas, test)?,
        };
        if let Some(error) = &outcome {
            report::say_error(error);
        }
        report.record(outcome);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use std::path::Path;

    fn put(root: &Path, rel: &str, value: &serde_json::Value) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, serde_json::to_string(value).unwrap()).unwrap();
    }

    /// A tree with one VM test schema requiring an object per test.
    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        put(root, "JSONSchema/definitions.json", &json!({"definitions": {}}));
        put(
            root,
            "JSONSchema/vm-schema.json",
            &json!({
                "definitions": {},
                "patternProperties": {"^.*$": {"type": "object"}}
            }),
        );
        put(root, "VMTests/good.json", &json!({"t": {}}));
        dir
    }

    fn validate(prefixes: &[&str]) -> Command {
        Command::Validate(SelectArgs {
            prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
        })
    }

    #[test]
    fn settings_resolve_relative_schema_dir() {
        let settings = Settings::new("/repo", "JSONSchema");
        assert_eq!(settings.schema_dir, PathBuf::from("/repo/JSONSchema"));
        assert_eq!(settings.schema_display, PathBuf::from("JSONSchema"));
    }

    #[test]
    fn conforming_file_yields_clean_report() {
        let dir = tree();
        let settings = Settings::new(dir.path(), "JSONSchema");
        let report = run_command(&validate(&["./VMTests/"]), &settings).unwrap();
        assert_eq!(report.processed(), 1);
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn violating_file_yields_one_recorded_error() {
        let dir = tree();
        put(dir.path(), "VMTests/foo.json", &json!({"t": 5}));
        let settings = Settings::new(dir.path(), "JSONSchema");
        let report = run_command(&validate(&["./VMTests/foo"]), &settings).unwrap();
        assert_eq!(report.errors().len(), 1);
        let msg = report.errors()[0].to_string();
        assert!(msg.contains("vm-schema.json"), "{msg}");
        assert!(msg.contains("./VMTests/foo.json"), "{msg}");
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn unknown_family_is_recorded_and_run_continues() {
        let dir = tree();
        put(dir.path(), "Other/x.json", &json!({}));
        let settings = Settings::new(dir.path(), "JSONSchema");
        let report = run_command(&validate(&["./Other/", "./VMTests/"]), &settings).unwrap();
        assert_eq!(report.processed(), 2);
        assert_eq!(
            report.errors(),
            &[RecordedError::UnknownFamily {
                file: "./Other/x.json".to_string()
            }]
        );
    }

    #[test]
    fn no_matching_tests_is_fatal() {
        let dir = tree();
        let settings = Settings::new(dir.path(), "JSONSchema");
        let err = run_command(&validate(&["./Nothing/"]), &settings).unwrap_err();
        assert_eq!(err.to_string(), "No tests listed!!!");
    }

    #[test]
    fn malformed_test_file_is_fatal() {
        let dir = tree();
        fs::write(dir.path().join("VMTests/broken.json"), "{").unwrap();
        let settings = Settings::new(dir.path(), "JSONSchema");
        let err = run_command(&validate(&["./VMTests/"]), &settings).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.starts_with("cannot validate ./VMTests/broken.json: "), "{msg}");
    }

    #[test]
    fn format_rewrites_selected_files_only() {
        let dir = tree();
        put(dir.path(), "src/VMTestsFiller/a.json", &json!({"b": 1, "a": 2}));
        let settings = Settings::new(dir.path(), "JSONSchema");
        let command = Command::Format(SelectArgs {
            prefixes: vec!["./src/".to_string()],
        });
        let report = run_command(&command, &settings).unwrap();
        assert!(report.is_clean());
        let text = fs::read_to_string(dir.path().join("src/VMTestsFiller/a.json")).unwrap();
        assert_eq!(text, "{\n    \"a\": 2,\n    \"b\": 1\n}");
        let untouched = fs::read_to_string(dir.path().join("VMTests/good.json")).unwrap();
        assert_eq!(untouched, r#"{"t":{}}"#);
    }

    #[test]
    fn list_touches_no_schema() {
        let dir = tree();
        fs::remove_dir_all(dir.path().join("JSONSchema")).unwrap();
        let settings = Settings::new(dir.path(), "JSONSchema");
        let report = run_command(&Command::List(SelectArgs::default()), &settings).unwrap();
        assert_eq!(report.processed(), 1);
        assert!(report.is_clean());
    }

    #[test]
    fn command_names() {
        assert_eq!(Command::List(SelectArgs::default()).name(), "list");
        assert_eq!(Command::Format(SelectArgs::default()).name(), "format");
        assert_eq!(validate(&[]).to_string(), "validate");
    }
}
