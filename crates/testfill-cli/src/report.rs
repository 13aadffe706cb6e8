//! # Run Report
//!
//! Per-file actions never print errors or touch an exit status directly.
//! They hand back an optional [`RecordedError`]; the dispatcher folds
//! those into a [`RunReport`], and the report decides the exit code.
//!
//! Every message goes to stderr with a `== testfill: ` lead-in. Only the
//! `list` output itself goes to stdout.

use std::fmt;

use testfill_schema::ValidationFailure;

/// Program name used in stderr messages.
pub const PROGRAM: &str = "testfill";

/// A non-fatal problem with one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedError {
    /// The file's path matches none of the schema families.
    UnknownFamily {
        /// Tool-facing path.
        file: String,
    },
    /// The file was checked and rejected.
    ValidationFailed(ValidationFailure),
}

impl RecordedError {
    /// Extra lines shown beneath the headline when the error occurs.
    pub fn details(&self) -> Vec<String> {
        match self {
            Self::UnknownFamily { .. } => Vec::new(),
            Self::ValidationFailed(failure) => failure.details(),
        }
    }
}

impl fmt::Display for RecordedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFamily { file } => write!(f, "Do not know how to validate file: {file}"),
            Self::ValidationFailed(failure) => write!(f, "{failure}"),
        }
    }
}

impl From<ValidationFailure> for RecordedError {
    fn from(failure: ValidationFailure) -> Self {
        Self::ValidationFailed(failure)
    }
}

/// Everything a run recorded.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    processed: usize,
    errors: Vec<RecordedError>,
}

impl RunReport {
    /// Fold one file's result into the report.
    pub fn record(&mut self, outcome: Option<RecordedError>) {
        self.processed += 1;
        if let Some(error) = outcome {
            self.errors.push(error);
        }
    }

    /// Number of files processed.
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Recorded errors, in the order they occurred.
    pub fn errors(&self) -> &[RecordedError] {
        &self.errors
    }

    /// True when nothing was recorded.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Process exit status for this run.
    pub fn exit_code(&self) -> u8 {
        if self.is_clean() {
            0
        } else {
            1
        }
    }

    /// The end-of-run replay: a headline, then one `[ERROR]` line per
    /// recorded error.
    pub fn summary(&self) -> String {
        let mut text = String::from("Errors reported!");
        for error in &self.errors {
            text.push_str("\n[ERROR] ");
            text.push_str(&error.to_string());
        }
        text
    }
}

/// Print a message to stderr.
pub fn say(message: impl fmt::Display) {
    eprintln!("== {PROGRAM}: {message}");
}

/// Print a recorded error as it happens.
pub fn say_error(error: &RecordedError) {
    say(format_args!("ERROR: {error}"));
    for line in error.details() {
        eprintln!("    {line}");
    }
}

/// Print a fatal message and the closing line.
pub fn say_fatal(message: impl fmt::Display) {
    say(message);
    say("exiting...");
}
