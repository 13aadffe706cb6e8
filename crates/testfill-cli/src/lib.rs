//! # testfill-cli — Command-Line Front End
//!
//! Provides the `testfill` binary:
//!
//! ```bash
//! testfill list     [<TEST_FILE_PREFIX>...]
//! testfill format   [<TEST_FILE_PREFIX>...]
//! testfill validate [<TEST_FILE_PREFIX>...]
//! ```
//!
//! Prefixes are matched against root-relative paths such as
//! `./src/VMTestsFiller/vmArithmeticTest/add0Filler.json`. With no
//! prefix, every `.json` file under the root is selected.
//!
//! ## Error Model
//!
//! - Fatal errors (bad arguments, no matching tests, unreadable or
//!   malformed files, unusable schemas) stop the run at once.
//! - Recorded errors (unknown schema family, validation failure) are
//!   reported as they happen, collected in a [`report::RunReport`], and
//!   replayed at the end; the exit status is then 1.
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers here take plain values.
//! - Handlers delegate to `testfill-core` and `testfill-schema`.

pub mod report;
pub mod run;
pub mod usage;

use std::path::{Path, PathBuf};

/// Resolve a configured directory against the walk root.
///
/// Absolute paths are returned unchanged; relative ones are joined onto
/// `root`.
pub fn resolve_under_root(path: &Path, root: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
