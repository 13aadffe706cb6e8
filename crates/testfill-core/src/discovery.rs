//! # Test Discovery
//!
//! Walks a directory tree and collects JSON test files whose tool-facing
//! path starts with one of a set of prefixes.
//!
//! Tool-facing paths are always rendered relative to the walk root as
//! `./<dir>/<file>.json`, with `/` separators. This keeps the prefix table
//! in `testfill-schema` independent of where the tree lives on disk: a
//! tree rooted at `/tmp/tests` still reports `./VMTests/add.json`.
//!
//! Walk order is deterministic. Within a directory, files come before
//! subdirectories, and both are sorted by file name.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::CoreError;

/// File extension selected by discovery.
pub const TEST_EXTENSION: &str = ".json";

/// A discovered test file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestFile {
    /// Tool-facing path, e.g. `./VMTests/vmArithmeticTest/add0.json`.
    pub id: String,
    /// Location on disk.
    pub path: PathBuf,
}

impl TestFile {
    /// Build a `TestFile` for `path`, which must lie under `root`.
    ///
    /// Returns `None` if `path` is not below `root`.
    pub fn under_root(root: &Path, path: &Path) -> Option<Self> {
        let relative = path.strip_prefix(root).ok()?;
        let mut id = String::from(".");
        for component in relative.components() {
            id.push('/');
            id.push_str(&component.as_os_str().to_string_lossy());
        }
        Some(Self {
            id,
            path: path.to_path_buf(),
        })
    }
}

/// Files before directories, then by name.
fn walk_order(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Find every `.json` file under `root` whose id starts with `prefix`.
///
/// Symlinked directories are not followed. Entries that cannot be read
/// (e.g. permission denied) are skipped with a warning.
///
/// # Errors
///
/// Returns [`CoreError::NotADirectory`] if `root` is not a directory.
pub fn find_tests(root: &Path, prefix: &str) -> Result<Vec<TestFile>, CoreError> {
    if !root.is_dir() {
        return Err(CoreError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let mut found = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by(walk_order);

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        // Symlinks to directories are not descended into, nor listed.
        if entry.file_type().is_dir() || entry.path().is_dir() {
            continue;
        }
        if !entry.file_name().to_string_lossy().ends_with(TEST_EXTENSION) {
            continue;
        }
        let Some(test) = TestFile::under_root(root, entry.path()) else {
            continue;
        };
        if test.id.starts_with(prefix) {
            found.push(test);
        }
    }

    tracing::debug!(prefix, count = found.len(), "discovered tests");
    Ok(found)
}

/// Discover tests for each prefix in turn and concatenate the results.
///
/// An empty prefix list means "everything" (the single prefix `""`).
/// Overlapping prefixes produce duplicate entries; callers that need a
/// set must deduplicate themselves.
pub fn list_tests<S: AsRef<str>>(root: &Path, prefixes: &[S]) -> Result<Vec<TestFile>, CoreError> {
    if prefixes.is_empty() {
        return find_tests(root, "");
    }
    let mut tests = Vec::new();
    for prefix in prefixes {
        tests.extend(find_tests(root, prefix.as_ref())?);
    }
    Ok(tests)
}
