//! # testfill-core — Discovery and Document I/O
//!
//! The leaf crate of the testfill workspace. It knows how to find JSON
//! test files in a directory tree and how to read and canonically rewrite
//! them; it knows nothing about schemas.
//!
//! ## Modules
//!
//! - [`discovery`] — recursive walk with path-prefix filtering.
//! - [`document`] — JSON read/write and the canonical (sorted-key,
//!   four-space, ASCII-only) text form used by `testfill format`.
//! - [`error`] — the fatal error type shared by both.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `testfill-*` crates.
//! - No `.unwrap()` outside tests.

pub mod discovery;
pub mod document;
pub mod error;

pub use discovery::{find_tests, list_tests, TestFile};
pub use document::{format_json_file, read_json_file, to_canonical_string, write_json_file};
pub use error::CoreError;
