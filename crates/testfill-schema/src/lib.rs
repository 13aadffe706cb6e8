//! # testfill-schema — Schema Selection and Validation
//!
//! Decides which JSON Schema a test file is checked against and runs the
//! check.
//!
//! ## Families (`family`)
//!
//! Six families, three filler sources and three generated-test trees,
//! each selected by a path prefix. See [`SCHEMA_FAMILIES`] for the table
//! and [`resolve_schema`] for the first-match lookup.
//!
//! ## Composition (`compose`)
//!
//! Family schemas share a `definitions.json`. [`compose_schema`] merges
//! the shared definitions under the family's own and keeps only the
//! family's `patternProperties`.
//!
//! ## Validation (`validate`)
//!
//! [`SchemaSet`] loads and compiles schemas lazily, once per family per
//! run, and returns a [`ValidationFailure`] carrying every violation
//! rather than a bare pass/fail.
//!
//! ## Crate Policy
//!
//! - Depends only on `testfill-core` internally.
//! - Unusable schema files are [`SchemaError`]s; non-conforming documents
//!   are values, not errors.

pub mod compose;
pub mod error;
pub mod family;
pub mod validate;

pub use compose::compose_schema;
pub use error::{CompositionError, SchemaError};
pub use family::{
    resolve_schema, FamilyKind, SchemaFamily, DEFAULT_SCHEMA_DIR, DEFINITIONS_FILE,
    SCHEMA_FAMILIES,
};
pub use validate::{
    FailureReason, SchemaSet, ValidationFailure, ValidationOutcome, ValidationViolations,
    Violation,
};
