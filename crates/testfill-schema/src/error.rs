//! # Schema Errors
//!
//! Problems with the schema files themselves. These stop the run: if the
//! shared definitions or a family schema cannot be loaded, no document of
//! that family can be checked.
//!
//! A document that fails validation is *not* an error here; see
//! [`crate::validate::ValidationFailure`].

use std::path::PathBuf;

use testfill_core::CoreError;
use thiserror::Error;

/// Structural defects found while composing a schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompositionError {
    /// The shared schema has no `definitions` object.
    #[error("base schema has no \"definitions\" object")]
    BaseDefinitions,

    /// The family schema has no `definitions` object.
    #[error("family schema has no \"definitions\" object")]
    FamilyDefinitions,

    /// The family schema has no `patternProperties` entry.
    #[error("family schema has no \"patternProperties\"")]
    PatternProperties,
}

/// Fatal error while loading or composing schemas.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A schema file could not be read or parsed.
    #[error("schema load error for '{}': {source}", schema.display())]
    Load {
        /// Schema file as shown to the user.
        schema: PathBuf,
        /// Underlying read/parse failure.
        #[source]
        source: CoreError,
    },

    /// The schema files parsed but cannot be composed.
    #[error("malformed schema '{}': {source}", schema.display())]
    Malformed {
        /// Schema file as shown to the user.
        schema: PathBuf,
        /// What is missing.
        #[source]
        source: CompositionError,
    },
}
