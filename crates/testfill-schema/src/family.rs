//! # Schema Families
//!
//! A test file's schema is chosen purely by where it lives. Each family
//! pairs a tool-facing path prefix (see `testfill_core::discovery`) with
//! a schema file in the schema directory. Fillers (hand-written test
//! sources under `./src/`) and generated tests use different schemas.
//!
//! The table is consulted in order and the first matching prefix wins.

use std::fmt;

/// Whether a family describes filler sources or generated tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FamilyKind {
    /// Hand-written test sources, validated against a filler schema.
    Filler,
    /// Generated test files, validated against a plain schema.
    Test,
}

impl fmt::Display for FamilyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filler => f.write_str("filler"),
            Self::Test => f.write_str("test"),
        }
    }
}

/// One row of the prefix-to-schema table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaFamily {
    /// Short test-suite label (`vm`, `st`, `bc`).
    pub name: &'static str,
    /// Filler or generated test.
    pub kind: FamilyKind,
    /// Tool-facing path prefix, including the trailing `/`.
    pub prefix: &'static str,
    /// Schema file name inside the schema directory.
    pub schema_file: &'static str,
}

impl fmt::Display for SchemaFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} ({})", self.name, self.kind, self.schema_file)
    }
}

/// Shared definitions merged into every family schema.
pub const DEFINITIONS_FILE: &str = "definitions.json";

/// Default schema directory, relative to the walk root.
pub const DEFAULT_SCHEMA_DIR: &str = "JSONSchema";

/// The six recognised families, in priority order.
pub static SCHEMA_FAMILIES: [SchemaFamily; 6] = [
    SchemaFamily {
        name: "vm",
        kind: FamilyKind::Filler,
        prefix: "./src/VMTestsFiller/",
        schema_file: "vm-filler-schema.json",
    },
    SchemaFamily {
        name: "st",
        kind: FamilyKind::Filler,
        prefix: "./src/GeneralStateTestsFiller/",
        schema_file: "st-filler-schema.json",
    },
    SchemaFamily {
        name: "bc",
        kind: FamilyKind::Filler,
        prefix: "./src/BlockchainTestsFiller/",
        schema_file: "bc-filler-schema.json",
    },
    SchemaFamily {
        name: "vm",
        kind: FamilyKind::Test,
        prefix: "./VMTests/",
        schema_file: "vm-schema.json",
    },
    SchemaFamily {
        name: "st",
        kind: FamilyKind::Test,
        prefix: "./GeneralStateTests/",
        schema_file: "st-schema.json",
    },
    SchemaFamily {
        name: "bc",
        kind: FamilyKind::Test,
        prefix: "./BlockchainTests/",
        schema_file: "bc-schema.json",
    },
];

/// Find the family for a tool-facing test path.
pub fn resolve_schema(test_id: &str) -> Option<&'static SchemaFamily> {
    SCHEMA_FAMILIES
        .iter()
        .find(|family| test_id.starts_with(family.prefix))
}
