//! # Schema Composition
//!
//! Every family schema is validated together with a shared set of
//! definitions. The effective schema keeps exactly two keys:
//!
//! - `definitions`: the shared definitions, extended and overridden by
//!   the family's own (family wins on a name clash);
//! - `patternProperties`: copied verbatim from the family schema.
//!
//! Everything else in either document, including any `patternProperties`
//! in the shared file, is dropped.

use serde_json::{Map, Value};

use crate::error::CompositionError;

fn definitions<'a>(schema: &'a Value, missing: CompositionError) -> Result<&'a Map<String, Value>, CompositionError> {
    schema
        .get("definitions")
        .and_then(Value::as_object)
        .ok_or(missing)
}

/// Merge shared `base` definitions into a `family` schema.
pub fn compose_schema(base: &Value, family: &Value) -> Result<Value, CompositionError> {
    let mut merged = definitions(base, CompositionError::BaseDefinitions)?.clone();
    for (name, def) in definitions(family, CompositionError::FamilyDefinitions)? {
        merged.insert(name.clone(), def.clone());
    }

    let patterns = family
        .get("patternProperties")
        .cloned()
        .ok_or(CompositionError::PatternProperties)?;

    let mut schema = Map::new();
    schema.insert("definitions".to_string(), Value::Object(merged));
    schema.insert("patternProperties".to_string(), patterns);
    Ok(Value::Object(schema))
}
