//! Value extractors
//!
//! An extractor pulls the raw value of a field out of an instance. The
//! default is plain attribute lookup; [`LengthExtractor`] is the bundled
//! helper that reports the length of an attribute instead of its value.
//! Any `Fn(&dyn Inspect, &str) -> Result<Value>` closure is an extractor too.

use crate::error::{ReprError, Result};
use crate::inspect::Inspect;
use crate::value::Value;

/// Capability turning an instance and a field name into a raw value.
pub trait Extractor: Send + Sync {
    fn extract(&self, target: &dyn Inspect, name: &str) -> Result<Value>;
}

impl<F> Extractor for F
where
    F: Fn(&dyn Inspect, &str) -> Result<Value> + Send + Sync,
{
    fn extract(&self, target: &dyn Inspect, name: &str) -> Result<Value> {
        self(target, name)
    }
}

/// Plain attribute lookup by field name.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeExtractor;

impl Extractor for AttributeExtractor {
    fn extract(&self, target: &dyn Inspect, name: &str) -> Result<Value> {
        lookup(target, name)
    }
}

/// Length of the named attribute: characters of a string, elements of an
/// array, entries of an object.
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthExtractor;

impl Extractor for LengthExtractor {
    fn extract(&self, target: &dyn Inspect, name: &str) -> Result<Value> {
        attribute_length(target, name).map(Value::from)
    }
}

/// Length of `target`'s attribute `name`.
///
/// Fails if the attribute is absent or its value has no length.
pub fn attribute_length(target: &dyn Inspect, name: &str) -> Result<usize> {
    match lookup(target, name)? {
        Value::String(s) => Ok(s.chars().count()),
        Value::Array(items) => Ok(items.len()),
        Value::Object(map) => Ok(map.len()),
        other => Err(ReprError::extraction(
            target.type_name(),
            name,
            format!("{} value has no length", kind_of(&other)),
        )),
    }
}

fn lookup(target: &dyn Inspect, name: &str) -> Result<Value> {
    if name.is_empty() {
        return Err(ReprError::extraction(
            target.type_name(),
            name,
            "field has no name",
        ));
    }
    target.attribute(name)?.ok_or_else(|| {
        ReprError::extraction(
            target.type_name(),
            name,
            format!("{} has no attribute '{name}'", target.type_name()),
        )
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
