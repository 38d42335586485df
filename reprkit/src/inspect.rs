//! Runtime inspection of render targets.
//!
//! Extractors see an instance only through [`Inspect`]: its runtime type name
//! and attribute lookup by name. Any `Serialize` type can implement it with
//! [`impl_inspect!`](crate::impl_inspect); [`Record`] covers objects whose
//! shape is only known at runtime.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::error::{ReprError, Result};
use crate::value::Value;

/// An object that can be rendered.
pub trait Inspect {
    /// Runtime type name, used both as the `class_name` template argument and
    /// as the registry key for the type's renderer.
    fn type_name(&self) -> &str;

    /// Look up an attribute by name. `Ok(None)` means the attribute does not
    /// exist; an error means the instance could not be inspected.
    fn attribute(&self, name: &str) -> Result<Option<Value>>;
}

impl<T: Inspect + ?Sized> Inspect for &T {
    fn type_name(&self) -> &str {
        (**self).type_name()
    }

    fn attribute(&self, name: &str) -> Result<Option<Value>> {
        (**self).attribute(name)
    }
}

/// Attribute lookup through serde: serialize `value` and take the named
/// member of the resulting object.
///
/// A value that fails to serialize is an [`ReprError::Extraction`] carrying
/// the serde error.
pub fn serialized_attribute<T: Serialize + ?Sized>(
    value: &T,
    type_name: &str,
    name: &str,
) -> Result<Option<Value>> {
    match serde_json::to_value(value) {
        Ok(Value::Object(mut map)) => Ok(map.remove(name)),
        Ok(_) => Ok(None),
        Err(e) => {
            debug!(type_name, attribute = name, error = %e, "instance did not serialize");
            Err(ReprError::extraction(
                type_name,
                name,
                format!("{type_name} did not serialize: {e}"),
            ))
        }
    }
}

/// Implement [`Inspect`] for a `Serialize` type.
///
/// ```
/// use reprkit::{impl_inspect, Inspect};
///
/// #[derive(serde::Serialize)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
/// impl_inspect!(Point);
///
/// let p = Point { x: 1, y: 2 };
/// assert_eq!(p.type_name(), "Point");
/// assert_eq!(p.attribute("y").unwrap(), Some(serde_json::json!(2)));
/// ```
#[macro_export]
macro_rules! impl_inspect {
    ($ty:ty) => {
        $crate::impl_inspect!($ty, stringify!($ty));
    };
    ($ty:ty, $name:expr) => {
        impl $crate::Inspect for $ty {
            fn type_name(&self) -> &str {
                $name
            }

            fn attribute(&self, name: &str) -> $crate::Result<Option<$crate::Value>> {
                $crate::inspect::serialized_attribute(self, $crate::Inspect::type_name(self), name)
            }
        }
    };
}

/// A dynamically shaped object: a type name plus named attribute values.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    type_name: String,
    attributes: IndexMap<String, Value>,
}

impl Record {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            attributes: IndexMap::new(),
        }
    }

    /// Add or replace an attribute.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn attributes(&self) -> &IndexMap<String, Value> {
        &self.attributes
    }
}

impl Inspect for Record {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn attribute(&self, name: &str) -> Result<Option<Value>> {
        Ok(self.attributes.get(name).cloned())
    }
}
