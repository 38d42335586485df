//! Stylized capability: route a type's textual conversion to its renderer.

use std::fmt;

use tracing::warn;

use crate::error::Result;
use crate::inspect::Inspect;
use crate::registry::Registry;

/// Opt-in for types whose string form comes from their registered renderer.
///
/// The type must have been defined in [`Stylized::registry`] under its
/// [`Inspect::type_name`]. Override `registry` to use something other than
/// the global registry.
///
/// ```
/// use reprkit::{impl_inspect, Field, Registry, Stylized, TypeDecl};
///
/// #[derive(serde::Serialize)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
/// impl_inspect!(Point);
/// impl Stylized for Point {}
///
/// Registry::global()
///     .define(TypeDecl::new("Point").field(Field::named("x")).field(Field::named("y")))
///     .unwrap();
///
/// let p = Point { x: 1, y: 2 };
/// assert_eq!(p.to_display_string().unwrap(), "Point(x=1, y=2)");
/// assert_eq!(p.styled().to_string(), "Point(x=1, y=2)");
/// ```
pub trait Stylized: Inspect {
    fn registry(&self) -> &Registry {
        Registry::global()
    }

    fn to_display_string(&self) -> Result<String>
    where
        Self: Sized,
    {
        self.registry().render(self)
    }

    /// `Display` adapter over [`Stylized::to_display_string`].
    fn styled(&self) -> Styled<'_, Self>
    where
        Self: Sized,
    {
        Styled(self)
    }
}

/// Displays a [`Stylized`] value through its renderer.
///
/// A render failure is logged and reported as [`fmt::Error`]; use
/// [`Stylized::to_display_string`] to get the error itself.
pub struct Styled<'a, T: ?Sized>(&'a T);

impl<T: Stylized> fmt::Display for Styled<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.to_display_string() {
            Ok(text) => f.write_str(&text),
            Err(e) => {
                warn!(type_name = %self.0.type_name(), error = %e, "render failed");
                Err(fmt::Error)
            }
        }
    }
}

impl<T: Stylized> fmt::Debug for Styled<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
