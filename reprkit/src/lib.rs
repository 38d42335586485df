//! Declarative, human-readable object representations
//!
//! `reprkit` renders one flat string per object from a set of field
//! descriptors. Each [`Field`] pairs a value extractor with a value
//! formatter; a [`FieldRenderer`] orders the fields by priority, joins their
//! fragments and substitutes them into a template such as
//! `{class_name}({formatted_fields})`.
//!
//! # Architecture
//!
//! - **Declared, not discovered**: a type lists its parents and local fields in a [`TypeDecl`]
//! - **Two-phase build**: [`Registry::define`] aggregates inherited fields by identity and builds the renderer once
//! - **Side table**: renderers are cached in the [`Registry`] keyed by type name, not on the type
//! - **Opt-in display**: types implementing [`Stylized`] render through their registered renderer
//!
//! ```
//! use reprkit::{Field, Record, Registry, TemplateFormatter, TypeDecl};
//!
//! let registry = Registry::new();
//! registry
//!     .define(TypeDecl::new("Shape").field(Field::named("sides")))
//!     .unwrap();
//! registry
//!     .define(
//!         TypeDecl::new("Square")
//!             .parent("Shape")
//!             .field(Field::named("fill").formatter(TemplateFormatter::new("{value}% filled"))),
//!     )
//!     .unwrap();
//!
//! let square = Record::new("Square").with("sides", 4).with("fill", 80);
//! assert_eq!(registry.render(&square).unwrap(), "Square(sides=4, 80% filled)");
//! ```

pub mod error;
pub mod extract;
pub mod field;
pub mod format;
pub mod inspect;
pub mod registry;
pub mod renderer;
pub mod sequencer;
pub mod style;
pub mod stylized;
pub mod template;
pub mod value;

pub use error::{ErrorSeverity, ReprError, Result};
pub use extract::{attribute_length, AttributeExtractor, Extractor, LengthExtractor};
pub use field::{Field, FieldBuilder, FieldId};
pub use format::{DefaultFormatter, TemplateFormatter, ValueFormatter};
pub use inspect::{Inspect, Record};
pub use registry::{Registry, TypeDecl};
pub use renderer::{Arguments, FieldRenderer, FieldRendererFactory, Render, RendererFactory};
pub use sequencer::Sequencer;
pub use style::RenderStyle;
pub use stylized::{Styled, Stylized};
pub use template::{Template, TemplateFault};
pub use value::{display_value, Value};
