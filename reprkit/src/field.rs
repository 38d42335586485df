//! Field descriptors
//!
//! A [`Field`] pairs a name and an ordering priority with an extractor and a
//! formatter. Fields are built once, when a type is declared, and shared
//! read-only (behind `Arc`) by every renderer that includes them.
//!
//! Identity matters: two fields are the same entry only if they are the same
//! constructed object. Each construction gets a fresh [`FieldId`], which also
//! breaks priority ties in declaration order.

use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::error::{ReprError, Result};
use crate::extract::{AttributeExtractor, Extractor};
use crate::format::{DefaultFormatter, ValueFormatter};
use crate::inspect::Inspect;
use crate::sequencer::Sequencer;

static NEXT_FIELD_ID: AtomicU64 = AtomicU64::new(1);

static DEFAULT_EXTRACTOR: Lazy<Arc<dyn Extractor>> = Lazy::new(|| Arc::new(AttributeExtractor));
static DEFAULT_FORMATTER: Lazy<Arc<dyn ValueFormatter>> = Lazy::new(|| Arc::new(DefaultFormatter));

/// Declaration identity of a field. Increases with construction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId(u64);

impl FieldId {
    fn fresh() -> Self {
        Self(NEXT_FIELD_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An immutable field descriptor.
pub struct Field {
    id: FieldId,
    name: Option<String>,
    priority: i64,
    extractor: Arc<dyn Extractor>,
    formatter: Arc<dyn ValueFormatter>,
}

impl Field {
    pub fn builder() -> FieldBuilder {
        FieldBuilder::default()
    }

    /// Builder with the name already set.
    pub fn named(name: impl Into<String>) -> FieldBuilder {
        FieldBuilder::default().name(name)
    }

    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn priority(&self) -> i64 {
        self.priority
    }

    /// Rendering order: ascending priority, then declaration order.
    pub fn render_order(&self, other: &Field) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| self.id.cmp(&other.id))
    }

    /// Extract this field from `target` and format it into a fragment.
    ///
    /// Extractor failures surface as [`ReprError::Extraction`], formatter
    /// failures as [`ReprError::Formatting`].
    pub fn render_against(&self, target: &dyn Inspect) -> Result<String> {
        let name = self.name.as_deref().unwrap_or_default();

        let value = self
            .extractor
            .extract(target, name)
            .map_err(|e| match e {
                e @ ReprError::Extraction { .. } => e,
                other => ReprError::extraction(target.type_name(), name, other.to_string()),
            })?;

        self.formatter.format(&value, name).map_err(|e| match e {
            e @ ReprError::Formatting { .. } => e,
            other => ReprError::formatting(name, other.to_string()),
        })
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Field`]. Unset parts fall back to attribute lookup, the
/// `name=value` formatter, and the next value of the sequencer passed to
/// [`FieldBuilder::build`].
#[derive(Default)]
pub struct FieldBuilder {
    name: Option<String>,
    priority: Option<i64>,
    extractor: Option<Arc<dyn Extractor>>,
    formatter: Option<Arc<dyn ValueFormatter>>,
}

impl FieldBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn extractor(mut self, extractor: impl Extractor + 'static) -> Self {
        self.extractor = Some(Arc::new(extractor));
        self
    }

    pub fn formatter(mut self, formatter: impl ValueFormatter + 'static) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    pub fn has_name(&self) -> bool {
        self.name.is_some()
    }

    /// Build the field. `sequencer` is advanced only when no explicit
    /// priority was given.
    pub fn build(self, sequencer: &Sequencer) -> Arc<Field> {
        let priority = self.priority.unwrap_or_else(|| sequencer.next());
        Arc::new(Field {
            id: FieldId::fresh(),
            name: self.name,
            priority,
            extractor: self
                .extractor
                .unwrap_or_else(|| Arc::clone(&*DEFAULT_EXTRACTOR)),
            formatter: self
                .formatter
                .unwrap_or_else(|| Arc::clone(&*DEFAULT_FORMATTER)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::LengthExtractor;
    use crate::format::TemplateFormatter;
    use crate::inspect::Record;
    use crate::value::Value;
    use serde_json::json;

    #[test]
    fn test_default_field_renders_name_equals_value() {
        let seq = Sequencer::default();
        let field = Field::named("n").build(&seq);
        let obj = Record::new("Thing").with("n", 5);
        assert_eq!(field.render_against(&obj).unwrap(), "n=5");
    }

    #[test]
    fn test_template_formatter_field() {
        let seq = Sequencer::default();
        let field = Field::named("x")
            .formatter(TemplateFormatter::new("{value}%"))
            .build(&seq);
        let obj = Record::new("Gauge").with("x", 42);
        assert_eq!(field.render_against(&obj).unwrap(), "42%");
    }

    #[test]
    fn test_default_priorities_follow_declaration_order() {
        let seq = Sequencer::default();
        let fields: Vec<_> = ["a", "b", "c"]
            .into_iter()
            .map(|n| Field::named(n).build(&seq))
            .collect();
        assert!(fields.windows(2).all(|w| w[0].priority() < w[1].priority()));
        assert_eq!(fields[2].priority(), 3);
    }

    #[test]
    fn test_explicit_priority_does_not_advance_sequencer() {
        let seq = Sequencer::default();
        let explicit = Field::named("a").priority(100).build(&seq);
        let implicit = Field::named("b").build(&seq);
        assert_eq!(explicit.priority(), 100);
        assert_eq!(implicit.priority(), 1);
    }

    #[test]
    fn test_render_order_breaks_ties_by_declaration() {
        let seq = Sequencer::default();
        let first = Field::named("a").priority(1).build(&seq);
        let second = Field::named("b").priority(1).build(&seq);
        assert_eq!(first.render_order(&second), Ordering::Less);
        assert!(first.id() < second.id());
    }

    #[test]
    fn test_missing_attribute_is_extraction_error() {
        let seq = Sequencer::default();
        let field = Field::named("missing").build(&seq);
        let obj = Record::new("Thing");
        assert!(matches!(
            field.render_against(&obj),
            Err(ReprError::Extraction { .. })
        ));
    }

    #[test]
    fn test_unnamed_field_fails_with_default_extractor() {
        let seq = Sequencer::default();
        let field = Field::builder().build(&seq);
        assert_eq!(field.name(), None);
        assert!(matches!(
            field.render_against(&Record::new("Thing")),
            Err(ReprError::Extraction { .. })
        ));
    }

    #[test]
    fn test_extractor_failures_are_reported_as_extraction() {
        let seq = Sequencer::default();
        let field = Field::named("x")
            .extractor(|_: &dyn Inspect, name: &str| -> Result<Value> {
                Err(ReprError::formatting(name, "wrong kind on purpose"))
            })
            .build(&seq);
        let err = field.render_against(&Record::new("Thing")).unwrap_err();
        assert!(matches!(err, ReprError::Extraction { .. }));
        assert!(err.to_string().contains("wrong kind on purpose"));
    }

    #[test]
    fn test_length_helper_as_extractor() {
        let seq = Sequencer::default();
        let field = Field::named("tags").extractor(LengthExtractor).build(&seq);
        let obj = Record::new("Post").with("tags", json!(["a", "b"]));
        assert_eq!(field.render_against(&obj).unwrap(), "tags=2");
    }

    #[test]
    fn test_debug_omits_capabilities() {
        let seq = Sequencer::default();
        let field = Field::named("a").build(&seq);
        let dbg = format!("{field:?}");
        assert!(dbg.contains("\"a\""));
        assert!(dbg.contains("priority: 1"));
    }
}
