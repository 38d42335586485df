//! Renderers
//!
//! A renderer turns an instance into its final string. The [`Render`] trait
//! splits that into a template plus the arguments substituted into it;
//! [`FieldRenderer`] supplies `class_name` and `formatted_fields` from a set
//! of [`Field`]s.
//!
//! Rendering is all-or-nothing: the first extraction, formatting or template
//! failure is returned and no partial string is produced.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use tracing::trace;

use crate::error::{ReprError, Result};
use crate::field::Field;
use crate::inspect::Inspect;
use crate::style::RenderStyle;
use crate::template::Template;

/// Template arguments keyed by placeholder name.
pub type Arguments = IndexMap<String, String>;

static DEFAULT_TEMPLATE: Lazy<Template> = Lazy::new(|| {
    Template::parse(RenderStyle::DEFAULT_TEMPLATE).expect("default template is well formed")
});

/// Something that can render an instance through a template.
pub trait Render: fmt::Debug + Send + Sync {
    fn template(&self) -> &Template;

    /// Arguments to substitute into [`Render::template`] for `target`.
    fn arguments(&self, target: &dyn Inspect) -> Result<Arguments>;

    /// Field descriptors this renderer draws on, if any.
    fn fields(&self) -> &[Arc<Field>] {
        &[]
    }

    fn render(&self, target: &dyn Inspect) -> Result<String> {
        let args = self.arguments(target)?;
        let template = self.template();
        template
            .render(|key| args.get(key).map(String::as_str))
            .map_err(|fault| ReprError::template(template.source(), fault.to_string()))
    }
}

/// Renders `class_name` and the priority-ordered, delimiter-joined field
/// fragments as `formatted_fields`.
#[derive(Debug, Clone)]
pub struct FieldRenderer {
    fields: Vec<Arc<Field>>,
    template: Template,
    delimiter: String,
}

impl FieldRenderer {
    pub const CLASS_NAME: &'static str = "class_name";
    pub const FORMATTED_FIELDS: &'static str = "formatted_fields";

    /// Renderer with the default template and delimiter.
    pub fn new(fields: impl IntoIterator<Item = Arc<Field>>) -> Self {
        Self {
            fields: distinct(fields),
            template: DEFAULT_TEMPLATE.clone(),
            delimiter: RenderStyle::DEFAULT_DELIMITER.to_string(),
        }
    }

    /// Renderer with an explicit template and delimiter. Fails if the
    /// template does not parse.
    pub fn with_template(
        fields: impl IntoIterator<Item = Arc<Field>>,
        template: &str,
        delimiter: impl Into<String>,
    ) -> Result<Self> {
        let template =
            Template::parse(template).map_err(|fault| ReprError::template(template, fault.to_string()))?;
        Ok(Self {
            fields: distinct(fields),
            template,
            delimiter: delimiter.into(),
        })
    }

    pub fn from_style(
        fields: impl IntoIterator<Item = Arc<Field>>,
        style: &RenderStyle,
    ) -> Result<Self> {
        Self::with_template(fields, &style.template, style.delimiter.as_str())
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Field fragments for `target` in rendering order.
    pub fn formatted_fields(&self, target: &dyn Inspect) -> Result<Vec<String>> {
        let mut ordered: Vec<&Arc<Field>> = self.fields.iter().collect();
        ordered.sort_by(|a, b| a.render_order(b));
        ordered
            .into_iter()
            .map(|field| field.render_against(target))
            .collect()
    }
}

impl Render for FieldRenderer {
    fn template(&self) -> &Template {
        &self.template
    }

    fn arguments(&self, target: &dyn Inspect) -> Result<Arguments> {
        let formatted = self.formatted_fields(target)?.join(&self.delimiter);
        trace!(
            type_name = %target.type_name(),
            fields = self.fields.len(),
            "rendering instance"
        );

        let mut args = Arguments::new();
        args.insert(Self::CLASS_NAME.to_string(), target.type_name().to_string());
        args.insert(Self::FORMATTED_FIELDS.to_string(), formatted);
        Ok(args)
    }

    fn fields(&self) -> &[Arc<Field>] {
        &self.fields
    }
}

/// Builds the renderer for a type from its effective fields.
pub trait RendererFactory: Send + Sync {
    fn build(&self, fields: Vec<Arc<Field>>, style: &RenderStyle) -> Result<Arc<dyn Render>>;
}

impl<F> RendererFactory for F
where
    F: Fn(Vec<Arc<Field>>, &RenderStyle) -> Result<Arc<dyn Render>> + Send + Sync,
{
    fn build(&self, fields: Vec<Arc<Field>>, style: &RenderStyle) -> Result<Arc<dyn Render>> {
        self(fields, style)
    }
}

/// Factory producing a [`FieldRenderer`] from the style.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldRendererFactory;

impl RendererFactory for FieldRendererFactory {
    fn build(&self, fields: Vec<Arc<Field>>, style: &RenderStyle) -> Result<Arc<dyn Render>> {
        Ok(Arc::new(FieldRenderer::from_style(fields, style)?))
    }
}

/// Keep the first occurrence of each field identity.
fn distinct(fields: impl IntoIterator<Item = Arc<Field>>) -> Vec<Arc<Field>> {
    let mut seen = HashSet::new();
    fields
        .into_iter()
        .filter(|field| seen.insert(field.id()))
        .collect()
}
