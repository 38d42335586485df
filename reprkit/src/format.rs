//! Value formatters
//!
//! A formatter turns an extracted value and its field name into the text
//! fragment that ends up between the delimiters of the rendered string.

use crate::error::{ReprError, Result};
use crate::template::{Template, TemplateFault};
use crate::value::{display_value, Value};

/// Capability converting a raw value plus its field name into a fragment.
pub trait ValueFormatter: Send + Sync {
    fn format(&self, value: &Value, field_name: &str) -> Result<String>;
}

impl<F> ValueFormatter for F
where
    F: Fn(&Value, &str) -> Result<String> + Send + Sync,
{
    fn format(&self, value: &Value, field_name: &str) -> Result<String> {
        self(value, field_name)
    }
}

/// Formats as `name=value`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormatter;

impl ValueFormatter for DefaultFormatter {
    fn format(&self, value: &Value, field_name: &str) -> Result<String> {
        Ok(format!("{field_name}={}", display_value(value)))
    }
}

/// Substitutes the value into a template with a single `{value}` placeholder.
///
/// The placeholder may carry a format spec such as `{value:.2f}` or
/// `{value:>5}` (see [`crate::template`]). The field name is ignored. A
/// malformed template, one referencing any key other than `value`, or an `f`
/// spec applied to a non-numeric value fails when a value is formatted.
#[derive(Debug, Clone)]
pub struct TemplateFormatter {
    source: String,
    parsed: std::result::Result<Template, TemplateFault>,
}

impl TemplateFormatter {
    pub fn new(template: impl Into<String>) -> Self {
        let source = template.into();
        let parsed = Template::parse(source.as_str());
        Self { source, parsed }
    }

    pub fn template(&self) -> &str {
        &self.source
    }
}

impl ValueFormatter for TemplateFormatter {
    fn format(&self, value: &Value, field_name: &str) -> Result<String> {
        let template = self
            .parsed
            .as_ref()
            .map_err(|fault| ReprError::formatting(field_name, fault.to_string()))?;
        let text = display_value(value);
        template
            .render(|key| (key == "value").then_some(text.as_str()))
            .map_err(|fault| {
                ReprError::formatting(field_name, format!("template '{}': {fault}", self.source))
            })
    }
}
