//! Brace placeholder templates
//!
//! Templates use `{name}` placeholders; `{{` and `}}` produce literal braces.
//! A template is parsed once into literal and placeholder segments, then
//! rendered any number of times against a key lookup.
//!
//! A placeholder may carry a format spec after a colon,
//! `{name:[[fill]align][width][.precision][f]}`:
//!
//! - `align` is `<`, `>` or `^`; numbers default to right, text to left
//! - `precision` gives numbers that many decimals and truncates text
//! - `f` requires the substituted text to be a number
//!
//! Other spec characters make the template malformed.
//!
//! ```
//! use reprkit::template::Template;
//!
//! let template = Template::parse("{class_name}({formatted_fields})").unwrap();
//! let rendered = template
//!     .render(|key| match key {
//!         "class_name" => Some("Point"),
//!         "formatted_fields" => Some("x=1"),
//!         _ => None,
//!     })
//!     .unwrap();
//! assert_eq!(rendered, "Point(x=1)");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Matches, in order of preference: an escaped `{{`, an escaped `}}`, a
/// `{placeholder}`, or a stray brace.
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{|\}\}|\{([^{}]*)\}|[{}]").expect("valid token pattern"));

static KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid key pattern"));

static SPEC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?P<fill>.)?(?P<align>[<>^]))?(?P<width>\d+)?(?:\.(?P<precision>\d+))?(?P<fixed>f)?$")
        .expect("valid spec pattern")
});

/// Why a template could not be parsed or rendered
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateFault {
    #[error("malformed template at byte {position}: {message}")]
    Malformed { position: usize, message: String },

    #[error("unknown substitution key '{key}'")]
    UnknownKey { key: String },

    #[error("'{text}' for key '{key}' is not a number")]
    NotANumber { key: String, text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
}

/// Parsed `[[fill]align][width][.precision][f]` spec.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct FormatSpec {
    fill: Option<char>,
    align: Option<Align>,
    width: Option<usize>,
    precision: Option<usize>,
    fixed: bool,
}

impl FormatSpec {
    fn parse(spec: &str) -> Option<Self> {
        let caps = SPEC_RE.captures(spec)?;
        let number = |group: &str| match caps.name(group) {
            Some(m) => m.as_str().parse::<usize>().ok().map(Some),
            None => Some(None),
        };
        Some(Self {
            fill: caps.name("fill").and_then(|m| m.as_str().chars().next()),
            align: caps.name("align").map(|m| match m.as_str() {
                "<" => Align::Left,
                "^" => Align::Center,
                _ => Align::Right,
            }),
            width: number("width")?,
            precision: number("precision")?,
            fixed: caps.name("fixed").is_some(),
        })
    }

    fn apply(&self, key: &str, text: &str) -> Result<String, TemplateFault> {
        let number = text.trim().parse::<f64>().ok();
        if self.fixed && number.is_none() {
            return Err(TemplateFault::NotANumber {
                key: key.to_string(),
                text: text.to_string(),
            });
        }

        let body = match (self.precision, number) {
            (Some(precision), Some(n)) => format!("{n:.precision$}"),
            (None, Some(n)) if self.fixed => format!("{n:.6}"),
            (Some(precision), None) => text.chars().take(precision).collect(),
            _ => text.to_string(),
        };

        let len = body.chars().count();
        let Some(width) = self.width.filter(|w| *w > len) else {
            return Ok(body);
        };
        let pad = width - len;
        let align = self.align.unwrap_or(if number.is_some() {
            Align::Right
        } else {
            Align::Left
        });
        let (left, right) = match align {
            Align::Left => (0, pad),
            Align::Right => (pad, 0),
            Align::Center => (pad / 2, pad - pad / 2),
        };
        let fill = self.fill.unwrap_or(' ');
        let mut out = String::with_capacity(body.len() + pad * fill.len_utf8());
        out.extend(std::iter::repeat(fill).take(left));
        out.push_str(&body);
        out.extend(std::iter::repeat(fill).take(right));
        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Key { key: String, spec: Option<FormatSpec> },
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: impl Into<String>) -> Result<Self, TemplateFault> {
        let source = source.into();
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut last = 0;

        for caps in TOKEN_RE.captures_iter(&source) {
            let Some(token) = caps.get(0) else {
                continue;
            };
            literal.push_str(&source[last..token.start()]);
            last = token.end();

            match token.as_str() {
                "{{" => literal.push('{'),
                "}}" => literal.push('}'),
                "{" | "}" => {
                    return Err(TemplateFault::Malformed {
                        position: token.start(),
                        message: format!("unmatched '{}'", token.as_str()),
                    });
                }
                _ => {
                    let body = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                    let (key, spec) = match body.split_once(':') {
                        Some((key, spec)) => (key, Some(spec)),
                        None => (body, None),
                    };
                    if !KEY_RE.is_match(key) {
                        return Err(TemplateFault::Malformed {
                            position: token.start(),
                            message: format!("invalid placeholder '{{{body}}}'"),
                        });
                    }
                    let spec = match spec.map(FormatSpec::parse) {
                        Some(None) => {
                            return Err(TemplateFault::Malformed {
                                position: token.start(),
                                message: format!("invalid format spec in '{{{body}}}'"),
                            });
                        }
                        Some(Some(spec)) => Some(spec),
                        None => None,
                    };
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Key {
                        key: key.to_string(),
                        spec,
                    });
                }
            }
        }

        literal.push_str(&source[last..]);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { source, segments })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholder keys in order of appearance, repeats included.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Key { key, .. } => Some(key.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Substitute every placeholder using `lookup`.
    ///
    /// Fails on the first key `lookup` does not know; nothing is returned
    /// for a partially substituted template.
    pub fn render<'a, F>(&self, lookup: F) -> Result<String, TemplateFault>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Key { key, spec } => {
                    let value = lookup(key)
                        .ok_or_else(|| TemplateFault::UnknownKey { key: key.clone() })?;
                    match spec {
                        Some(spec) => out.push_str(&spec.apply(key, value)?),
                        None => out.push_str(value),
                    }
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn value_only(key: &str) -> Option<&'static str> {
        (key == "value").then_some("42")
    }

    #[rstest]
    #[case("{value}%", "42%")]
    #[case("[{value}]", "[42]")]
    #[case("{value}{value}", "4242")]
    #[case("no placeholder", "no placeholder")]
    #[case("{{literal}} {value}", "{literal} 42")]
    #[case("", "")]
    fn test_render_cases(#[case] source: &str, #[case] expected: &str) {
        let template = Template::parse(source).unwrap();
        assert_eq!(template.render(value_only).unwrap(), expected);
    }

    #[rstest]
    #[case("{value")]
    #[case("value}")]
    #[case("{}")]
    #[case("{not a key}")]
    #[case("{a{b}")]
    #[case("{value:x}")]
    #[case("{value:.f2}")]
    #[case("{:>5}")]
    fn test_malformed_templates(#[case] source: &str) {
        assert!(matches!(
            Template::parse(source),
            Err(TemplateFault::Malformed { .. })
        ));
    }

    #[rstest]
    #[case("{value:.2f}", "42", "42.00")]
    #[case("{value:.1}", "3.14159", "3.1")]
    #[case("{value:>5}", "42", "   42")]
    #[case("{value:5}", "42", "   42")]
    #[case("{value:5}", "ab", "ab   ")]
    #[case("{value:*^7}", "ab", "**ab***")]
    #[case("{value:0>4}", "7", "0007")]
    #[case("{value:<6.2f}", "1.5", "1.50  ")]
    #[case("{value:.3}", "abcdef", "abc")]
    #[case("{value:2}", "abcdef", "abcdef")]
    fn test_format_specs(#[case] source: &str, #[case] text: &str, #[case] expected: &str) {
        let template = Template::parse(source).unwrap();
        let rendered = template
            .render(|key| (key == "value").then_some(text))
            .unwrap();
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_fixed_spec_rejects_text() {
        let template = Template::parse("{value:.2f}").unwrap();
        let err = template
            .render(|key| (key == "value").then_some("n/a"))
            .unwrap_err();
        assert_eq!(
            err,
            TemplateFault::NotANumber {
                key: "value".into(),
                text: "n/a".into()
            }
        );
    }

    #[test]
    fn test_unknown_key() {
        let template = Template::parse("{value} {other}").unwrap();
        let err = template.render(value_only).unwrap_err();
        assert_eq!(
            err,
            TemplateFault::UnknownKey {
                key: "other".into()
            }
        );
    }

    #[test]
    fn test_keys_in_order() {
        let template = Template::parse("{class_name}({formatted_fields}) {class_name}").unwrap();
        let keys: Vec<_> = template.keys().collect();
        assert_eq!(keys, vec!["class_name", "formatted_fields", "class_name"]);
        assert_eq!(template.source(), "{class_name}({formatted_fields}) {class_name}");
    }
}
