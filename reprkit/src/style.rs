//! Render style configuration
//!
//! A [`RenderStyle`] is the template and delimiter a registry hands to types
//! that do not set their own. It can be loaded with figment from, in
//! precedence order (later sources override earlier ones):
//!
//! 1. Built-in defaults (`{class_name}({formatted_fields})` and `", "`)
//! 2. `reprkit.toml`, `reprkit.yaml`, `reprkit.yml`, `reprkit.json` in the
//!    given directory
//! 3. Environment variables `REPRKIT_TEMPLATE` and `REPRKIT_DELIMITER`

use std::path::Path;

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Template and delimiter used to build a type's renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    pub template: String,
    pub delimiter: String,
}

impl RenderStyle {
    pub const DEFAULT_TEMPLATE: &'static str = "{class_name}({formatted_fields})";
    pub const DEFAULT_DELIMITER: &'static str = ", ";
    pub const ENV_PREFIX: &'static str = "REPRKIT_";
    pub const FILE_STEM: &'static str = "reprkit";

    pub fn new(template: impl Into<String>, delimiter: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            delimiter: delimiter.into(),
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Load from defaults, config files in the current directory, and the
    /// environment.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Load from defaults, config files in `dir`, and the environment.
    pub fn load_from(dir: &Path) -> Result<Self> {
        Self::from_figment(Self::figment(dir))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let style: Self = figment.extract()?;
        debug!(template = %style.template, delimiter = ?style.delimiter, "render style loaded");
        Ok(style)
    }

    /// Figment with every source in precedence order.
    pub fn figment(dir: &Path) -> Figment {
        let stem = Self::FILE_STEM;
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(dir.join(format!("{stem}.toml"))))
            .merge(Yaml::file(dir.join(format!("{stem}.yaml"))))
            .merge(Yaml::file(dir.join(format!("{stem}.yml"))))
            .merge(Json::file(dir.join(format!("{stem}.json"))))
            .merge(Env::prefixed(Self::ENV_PREFIX).map(|key| key.as_str().to_lowercase().into()))
    }
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TEMPLATE, Self::DEFAULT_DELIMITER)
    }
}
