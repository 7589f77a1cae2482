//! Application configuration.
//!
//! Configuration is a YAML document. Every field is optional:
//!
//! ```yaml
//! templates:
//!   directories: [templates, /usr/share/myapp/templates]
//!   prefix: ""
//!   postfix: .j2
//! debug:
//!   tree_string_length: 64
//! prompt: "myapp> "
//! ```
//!
//! Relative template directories in a file loaded with
//! [`AppConfig::from_file`] are resolved against the file's directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tinyapp_render::{
    DebugEngine, FileEngine, MergedEngine, RenderError, RenderingEngine, RenderingEngineExt,
    DEFAULT_TREE_STRING_LENGTH,
};

/// Errors loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Root of the configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub templates: TemplateConfig,
    pub debug: DebugConfig,
    /// Shell prompt; the shell's default when absent.
    pub prompt: Option<String>,
}

/// Template lookup settings for file-based engines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateConfig {
    pub directories: Vec<PathBuf>,
    pub prefix: String,
    pub postfix: String,
}

/// Debug engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DebugConfig {
    pub tree_string_length: usize,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            tree_string_length: DEFAULT_TREE_STRING_LENGTH,
        }
    }
}

impl AppConfig {
    /// Parses a YAML document. An empty document is the default config.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Loads a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml_str(&text)?;
        if let Some(base) = path.parent() {
            config.templates.resolve_relative(base);
        }
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Builds the standard engine chain: a MiniJinja file engine configured
    /// from `templates`, falling back to a debug engine configured from
    /// `debug`.
    pub fn build_renderer(&self) -> Result<MergedEngine, RenderError> {
        let mut file = FileEngine::jinja();
        self.templates.apply(&mut file);
        MergedEngine::new(vec![file.boxed(), self.debug.engine().boxed()])
    }
}

impl TemplateConfig {
    /// Applies the settings to an engine. Directories are added to the ones
    /// it already has.
    pub fn apply(&self, engine: &mut dyn RenderingEngine) {
        engine.set_template_prefix(&self.prefix);
        engine.set_template_postfix(&self.postfix);
        engine.add_template_directories(&self.directories);
    }

    /// Makes relative directories relative to `base`.
    pub fn resolve_relative(&mut self, base: &Path) {
        for dir in &mut self.directories {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
    }
}

impl DebugConfig {
    /// A debug engine with these settings.
    pub fn engine(&self) -> DebugEngine {
        DebugEngine::new().with_tree_string_length(self.tree_string_length)
    }
}
