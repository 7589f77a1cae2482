//! MiniJinja delegate for file-based engines.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::Context;
use minijinja::{path_loader, Environment, Value};

use crate::file::PathRenderer;

type ConfigureFn = Box<dyn Fn(&mut Environment<'static>)>;

/// Renders template files with MiniJinja.
///
/// Each render reads the file fresh from disk, so edits show up without a
/// restart. The template sees:
///
/// - every key of the data, if the data is an object
/// - the whole value as `data`, whatever its shape (object keys win on clash)
///
/// `{% include %}` and `{% extends %}` resolve relative to the directory of
/// the template being rendered.
///
/// # Example
///
/// ```rust
/// use tinyapp_render::MiniJinjaRenderer;
///
/// let renderer = MiniJinjaRenderer::new().configure(|env| {
///     env.add_filter("shout", |s: String| s.to_uppercase());
/// });
/// # let _ = renderer;
/// ```
#[derive(Default)]
pub struct MiniJinjaRenderer {
    configure: Option<ConfigureFn>,
}

impl MiniJinjaRenderer {
    /// Creates a renderer with the default filters registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a hook that can register filters, functions or globals on the
    /// environment before each render.
    pub fn configure<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Environment<'static>) + 'static,
    {
        self.configure = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for MiniJinjaRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiniJinjaRenderer")
            .field("configured", &self.configure.is_some())
            .finish()
    }
}

impl PathRenderer for MiniJinjaRenderer {
    fn render_path(&self, data: &serde_json::Value, path: &Path) -> anyhow::Result<String> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read template {}", path.display()))?;

        let mut env: Environment<'static> = Environment::new();
        register_filters(&mut env);
        if let Some(dir) = path.parent() {
            env.set_loader(path_loader(dir));
        }
        if let Some(configure) = &self.configure {
            configure(&mut env);
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(env.render_named_str(&name, &source, template_context(data))?)
    }
}

/// Builds the template context: object keys at the top level, plus `data`.
fn template_context(data: &serde_json::Value) -> HashMap<String, Value> {
    let mut combined = HashMap::new();
    combined.insert("data".to_string(), Value::from_serialize(data));

    if let serde_json::Value::Object(map) = data {
        for (key, value) in map {
            combined.insert(key.clone(), Value::from_serialize(value));
        }
    }

    combined
}

/// Registers tinyapp's filters with a MiniJinja environment.
///
/// Called for every render by [`MiniJinjaRenderer`]. Call it yourself when
/// building an environment by hand.
pub fn register_filters(env: &mut Environment<'static>) {
    // Newline filter
    env.add_filter("nl", |value: Value| -> String { format!("{}\n", value) });

    env.add_filter("pad", |value: Value, width: usize| -> String {
        format!("{:<width$}", value.to_string(), width = width)
    });
}
