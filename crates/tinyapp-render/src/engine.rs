//! Rendering engine abstraction.
//!
//! This module defines the [`RenderingEngine`] trait: the capability of turning
//! an arbitrary result value plus a template name into a string. The trait is
//! object safe, so engines can be boxed, chained ([`MergedEngine`]) and shared
//! through the application container.
//!
//! Besides rendering, every engine carries the file-lookup configuration
//! (prefix, postfix, search directories). Engines that do not read files
//! accept the setters and ignore them.
//!
//! [`MergedEngine`]: crate::MergedEngine

use std::path::PathBuf;

use serde_json::Value;

use crate::error::RenderError;

/// A component converting a value and a template name into a string.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tinyapp_render::{DebugEngine, RenderingEngine};
///
/// let engine = DebugEngine::new();
/// assert_eq!(engine.render(&json!("hi"), "plain").unwrap(), "hi");
/// ```
pub trait RenderingEngine {
    /// Renders `template` with `data`.
    fn render(&self, data: &Value, template: &str) -> Result<String, RenderError>;

    /// Sets the string put in front of template names when building file names.
    fn set_template_prefix(&mut self, prefix: &str);

    /// Sets the string appended to template names, e.g. an extension like `".j2"`.
    fn set_template_postfix(&mut self, postfix: &str);

    /// Returns the current template prefix.
    fn template_prefix(&self) -> &str;

    /// Returns the current template postfix.
    fn template_postfix(&self) -> &str;

    /// Adds directories to search templates in. Directories already present
    /// are skipped; insertion order is search order.
    fn add_template_directories(&mut self, dirs: &[PathBuf]);

    /// Removes previously added directories.
    fn remove_template_directories(&mut self, dirs: &[PathBuf]);

    /// Returns the search directories.
    fn template_directories(&self) -> Vec<PathBuf>;

    /// Short name used in diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Builder-style configuration for concrete engines.
///
/// The [`RenderingEngine`] setters take `&mut self` so they stay usable on
/// boxed engines; these consuming variants allow chaining at construction:
///
/// ```rust
/// use tinyapp_render::{FileEngine, RenderingEngine, RenderingEngineExt};
///
/// let engine = FileEngine::jinja()
///     .with_prefix("tpl_")
///     .with_postfix(".j2")
///     .with_directories(["templates", "/usr/share/app/templates"]);
///
/// assert_eq!(engine.template_postfix(), ".j2");
/// assert_eq!(engine.template_directories().len(), 2);
/// ```
pub trait RenderingEngineExt: RenderingEngine + Sized {
    /// Sets the template prefix and returns the engine.
    fn with_prefix(mut self, prefix: &str) -> Self {
        self.set_template_prefix(prefix);
        self
    }

    /// Sets the template postfix and returns the engine.
    fn with_postfix(mut self, postfix: &str) -> Self {
        self.set_template_postfix(postfix);
        self
    }

    /// Adds search directories and returns the engine.
    fn with_directories<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let dirs: Vec<PathBuf> = dirs.into_iter().map(Into::into).collect();
        self.add_template_directories(&dirs);
        self
    }

    /// Boxes the engine for use in a chain.
    fn boxed(self) -> Box<dyn RenderingEngine>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<T: RenderingEngine> RenderingEngineExt for T {}
