//! File-based rendering engine.
//!
//! [`FileEngine`] is the base engine for templates stored on disk. It owns the
//! lookup half (a [`TemplateLocator`]) and hands the actual rendering to a
//! [`PathRenderer`] delegate, which is where a concrete template language
//! plugs in.
//!
//! Failure modes are kept apart:
//!
//! - no directory yields a readable file → [`RenderError::TemplateNotFound`]
//! - the delegate fails in any way → [`RenderError::Render`] wrapping the cause

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::engine::RenderingEngine;
use crate::error::RenderError;
use crate::template::{MiniJinjaRenderer, TemplateLocator};

/// Renders a template file that has already been located.
pub trait PathRenderer {
    /// Renders the file at `path` with `data`.
    fn render_path(&self, data: &Value, path: &Path) -> anyhow::Result<String>;
}

/// A [`PathRenderer`] backed by a closure.
///
/// ```rust
/// use tinyapp_render::{FileEngine, FnRenderer};
///
/// let engine = FileEngine::new(FnRenderer::new(|data, path| {
///     Ok(format!("{} <- {}", data, path.display()))
/// }));
/// # let _ = engine;
/// ```
pub struct FnRenderer<F> {
    f: F,
}

impl<F> FnRenderer<F>
where
    F: Fn(&Value, &Path) -> anyhow::Result<String>,
{
    /// Wraps the closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> PathRenderer for FnRenderer<F>
where
    F: Fn(&Value, &Path) -> anyhow::Result<String>,
{
    fn render_path(&self, data: &Value, path: &Path) -> anyhow::Result<String> {
        (self.f)(data, path)
    }
}

/// Engine that resolves template names to files and renders them through a
/// delegate.
///
/// # Example
///
/// ```rust,ignore
/// use tinyapp_render::{FileEngine, RenderingEngine, RenderingEngineExt};
///
/// let engine = FileEngine::jinja()
///     .with_postfix(".j2")
///     .with_directories(["./templates"]);
///
/// // Renders ./templates/report.j2
/// let out = engine.render(&serde_json::json!({"total": 3}), "report")?;
/// ```
pub struct FileEngine<R> {
    locator: TemplateLocator,
    renderer: R,
}

impl<R: PathRenderer> FileEngine<R> {
    /// Creates an engine with no directories and empty affixes.
    pub fn new(renderer: R) -> Self {
        Self {
            locator: TemplateLocator::new(),
            renderer,
        }
    }

    /// Returns the lookup configuration.
    pub fn locator(&self) -> &TemplateLocator {
        &self.locator
    }

    /// Returns the delegate.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Finds the file `template` resolves to, if any.
    pub fn find_template(&self, template: &str) -> Option<PathBuf> {
        self.locator.find(template)
    }
}

impl FileEngine<MiniJinjaRenderer> {
    /// Creates a file engine rendering with MiniJinja.
    pub fn jinja() -> Self {
        Self::new(MiniJinjaRenderer::new())
    }
}

impl<R: PathRenderer> RenderingEngine for FileEngine<R> {
    fn render(&self, data: &Value, template: &str) -> Result<String, RenderError> {
        let path = self.locator.find(template).ok_or_else(|| {
            tracing::debug!(
                template,
                candidates = ?self.locator.candidates(template),
                "template not found"
            );
            RenderError::not_found(template)
        })?;

        self.renderer
            .render_path(data, &path)
            .map_err(|source| RenderError::render(template, Some(path), source))
    }

    fn set_template_prefix(&mut self, prefix: &str) {
        self.locator.set_prefix(prefix);
    }

    fn set_template_postfix(&mut self, postfix: &str) {
        self.locator.set_postfix(postfix);
    }

    fn template_prefix(&self) -> &str {
        self.locator.prefix()
    }

    fn template_postfix(&self) -> &str {
        self.locator.postfix()
    }

    fn add_template_directories(&mut self, dirs: &[PathBuf]) {
        self.locator.add_directories(dirs.iter().cloned());
    }

    fn remove_template_directories(&mut self, dirs: &[PathBuf]) {
        self.locator.remove_directories(dirs);
    }

    fn template_directories(&self) -> Vec<PathBuf> {
        self.locator.directories().to_vec()
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl<R> fmt::Debug for FileEngine<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileEngine")
            .field("locator", &self.locator)
            .finish_non_exhaustive()
    }
}
