//! Fallback chain of rendering engines.
//!
//! A [`MergedEngine`] tries its members in order. Template failures (see
//! [`RenderError::is_template_error`]) move on to the next member, anything
//! else is returned as is. The first success wins.

use std::fmt;
use std::path::PathBuf;

use serde_json::Value;

use crate::engine::RenderingEngine;
use crate::error::RenderError;

/// Callback invoked for every member failure the chain recovers from.
///
/// Receives the error, the template name, the data and the failing engine.
pub type FailureObserver = Box<dyn Fn(&RenderError, &str, &Value, &dyn RenderingEngine)>;

/// Engine composed of an ordered, non-empty list of engines.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tinyapp_render::{DebugEngine, FileEngine, MergedEngine, RenderingEngine, RenderingEngineExt};
///
/// let engine = MergedEngine::new(vec![
///     FileEngine::jinja().with_postfix(".j2").boxed(),
///     DebugEngine::new().boxed(),
/// ])
/// .unwrap();
///
/// // No file named "plain.j2" anywhere, so the debug engine answers.
/// assert_eq!(engine.render(&json!("hi"), "plain").unwrap(), "hi");
/// ```
pub struct MergedEngine {
    engines: Vec<Box<dyn RenderingEngine>>,
    observer: Option<FailureObserver>,
}

impl MergedEngine {
    /// Creates a chain. Fails with [`RenderError::InvalidConfiguration`] when
    /// `engines` is empty.
    pub fn new(engines: Vec<Box<dyn RenderingEngine>>) -> Result<Self, RenderError> {
        if engines.is_empty() {
            return Err(RenderError::InvalidConfiguration(
                "Array of rendering engines is empty".to_string(),
            ));
        }
        Ok(Self {
            engines,
            observer: None,
        })
    }

    /// Installs the failure observer.
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&RenderError, &str, &Value, &dyn RenderingEngine) + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Returns the members in trial order.
    pub fn engines(&self) -> &[Box<dyn RenderingEngine>] {
        &self.engines
    }
}

impl RenderingEngine for MergedEngine {
    fn render(&self, data: &Value, template: &str) -> Result<String, RenderError> {
        let mut last_error = None;

        for engine in &self.engines {
            match engine.render(data, template) {
                Ok(output) => return Ok(output),
                Err(err) if err.is_template_error() => {
                    tracing::debug!(
                        engine = engine.name(),
                        template,
                        error = %err,
                        "engine failed, trying next"
                    );
                    if let Some(observer) = &self.observer {
                        observer(&err, template, data, engine.as_ref());
                    }
                    last_error = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        Err(last_error.unwrap_or(RenderError::NoEngines))
    }

    fn set_template_prefix(&mut self, prefix: &str) {
        for engine in &mut self.engines {
            engine.set_template_prefix(prefix);
        }
    }

    fn set_template_postfix(&mut self, postfix: &str) {
        for engine in &mut self.engines {
            engine.set_template_postfix(postfix);
        }
    }

    fn template_prefix(&self) -> &str {
        self.engines
            .first()
            .map(|e| e.template_prefix())
            .unwrap_or("")
    }

    fn template_postfix(&self) -> &str {
        self.engines
            .first()
            .map(|e| e.template_postfix())
            .unwrap_or("")
    }

    fn add_template_directories(&mut self, dirs: &[PathBuf]) {
        for engine in &mut self.engines {
            engine.add_template_directories(dirs);
        }
    }

    fn remove_template_directories(&mut self, dirs: &[PathBuf]) {
        for engine in &mut self.engines {
            engine.remove_template_directories(dirs);
        }
    }

    fn template_directories(&self) -> Vec<PathBuf> {
        let mut union: Vec<PathBuf> = Vec::new();
        for dir in self.engines.iter().flat_map(|e| e.template_directories()) {
            if !union.contains(&dir) {
                union.push(dir);
            }
        }
        union
    }

    fn name(&self) -> &str {
        "merged"
    }
}

impl fmt::Debug for MergedEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.engines.iter().map(|e| e.name()).collect();
        f.debug_struct("MergedEngine")
            .field("engines", &names)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
