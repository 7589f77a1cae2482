//! # tinyapp-render - Rendering engine chain
//!
//! Turns the raw result of an action into text. Every engine implements
//! [`RenderingEngine`]: `render(data, template) -> String`, plus a shared
//! file-lookup configuration (prefix, postfix, search directories).
//!
//! ## Engines
//!
//! - [`FileEngine`]: resolves `<dir>/<prefix><name><postfix>` over its search
//!   directories and renders the first readable file through a
//!   [`PathRenderer`]. [`FileEngine::jinja`] uses MiniJinja.
//! - [`MergedEngine`]: ordered fallback chain. Template failures move on to
//!   the next member; other failures stop the chain.
//! - [`DebugEngine`]: ignores files; the template name selects a dump format
//!   (`plain`, `json`, `yaml`, `debug`, `tree`).
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use tinyapp_render::{DebugEngine, FileEngine, MergedEngine, RenderingEngine, RenderingEngineExt};
//!
//! let engine = MergedEngine::new(vec![
//!     FileEngine::jinja()
//!         .with_postfix(".j2")
//!         .with_directories(["templates"])
//!         .boxed(),
//!     DebugEngine::new().boxed(),
//! ])
//! .unwrap();
//!
//! let out = engine.render(&json!({"a": 1}), "tree").unwrap();
//! assert_eq!(out, " root[1]┐\n        └ a => [int] 1");
//! ```
//!
//! ## Errors
//!
//! All engines fail with [`RenderError`]. Only the template class
//! (not found, render failure) is recovered by [`MergedEngine`].

mod debug;
mod engine;
mod error;
mod file;
mod merged;
pub mod template;

pub use debug::{DebugEngine, DEBUG_MODES, DEFAULT_TREE_STRING_LENGTH};
pub use engine::{RenderingEngine, RenderingEngineExt};
pub use error::RenderError;
pub use file::{FileEngine, FnRenderer, PathRenderer};
pub use merged::{FailureObserver, MergedEngine};
pub use template::{register_filters, MiniJinjaRenderer, TemplateLocator};

// Re-export for hooks passed to `MiniJinjaRenderer::configure`
pub use minijinja;
