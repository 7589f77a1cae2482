//! Template lookup and the MiniJinja delegate.
//!
//! - [`TemplateLocator`] turns a template name into a file on disk.
//! - [`MiniJinjaRenderer`] renders such a file.
//!
//! [`FileEngine`](crate::FileEngine) puts the two together.

mod jinja;
mod locator;

pub use jinja::{register_filters, MiniJinjaRenderer};
pub use locator::TemplateLocator;
