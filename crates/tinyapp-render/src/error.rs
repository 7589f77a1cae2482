//! Error types for rendering.
//!
//! [`RenderError`] is the single error type of every [`RenderingEngine`]. Its
//! kinds split into two classes: template failures (the template could not be
//! found or could not be rendered) and everything else. Fallback chains such
//! as [`MergedEngine`] only recover from the first class; see
//! [`RenderError::is_template_error`].
//!
//! [`RenderingEngine`]: crate::RenderingEngine
//! [`MergedEngine`]: crate::MergedEngine

use std::fmt;
use std::path::PathBuf;

/// Error type for rendering operations.
#[derive(Debug)]
pub enum RenderError {
    /// No template matches the name.
    TemplateNotFound {
        /// The template name as requested
        name: String,
        /// Extra explanation, e.g. the list of valid names
        detail: Option<String>,
    },

    /// The template was found but rendering it failed.
    Render {
        /// The template name as requested
        template: String,
        /// Resolved file, for file-based engines
        path: Option<PathBuf>,
        /// The underlying failure
        source: anyhow::Error,
    },

    /// A chain had no engine to try.
    NoEngines,

    /// The engine was set up with an unusable configuration.
    InvalidConfiguration(String),

    /// Data could not be serialized for output.
    SerializationError(String),
}

impl RenderError {
    /// Creates a [`RenderError::TemplateNotFound`] without detail.
    pub fn not_found(name: impl Into<String>) -> Self {
        RenderError::TemplateNotFound {
            name: name.into(),
            detail: None,
        }
    }

    /// Creates a [`RenderError::TemplateNotFound`] with an explanation.
    pub fn not_found_with(name: impl Into<String>, detail: impl Into<String>) -> Self {
        RenderError::TemplateNotFound {
            name: name.into(),
            detail: Some(detail.into()),
        }
    }

    /// Wraps a delegate failure for the given template.
    pub fn render(
        template: impl Into<String>,
        path: Option<PathBuf>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        RenderError::Render {
            template: template.into(),
            path,
            source: source.into(),
        }
    }

    /// Returns `true` for the template-failure class: not found, render
    /// failure, or an empty chain.
    ///
    /// Fallback chains try their next engine on these and propagate anything
    /// else immediately.
    pub fn is_template_error(&self) -> bool {
        matches!(
            self,
            RenderError::TemplateNotFound { .. }
                | RenderError::Render { .. }
                | RenderError::NoEngines
        )
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::TemplateNotFound { name, detail } => match detail {
                Some(detail) => write!(f, "Template {} not found: {}", name, detail),
                None => write!(f, "Template {} not found", name),
            },
            RenderError::Render {
                template,
                path: Some(path),
                ..
            } => write!(
                f,
                "Unexpected error while rendering template {} ({})",
                template,
                path.display()
            ),
            RenderError::Render { template, .. } => {
                write!(f, "Unexpected error while rendering template {}", template)
            }
            RenderError::NoEngines => write!(
                f,
                "No rendering engines are set, unable to render a template"
            ),
            RenderError::InvalidConfiguration(msg) => {
                write!(f, "invalid rendering configuration: {}", msg)
            }
            RenderError::SerializationError(msg) => write!(f, "serialization error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Render { source, .. } => Some(&**source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for RenderError {
    fn from(err: serde_yaml::Error) -> Self {
        RenderError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RenderError::not_found("foo");
        assert_eq!(err.to_string(), "Template foo not found");

        let err = RenderError::not_found_with("foo", "valid names are: a, b");
        assert!(err.to_string().ends_with("valid names are: a, b"));
    }

    #[test]
    fn test_render_error_keeps_source() {
        let err = RenderError::render(
            "page",
            Some(PathBuf::from("/tpl/page.j2")),
            anyhow::anyhow!("undefined variable"),
        );
        assert_eq!(
            err.to_string(),
            "Unexpected error while rendering template page (/tpl/page.j2)"
        );
        assert_eq!(
            std::error::Error::source(&err).unwrap().to_string(),
            "undefined variable"
        );
    }

    #[test]
    fn test_render_error_cause_appears_once_in_chain() {
        let err = RenderError::render("page", None, anyhow::anyhow!("undefined variable"));
        assert_eq!(
            format!("{:#}", anyhow::Error::from(err)),
            "Unexpected error while rendering template page: undefined variable"
        );
    }

    #[test]
    fn test_template_error_class() {
        assert!(RenderError::not_found("x").is_template_error());
        assert!(RenderError::render("x", None, anyhow::anyhow!("boom")).is_template_error());
        assert!(RenderError::NoEngines.is_template_error());
        assert!(!RenderError::InvalidConfiguration("empty".into()).is_template_error());
        assert!(!RenderError::SerializationError("bad".into()).is_template_error());
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: RenderError = json_err.into();
        assert!(matches!(err, RenderError::SerializationError(_)));
    }
}
