//! Action identifiers.
//!
//! An action identifier has the form `[controller:]action`. Both parts are
//! made of word characters (letters, digits, underscore). Without a controller
//! part the [`CONTROLLER_MAIN`] controller is meant.
//!
//! Parsing is all-or-nothing: `"a:b:c"`, `"a b"` or `""` are rejected instead
//! of matching some substring.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Container key prefix under which controllers are registered.
pub const CONTROLLER_PREFIX: &str = "controller:";

/// Controller used when an identifier has no controller part.
pub const CONTROLLER_MAIN: &str = "main";

/// Suffix appended to an action name to form its method name.
pub const ACTION_POSTFIX: &str = "Action";

/// Container key of the rendering engine.
pub const RENDERING_ENGINE_KEY: &str = "rendering_engine";

static ACTION_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?P<controller>[A-Za-z0-9_]+):)?(?P<action>[A-Za-z0-9_]+)$")
        .expect("valid action id pattern")
});

/// A parsed `[controller:]action` identifier.
///
/// # Example
///
/// ```rust
/// use tinyapp_dispatch::ActionId;
///
/// let id = ActionId::parse("users:list").unwrap();
/// assert_eq!(id.controller(), "users");
/// assert_eq!(id.method_name(), "listAction");
/// assert_eq!(id.controller_key(), "controller:users");
///
/// let id = ActionId::parse("help").unwrap();
/// assert_eq!(id.controller(), "main");
///
/// assert!(ActionId::parse("a:b:c").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionId {
    controller: String,
    action: String,
}

impl ActionId {
    /// Parses an identifier, or returns `None` if it is malformed.
    pub fn parse(input: &str) -> Option<Self> {
        let caps = ACTION_ID.captures(input)?;
        let controller = caps
            .name("controller")
            .map_or(CONTROLLER_MAIN, |m| m.as_str());
        Some(Self {
            controller: controller.to_string(),
            action: caps["action"].to_string(),
        })
    }

    /// Builds an identifier from its parts without validation.
    pub fn new(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            action: action.into(),
        }
    }

    /// Controller name, `main` if none was given.
    pub fn controller(&self) -> &str {
        &self.controller
    }

    /// Action name, without the method suffix.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Method name the action is registered under, e.g. `listAction`.
    pub fn method_name(&self) -> String {
        method_name(&self.action)
    }

    /// Container key of the controller, e.g. `controller:users`.
    pub fn controller_key(&self) -> String {
        controller_key(&self.controller)
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.controller, self.action)
    }
}

/// Returns the method name for an action name.
pub fn method_name(action: &str) -> String {
    format!("{}{}", action, ACTION_POSTFIX)
}

/// Returns the container key for a controller name.
pub fn controller_key(controller: &str) -> String {
    format!("{}{}", CONTROLLER_PREFIX, controller)
}
