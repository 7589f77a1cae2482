//! Controllers: named groups of actions.
//!
//! A [`Controller`] is an immutable table built once with a
//! [`ControllerBuilder`]. Actions are stored under their method name
//! (`<action>Action`), and the controller may declare which actions are
//! rendered and through which template.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::action::method_name;
use crate::handler::{ActionContext, ActionHandler, Args, FnAction, IntoActionResult};

/// A named group of actions plus optional action-to-template declarations.
///
/// # Example
///
/// ```rust
/// use tinyapp_dispatch::{ActionContext, Args, Controller};
///
/// let users = Controller::builder("users")
///     .action("list", |_ctx: &ActionContext<'_>, _args: &Args| {
///         Ok::<_, anyhow::Error>(vec!["ada", "grace"])
///     })
///     .template("list", "users_list")
///     .build();
///
/// assert!(users.has_action("list"));
/// assert_eq!(users.template("list"), Some("users_list"));
/// ```
pub struct Controller {
    name: String,
    methods: HashMap<String, Rc<dyn ActionHandler>>,
    templates: Option<HashMap<String, String>>,
}

impl Controller {
    /// Starts building a controller named `name`.
    pub fn builder(name: impl Into<String>) -> ControllerBuilder {
        ControllerBuilder {
            name: name.into(),
            methods: HashMap::new(),
            templates: None,
        }
    }

    /// The controller name; it is registered as `controller:<name>`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up a handler by method name, e.g. `listAction`.
    pub fn method(&self, method: &str) -> Option<&dyn ActionHandler> {
        self.methods.get(method).map(|h| h.as_ref())
    }

    /// Returns `true` if an action named `action` is registered.
    pub fn has_action(&self, action: &str) -> bool {
        self.methods.contains_key(&method_name(action))
    }

    /// Registered method names, sorted.
    pub fn methods(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The template declarations, if the controller has any.
    ///
    /// `None` means the controller never renders; an empty map is possible
    /// and means the same.
    pub fn templates(&self) -> Option<&HashMap<String, String>> {
        self.templates.as_ref()
    }

    /// Template declared for `action`.
    pub fn template(&self, action: &str) -> Option<&str> {
        self.templates
            .as_ref()
            .and_then(|t| t.get(action))
            .map(String::as_str)
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("name", &self.name)
            .field("methods", &self.methods())
            .field("templates", &self.templates)
            .finish()
    }
}

/// Builder for [`Controller`].
pub struct ControllerBuilder {
    name: String,
    methods: HashMap<String, Rc<dyn ActionHandler>>,
    templates: Option<HashMap<String, String>>,
}

impl ControllerBuilder {
    /// Registers a closure as action `name`.
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn action<F, R>(self, name: &str, f: F) -> Self
    where
        F: Fn(&ActionContext<'_>, &Args) -> R + 'static,
        R: IntoActionResult + 'static,
    {
        self.handler(name, FnAction::new(f))
    }

    /// Registers an [`ActionHandler`] as action `name`.
    pub fn handler<H: ActionHandler + 'static>(mut self, name: &str, handler: H) -> Self {
        self.methods.insert(method_name(name), Rc::new(handler));
        self
    }

    /// Declares that `action` is rendered through `template`.
    pub fn template(mut self, action: &str, template: &str) -> Self {
        self.templates
            .get_or_insert_with(HashMap::new)
            .insert(action.to_string(), template.to_string());
        self
    }

    /// Declares several templates at once.
    pub fn templates<I, A, T>(mut self, templates: I) -> Self
    where
        I: IntoIterator<Item = (A, T)>,
        A: Into<String>,
        T: Into<String>,
    {
        let map = self.templates.get_or_insert_with(HashMap::new);
        for (action, template) in templates {
            map.insert(action.into(), template.into());
        }
        self
    }

    /// Finishes the controller.
    pub fn build(self) -> Controller {
        Controller {
            name: self.name,
            methods: self.methods,
            templates: self.templates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn noop(_ctx: &ActionContext<'_>, _args: &Args) -> anyhow::Result<Value> {
        Ok(Value::Null)
    }

    #[test]
    fn test_actions_are_stored_by_method_name() {
        let controller = Controller::builder("main")
            .action("hello", noop)
            .action("sum", noop)
            .build();

        assert_eq!(controller.name(), "main");
        assert!(controller.has_action("hello"));
        assert!(!controller.has_action("helloAction"));
        assert!(controller.method("helloAction").is_some());
        assert!(controller.method("hello").is_none());
        assert_eq!(controller.methods(), vec!["helloAction", "sumAction"]);
    }

    #[test]
    fn test_templates_are_optional() {
        let plain = Controller::builder("main").action("a", noop).build();
        assert!(plain.templates().is_none());
        assert_eq!(plain.template("a"), None);

        let templated = Controller::builder("main")
            .action("a", noop)
            .templates([("a", "tpl_a"), ("b", "tpl_b")])
            .template("a", "override")
            .build();
        assert_eq!(templated.template("a"), Some("override"));
        assert_eq!(templated.template("b"), Some("tpl_b"));
        assert_eq!(templated.templates().map(|t| t.len()), Some(2));
    }
}
