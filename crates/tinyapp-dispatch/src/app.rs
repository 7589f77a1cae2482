//! The application: container, dispatcher and output sink.
//!
//! [`App::run`] is the single entry point of the dispatch pipeline:
//!
//! 1. Parse the identifier into controller and action ([`ActionId`]).
//! 2. Resolve `controller:<name>` from the container.
//! 3. Look up `<action>Action` on the controller, or fail with
//!    [`AppError::ActionNotFound`].
//! 4. Invoke the handler with the arguments, in order.
//! 5. If the controller declares a template for the action and a rendering
//!    engine is registered, render the raw result through it.
//!
//! Nothing in the pipeline swallows errors: container, handler and render
//! failures all reach the caller.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use thiserror::Error;
use tinyapp_container::{Container, ContainerError};
use tinyapp_render::{RenderError, RenderingEngine};

use crate::action::{controller_key, ActionId, RENDERING_ENGINE_KEY};
use crate::controller::Controller;
use crate::handler::{ActionContext, Args};
use crate::output::{OutputSink, StdStreams};

/// How rendering engines are stored in the container.
pub type SharedEngine = Rc<dyn RenderingEngine>;

/// Errors from [`App::run`] and [`AppBuilder::build`].
#[derive(Debug, Error)]
pub enum AppError {
    /// Resolving the controller or the renderer failed.
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// The identifier is not of the form `[controller:]action`.
    #[error("Invalid action identifier \"{0}\"")]
    InvalidActionId(String),

    /// The controller has no such method.
    #[error("Action \"{action}\" of controller \"{controller}\" does not exist")]
    ActionNotFound { action: String, controller: String },

    /// The renderer failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The action itself failed; the handler's error, untouched.
    #[error(transparent)]
    Action(anyhow::Error),
}

impl AppError {
    /// The handler's error, if the action itself failed.
    pub fn action_error(&self) -> Option<&anyhow::Error> {
        match self {
            AppError::Action(err) => Some(err),
            _ => None,
        }
    }
}

/// Outcome of [`App::run`].
#[derive(Debug, Clone, PartialEq)]
pub enum RunResult {
    /// The action's raw result; no template was declared or no renderer is
    /// registered.
    Raw(Value),
    /// The renderer's output.
    Rendered(String),
}

impl RunResult {
    /// Returns `true` if a renderer produced the result.
    pub fn is_rendered(&self) -> bool {
        matches!(self, RunResult::Rendered(_))
    }

    /// The raw value, if not rendered.
    pub fn raw(&self) -> Option<&Value> {
        match self {
            RunResult::Raw(v) => Some(v),
            RunResult::Rendered(_) => None,
        }
    }

    /// The rendered text, if rendered.
    pub fn rendered(&self) -> Option<&str> {
        match self {
            RunResult::Rendered(s) => Some(s),
            RunResult::Raw(_) => None,
        }
    }

    /// Converts into a JSON value; rendered text becomes a string.
    pub fn into_value(self) -> Value {
        match self {
            RunResult::Raw(v) => v,
            RunResult::Rendered(s) => Value::String(s),
        }
    }
}

/// Strings print as is, other scalars as their JSON text, `null` as nothing,
/// arrays and objects as pretty JSON.
impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunResult::Rendered(s) => f.write_str(s),
            RunResult::Raw(Value::String(s)) => f.write_str(s),
            RunResult::Raw(Value::Null) => Ok(()),
            RunResult::Raw(v @ (Value::Array(_) | Value::Object(_))) => {
                let pretty = serde_json::to_string_pretty(v).map_err(|_| fmt::Error)?;
                f.write_str(&pretty)
            }
            RunResult::Raw(v) => write!(f, "{}", v),
        }
    }
}

/// An application: a container of services and controllers, plus where its
/// output goes.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tinyapp_dispatch::{ActionContext, App, Args, Controller, RunResult};
///
/// let app = App::builder()
///     .controller(
///         Controller::builder("main")
///             .action("double", |_: &ActionContext<'_>, args: &Args| {
///                 Ok::<_, anyhow::Error>(args.parse::<i64>(0)? * 2)
///             })
///             .build(),
///     )
///     .build()?;
///
/// assert_eq!(app.run("double", ["21"])?, RunResult::Raw(json!(42)));
/// # Ok::<(), tinyapp_dispatch::AppError>(())
/// ```
pub struct App {
    container: Container,
    output: Box<dyn OutputSink>,
}

impl App {
    /// Creates a builder.
    pub fn builder() -> AppBuilder {
        AppBuilder::new()
    }

    /// Wraps an existing container; output goes to the standard streams.
    pub fn with_container(container: Container) -> Self {
        Self {
            container,
            output: Box::new(StdStreams),
        }
    }

    /// The service container.
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Resolves a service from the container.
    pub fn get<T: Any + Clone>(&self, key: &str) -> Result<T, ContainerError> {
        self.container.get(key)
    }

    /// The output sink.
    pub fn output(&self) -> &dyn OutputSink {
        self.output.as_ref()
    }

    /// Replaces the output sink.
    pub fn set_output(&mut self, output: impl OutputSink + 'static) {
        self.output = Box::new(output);
    }

    /// Resolves a controller by name.
    pub fn controller(&self, name: &str) -> Result<Rc<Controller>, AppError> {
        let key = controller_key(name);
        Ok(self.container.get::<Rc<Controller>>(&key)?)
    }

    /// Resolves the rendering engine.
    ///
    /// `Ok(None)` when nothing is registered under
    /// [`RENDERING_ENGINE_KEY`] or what is registered there is not a
    /// [`SharedEngine`]. Failures while constructing it are errors.
    pub fn renderer(&self) -> Result<Option<SharedEngine>, AppError> {
        match self.container.get::<SharedEngine>(RENDERING_ENGINE_KEY) {
            Ok(engine) => Ok(Some(engine)),
            Err(ContainerError::KeyNotFound(_)) => Ok(None),
            Err(ContainerError::TypeMismatch { key, expected }) => {
                tracing::warn!(key = %key, expected, "renderer key holds another type, not rendering");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Runs the action named by `action_id` with `args`.
    ///
    /// `action_id` is `[controller:]action`; without a controller part the
    /// `main` controller is used.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidActionId`] for a malformed identifier
    /// - [`AppError::Container`] if the controller (or the renderer) cannot be
    ///   resolved
    /// - [`AppError::ActionNotFound`] if the controller lacks the action
    /// - [`AppError::Action`] with the handler's own error
    /// - [`AppError::Render`] if rendering fails
    pub fn run(&self, action_id: &str, args: impl Into<Args>) -> Result<RunResult, AppError> {
        let id = ActionId::parse(action_id)
            .ok_or_else(|| AppError::InvalidActionId(action_id.to_string()))?;
        let args = args.into();

        let controller = self.controller(id.controller())?;
        let handler = controller
            .method(&id.method_name())
            .ok_or_else(|| AppError::ActionNotFound {
                action: id.action().to_string(),
                controller: id.controller().to_string(),
            })?;

        tracing::debug!(action = %id, args = args.len(), "running action");
        let ctx = ActionContext::new(self, id.controller(), id.action());
        let result = handler.handle(&ctx, &args).map_err(AppError::Action)?;

        let Some(template) = controller.template(id.action()) else {
            return Ok(RunResult::Raw(result));
        };
        let Some(engine) = self.renderer()? else {
            return Ok(RunResult::Raw(result));
        };

        tracing::debug!(action = %id, template, engine = engine.name(), "rendering result");
        Ok(RunResult::Rendered(engine.render(&result, template)?))
    }

    /// Writes a line to the output sink, ignoring I/O errors.
    pub fn stdout(&self, line: &str) {
        if let Err(err) = self.output.stdout(line) {
            tracing::warn!(error = %err, "failed to write output");
        }
    }

    /// Writes a line to the error sink, ignoring I/O errors.
    pub fn stderr(&self, line: &str) {
        if let Err(err) = self.output.stderr(line) {
            tracing::warn!(error = %err, "failed to write error output");
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::with_container(Container::new())
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("container", &self.container)
            .finish_non_exhaustive()
    }
}

/// Builder for [`App`].
///
/// Registrations go straight into the container; the first failed one (a
/// duplicate key) is reported by [`build`](Self::build).
pub struct AppBuilder {
    container: Container,
    output: Option<Box<dyn OutputSink>>,
    error: Option<ContainerError>,
}

impl AppBuilder {
    /// Creates a builder with an empty container.
    pub fn new() -> Self {
        Self {
            container: Container::new(),
            output: None,
            error: None,
        }
    }

    /// Registers a plain value.
    pub fn service<T: 'static>(self, key: impl Into<String>, value: T) -> Self {
        let result = self.container.set(key, value);
        self.record(result)
    }

    /// Registers a lazily built value.
    pub fn factory<T, F>(self, key: impl Into<String>, factory: F) -> Self
    where
        T: 'static,
        F: Fn(&Container) -> anyhow::Result<T> + 'static,
    {
        let result = self.container.set_factory(key, factory);
        self.record(result)
    }

    /// Registers a controller under `controller:<name>`.
    pub fn controller(self, controller: Controller) -> Self {
        let key = controller_key(controller.name());
        let result = self.container.set(key, Rc::new(controller));
        self.record(result)
    }

    /// Registers the rendering engine.
    pub fn renderer<E: RenderingEngine + 'static>(self, engine: E) -> Self {
        let engine: SharedEngine = Rc::new(engine);
        let result = self.container.set(RENDERING_ENGINE_KEY, engine);
        self.record(result)
    }

    /// Registers a factory for the rendering engine, built on first render.
    pub fn renderer_factory<F>(self, factory: F) -> Self
    where
        F: Fn(&Container) -> anyhow::Result<SharedEngine> + 'static,
    {
        let result = self.container.set_factory(RENDERING_ENGINE_KEY, factory);
        self.record(result)
    }

    /// Sets where output goes; defaults to the standard streams.
    pub fn output(mut self, output: impl OutputSink + 'static) -> Self {
        self.output = Some(Box::new(output));
        self
    }

    /// Builds the app.
    ///
    /// Fails with the first registration error, e.g. a key registered twice.
    pub fn build(self) -> Result<App, AppError> {
        if let Some(err) = self.error {
            return Err(err.into());
        }
        Ok(App {
            container: self.container,
            output: self.output.unwrap_or_else(|| Box::new(StdStreams)),
        })
    }

    fn record(mut self, result: Result<(), ContainerError>) -> Self {
        if let Err(err) = result {
            self.error.get_or_insert(err);
        }
        self
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::BufferedOutput;
    use serde_json::json;
    use std::cell::RefCell;
    use std::path::PathBuf;

    /// Engine echoing `template:data`.
    struct Echo;

    impl RenderingEngine for Echo {
        fn render(&self, data: &Value, template: &str) -> Result<String, RenderError> {
            Ok(format!("{}:{}", template, data))
        }
        fn set_template_prefix(&mut self, _: &str) {}
        fn set_template_postfix(&mut self, _: &str) {}
        fn template_prefix(&self) -> &str {
            ""
        }
        fn template_postfix(&self) -> &str {
            ""
        }
        fn add_template_directories(&mut self, _: &[PathBuf]) {}
        fn remove_template_directories(&mut self, _: &[PathBuf]) {}
        fn template_directories(&self) -> Vec<PathBuf> {
            Vec::new()
        }
    }

    fn yes(_: &ActionContext<'_>, _: &Args) -> anyhow::Result<bool> {
        Ok(true)
    }

    #[test]
    fn test_run_invalid_identifier() {
        let app = App::builder().build().unwrap();
        let err = app.run("a:b:c", ()).unwrap_err();
        assert!(matches!(err, AppError::InvalidActionId(ref id) if id == "a:b:c"));
        assert_eq!(err.to_string(), "Invalid action identifier \"a:b:c\"");
    }

    #[test]
    fn test_run_missing_controller_is_container_error() {
        let app = App::builder().build().unwrap();
        let err = app.run("nope:x", ()).unwrap_err();
        assert!(matches!(
            err,
            AppError::Container(ContainerError::KeyNotFound(ref key)) if key == "controller:nope"
        ));
    }

    #[test]
    fn test_run_missing_action_names_action_and_controller() {
        let app = App::builder()
            .controller(Controller::builder("main").action("yes", yes).build())
            .build()
            .unwrap();

        let err = app.run("nonexistent_action", ()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Action \"nonexistent_action\" of controller \"main\" does not exist"
        );
        match err {
            AppError::ActionNotFound { action, controller } => {
                assert_eq!(action, "nonexistent_action");
                assert_eq!(controller, "main");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_run_passes_args_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let app = App::builder()
            .controller(
                Controller::builder("ctrl")
                    .action("act", move |ctx: &ActionContext<'_>, args: &Args| {
                        sink.borrow_mut().push((
                            ctx.controller().to_string(),
                            ctx.action().to_string(),
                            args.clone(),
                        ));
                        Ok::<_, anyhow::Error>(())
                    })
                    .build(),
            )
            .build()
            .unwrap();

        let result = app.run("ctrl:act", vec![json!("x"), json!(2)]).unwrap();
        assert_eq!(result, RunResult::Raw(Value::Null));
        assert_eq!(
            *seen.borrow(),
            vec![(
                "ctrl".to_string(),
                "act".to_string(),
                Args::from(vec![json!("x"), json!(2)])
            )]
        );
    }

    #[test]
    fn test_run_renders_only_declared_actions() {
        let app = App::builder()
            .controller(
                Controller::builder("main")
                    .action("raw", yes)
                    .action("pretty", yes)
                    .template("pretty", "tpl")
                    .build(),
            )
            .renderer(Echo)
            .build()
            .unwrap();

        assert_eq!(app.run("raw", ()).unwrap(), RunResult::Raw(json!(true)));
        assert_eq!(
            app.run("pretty", ()).unwrap(),
            RunResult::Rendered("tpl:true".to_string())
        );
    }

    #[test]
    fn test_run_without_renderer_returns_raw() {
        let app = App::builder()
            .controller(
                Controller::builder("main")
                    .action("pretty", yes)
                    .template("pretty", "tpl")
                    .build(),
            )
            .build()
            .unwrap();

        assert_eq!(app.run("pretty", ()).unwrap(), RunResult::Raw(json!(true)));
    }

    #[test]
    fn test_renderer_of_wrong_type_is_ignored() {
        let app = App::builder()
            .service(RENDERING_ENGINE_KEY, "not an engine")
            .controller(
                Controller::builder("main")
                    .action("pretty", yes)
                    .template("pretty", "tpl")
                    .build(),
            )
            .build()
            .unwrap();

        assert!(app.renderer().unwrap().is_none());
        assert_eq!(app.run("pretty", ()).unwrap(), RunResult::Raw(json!(true)));
    }

    #[test]
    fn test_renderer_factory_runs_only_when_rendering() {
        let built = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&built);

        let app = App::builder()
            .controller(
                Controller::builder("main")
                    .action("raw", yes)
                    .action("pretty", yes)
                    .template("pretty", "tpl")
                    .build(),
            )
            .renderer_factory(move |_| {
                *counter.borrow_mut() += 1;
                Ok(Rc::new(Echo) as SharedEngine)
            })
            .build()
            .unwrap();

        app.run("raw", ()).unwrap();
        assert_eq!(*built.borrow(), 0);
        app.run("pretty", ()).unwrap();
        app.run("pretty", ()).unwrap();
        assert_eq!(*built.borrow(), 1);
    }

    #[test]
    fn test_failing_renderer_factory_propagates() {
        let app = App::builder()
            .controller(
                Controller::builder("main")
                    .action("pretty", yes)
                    .template("pretty", "tpl")
                    .build(),
            )
            .renderer_factory(|_| anyhow::bail!("no templates"))
            .build()
            .unwrap();

        let err = app.run("pretty", ()).unwrap_err();
        assert!(matches!(
            err,
            AppError::Container(ContainerError::Factory { .. })
        ));
    }

    #[test]
    fn test_action_error_is_untouched() {
        #[derive(Debug, Error)]
        #[error("disk on fire")]
        struct DiskError;

        let app = App::builder()
            .controller(
                Controller::builder("main")
                    .action("burn", |_: &ActionContext<'_>, _: &Args| {
                        Err::<(), _>(DiskError)
                    })
                    .build(),
            )
            .build()
            .unwrap();

        let err = app.run("burn", ()).unwrap_err();
        assert_eq!(err.to_string(), "disk on fire");
        let source = err.action_error().unwrap();
        assert!(source.downcast_ref::<DiskError>().is_some());
    }

    #[test]
    fn test_duplicate_registration_fails_build() {
        let err = App::builder()
            .service("db", 1)
            .service("db", 2)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Container(ContainerError::KeyAlreadySet(ref key)) if key == "db"
        ));
    }

    #[test]
    fn test_context_reaches_services_and_output() {
        let buffer = Rc::new(BufferedOutput::new());
        let app = App::builder()
            .service("greeting", "hi".to_string())
            .controller(
                Controller::builder("main")
                    .action("say", |ctx: &ActionContext<'_>, _: &Args| {
                        let greeting: String = ctx.get("greeting")?;
                        ctx.stdout(&greeting)?;
                        ctx.stderr("done")?;
                        Ok::<_, anyhow::Error>(())
                    })
                    .build(),
            )
            .output(Rc::clone(&buffer))
            .build()
            .unwrap();

        app.run("say", ()).unwrap();
        assert_eq!(buffer.stdout_lines(), vec!["hi"]);
        assert_eq!(buffer.stderr_lines(), vec!["done"]);
    }

    #[test]
    fn test_run_result_display() {
        assert_eq!(RunResult::Raw(json!("text")).to_string(), "text");
        assert_eq!(RunResult::Raw(json!(true)).to_string(), "true");
        assert_eq!(RunResult::Raw(json!(1.5)).to_string(), "1.5");
        assert_eq!(RunResult::Raw(Value::Null).to_string(), "");
        assert_eq!(RunResult::Raw(json!([1])).to_string(), "[\n  1\n]");
        assert_eq!(RunResult::Rendered("out".into()).to_string(), "out");
    }

    #[test]
    fn test_with_container_uses_existing_registrations() {
        let container = Container::new();
        container
            .set(
                controller_key("main"),
                Rc::new(Controller::builder("main").action("yes", yes).build()),
            )
            .unwrap();

        let app = App::with_container(container);
        assert_eq!(app.run("yes", ()).unwrap(), RunResult::Raw(json!(true)));
        assert_eq!(app.controller("main").unwrap().name(), "main");
    }
}
