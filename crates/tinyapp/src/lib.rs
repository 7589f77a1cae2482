//! # tinyapp - Minimal application toolkit
//!
//! tinyapp wires three small pieces into an application:
//!
//! - a lazy, memoized, cycle-detecting service [`Container`]
//! - an action dispatcher, [`App::run`], mapping `[controller:]action`
//!   identifiers to handler functions
//! - a rendering engine chain turning action results into text:
//!   [`FileEngine`] templates, a [`MergedEngine`] fallback chain and a
//!   [`DebugEngine`] for dumps
//!
//! On top of those this crate adds an interactive [`shell`], YAML
//! [`config`] and [`logging`] setup.
//!
//! ## Quick Start
//!
//! ```rust
//! use tinyapp::prelude::*;
//!
//! let app = App::builder()
//!     .service("greeting", "Hello".to_string())
//!     .controller(
//!         Controller::builder("main")
//!             .action("hello", |ctx: &ActionContext<'_>, args: &Args| {
//!                 let greeting: String = ctx.get("greeting")?;
//!                 let name = args.str(0).unwrap_or("world");
//!                 Ok::<_, anyhow::Error>(format!("{}, {}!", greeting, name))
//!             })
//!             .action("inspect", |_: &ActionContext<'_>, args: &Args| {
//!                 Ok::<_, anyhow::Error>(args.as_slice().to_vec())
//!             })
//!             .template("inspect", "tree")
//!             .build(),
//!     )
//!     .renderer(AppConfig::default().build_renderer()?)
//!     .build()?;
//!
//! assert_eq!(app.run("hello", ["Ada"])?.to_string(), "Hello, Ada!");
//! assert_eq!(
//!     app.run("inspect", ["x"])?.to_string(),
//!     " root[1]┐\n        └ 0 => [string(1)] \"x\""
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Crates
//!
//! | Crate | Contents |
//! |-------|----------|
//! | `tinyapp-container` | [`Container`], [`ContainerError`] |
//! | `tinyapp-dispatch` | [`App`], [`Controller`], action handlers, output sinks |
//! | `tinyapp-render` | [`RenderingEngine`] and the engines |
//!
//! All of them are re-exported here.

pub mod config;
pub mod logging;
pub mod prelude;
pub mod shell;

pub use tinyapp_container::{Container, ContainerError, ContainerResult};
pub use tinyapp_dispatch::{
    controller_key, method_name, ActionContext, ActionHandler, ActionId, ActionResult, App,
    AppBuilder, AppError, ArgError, Args, BufferedOutput, Controller, ControllerBuilder, FnAction,
    IntoActionResult, OutputSink, RunResult, SharedEngine, StdStreams, Stream, ACTION_POSTFIX,
    CONTROLLER_MAIN, CONTROLLER_PREFIX, RENDERING_ENGINE_KEY,
};
pub use tinyapp_render::{
    register_filters, DebugEngine, FailureObserver, FileEngine, FnRenderer, MergedEngine,
    MiniJinjaRenderer, PathRenderer, RenderError, RenderingEngine, RenderingEngineExt,
    TemplateLocator, DEBUG_MODES, DEFAULT_TREE_STRING_LENGTH,
};

pub use config::{AppConfig, ConfigError};
pub use shell::Shell;
