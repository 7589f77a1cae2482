//! Action dispatch for tinyapp.
//!
//! `tinyapp-dispatch` maps action identifiers of the form `[controller:]action`
//! to handler functions, runs them, and optionally passes their result through
//! a rendering engine. Controllers, services and the engine all live in one
//! [`Container`](tinyapp_container::Container).
//!
//! # Features
//!
//! - **Routing**: `ctrl:act` resolves `controller:ctrl` from the container and
//!   calls its `actAction`; a bare `act` goes to the `main` controller
//! - **Handlers**: closures or [`ActionHandler`] impls returning any
//!   serializable value
//! - **Optional rendering**: actions with a declared template are rendered
//!   by the engine registered under [`RENDERING_ENGINE_KEY`], if any
//! - **Output sinks**: actions print through the app, so tests can capture it
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use tinyapp_dispatch::{ActionContext, App, Args, Controller, RunResult};
//! use tinyapp_render::DebugEngine;
//!
//! let app = App::builder()
//!     .controller(
//!         Controller::builder("main")
//!             .action("flag", |_: &ActionContext<'_>, _: &Args| Ok::<_, anyhow::Error>(true))
//!             .action("shown", |_: &ActionContext<'_>, _: &Args| Ok::<_, anyhow::Error>(true))
//!             .template("shown", "tree")
//!             .build(),
//!     )
//!     .renderer(DebugEngine::new())
//!     .build()?;
//!
//! assert_eq!(app.run("flag", ())?, RunResult::Raw(json!(true)));
//! assert_eq!(app.run("shown", ())?, RunResult::Rendered(" root => [bool] true".into()));
//! # Ok::<(), tinyapp_dispatch::AppError>(())
//! ```

mod action;
mod app;
mod controller;
mod handler;
mod output;

pub use action::{
    controller_key, method_name, ActionId, ACTION_POSTFIX, CONTROLLER_MAIN, CONTROLLER_PREFIX,
    RENDERING_ENGINE_KEY,
};
pub use app::{App, AppBuilder, AppError, RunResult, SharedEngine};
pub use controller::{Controller, ControllerBuilder};
pub use handler::{
    ActionContext, ActionHandler, ActionResult, ArgError, Args, FnAction, IntoActionResult,
};
pub use output::{BufferedOutput, OutputSink, StdStreams, Stream};
