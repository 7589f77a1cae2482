//! Convenient imports for application code.
//!
//! ```rust
//! use tinyapp::prelude::*;
//! ```

pub use tinyapp_container::{Container, ContainerError};
pub use tinyapp_dispatch::{
    ActionContext, ActionHandler, ActionResult, App, AppBuilder, AppError, Args, BufferedOutput,
    Controller, OutputSink, RunResult, SharedEngine,
};
pub use tinyapp_render::{
    DebugEngine, FileEngine, MergedEngine, RenderError, RenderingEngine, RenderingEngineExt,
};

pub use crate::config::AppConfig;
pub use crate::shell::Shell;
