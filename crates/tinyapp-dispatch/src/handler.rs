//! Action handler types.
//!
//! An action is the business logic behind one `[controller:]action`
//! identifier. It receives an [`ActionContext`] and the positional [`Args`]
//! and returns a serializable value; whether that value gets rendered is
//! decided by the dispatcher, not by the action.
//!
//! # Core Types
//!
//! - [`ActionHandler`]: trait for action implementations
//! - [`FnAction`]: adapter turning a closure into an [`ActionHandler`]
//! - [`IntoActionResult`]: lets closures return any `Result<T: Serialize, E>`
//! - [`ActionContext`]: access to the app (services, output) from inside an action
//! - [`Args`]: ordered positional arguments

use std::any::Any;
use std::fmt;
use std::io;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tinyapp_container::ContainerError;

use crate::app::App;

/// What an action produces: its raw result as JSON, or its error.
pub type ActionResult = Result<Value, anyhow::Error>;

/// Trait for types that can be converted into an [`ActionResult`].
///
/// Implemented for every `Result<T, E>` with a serializable `T`, so closures
/// can return their natural types:
///
/// ```rust
/// use serde_json::json;
/// use tinyapp_dispatch::IntoActionResult;
///
/// let result = Ok::<_, anyhow::Error>(vec![1, 2]).into_action_result();
/// assert_eq!(result.unwrap(), json!([1, 2]));
/// ```
pub trait IntoActionResult {
    /// Convert this type into an [`ActionResult`].
    fn into_action_result(self) -> ActionResult;
}

impl<T, E> IntoActionResult for Result<T, E>
where
    T: Serialize,
    E: Into<anyhow::Error>,
{
    fn into_action_result(self) -> ActionResult {
        match self {
            Ok(value) => Ok(serde_json::to_value(value)?),
            Err(err) => Err(err.into()),
        }
    }
}

/// Trait for action implementations.
///
/// Handlers take `&self`: the dispatcher shares controllers, so state that
/// changes across calls needs interior mutability (`Cell`, `RefCell`).
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use serde_json::json;
/// use tinyapp_dispatch::{ActionContext, ActionHandler, ActionResult, Args};
///
/// struct Counter { count: Cell<u32> }
///
/// impl ActionHandler for Counter {
///     fn handle(&self, _ctx: &ActionContext<'_>, _args: &Args) -> ActionResult {
///         self.count.set(self.count.get() + 1);
///         Ok(json!(self.count.get()))
///     }
/// }
/// ```
pub trait ActionHandler {
    /// Execute the action.
    fn handle(&self, ctx: &ActionContext<'_>, args: &Args) -> ActionResult;
}

/// A wrapper that implements [`ActionHandler`] for closures.
///
/// The closure can return any `Result<T, E>` where `T: Serialize` and
/// `E: Into<anyhow::Error>`.
///
/// ```rust
/// use tinyapp_dispatch::{ActionContext, Args, FnAction};
///
/// let greet = FnAction::new(|_ctx: &ActionContext<'_>, args: &Args| {
///     let name = args.str(0).unwrap_or("world");
///     Ok::<_, anyhow::Error>(format!("Hello, {}!", name))
/// });
/// # let _ = greet;
/// ```
pub struct FnAction<F, R> {
    f: F,
    _phantom: PhantomData<fn() -> R>,
}

impl<F, R> FnAction<F, R>
where
    F: Fn(&ActionContext<'_>, &Args) -> R,
    R: IntoActionResult,
{
    /// Creates a new FnAction wrapping the given closure.
    pub fn new(f: F) -> Self {
        Self {
            f,
            _phantom: PhantomData,
        }
    }
}

impl<F, R> ActionHandler for FnAction<F, R>
where
    F: Fn(&ActionContext<'_>, &Args) -> R,
    R: IntoActionResult,
{
    fn handle(&self, ctx: &ActionContext<'_>, args: &Args) -> ActionResult {
        (self.f)(ctx, args).into_action_result()
    }
}

/// Context passed to action handlers.
///
/// Borrowed from the running [`App`] for the duration of one call.
pub struct ActionContext<'a> {
    app: &'a App,
    controller: &'a str,
    action: &'a str,
}

impl<'a> ActionContext<'a> {
    pub(crate) fn new(app: &'a App, controller: &'a str, action: &'a str) -> Self {
        Self {
            app,
            controller,
            action,
        }
    }

    /// The running application.
    pub fn app(&self) -> &'a App {
        self.app
    }

    /// Name of the controller the action belongs to.
    pub fn controller(&self) -> &str {
        self.controller
    }

    /// Name of the action, without the method suffix.
    pub fn action(&self) -> &str {
        self.action
    }

    /// Resolves a service from the application container.
    pub fn get<T: Any + Clone>(&self, key: &str) -> Result<T, ContainerError> {
        self.app.container().get(key)
    }

    /// Writes a line to the application's regular output.
    pub fn stdout(&self, line: &str) -> io::Result<()> {
        self.app.output().stdout(line)
    }

    /// Writes a line to the application's diagnostic output.
    pub fn stderr(&self, line: &str) -> io::Result<()> {
        self.app.output().stderr(line)
    }
}

impl fmt::Debug for ActionContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionContext")
            .field("controller", &self.controller)
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

/// Error for argument accessors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgError {
    /// No argument at the position.
    #[error("missing argument #{index}")]
    Missing { index: usize },

    /// The argument has another JSON type.
    #[error("argument #{index} must be {expected}")]
    WrongType { index: usize, expected: &'static str },

    /// The argument could not be parsed.
    #[error("argument #{index} ({value:?}) is invalid: {reason}")]
    Invalid {
        index: usize,
        value: String,
        reason: String,
    },
}

/// Ordered positional arguments of an action.
///
/// The shell passes every argument as a string; programmatic callers may pass
/// any JSON values.
///
/// # Example
///
/// ```rust
/// use tinyapp_dispatch::Args;
///
/// let args = Args::from(vec!["3", "four"]);
/// assert_eq!(args.parse::<i64>(0).unwrap(), 3);
/// assert!(args.parse::<i64>(1).is_err());
/// assert!(args.required(2).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args(Vec<Value>);

impl Args {
    /// Creates an empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Argument at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// Argument at `index` if it is a string.
    pub fn str(&self, index: usize) -> Option<&str> {
        self.0.get(index).and_then(Value::as_str)
    }

    /// Argument at `index`, or [`ArgError::Missing`].
    pub fn required(&self, index: usize) -> Result<&Value, ArgError> {
        self.0.get(index).ok_or(ArgError::Missing { index })
    }

    /// String argument at `index`.
    pub fn required_str(&self, index: usize) -> Result<&str, ArgError> {
        self.required(index)?
            .as_str()
            .ok_or(ArgError::WrongType {
                index,
                expected: "a string",
            })
    }

    /// Parses the argument at `index`.
    ///
    /// Strings are parsed with [`FromStr`]; other values through their JSON
    /// text, so `json!(3)` parses as an integer too.
    pub fn parse<T>(&self, index: usize) -> Result<T, ArgError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let value = self.required(index)?;
        let text = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        text.parse::<T>().map_err(|e| ArgError::Invalid {
            index,
            value: text.clone(),
            reason: e.to_string(),
        })
    }

    /// Iterates over the arguments in order.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.0.iter()
    }

    /// The arguments as a slice.
    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    /// Consumes the list, returning the values.
    pub fn into_vec(self) -> Vec<Value> {
        self.0
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl From<Vec<String>> for Args {
    fn from(values: Vec<String>) -> Self {
        Self(values.into_iter().map(Value::String).collect())
    }
}

impl From<Vec<&str>> for Args {
    fn from(values: Vec<&str>) -> Self {
        Self(values.into_iter().map(Value::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Args {
    fn from(values: [&str; N]) -> Self {
        Self(values.into_iter().map(Value::from).collect())
    }
}

impl From<()> for Args {
    fn from(_: ()) -> Self {
        Self::new()
    }
}

impl FromIterator<Value> for Args {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Args {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
