//! Lazy, memoized, cycle-detecting dependency container.
//!
//! `tinyapp-container` is the service registry behind a tinyapp application.
//! Keys are plain strings; each holds either a factory that has not run yet
//! or the value it produced.
//!
//! # Contract
//!
//! - **Write-once**: setting a key that already holds anything fails with
//!   [`ContainerError::KeyAlreadySet`]. So does removing a resolved key.
//! - **Lazy**: a factory runs on the first [`Container::get`] of its key and
//!   receives the container, so it can resolve its own dependencies.
//! - **Memoized**: a successful factory never runs again; later lookups return
//!   the stored value.
//! - **Cycle-detecting**: a factory whose dependency chain comes back to its
//!   own key fails with [`ContainerError::CircularDependency`].
//!
//! ```rust
//! use tinyapp_container::{Container, ContainerError};
//!
//! let c = Container::new();
//! c.set_factory("a", |c| Ok(c.get::<i32>("b")?))?;
//! c.set_factory("b", |c| Ok(c.get::<i32>("a")?))?;
//!
//! let err = c.get::<i32>("a").unwrap_err();
//! assert!(matches!(err, ContainerError::CircularDependency(key) if key == "a"));
//! # Ok::<(), ContainerError>(())
//! ```

mod container;
mod error;

pub use container::Container;
pub use error::{ContainerError, ContainerResult};
