//! # Type Injector
//!
//! A dependency injector that stores one value per type and calls functions
//! with their parameters resolved by exact type.
//!
//! The injector is built once, usually at startup, from long-lived values
//! (connection pools, templates, loggers, configuration). It is then used to
//! call *handler factories*: functions that declare the dependencies they need
//! as parameters and return the closure that does the actual work. This keeps
//! dependencies explicit without global state or one big context struct.
//!
//! ## Quick Start
//!
//! ```rust
//! use type_injector::{injector, must};
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! struct Templates {
//!     home: String,
//! }
//!
//! fn home(templates: Arc<Templates>, visitor: &'static str) -> impl Fn() -> String {
//!     move || templates.home.replace("{}", visitor)
//! }
//!
//! let di = injector![
//!     Arc::new(Templates { home: "Hello, {}!".to_string() }),
//!     "world",
//! ]
//! .unwrap();
//!
//! let handler = must(di.inject(home));
//! assert_eq!(handler(), "Hello, world!");
//! ```
//!
//! ## Rules
//!
//! - **One value per type**: a second value of a type already provided fails construction
//! - **Exact types**: `struct Port(u16)` and `u16` are different dependencies
//! - **Immutable**: no values can be added or removed after construction
//! - **Thread-safe**: `Injector` is `Send + Sync` and needs no locking to inject
//!
//! ## Main Items
//!
//! - [`injector!`] / [`Injector::new`] / [`Injector::builder`] - Build an injector
//! - [`Injector::inject`] - Call a function returning one value
//! - [`Injector::try_inject`] - Call a function returning `Result`
//! - [`Injector::call`] - Call a [`DynCallable`] described at runtime
//! - [`must`] - Unwrap an injection result, panicking on error

mod callable;
mod injectable;
mod injector;
mod injector_error;
mod injector_event;
mod macros;
mod signature;

pub use callable::{DynCallable, DynCallableBuilder, Injected, Returns};
pub use injectable::{Arguments, Injectable};
pub use injector::{Dependency, Injector, InjectorBuilder, TraceCallback};
pub use injector_error::{BoxError, InjectError};
pub use injector_event::InjectorEvent;
pub use signature::{Signature, TypeKey};

/// Returns the injected value, panicking if injection failed.
///
/// Meant for startup code where a missing dependency is a programming error.
///
/// # Panics
///
/// Panics with the error message if `result` is an `Err`.
///
/// # Examples
///
/// ```rust
/// use type_injector::{injector, must};
///
/// let di = injector![21u32].unwrap();
/// let doubled = must(di.inject(|n: u32| n * 2));
/// assert_eq!(doubled, 42);
/// ```
#[track_caller]
pub fn must<T>(result: Result<T, InjectError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("{}", err),
    }
}
