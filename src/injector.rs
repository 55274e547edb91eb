//! The injector: an immutable, type-keyed value store that calls functions
//! with their parameters resolved by exact type.
//!
//! Built once, usually at startup, from long-lived values. After that it is
//! only read, so it can be shared across threads without locking.
//!
//! # Examples
//!
//! ```
//! use type_injector::injector;
//!
//! #[derive(Debug, Clone)]
//! struct Greeting(&'static str);
//!
//! let di = injector![Greeting("hello"), "world"].unwrap();
//!
//! let message = di
//!     .inject(|g: Greeting, name: &'static str| format!("{} {}", g.0, name))
//!     .unwrap();
//! assert_eq!(message, "hello world");
//! ```

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
    sync::Arc,
};

use crate::callable::{DynCallable, Injected};
use crate::injectable::{Arguments, Injectable, SharedValue};
use crate::signature::ReturnShape;
use crate::{BoxError, InjectError, InjectorEvent, Signature, TypeKey};

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives every [`InjectorEvent`]. It must be thread-safe
/// because the injector itself can be shared between threads.
pub type TraceCallback = dyn Fn(&InjectorEvent<'_>) + Send + Sync + 'static;

// -------------------------------------------------------------------------------------------------
// Dependency
// -------------------------------------------------------------------------------------------------

/// One value to be stored in an [`Injector`], erased to its type key.
#[derive(Clone)]
pub struct Dependency {
    key: TypeKey,
    value: SharedValue,
    describe: fn(&(dyn Any + Send + Sync)) -> String,
}

impl Dependency {
    /// Wraps a value whose `Debug` output is used in error messages.
    ///
    /// The value is only formatted when a message needs it.
    pub fn new<T: Any + Send + Sync + fmt::Debug>(value: T) -> Self {
        Dependency {
            key: TypeKey::of::<T>(),
            value: Arc::new(value),
            describe: describe_debug::<T>,
        }
    }

    /// Wraps a value that has no `Debug` implementation.
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Dependency {
            key: TypeKey::of::<T>(),
            value: Arc::new(value),
            describe: describe_opaque::<T>,
        }
    }

    pub fn type_key(&self) -> TypeKey {
        self.key
    }

    /// Printable form of the value: its `Debug` output, or `<type name>` for
    /// opaque values.
    pub fn describe(&self) -> String {
        (self.describe)(&*self.value)
    }
}

fn describe_debug<T: Any + fmt::Debug>(value: &(dyn Any + Send + Sync)) -> String {
    match value.downcast_ref::<T>() {
        Some(value) => format!("{:?}", value),
        None => describe_opaque::<T>(value),
    }
}

fn describe_opaque<T: Any>(_: &(dyn Any + Send + Sync)) -> String {
    format!("<{}>", std::any::type_name::<T>())
}

impl fmt::Debug for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.describe(), self.key)
    }
}

// -------------------------------------------------------------------------------------------------
// Builder
// -------------------------------------------------------------------------------------------------

/// Collects dependencies and options, then builds an [`Injector`].
///
/// # Examples
///
/// ```
/// use type_injector::Injector;
///
/// struct Pool;
///
/// let di = Injector::builder()
///     .provide(8080u16)
///     .provide_opaque(std::sync::Arc::new(Pool))
///     .build()
///     .unwrap();
///
/// let port = di.inject(|port: u16| port + 1).unwrap();
/// assert_eq!(port, 8081);
/// ```
#[derive(Default)]
pub struct InjectorBuilder {
    dependencies: Vec<Dependency>,
    trace: Option<Arc<TraceCallback>>,
}

impl InjectorBuilder {
    pub fn provide<T: Any + Send + Sync + fmt::Debug>(self, value: T) -> Self {
        self.dependency(Dependency::new(value))
    }

    pub fn provide_opaque<T: Any + Send + Sync>(self, value: T) -> Self {
        self.dependency(Dependency::opaque(value))
    }

    pub fn dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Sets a callback invoked for every event of the built injector,
    /// including the ones emitted by [`build`](InjectorBuilder::build).
    ///
    /// The callback must NOT inject through the same injector.
    pub fn trace_callback(
        mut self,
        callback: impl Fn(&InjectorEvent<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.trace = Some(Arc::new(callback));
        self
    }

    /// Builds the injector.
    ///
    /// # Errors
    ///
    /// Fails on the first dependency whose type was already provided; the
    /// remaining dependencies are not looked at.
    pub fn build(self) -> Result<Injector, InjectError> {
        let mut injector = Injector {
            values: HashMap::with_capacity(self.dependencies.len()),
            trace: self.trace,
        };

        for dependency in self.dependencies {
            let key = dependency.key;

            if let Some(first) = injector.values.get(&key.id()) {
                let err = InjectError::DuplicateType {
                    first: first.describe(),
                    first_type: first.key.name(),
                    second: dependency.describe(),
                    second_type: key.name(),
                };
                injector.emit_event(&InjectorEvent::Duplicate {
                    type_name: key.name(),
                });
                return Err(err);
            }

            injector.emit_event(&InjectorEvent::Provide {
                type_name: key.name(),
            });
            injector.values.insert(key.id(), dependency);
        }

        Ok(injector)
    }
}

impl fmt::Debug for InjectorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectorBuilder")
            .field("dependencies", &self.dependencies)
            .field("trace", &self.trace.is_some())
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
// Injector
// -------------------------------------------------------------------------------------------------

/// Immutable store holding at most one value per type.
///
/// Values are handed to injected callables by type. A parameter of type `P`
/// receives a clone of the stored `P`; store an `Arc<T>` to share a single
/// instance between all callables.
///
/// Libraries that consume an injector take `&Injector` or `Arc<Injector>`.
pub struct Injector {
    values: HashMap<TypeId, Dependency>,
    trace: Option<Arc<TraceCallback>>,
}

impl Injector {
    /// Builds an injector from `dependencies`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`InjectError::DuplicateType`] when two dependencies share a type.
    ///
    /// # Examples
    ///
    /// ```
    /// use type_injector::{Dependency, InjectError, Injector};
    ///
    /// let err = Injector::new([Dependency::new(1u8), Dependency::new(2u8)]).unwrap_err();
    /// assert!(matches!(err, InjectError::DuplicateType { .. }));
    /// ```
    pub fn new(dependencies: impl IntoIterator<Item = Dependency>) -> Result<Self, InjectError> {
        dependencies
            .into_iter()
            .fold(Injector::builder(), InjectorBuilder::dependency)
            .build()
    }

    pub fn builder() -> InjectorBuilder {
        InjectorBuilder::default()
    }

    /// Calls `f` with every parameter resolved by type and returns its result.
    ///
    /// `f` must return exactly one value; a callable returning `()` is
    /// rejected. Use [`try_inject`](Injector::try_inject) for callables
    /// returning `Result`.
    ///
    /// # Errors
    ///
    /// - [`InjectError::NoReturnValue`] if `f` returns `()`
    /// - [`InjectError::MissingDependency`] for the first parameter type that
    ///   was never provided; `f` is not called in that case
    pub fn inject<F, Args>(&self, f: F) -> Result<F::Output, InjectError>
    where
        F: Injectable<Args>,
        F::Output: 'static,
    {
        let callable = std::any::type_name::<F>();
        let signature = Signature::new(F::params(), vec![TypeKey::of::<F::Output>()]);

        self.invoke(callable, &signature, f)
    }

    /// Like [`inject`](Injector::inject), for callables returning `Result<T, E>`.
    ///
    /// An `Err` from the callable is returned as [`InjectError::Invocation`]
    /// with the original error as its source.
    pub fn try_inject<F, Args, T, E>(&self, f: F) -> Result<T, InjectError>
    where
        F: Injectable<Args, Output = Result<T, E>>,
        T: 'static,
        E: Into<BoxError>,
    {
        let callable = std::any::type_name::<F>();
        let signature = Signature::new(F::params(), vec![TypeKey::of::<T>(), TypeKey::error()]);

        self.invoke(callable, &signature, f)?
            .map_err(|source| InjectError::Invocation {
                callable: callable.to_string(),
                source: source.into(),
            })
    }

    /// Calls a callable described at runtime.
    ///
    /// Performs the same validation and resolution as [`inject`](Injector::inject)
    /// and additionally checks that the body produced what its signature declared.
    pub fn call(&self, callable: &DynCallable) -> Result<Injected, InjectError> {
        let name = callable.name();
        let signature = callable.signature();
        let shape = signature.check_returns(name)?;
        let args = self.resolve(name, signature.params())?;

        self.emit_event(&InjectorEvent::Invoke {
            callable: name,
            params: signature.params().len(),
        });

        let mut values = callable.invoke(args)?.into_values();

        if values.len() != signature.returns().len() {
            return Err(InjectError::ReturnMismatch {
                callable: name.to_string(),
                expected: signature.returns().len(),
                found: values.len(),
            });
        }
        for ((produced, _), declared) in values.iter().zip(signature.returns()) {
            if produced != declared {
                return Err(InjectError::TypeMismatch {
                    expected: declared.name(),
                    found: produced.name(),
                });
            }
        }

        let error = match shape {
            ReturnShape::Value => None,
            ReturnShape::ValueOrError => values
                .pop()
                .and_then(|(_, slot)| slot.downcast::<Option<BoxError>>().ok())
                .and_then(|slot| *slot)
                .map(|source| InjectError::Invocation {
                    callable: name.to_string(),
                    source,
                }),
        };

        let (key, value) = values.pop().ok_or(InjectError::ReturnMismatch {
            callable: name.to_string(),
            expected: signature.returns().len(),
            found: 0,
        })?;

        Ok(Injected::new(key, value, error))
    }

    fn invoke<F, Args>(
        &self,
        callable: &str,
        signature: &Signature,
        f: F,
    ) -> Result<F::Output, InjectError>
    where
        F: Injectable<Args>,
    {
        signature.check_returns(callable)?;
        let args = self.resolve(callable, signature.params())?;

        self.emit_event(&InjectorEvent::Invoke {
            callable,
            params: signature.params().len(),
        });

        f.call(args)
    }

    /// Looks up every parameter, left to right, stopping at the first miss.
    fn resolve(&self, callable: &str, params: &[TypeKey]) -> Result<Arguments, InjectError> {
        let mut resolved = Vec::with_capacity(params.len());

        for key in params {
            let found = self.values.get(&key.id());

            self.emit_event(&InjectorEvent::Resolve {
                type_name: key.name(),
                found: found.is_some(),
            });

            let dependency = found.ok_or_else(|| InjectError::MissingDependency {
                type_name: key.name(),
                callable: callable.to_string(),
            })?;
            resolved.push((*key, Arc::clone(&dependency.value)));
        }

        Ok(Arguments::new(resolved))
    }

    /// Logs `event` and forwards it to the trace callback, if any.
    fn emit_event(&self, event: &InjectorEvent<'_>) {
        tracing::debug!(target: "type_injector", "{}", event);

        if let Some(callback) = self.trace.as_ref() {
            callback(event);
        }
    }
}

impl fmt::Debug for Injector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<&str> = self.values.values().map(|d| d.key.name()).collect();
        types.sort_unstable();

        f.debug_struct("Injector")
            .field("types", &types)
            .field("trace", &self.trace.is_some())
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct A(i32);
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct B(i32);

    #[test]
    fn test_new_distinct_types() {
        let di = Injector::new([Dependency::new(A(0)), Dependency::new(B(1))]).unwrap();
        assert_eq!(di.values.len(), 2);
    }

    #[test]
    fn test_new_rejects_duplicate_type() {
        let err = Injector::new([Dependency::new(A(0)), Dependency::new(A(1))]).unwrap_err();
        match err {
            InjectError::DuplicateType {
                first,
                first_type,
                second,
                second_type,
            } => {
                assert_eq!(first, "A(0)");
                assert_eq!(second, "A(1)");
                assert_eq!(first_type, second_type);
                assert!(first_type.ends_with("::A"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_stops_processing() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();

        let result = Injector::builder()
            .trace_callback(move |e| events_clone.lock().unwrap().push(e.to_string()))
            .provide(1u8)
            .provide(2u8)
            .provide(3u16)
            .build();
        assert!(result.is_err());

        let captured = events.lock().unwrap();
        assert_eq!(captured.len(), 2);
        assert_eq!(captured[0], "provide { type_name: u8 }");
        assert_eq!(captured[1], "duplicate { type_name: u8 }");
    }

    #[test]
    fn test_values_formatted_only_for_duplicates() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        static FORMATTED: AtomicUsize = AtomicUsize::new(0);

        struct Big(Vec<u8>);

        impl fmt::Debug for Big {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                FORMATTED.fetch_add(1, Ordering::SeqCst);
                write!(f, "Big({} bytes)", self.0.len())
            }
        }

        let di = Injector::builder()
            .provide(Arc::new(Big(vec![0; 1 << 20])))
            .provide(1u8)
            .build()
            .unwrap();
        assert_eq!(FORMATTED.load(Ordering::SeqCst), 0);
        assert_eq!(di.inject(|big: Arc<Big>| big.0.len()).unwrap(), 1 << 20);
        assert_eq!(FORMATTED.load(Ordering::SeqCst), 0);

        let err = Injector::builder()
            .provide(Arc::new(Big(vec![1])))
            .provide(Arc::new(Big(vec![1, 2])))
            .build()
            .unwrap_err();
        assert_eq!(FORMATTED.load(Ordering::SeqCst), 2);
        assert!(err
            .to_string()
            .contains("first: Big(1 bytes) (alloc::sync::Arc<"));
    }

    #[test]
    fn test_opaque_printable() {
        struct Pool;
        let err = Injector::builder()
            .provide_opaque(Arc::new(Pool))
            .provide_opaque(Arc::new(Pool))
            .build()
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("first: <alloc::sync::Arc<"));
    }

    #[test]
    fn test_resolve_in_declared_order() {
        let di = Injector::new([Dependency::new(B(1)), Dependency::new(A(0))]).unwrap();
        let mut args = di
            .resolve("f", &[TypeKey::of::<A>(), TypeKey::of::<B>()])
            .unwrap();
        assert_eq!(args.len(), 2);
        assert_eq!(args.take::<A>().unwrap(), A(0));
        assert_eq!(args.take::<B>().unwrap(), B(1));
    }

    #[test]
    fn test_resolve_stops_at_first_miss() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();

        let di = Injector::builder()
            .trace_callback(move |e| {
                if let InjectorEvent::Resolve { .. } = e {
                    events_clone.lock().unwrap().push(e.to_string());
                }
            })
            .provide(A(0))
            .build()
            .unwrap();

        let err = di
            .resolve(
                "f",
                &[TypeKey::of::<A>(), TypeKey::of::<i32>(), TypeKey::of::<B>()],
            )
            .unwrap_err();
        assert!(matches!(
            err,
            InjectError::MissingDependency {
                type_name: "i32",
                ..
            }
        ));

        let captured = events.lock().unwrap();
        assert_eq!(captured.len(), 2);
        assert!(captured[1].contains("found: false"));
    }

    #[test]
    fn test_inject_example_scenario() {
        let di = Injector::new([Dependency::new(A(0)), Dependency::new(B(1))]).unwrap();
        let res = di
            .inject(|a: A, b: B| format!("{} {}", a.0, b.0))
            .unwrap();
        assert_eq!(res, "0 1");
    }

    #[test]
    fn test_inject_rejects_unit_return() {
        let di = Injector::new([Dependency::new(A(0))]).unwrap();
        let called = Arc::new(Mutex::new(false));
        let called_clone = called.clone();

        let err = di
            .inject(move |_a: A| {
                *called_clone.lock().unwrap() = true;
            })
            .unwrap_err();

        assert!(matches!(err, InjectError::NoReturnValue { .. }));
        assert!(!*called.lock().unwrap());
    }

    #[test]
    fn test_debug_lists_types() {
        let di = Injector::new([Dependency::new(2u16), Dependency::new(1u8)]).unwrap();
        assert_eq!(
            format!("{:?}", di),
            r#"Injector { types: ["u16", "u8"], trace: false }"#
        );
    }

    #[test]
    fn test_injector_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Injector>();
        assert_send_sync::<Dependency>();
    }
}
