//! Callables described at runtime.
//!
//! A [`DynCallable`] carries its own list of parameter and return type keys
//! instead of having them derived from a Rust function type. This is useful
//! when the callable comes from a plugin table or a script binding, where the
//! shape is only known while the program runs. Because the shape is data,
//! every return-shape rule is checked when the callable is injected.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;

use crate::{Arguments, BoxError, InjectError, Signature, TypeKey};

type Body = Box<dyn Fn(Arguments) -> Result<Returns, InjectError> + Send + Sync>;

/// A callable with an explicit [`Signature`].
///
/// # Examples
///
/// ```rust
/// use type_injector::{injector, DynCallable, Returns};
///
/// let greet = DynCallable::builder("greet")
///     .param::<String>()
///     .returns::<String>()
///     .build(|mut args| {
///         let name: String = args.take()?;
///         Ok(Returns::new().value(format!("hello {name}")))
///     });
///
/// let di = injector!["world".to_string()].unwrap();
/// let greeting: String = di.call(&greet).unwrap().downcast().unwrap();
/// assert_eq!(greeting, "hello world");
/// ```
pub struct DynCallable {
    name: Cow<'static, str>,
    signature: Signature,
    body: Body,
}

impl DynCallable {
    pub fn builder(name: impl Into<Cow<'static, str>>) -> DynCallableBuilder {
        DynCallableBuilder {
            name: name.into(),
            params: Vec::new(),
            returns: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub(crate) fn invoke(&self, args: Arguments) -> Result<Returns, InjectError> {
        (self.body)(args)
    }
}

impl fmt::Debug for DynCallable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynCallable")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Builder for [`DynCallable`].
#[derive(Debug)]
pub struct DynCallableBuilder {
    name: Cow<'static, str>,
    params: Vec<TypeKey>,
    returns: Vec<TypeKey>,
}

impl DynCallableBuilder {
    /// Appends a parameter of type `T`.
    pub fn param<T: ?Sized + 'static>(mut self) -> Self {
        self.params.push(TypeKey::of::<T>());
        self
    }

    /// Appends a return value of type `T`.
    pub fn returns<T: ?Sized + 'static>(mut self) -> Self {
        self.returns.push(TypeKey::of::<T>());
        self
    }

    /// Appends the error capability as a return value.
    pub fn returns_error(mut self) -> Self {
        self.returns.push(TypeKey::error());
        self
    }

    pub fn build(
        self,
        body: impl Fn(Arguments) -> Result<Returns, InjectError> + Send + Sync + 'static,
    ) -> DynCallable {
        DynCallable {
            name: self.name,
            signature: Signature::new(self.params, self.returns),
            body: Box::new(body),
        }
    }
}

/// Values produced by a [`DynCallable`] body, in declared return order.
#[derive(Default)]
pub struct Returns {
    values: Vec<(TypeKey, Box<dyn Any + Send>)>,
}

impl Returns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value<T: Any + Send>(mut self, value: T) -> Self {
        self.values.push((TypeKey::of::<T>(), Box::new(value)));
        self
    }

    /// Appends the error capability, `None` meaning success.
    pub fn error<E: Into<BoxError>>(mut self, error: Option<E>) -> Self {
        let error: Option<BoxError> = error.map(Into::into);
        self.values.push((TypeKey::error(), Box::new(error)));
        self
    }

    /// Appends an empty error capability.
    pub fn no_error(self) -> Self {
        self.error(None::<BoxError>)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values paired with the type they were produced as.
    pub(crate) fn into_values(self) -> Vec<(TypeKey, Box<dyn Any + Send>)> {
        self.values
    }
}

impl fmt::Debug for Returns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types: Vec<&str> = self.values.iter().map(|(key, _)| key.name()).collect();
        f.debug_struct("Returns").field("types", &types).finish()
    }
}

/// Normalized result of [`Injector::call`](crate::Injector::call).
///
/// Holds the callable's value and, when it declared an error return that
/// came back non-empty, the wrapped error. Both are available at once.
pub struct Injected {
    key: TypeKey,
    value: Box<dyn Any + Send>,
    error: Option<InjectError>,
}

impl Injected {
    pub(crate) fn new(key: TypeKey, value: Box<dyn Any + Send>, error: Option<InjectError>) -> Self {
        Injected { key, value, error }
    }

    /// The type the value was returned as.
    pub fn type_key(&self) -> TypeKey {
        self.key
    }

    pub fn value(&self) -> &(dyn Any + Send) {
        self.value.as_ref()
    }

    /// The callable's own error, wrapped as [`InjectError::Invocation`].
    pub fn error(&self) -> Option<&InjectError> {
        self.error.as_ref()
    }

    pub fn into_parts(self) -> (Box<dyn Any + Send>, Option<InjectError>) {
        (self.value, self.error)
    }

    /// Returns the value as a `T`, or the callable's error if it reported one.
    pub fn downcast<T: Any>(self) -> Result<T, InjectError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        self.value
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| InjectError::TypeMismatch {
                expected: std::any::type_name::<T>(),
                found: self.key.name(),
            })
    }
}

impl fmt::Debug for Injected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injected")
            .field("type", &self.key.name())
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}
