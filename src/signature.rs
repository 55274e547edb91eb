//! Type keys and callable signatures.
//!
//! A [`TypeKey`] is the exact identity used both as registry key and for
//! parameter matching. A [`Signature`] is the shape of one callable: the
//! ordered parameter keys and the ordered return keys.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::{BoxError, InjectError};

/// Exact type identity with a readable name.
///
/// Equality and hashing only look at the `TypeId`, so a newtype such as
/// `struct Port(u16)` never matches the `u16` it wraps.
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        TypeKey {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The error capability accepted as the second return value.
    ///
    /// Its runtime representation is `Option<BoxError>`.
    pub fn error() -> Self {
        TypeKey {
            id: TypeId::of::<Option<BoxError>>(),
            name: "error",
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_error(&self) -> bool {
        *self == TypeKey::error()
    }

    fn is_unit(&self) -> bool {
        self.id == TypeId::of::<()>()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// How a validated callable reports its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReturnShape {
    /// A single value.
    Value,
    /// A value followed by the error capability.
    ValueOrError,
}

/// Parameter and return types of a callable, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    params: Vec<TypeKey>,
    returns: Vec<TypeKey>,
}

impl Signature {
    pub fn new(params: Vec<TypeKey>, returns: Vec<TypeKey>) -> Self {
        Signature { params, returns }
    }

    pub fn params(&self) -> &[TypeKey] {
        &self.params
    }

    pub fn returns(&self) -> &[TypeKey] {
        &self.returns
    }

    /// Validates the return list of `callable`.
    ///
    /// A lone `()` return counts as no return value at all.
    pub(crate) fn check_returns(&self, callable: &str) -> Result<ReturnShape, InjectError> {
        match self.returns.as_slice() {
            [] => Err(InjectError::NoReturnValue {
                callable: callable.to_string(),
            }),
            [only] if only.is_unit() => Err(InjectError::NoReturnValue {
                callable: callable.to_string(),
            }),
            [_] => Ok(ReturnShape::Value),
            [_, second] if second.is_error() => Ok(ReturnShape::ValueOrError),
            [_, second] => Err(InjectError::InvalidSecondReturn {
                type_name: second.name(),
                callable: callable.to_string(),
            }),
            more => Err(InjectError::TooManyReturnValues {
                callable: callable.to_string(),
                count: more.len(),
            }),
        }
    }
}
