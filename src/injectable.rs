//! Callables whose parameters can be resolved by type.
//!
//! [`Injectable`] is implemented for every `FnOnce` taking up to twelve
//! parameters, as long as each parameter type is `Clone + Send + Sync + 'static`.
//! The `Args` type parameter is the tuple of parameter types; it only exists
//! so that closures of different arities get distinct implementations.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::{InjectError, TypeKey};

/// A value stored in the injector, shared between all resolutions of its type.
pub(crate) type SharedValue = Arc<dyn Any + Send + Sync>;

/// Resolved argument list for one call, in declared parameter order.
///
/// Each [`take`](Arguments::take) or [`take_shared`](Arguments::take_shared)
/// consumes the next argument.
pub struct Arguments {
    values: std::vec::IntoIter<(TypeKey, SharedValue)>,
}

impl Arguments {
    pub(crate) fn new(values: Vec<(TypeKey, SharedValue)>) -> Self {
        Arguments {
            values: values.into_iter(),
        }
    }

    /// Number of arguments not yet taken.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.len() == 0
    }

    /// Takes the next argument as an owned clone of the stored value.
    ///
    /// # Errors
    ///
    /// - No arguments are left
    /// - The next argument is not a `T`
    pub fn take<T: Clone + 'static>(&mut self) -> Result<T, InjectError> {
        let (key, value) = self.next_for::<T>()?;
        value
            .downcast_ref::<T>()
            .cloned()
            .ok_or(InjectError::TypeMismatch {
                expected: std::any::type_name::<T>(),
                found: key.name(),
            })
    }

    /// Takes the next argument as the shared `Arc` held by the injector.
    ///
    /// Unlike [`take`](Arguments::take) this does not require `T: Clone`.
    pub fn take_shared<T: Send + Sync + 'static>(&mut self) -> Result<Arc<T>, InjectError> {
        let (key, value) = self.next_for::<T>()?;
        value.downcast::<T>().map_err(|_| InjectError::TypeMismatch {
            expected: std::any::type_name::<T>(),
            found: key.name(),
        })
    }

    fn next_for<T: 'static>(&mut self) -> Result<(TypeKey, SharedValue), InjectError> {
        let (key, value) = self.values.next().ok_or(InjectError::TypeMismatch {
            expected: std::any::type_name::<T>(),
            found: "<no argument>",
        })?;

        if key.id() != TypeId::of::<T>() {
            return Err(InjectError::TypeMismatch {
                expected: std::any::type_name::<T>(),
                found: key.name(),
            });
        }

        Ok((key, value))
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pending: Vec<&str> = self
            .values
            .as_slice()
            .iter()
            .map(|(key, _)| key.name())
            .collect();
        f.debug_struct("Arguments")
            .field("pending", &pending)
            .finish_non_exhaustive()
    }
}

/// A callable whose parameters are resolved from an [`Injector`](crate::Injector).
pub trait Injectable<Args>: Sized {
    /// The callable's return type.
    type Output;

    /// Parameter types in declaration order.
    fn params() -> Vec<TypeKey>;

    /// Calls `self` with the resolved arguments.
    fn call(self, args: Arguments) -> Result<Self::Output, InjectError>;
}

macro_rules! impl_injectable {
    ($($param:ident),*) => {
        impl<F, R, $($param,)*> Injectable<($($param,)*)> for F
        where
            F: FnOnce($($param),*) -> R,
            $($param: Clone + Send + Sync + 'static,)*
        {
            type Output = R;

            fn params() -> Vec<TypeKey> {
                vec![$(TypeKey::of::<$param>()),*]
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn call(self, mut args: Arguments) -> Result<R, InjectError> {
                $(let $param = args.take::<$param>()?;)*
                Ok(self($($param),*))
            }
        }
    };
}

impl_injectable!();
impl_injectable!(P1);
impl_injectable!(P1, P2);
impl_injectable!(P1, P2, P3);
impl_injectable!(P1, P2, P3, P4);
impl_injectable!(P1, P2, P3, P4, P5);
impl_injectable!(P1, P2, P3, P4, P5, P6);
impl_injectable!(P1, P2, P3, P4, P5, P6, P7);
impl_injectable!(P1, P2, P3, P4, P5, P6, P7, P8);
impl_injectable!(P1, P2, P3, P4, P5, P6, P7, P8, P9);
impl_injectable!(P1, P2, P3, P4, P5, P6, P7, P8, P9, P10);
impl_injectable!(P1, P2, P3, P4, P5, P6, P7, P8, P9, P10, P11);
impl_injectable!(P1, P2, P3, P4, P5, P6, P7, P8, P9, P10, P11, P12);
