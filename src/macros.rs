//! Macros for building injectors.

/// Builds an [`Injector`](crate::Injector) from a list of values.
///
/// Each value is wrapped with [`Dependency::new`](crate::Dependency::new), so
/// it must implement `Debug`. Use [`Injector::builder`](crate::Injector::builder)
/// with `provide_opaque` for values that don't.
///
/// Evaluates to `Result<Injector, InjectError>`.
///
/// # Examples
///
/// ```rust
/// use type_injector::injector;
///
/// #[derive(Debug, Clone, Copy)]
/// struct A(i32);
/// #[derive(Debug, Clone, Copy)]
/// struct B(i32);
///
/// let di = injector![A(0), B(1)].unwrap();
/// let res = di.inject(|a: A, b: B| format!("{} {}", a.0, b.0)).unwrap();
/// assert_eq!(res, "0 1");
///
/// // Only one value per type
/// assert!(injector![A(0), A(1)].is_err());
/// ```
#[macro_export]
macro_rules! injector {
    () => {
        $crate::Injector::new(::std::iter::empty::<$crate::Dependency>())
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Injector::new([$($crate::Dependency::new($value)),+])
    };
}
