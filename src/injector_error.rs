use thiserror::Error;

/// Boxed error used as the error capability of injected callables.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned while building an [`Injector`](crate::Injector) or injecting a callable.
#[derive(Debug, Error)]
pub enum InjectError {
    /// Two values of the same type were passed at construction time.
    #[error(
        "cannot inject two values of the same type. first: {first} ({first_type}), second: {second} ({second_type})"
    )]
    DuplicateType {
        first: String,
        first_type: &'static str,
        second: String,
        second_type: &'static str,
    },

    #[error("cannot inject function with no return values: {callable}")]
    NoReturnValue { callable: String },

    #[error("cannot inject function with more than 2 return values: {callable}")]
    TooManyReturnValues { callable: String, count: usize },

    #[error("cannot inject function with a non-error second return value: {type_name}. {callable}")]
    InvalidSecondReturn {
        type_name: &'static str,
        callable: String,
    },

    /// A declared parameter type has no registered value.
    #[error("fn requires a type that's missing: {type_name}. {callable}")]
    MissingDependency {
        type_name: &'static str,
        callable: String,
    },

    /// The callable itself reported a failure through its error return.
    #[error("cannot inject: {source}")]
    Invocation {
        callable: String,
        #[source]
        source: BoxError,
    },

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("callable {callable} declared {expected} return values but produced {found}")]
    ReturnMismatch {
        callable: String,
        expected: usize,
        found: usize,
    },
}

impl InjectError {
    /// Returns `true` if the error came from the callable rather than the injection mechanism.
    pub fn is_invocation(&self) -> bool {
        matches!(self, InjectError::Invocation { .. })
    }
}
