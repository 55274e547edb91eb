/// Events emitted by the injector during construction and injection.
///
/// Every event is logged through `tracing` and passed to the trace callback
/// set via [`InjectorBuilder::trace_callback`](crate::InjectorBuilder::trace_callback).
///
/// # Examples
///
/// ```rust
/// use type_injector::InjectorEvent;
///
/// let event = InjectorEvent::Provide { type_name: "i32" };
/// assert_eq!(event.to_string(), "provide { type_name: i32 }");
/// ```
#[derive(Debug, Clone)]
pub enum InjectorEvent<'a> {
    /// A value was stored while building the injector.
    Provide {
        /// The type name of the stored value (e.g., "i32", "alloc::string::String")
        type_name: &'static str,
    },

    /// A second value of an already stored type was rejected.
    Duplicate {
        type_name: &'static str,
    },

    /// A parameter type was looked up.
    Resolve {
        /// The type name that was requested
        type_name: &'static str,
        /// Whether a value of that type is registered
        found: bool,
    },

    /// A callable is about to be invoked with all of its parameters resolved.
    Invoke {
        callable: &'a str,
        params: usize,
    },
}

impl std::fmt::Display for InjectorEvent<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InjectorEvent::Provide { type_name } => {
                write!(f, "provide {{ type_name: {} }}", type_name)
            }
            InjectorEvent::Duplicate { type_name } => {
                write!(f, "duplicate {{ type_name: {} }}", type_name)
            }
            InjectorEvent::Resolve { type_name, found } => {
                write!(f, "resolve {{ type_name: {}, found: {} }}", type_name, found)
            }
            InjectorEvent::Invoke { callable, params } => {
                write!(f, "invoke {{ callable: {}, params: {} }}", callable, params)
            }
        }
    }
}
