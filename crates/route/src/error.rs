use thiserror::Error;

/// Errors raised while compiling a route pattern into a [`Binding`](crate::Binding).
///
/// These only happen at registration time, never while matching a request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("argument `{name}` not found in handler signature")]
    UnknownCaptureName { name: String },

    #[error("type `{ty}` of argument `{name}` is not supported as a path capture")]
    UnsupportedCaptureType { name: String, ty: String },

    #[error("`::{name}` can only be used as the last segment")]
    AbsorbRestNotLast { name: String },

    #[error("`::{name}` should capture a string")]
    AbsorbRestMustBeString { name: String },

    #[error("a binding needs at least one parameter")]
    NoParameters,
}

impl ParseError {
    pub fn unknown_capture_name<S: ToString>(name: S) -> Self {
        Self::UnknownCaptureName { name: name.to_string() }
    }

    pub fn unsupported_capture_type<S: ToString, T: ToString>(name: S, ty: T) -> Self {
        Self::UnsupportedCaptureType { name: name.to_string(), ty: ty.to_string() }
    }

    pub fn absorb_rest_not_last<S: ToString>(name: S) -> Self {
        Self::AbsorbRestNotLast { name: name.to_string() }
    }

    pub fn absorb_rest_must_be_string<S: ToString>(name: S) -> Self {
        Self::AbsorbRestMustBeString { name: name.to_string() }
    }
}
