use crate::extract::{ArgError, Value};
use crate::request::RequestHandle;
use crate::response::ResponseHandle;
use uniweb_route::ArgType;

/// A type a single handler argument can be bound to.
pub trait FromArg: Sized {
    /// The declared type reported in the handler's signature.
    fn arg_type() -> ArgType;

    fn from_arg(slot: usize, value: Option<Value>) -> Result<Self, ArgError>;
}

macro_rules! impl_from_arg {
    ($ty:ty, $arg_type:ident, $variant:ident) => {
        impl FromArg for $ty {
            #[inline]
            fn arg_type() -> ArgType {
                ArgType::$arg_type
            }

            fn from_arg(slot: usize, value: Option<Value>) -> Result<Self, ArgError> {
                match value {
                    Some(Value::$variant(v)) => Ok(v),
                    Some(other) => Err(ArgError::mismatch(slot, Self::arg_type(), &other)),
                    None => Err(ArgError::Unbound { slot }),
                }
            }
        }
    };
}

impl_from_arg!(String, String, Str);
impl_from_arg!(i32, Int, Int);
impl_from_arg!(f32, Float, Float);
impl_from_arg!(f64, Double, Double);
impl_from_arg!(RequestHandle, Request, Request);
impl_from_arg!(ResponseHandle, Response, Response);

/// An argument that may stay unbound, such as a capture the pattern doesn't mention.
impl<T: FromArg> FromArg for Option<T> {
    fn arg_type() -> ArgType {
        T::arg_type()
    }

    fn from_arg(slot: usize, value: Option<Value>) -> Result<Self, ArgError> {
        match value {
            Some(value) => T::from_arg(slot, Some(value)).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FromArg;
    use crate::extract::{ArgError, Value};
    use crate::response::ResponseHandle;
    use uniweb_route::ArgType;

    #[test]
    fn test_arg_types() {
        assert_eq!(String::arg_type(), ArgType::String);
        assert_eq!(i32::arg_type(), ArgType::Int);
        assert_eq!(f32::arg_type(), ArgType::Float);
        assert_eq!(f64::arg_type(), ArgType::Double);
        assert_eq!(ResponseHandle::arg_type(), ArgType::Response);
        assert_eq!(Option::<i32>::arg_type(), ArgType::Int);
    }

    #[test]
    fn test_from_arg() {
        assert_eq!(i32::from_arg(0, Some(Value::Int(42))), Ok(42));
        assert_eq!(String::from_arg(1, Some(Value::Str("abc".into()))), Ok("abc".to_string()));
        assert_eq!(
            f64::from_arg(2, Some(Value::Int(1))),
            Err(ArgError::Mismatch { slot: 2, expected: ArgType::Double, actual: "int" })
        );
        assert_eq!(i32::from_arg(3, None), Err(ArgError::Unbound { slot: 3 }));
    }

    #[test]
    fn test_optional_arg() {
        assert_eq!(Option::<i32>::from_arg(0, None), Ok(None));
        assert_eq!(Option::<i32>::from_arg(0, Some(Value::Int(7))), Ok(Some(7)));
        assert!(Option::<i32>::from_arg(0, Some(Value::Str("7".into()))).is_err());
    }
}
