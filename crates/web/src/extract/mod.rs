//! Binding matched route values to typed handler arguments.
//!
//! After a route matches, each argument slot of the handler holds either a converted
//! path capture, the request or response handle, or nothing. [`Arguments`] carries those
//! slots, and [`FromArgs`] turns them into the tuple a handler function is called with.

mod extract_tuple;
mod from_arg;

pub use extract_tuple::FromArgs;
pub use from_arg::FromArg;

use crate::request::RequestHandle;
use crate::response::ResponseHandle;
use thiserror::Error;
use uniweb_route::{Arg, ArgType, Args};

/// One bound argument value.
#[derive(Debug, Clone)]
pub enum Value {
    Str(String),
    Int(i32),
    Float(f32),
    Double(f64),
    Request(RequestHandle),
    Response(ResponseHandle),
}

impl Value {
    /// The short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Request(_) => "request",
            Value::Response(_) => "response",
        }
    }
}

impl From<Arg> for Value {
    fn from(arg: Arg) -> Self {
        match arg {
            Arg::Str(s) => Value::Str(s),
            Arg::Int(i) => Value::Int(i),
            Arg::Float(f) => Value::Float(f),
            Arg::Double(d) => Value::Double(d),
        }
    }
}

/// The positional argument values for one handler invocation.
///
/// Slots not filled by the path or by context injection stay `None`.
#[derive(Debug, Default)]
pub struct Arguments {
    slots: Vec<Option<Value>>,
}

impl Arguments {
    pub fn with_arity(arity: usize) -> Self {
        Self { slots: vec![None; arity] }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&Value> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Stores `value` at `slot`. Out of range slots are ignored.
    pub fn set(&mut self, slot: usize, value: Value) {
        if let Some(target) = self.slots.get_mut(slot) {
            *target = Some(value);
        }
    }

    pub fn take(&mut self, slot: usize) -> Option<Value> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    pub fn into_slots(self) -> Vec<Option<Value>> {
        self.slots
    }
}

impl From<Args> for Arguments {
    fn from(args: Args) -> Self {
        Self { slots: args.into_slots().into_iter().map(|arg| arg.map(Value::from)).collect() }
    }
}

impl IntoIterator for Arguments {
    type Item = Option<Value>;
    type IntoIter = std::vec::IntoIter<Option<Value>>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgError {
    #[error("argument {slot} is not bound")]
    Unbound { slot: usize },

    #[error("argument {slot} expects {expected}, got {actual}")]
    Mismatch { slot: usize, expected: ArgType, actual: &'static str },

    #[error("handler takes {expected} arguments, got {actual}")]
    Arity { expected: usize, actual: usize },
}

impl ArgError {
    pub fn mismatch(slot: usize, expected: ArgType, actual: &Value) -> Self {
        Self::Mismatch { slot, expected, actual: actual.type_name() }
    }
}
