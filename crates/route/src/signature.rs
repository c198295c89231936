//! Handler metadata used in place of runtime reflection.
//!
//! The host describes each handler's arguments (name and declared type) and what kind of
//! value it returns. The pattern parser resolves `:name` captures against this description,
//! and the dispatcher uses it to know which slots take the request and response handles.

use crate::ParamKind;
use std::fmt;

/// The declared type of one handler argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgType {
    String,
    /// 32 bit signed integer.
    Int,
    /// 32 bit float.
    Float,
    /// 64 bit float.
    Double,
    /// Receives the request handle. Never bound from the path.
    Request,
    /// Receives the response handle. Never bound from the path.
    Response,
    /// Any other type, carried by name for error reporting.
    Other(&'static str),
}

impl ArgType {
    /// Maps a declared argument type to the capture kind that can produce it.
    ///
    /// Returns `None` for types a path segment can't be converted into.
    pub fn capture_kind(self) -> Option<ParamKind> {
        match self {
            ArgType::String => Some(ParamKind::String),
            ArgType::Int => Some(ParamKind::Int),
            ArgType::Float => Some(ParamKind::Float),
            ArgType::Double => Some(ParamKind::Double),
            ArgType::Request | ArgType::Response | ArgType::Other(_) => None,
        }
    }

    /// Returns true for the request/response context slots.
    #[inline]
    pub fn is_context(self) -> bool {
        matches!(self, ArgType::Request | ArgType::Response)
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgType::String => f.write_str("string"),
            ArgType::Int => f.write_str("int"),
            ArgType::Float => f.write_str("float"),
            ArgType::Double => f.write_str("double"),
            ArgType::Request => f.write_str("request"),
            ArgType::Response => f.write_str("response"),
            ArgType::Other(name) => f.write_str(name),
        }
    }
}

/// What a handler produces, which decides how its result is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnKind {
    /// No value, the response body stays empty.
    Unit,
    /// Raw bytes, written unchanged.
    Bytes,
    /// Text, written as UTF-8.
    Text,
    /// A structured value, serialized to JSON.
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgSpec {
    name: String,
    ty: ArgType,
}

impl ArgSpec {
    pub fn new(name: impl Into<String>, ty: ArgType) -> Self {
        Self { name: name.into(), ty }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn ty(&self) -> ArgType {
        self.ty
    }
}

/// The ordered argument list and return kind of a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    args: Vec<ArgSpec>,
    returns: ReturnKind,
}

impl Signature {
    pub fn new(returns: ReturnKind) -> Self {
        Self { args: vec![], returns }
    }

    /// Appends an argument at the next position.
    pub fn arg(mut self, name: impl Into<String>, ty: ArgType) -> Self {
        self.args.push(ArgSpec::new(name, ty));
        self
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    #[inline]
    pub fn args(&self) -> &[ArgSpec] {
        &self.args
    }

    #[inline]
    pub fn returns(&self) -> ReturnKind {
        self.returns
    }

    /// Finds the path-bindable argument called `name`, with its position.
    ///
    /// Context slots and nameless arguments are never returned.
    pub fn find_arg(&self, name: &str) -> Option<(usize, &ArgSpec)> {
        if name.is_empty() {
            return None;
        }
        self.args.iter().enumerate().find(|(_, spec)| !spec.ty.is_context() && spec.name == name)
    }
}
