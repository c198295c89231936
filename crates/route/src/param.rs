//! The compiled form of one route segment.
//!
//! A route pattern such as `samplepage/number/:number/` compiles to an ordered list of
//! [`Param`]s, one per path position. Matching walks that list against the request's
//! path tokens.

use std::fmt;

/// What a single path position matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Matches one literal segment.
    Static,
    /// Matches only the default page sentinel, see [`DEFAULT_PAGE`](crate::DEFAULT_PAGE).
    DefaultPage,
    String,
    Int,
    Float,
    Double,
}

impl ParamKind {
    /// Returns true for the kinds that bind a value into a handler argument.
    #[inline]
    pub fn is_capture(self) -> bool {
        !matches!(self, ParamKind::Static | ParamKind::DefaultPage)
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::Static => "Static",
            ParamKind::DefaultPage => "DefaultPage",
            ParamKind::String => "String",
            ParamKind::Int => "Int",
            ParamKind::Float => "Float",
            ParamKind::Double => "Double",
        };
        f.write_str(name)
    }
}

/// One matched path position.
///
/// `name` is the literal for [`ParamKind::Static`] and the argument name for captures.
/// `slot` indexes the handler's argument list and is only meaningful for captures.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    kind: ParamKind,
    name: String,
    slot: usize,
    absorbs_rest: bool,
}

impl Param {
    pub fn literal(name: impl Into<String>) -> Self {
        Self { kind: ParamKind::Static, name: name.into(), slot: 0, absorbs_rest: false }
    }

    pub fn default_page() -> Self {
        Self { kind: ParamKind::DefaultPage, name: String::new(), slot: 0, absorbs_rest: false }
    }

    pub fn capture(kind: ParamKind, name: impl Into<String>, slot: usize) -> Self {
        Self { kind, name: name.into(), slot, absorbs_rest: false }
    }

    /// A string capture that takes every remaining token, joined with `/`.
    pub fn rest(name: impl Into<String>, slot: usize) -> Self {
        Self { kind: ParamKind::String, name: name.into(), slot, absorbs_rest: true }
    }

    #[inline]
    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn slot(&self) -> usize {
        self.slot
    }

    #[inline]
    pub fn absorbs_rest(&self) -> bool {
        self.absorbs_rest
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Type: {}, Name: {}, IncludeSlash: {}, ArgumentIndex: {}",
            self.kind, self.name, self.absorbs_rest, self.slot
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Param, ParamKind};

    #[test]
    fn test_capture_kinds() {
        assert!(!ParamKind::Static.is_capture());
        assert!(!ParamKind::DefaultPage.is_capture());
        assert!(ParamKind::String.is_capture());
        assert!(ParamKind::Int.is_capture());
        assert!(ParamKind::Float.is_capture());
        assert!(ParamKind::Double.is_capture());
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(Param::literal("path1"), Param::literal("path1"));
        assert_ne!(Param::literal("path1"), Param::literal("path2"));
        assert_eq!(Param::default_page(), Param::default_page());
        assert_ne!(Param::capture(ParamKind::String, "path", 0), Param::rest("path", 0));
    }

    #[test]
    fn test_display() {
        let param = Param::rest("path", 2);
        assert_eq!(param.to_string(), "Type: String, Name: path, IncludeSlash: true, ArgumentIndex: 2");
    }
}
