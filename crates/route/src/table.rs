use crate::matcher::{Args, match_params};
use crate::{DEFAULT_PAGE, Param, ParamKind, ParseError, Signature, parse, segment};
use std::fmt;
use tracing::debug;

/// A compiled association between a path pattern and a handler.
///
/// The parameter list is never empty, and an absorbing capture can only be the last
/// parameter and only capture a string.
#[derive(Debug)]
pub struct Binding<H> {
    params: Vec<Param>,
    signature: Signature,
    handler: H,
}

impl<H> Binding<H> {
    /// Compiles `pattern` against `signature`, see [`parse`].
    pub fn compile(pattern: &str, signature: Signature, handler: H) -> Result<Self, ParseError> {
        let params = parse(pattern, &signature)?;
        Ok(Self { params, signature, handler })
    }

    /// Builds a binding from parameters assembled by hand.
    pub fn new(params: Vec<Param>, signature: Signature, handler: H) -> Result<Self, ParseError> {
        let Some(last) = params.len().checked_sub(1) else {
            return Err(ParseError::NoParameters);
        };

        for (index, param) in params.iter().enumerate() {
            if param.kind().is_capture() {
                let Some(spec) = signature.args().get(param.slot()) else {
                    return Err(ParseError::unknown_capture_name(param.name()));
                };
                if spec.ty().capture_kind() != Some(param.kind()) {
                    return Err(ParseError::unsupported_capture_type(param.name(), spec.ty()));
                }
            }

            if param.absorbs_rest() {
                if index != last {
                    return Err(ParseError::absorb_rest_not_last(param.name()));
                }
                if param.kind() != ParamKind::String {
                    return Err(ParseError::absorb_rest_must_be_string(param.name()));
                }
            }
        }

        Ok(Self { params, signature, handler })
    }

    #[inline]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    #[inline]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    #[inline]
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Returns the bound arguments if `tokens` match this binding.
    pub fn matches(&self, tokens: &[&str]) -> Option<Args> {
        match_params(&self.params, self.signature.arity(), tokens)
    }

    /// Renders the parameters back into pattern syntax.
    pub fn pattern(&self) -> String {
        self.to_string()
    }
}

impl<H> fmt::Display for Binding<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for param in &self.params {
            match param.kind() {
                ParamKind::DefaultPage => {}
                ParamKind::Static => write!(f, "/{}", param.name())?,
                _ if param.absorbs_rest() => write!(f, "/::{}", param.name())?,
                _ => write!(f, "/:{}", param.name())?,
            }
        }
        if self.params.last().is_some_and(|param| param.kind() == ParamKind::DefaultPage) {
            f.write_str("/")?;
        }
        Ok(())
    }
}

/// A successful lookup: the binding that matched and its bound arguments.
#[derive(Debug)]
pub struct Matched<'table, H> {
    binding: &'table Binding<H>,
    args: Args,
}

impl<'table, H> Matched<'table, H> {
    #[inline]
    pub fn binding(&self) -> &'table Binding<H> {
        self.binding
    }

    #[inline]
    pub fn args(&self) -> &Args {
        &self.args
    }

    pub fn into_parts(self) -> (&'table Binding<H>, Args) {
        (self.binding, self.args)
    }
}

/// Ordered, append-only list of bindings.
///
/// Registration order is the only priority: the first binding that matches wins, so
/// specific static patterns should be registered before general capturing ones.
#[derive(Debug)]
pub struct RouteTable<H> {
    bindings: Vec<Binding<H>>,
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> RouteTable<H> {
    pub fn new() -> Self {
        Self { bindings: vec![] }
    }

    /// Compiles `pattern` and appends the binding.
    ///
    /// On error nothing is appended and the table is unchanged.
    pub fn register(&mut self, pattern: &str, signature: Signature, handler: H) -> Result<(), ParseError> {
        let binding = Binding::compile(pattern, signature, handler)?;
        self.push(binding);
        Ok(())
    }

    pub fn push(&mut self, binding: Binding<H>) {
        debug!(pattern = %binding, "route registered");
        self.bindings.push(binding);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Binding<H>> {
        self.bindings.iter()
    }

    /// Scans the bindings in registration order and returns the first match.
    pub fn find(&self, tokens: &[&str]) -> Option<Matched<'_, H>> {
        self.bindings.iter().find_map(|binding| binding.matches(tokens).map(|args| Matched { binding, args }))
    }

    /// Segments `path` and finds the binding for it.
    ///
    /// A non-root path ending with `/` carries a trailing [`DEFAULT_PAGE`] token. Each
    /// binding is tried with the full token list, then once without that token, before
    /// the next binding is tried. So `/a/b/` reaches a binding for `/a/b` unless an earlier
    /// binding takes it.
    pub fn find_path(&self, path: &str) -> Option<Matched<'_, H>> {
        let tokens = segment(path);
        let trimmed = match tokens.split_last() {
            Some((&DEFAULT_PAGE, rest)) if !rest.is_empty() => Some(rest),
            _ => None,
        };

        self.bindings.iter().find_map(|binding| {
            binding
                .matches(&tokens)
                .or_else(|| trimmed.and_then(|rest| binding.matches(rest)))
                .map(|args| Matched { binding, args })
        })
    }
}

impl<'table, H> IntoIterator for &'table RouteTable<H> {
    type Item = &'table Binding<H>;
    type IntoIter = std::slice::Iter<'table, Binding<H>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{Binding, RouteTable};
    use crate::{Arg, ArgType, DEFAULT_PAGE, Param, ParamKind, ParseError, ReturnKind, Signature, segment};

    fn text(name: &str, ty: ArgType) -> Signature {
        Signature::new(ReturnKind::Text).arg(name, ty)
    }

    #[test]
    fn test_first_registered_wins() {
        let mut table = RouteTable::new();
        table.register("items/:name", text("name", ArgType::String), "by name").unwrap();
        table.register("items/:id", text("id", ArgType::Int), "by id").unwrap();

        let matched = table.find(&["items", "42"]).unwrap();
        assert_eq!(*matched.binding().handler(), "by name");
        assert_eq!(matched.args().get(0), Some(&Arg::Str("42".into())));
    }

    #[test]
    fn test_falls_through_on_conversion_failure() {
        let mut table = RouteTable::new();
        table.register("items/:id", text("id", ArgType::Int), "by id").unwrap();
        table.register("items/:name", text("name", ArgType::String), "by name").unwrap();

        assert_eq!(*table.find(&["items", "42"]).unwrap().binding().handler(), "by id");
        assert_eq!(*table.find(&["items", "abc"]).unwrap().binding().handler(), "by name");
        assert!(table.find(&["items"]).is_none());
    }

    #[test]
    fn test_trailing_slash_route() {
        let mut table = RouteTable::new();
        table.register("samplepage/number/:number/", text("number", ArgType::Int), "number").unwrap();

        let tokens = segment("/samplepage/number/42/");
        assert_eq!(tokens, vec!["samplepage", "number", "42", DEFAULT_PAGE]);
        assert!(table.find(&tokens).is_none());

        for path in ["/samplepage/number/42/", "/samplepage/number/42"] {
            let matched = table.find_path(path).unwrap();
            assert_eq!(matched.args().get(0), Some(&Arg::Int(42)));
        }
        assert!(table.find_path("/samplepage/number/42/x").is_none());
    }

    #[test]
    fn test_trailing_slash_follows_registration_order() {
        let mut table = RouteTable::new();
        table.register("files/:name", text("name", ArgType::String), "single").unwrap();
        table.register("files/::path", text("path", ArgType::String), "rest").unwrap();

        let (binding, args) = table.find_path("/files/a/").unwrap().into_parts();
        assert_eq!(*binding.handler(), "single");
        assert_eq!(args.get(0), Some(&Arg::Str("a".into())));

        let mut table = RouteTable::new();
        table.register("files/::path", text("path", ArgType::String), "rest").unwrap();
        table.register("files/:name", text("name", ArgType::String), "single").unwrap();

        let (binding, args) = table.find_path("/files/a/").unwrap().into_parts();
        assert_eq!(*binding.handler(), "rest");
        assert_eq!(args.get(0), Some(&Arg::Str("a//".into())));
    }

    #[test]
    fn test_later_catch_all_does_not_shadow_trailing_slash_route() {
        let mut table = RouteTable::new();
        table.register("samplepage/number/:number/", text("number", ArgType::Int), "number").unwrap();
        table.push(Binding::new(vec![Param::rest("path", 0)], text("path", ArgType::String), "files").unwrap());

        let (binding, args) = table.find_path("/samplepage/number/42/").unwrap().into_parts();
        assert_eq!(*binding.handler(), "number");
        assert_eq!(args.get(0), Some(&Arg::Int(42)));

        assert_eq!(*table.find_path("/samplepage/number/abc/").unwrap().binding().handler(), "files");
    }

    #[test]
    fn test_root_is_never_retried() {
        let mut table = RouteTable::new();
        table.register("a", Signature::new(ReturnKind::Unit), ()).unwrap();
        assert!(table.find_path("/").is_none());
    }

    #[test]
    fn test_default_page_and_rest() {
        let mut table = RouteTable::new();
        table.register("/", Signature::new(ReturnKind::Text), "index").unwrap();
        table.register("::path", text("path", ArgType::String), "files").unwrap();

        assert_eq!(*table.find(&segment("http://localhost/")).unwrap().binding().handler(), "index");

        let (binding, args) = table.find(&segment("/css/site.css")).unwrap().into_parts();
        assert_eq!(*binding.handler(), "files");
        assert_eq!(args.get(0), Some(&Arg::Str("css/site.css".into())));
    }

    #[test]
    fn test_failed_registration_leaves_table_unchanged() {
        let mut table = RouteTable::new();
        let result = table.register("a/:missing", Signature::new(ReturnKind::Unit), ());

        assert_eq!(result, Err(ParseError::unknown_capture_name("missing")));
        assert!(table.is_empty());
    }

    #[test]
    fn test_binding_new_validates() {
        let signature = text("path", ArgType::String);

        assert_eq!(Binding::new(vec![], signature.clone(), ()).unwrap_err(), ParseError::NoParameters);
        assert_eq!(
            Binding::new(vec![Param::rest("path", 0), Param::literal("a")], signature.clone(), ()).unwrap_err(),
            ParseError::absorb_rest_not_last("path")
        );
        assert_eq!(
            Binding::new(vec![Param::capture(ParamKind::Int, "n", 3)], signature.clone(), ()).unwrap_err(),
            ParseError::unknown_capture_name("n")
        );
        assert_eq!(
            Binding::new(vec![Param::capture(ParamKind::Int, "n", 0)], signature.clone(), ()).unwrap_err(),
            ParseError::unsupported_capture_type("n", "string")
        );
        assert_eq!(
            Binding::new(vec![Param::capture(ParamKind::String, "r", 0)], text("r", ArgType::Request), ()).unwrap_err(),
            ParseError::unsupported_capture_type("r", "request")
        );
        assert!(Binding::new(vec![Param::literal("static"), Param::rest("path", 0)], signature, ()).is_ok());
    }

    #[test]
    fn test_pattern_rendering() {
        let binding = Binding::compile("a/:n/::rest", text("n", ArgType::Int).arg("rest", ArgType::String), ()).unwrap();
        assert_eq!(binding.pattern(), "/a/:n/::rest");

        let index = Binding::compile("", Signature::new(ReturnKind::Unit), ()).unwrap();
        assert_eq!(index.pattern(), "/");
    }
}
