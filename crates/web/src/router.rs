//! The route table of a server, and the ways to fill it.
//!
//! Routes are tried in registration order and the first match wins, so register specific
//! patterns before general ones:
//!
//! ```
//! use uniweb::{Router, handler_fn};
//!
//! async fn index() -> &'static str {
//!     "index"
//! }
//!
//! async fn number(number: i32) -> String {
//!     format!("number: {number}")
//! }
//!
//! let router = Router::builder()
//!     .route("/", handler_fn(index))
//!     .route("samplepage/number/:number/", handler_fn(number).named(["number"]))
//!     .build();
//!
//! assert!(router.at("/samplepage/number/42/").is_some());
//! assert!(router.at("/samplepage/number/abc").is_none());
//! ```

use crate::handler::{BoxedHandler, RouteHandler};
use crate::static_files::{self, StaticRouteSetting};
use std::fmt;
use std::sync::Arc;
use tracing::warn;
use uniweb_route::{Binding, Matched, ParseError, RouteTable};

/// An ordered set of route bindings.
#[derive(Default)]
pub struct Router {
    table: RouteTable<BoxedHandler>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Compiles `pattern` against the handler's signature and appends the binding.
    ///
    /// A pattern that doesn't fit the handler is rejected and the router is left unchanged.
    pub fn register<H: RouteHandler + 'static>(&mut self, pattern: &str, handler: H) -> Result<(), ParseError> {
        self.register_boxed(pattern, Arc::new(handler))
    }

    pub fn register_boxed(&mut self, pattern: &str, handler: BoxedHandler) -> Result<(), ParseError> {
        let signature = handler.signature().clone();
        self.table.register(pattern, signature, handler)
    }

    /// Appends a binding that was assembled without a pattern.
    pub fn add_binding(&mut self, binding: Binding<BoxedHandler>) {
        self.table.push(binding);
    }

    /// Finds the binding for a request path, with the values captured from it.
    pub fn at(&self, path: &str) -> Option<Matched<'_, BoxedHandler>> {
        self.table.find_path(path)
    }

    pub fn table(&self) -> &RouteTable<BoxedHandler> {
        &self.table
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.table.iter().map(Binding::pattern)).finish()
    }
}

/// One route of a [`Controller`]: a pattern and the handler it dispatches to.
#[derive(Debug)]
pub struct Route {
    pattern: String,
    handler: BoxedHandler,
}

impl Route {
    pub fn new<H: RouteHandler + 'static>(pattern: impl Into<String>, handler: H) -> Self {
        Self { pattern: pattern.into(), handler: Arc::new(handler) }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn handler(&self) -> &BoxedHandler {
        &self.handler
    }
}

/// A group of routes sharing state.
///
/// Handlers typically capture a clone of `self` to reach that state.
pub trait Controller: Send + Sync + 'static {
    fn routes(self: Arc<Self>) -> Vec<Route>;
}

/// Builds a [`Router`], logging and skipping routes that fail to register.
#[derive(Debug, Default)]
pub struct RouterBuilder {
    router: Router,
}

impl RouterBuilder {
    fn new() -> Self {
        Self::default()
    }

    pub fn route<H: RouteHandler + 'static>(self, pattern: &str, handler: H) -> Self {
        self.boxed_route(pattern, Arc::new(handler))
    }

    fn boxed_route(mut self, pattern: &str, handler: BoxedHandler) -> Self {
        if let Err(e) = self.router.register_boxed(pattern, handler) {
            warn!(pattern, cause = %e, "skip route");
        }
        self
    }

    /// Registers every route of `controller`, in order.
    pub fn controller<C: Controller>(self, controller: Arc<C>) -> Self {
        controller.routes().into_iter().fold(self, |builder, route| builder.boxed_route(&route.pattern, route.handler))
    }

    /// Serves files under `setting.root_dir` below `setting.url_root`.
    pub fn static_files(mut self, setting: StaticRouteSetting) -> Self {
        match static_files::binding(setting) {
            Ok(binding) => self.router.add_binding(binding),
            Err(e) => warn!(cause = %e, "skip static route"),
        }
        self
    }

    pub fn build(self) -> Router {
        self.router
    }
}

#[cfg(test)]
mod tests {
    use super::{Controller, Route, Router};
    use crate::handler::{handler_fn, sync_handler_fn};
    use crate::request::RequestHandle;
    use std::sync::Arc;
    use uniweb_route::{Arg, ParseError};

    async fn number(number: i32) -> String {
        format!("number: {number}")
    }

    async fn text(text: String) -> String {
        text
    }

    #[test]
    fn test_register() {
        let mut router = Router::new();
        router.register("samplepage/number/:number/", handler_fn(number).named(["number"])).unwrap();

        let err = router.register("samplepage/text/:missing", handler_fn(text).named(["text"])).unwrap_err();
        assert_eq!(err, ParseError::unknown_capture_name("missing"));
        assert_eq!(router.len(), 1);

        let matched = router.at("/samplepage/number/42/").unwrap();
        assert_eq!(matched.binding().pattern(), "/samplepage/number/:number");
        assert_eq!(matched.args().get(0), Some(&Arg::Int(42)));
    }

    #[test]
    fn test_builder_skips_invalid_routes() {
        let router = Router::builder()
            .route("samplepage/path/::path/more", handler_fn(text).named(["path"]))
            .route("samplepage/text/:text", handler_fn(text).named(["text"]))
            .route("samplepage/request/:request", sync_handler_fn(|_request: RequestHandle| ()).named(["request"]))
            .build();

        assert_eq!(router.len(), 1);
        assert!(router.at("/samplepage/text/hello").is_some());
        assert!(router.at("/samplepage/path/a/more").is_none());
    }

    #[test]
    fn test_first_registered_wins() {
        let router = Router::builder()
            .route("samplepage/:text", handler_fn(text).named(["text"]))
            .route("samplepage/:number", handler_fn(number).named(["number"]))
            .build();

        let matched = router.at("/samplepage/42").unwrap();
        assert_eq!(matched.binding().pattern(), "/samplepage/:text");
    }

    struct Sample {
        greeting: String,
    }

    impl Controller for Sample {
        fn routes(self: Arc<Self>) -> Vec<Route> {
            let this = Arc::clone(&self);
            vec![
                Route::new("/", sync_handler_fn(move || this.greeting.clone())),
                Route::new("broken/::rest/tail", handler_fn(text).named(["rest"])),
                Route::new("samplepage/number/:number/", handler_fn(number).named(["number"])),
            ]
        }
    }

    #[test]
    fn test_controller() {
        let router = Router::builder().controller(Arc::new(Sample { greeting: "hello".into() })).build();

        assert_eq!(router.len(), 2);
        assert_eq!(format!("{router:?}"), r#"["/", "/samplepage/number/:number"]"#);
    }
}
