//! Turning a request into a response: match, bind, invoke, write.
//!
//! A request that matches no route gets an empty `404`. Otherwise the request and response
//! handles are injected into the handler's context slots, the handler runs on the
//! [`MainContext`], and its reply is written onto the response. Any failure on the way
//! (an argument that can't be bound, a handler error or panic, a closed context) is logged
//! and answered with an empty `500`. Every path ends with a finalized response.

use crate::BoxError;
use crate::body::{OptionReqBody, ResponseBody};
use crate::context::{ContextError, MainContext};
use crate::extract::{Arguments, Value};
use crate::handler::BoxedHandler;
use crate::reply::Reply;
use crate::request::RequestHandle;
use crate::response::ResponseHandle;
use crate::router::Router;
use bytes::Bytes;
use http::{Request, Response, StatusCode};
use http_body::Body as HttpBody;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};
use uniweb_route::{ArgType, Args, Binding, ReturnKind};

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    Context(#[from] ContextError),

    #[error("handler failed: {0}")]
    Handler(BoxError),
}

/// Dispatches requests against a [`Router`], running handlers on a [`MainContext`].
#[derive(Debug, Clone)]
pub struct Dispatcher {
    router: Arc<Router>,
    context: MainContext,
}

impl Dispatcher {
    pub fn new(router: Arc<Router>, context: MainContext) -> Self {
        Self { router, context }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Dispatches a request received from the network.
    pub async fn handle_request<B>(&self, request: Request<B>) -> Response<ResponseBody>
    where
        B: HttpBody<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        let (parts, body) = request.into_parts();
        let request = RequestHandle::new(parts, OptionReqBody::new(body));
        let path = request.path().to_owned();
        self.handle(&path, request, ResponseHandle::new()).await
    }

    /// Dispatches `path` and returns the finalized response.
    pub async fn handle(&self, path: &str, request: RequestHandle, response: ResponseHandle) -> Response<ResponseBody> {
        let Some(matched) = self.router.at(path) else {
            debug!(path, "no route matched");
            return status_only(StatusCode::NOT_FOUND);
        };

        let (binding, args) = matched.into_parts();
        debug!(path, route = %binding, "route matched");

        match self.invoke(binding, args, request, response.clone()).await {
            Ok(reply) => reply.into_response(&response),
            Err(e) => {
                error!(path, route = %binding, cause = %e, "dispatch failed");
                status_only(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    async fn invoke(
        &self,
        binding: &Binding<BoxedHandler>,
        args: Args,
        request: RequestHandle,
        response: ResponseHandle,
    ) -> Result<Reply, DispatchError> {
        let mut arguments = Arguments::from(args);
        for (slot, spec) in binding.signature().args().iter().enumerate() {
            match spec.ty() {
                ArgType::Request => arguments.set(slot, Value::Request(request.clone())),
                ArgType::Response => arguments.set(slot, Value::Response(response.clone())),
                _ => {}
            }
        }

        let handler = Arc::clone(binding.handler());
        let reply = self.context.run(async move { handler.invoke(arguments).await }).await?.map_err(DispatchError::Handler)?;

        match binding.signature().returns() {
            ReturnKind::Unit => Ok(Reply::Empty),
            _ => Ok(reply),
        }
    }
}

fn status_only(status: StatusCode) -> Response<ResponseBody> {
    let mut response = Response::new(ResponseBody::empty());
    *response.status_mut() = status;
    response
}

#[cfg(test)]
mod tests {
    use super::Dispatcher;
    use crate::body::ResponseBody;
    use crate::context::MainContext;
    use crate::handler::{handler_fn, sync_handler_fn};
    use crate::reply::Json;
    use crate::request::RequestHandle;
    use crate::response::ResponseHandle;
    use crate::router::Router;
    use bytes::Bytes;
    use http::{HeaderValue, Method, Request, Response, StatusCode};
    use http_body_util::Full;
    use serde::{Deserialize, Serialize};
    use std::io;
    use std::sync::Arc;

    #[derive(Serialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Deserialize)]
    struct Form {
        text: String,
    }

    async fn index() -> &'static str {
        "index"
    }

    async fn number(number: i32) -> String {
        format!("number: {number}")
    }

    async fn path(path: String) -> String {
        format!("path: {path}")
    }

    async fn download(response: ResponseHandle) -> Vec<u8> {
        response.set_status(StatusCode::ACCEPTED);
        response.insert_header(
            http::header::CONTENT_DISPOSITION,
            HeaderValue::from_static("attachment; filename=\"SampleFile.txt\""),
        );
        b"sample file".to_vec()
    }

    async fn form(request: RequestHandle) -> Result<String, io::Error> {
        let form = request.form::<Form>().await.map_err(io::Error::other)?;
        Ok(format!("text: {}", form.text))
    }

    async fn query(request: RequestHandle) -> String {
        let pairs = request.query_pairs().unwrap_or_default();
        pairs.into_iter().map(|(key, value)| format!("{key}={value}")).collect::<Vec<_>>().join(",")
    }

    async fn failing() -> Result<String, io::Error> {
        Err(io::Error::other("boom"))
    }

    async fn panicking() -> String {
        panic!("handler panicked")
    }

    fn dispatcher() -> Dispatcher {
        let router = Router::builder()
            .route("/", handler_fn(index))
            .route("samplepage/number/:number/", handler_fn(number).named(["number"]))
            .route("samplepage/path/::path", handler_fn(path).named(["path"]))
            .route("samplepage/download", handler_fn(download))
            .route("samplepage/form", handler_fn(form))
            .route("samplepage/query", handler_fn(query))
            .route("samplepage/json", sync_handler_fn(|| Json(Point { x: 1, y: 2 })))
            .route("samplepage/unit", sync_handler_fn(|response: ResponseHandle| response.set_status(StatusCode::CREATED)))
            .route("samplepage/failing", handler_fn(failing))
            .route("samplepage/panicking", handler_fn(panicking))
            .build();
        Dispatcher::new(Arc::new(router), MainContext::spawn())
    }

    async fn send(dispatcher: &Dispatcher, method: Method, uri: &str, body: &'static str) -> Response<ResponseBody> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Full::new(Bytes::from_static(body.as_bytes())))
            .unwrap();
        dispatcher.handle_request(request).await
    }

    async fn get(dispatcher: &Dispatcher, uri: &str) -> Response<ResponseBody> {
        send(dispatcher, Method::GET, uri, "").await
    }

    fn body(response: &Response<ResponseBody>) -> &[u8] {
        response.body().bytes().map(|bytes| &bytes[..]).unwrap_or_default()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_index() {
        let dispatcher = dispatcher();

        let response = get(&dispatcher, "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(&response), b"index");
        assert_eq!(body(&get(&dispatcher, "http://localhost:8080/").await), b"index");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_number_with_trailing_slash() {
        let dispatcher = dispatcher();

        assert_eq!(body(&get(&dispatcher, "/samplepage/number/42/").await), b"number: 42");
        assert_eq!(body(&get(&dispatcher, "/samplepage/number/-7").await), b"number: -7");
        assert_eq!(get(&dispatcher, "/samplepage/number/abc/").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_absorb_rest() {
        let dispatcher = dispatcher();

        assert_eq!(body(&get(&dispatcher, "/samplepage/path/foo/bar").await), b"path: foo/bar");
        assert_eq!(body(&get(&dispatcher, "/samplepage/path/foo/").await), b"path: foo//");
        assert_eq!(get(&dispatcher, "/samplepage/path").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_not_found() {
        let dispatcher = dispatcher();

        let response = get(&dispatcher, "/unknown").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body(&response).is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_handler_sets_status_and_headers() {
        let dispatcher = dispatcher();

        let response = get(&dispatcher, "/samplepage/download").await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(response.headers()[http::header::CONTENT_DISPOSITION], "attachment; filename=\"SampleFile.txt\"");
        assert_eq!(body(&response), b"sample file");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_request_injection() {
        let dispatcher = dispatcher();

        let response = send(&dispatcher, Method::POST, "/samplepage/form", "text=hello&hidden=x").await;
        assert_eq!(body(&response), b"text: hello");

        let response = get(&dispatcher, "/samplepage/query?text=Hello%20world!&id=1").await;
        assert_eq!(body(&response), b"text=Hello world!,id=1");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_json_and_unit_results() {
        let dispatcher = dispatcher();

        let response = get(&dispatcher, "/samplepage/json").await;
        assert_eq!(response.headers()[http::header::CONTENT_TYPE], "application/json");
        assert_eq!(body(&response), br#"{"x":1,"y":2}"#);

        let response = get(&dispatcher, "/samplepage/unit").await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(body(&response).is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_failures_become_internal_server_error() {
        let dispatcher = dispatcher();

        let response = get(&dispatcher, "/samplepage/failing").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body(&response).is_empty());

        let response = get(&dispatcher, "/samplepage/panicking").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = send(&dispatcher, Method::POST, "/samplepage/form", "no-text=1").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(body(&get(&dispatcher, "/").await), b"index");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_closed_context_becomes_internal_server_error() {
        let router = Router::builder().route("samplepage/number/:number/", handler_fn(number).named(["number"])).build();
        let (context, main_loop) = MainContext::new();
        drop(main_loop);
        let dispatcher = Dispatcher::new(Arc::new(router), context);

        let response = get(&dispatcher, "/samplepage/number/42/").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body(&response).is_empty());

        assert_eq!(get(&dispatcher, "/unknown").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_handle_with_explicit_handles() {
        let dispatcher = dispatcher();
        let request = Request::builder().uri("/ignored").body(()).unwrap().into_parts().0;
        let request = RequestHandle::new(request, crate::body::OptionReqBody::empty());

        let response = dispatcher.handle("/samplepage/number/10", request, ResponseHandle::new()).await;
        assert_eq!(body(&response), b"number: 10");
    }
}
