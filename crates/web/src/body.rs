use crate::BoxError;
use bytes::Bytes;
use http_body::Body as HttpBody;
use http_body::{Frame, SizeHint};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty};
use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::Mutex;

/// The type-erased request body handed to handlers.
pub type ReqBody = UnsyncBoxBody<Bytes, BoxError>;

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("body has been consumed")]
    BodyConsumed,

    #[error("invalid body: {reason}")]
    InvalidBody { reason: String },

    #[error("request has no query string")]
    MissingQuery,

    #[error("invalid query string: {reason}")]
    InvalidQuery { reason: String },
}

impl RequestError {
    pub fn invalid_body<S: ToString>(str: S) -> Self {
        Self::InvalidBody { reason: str.to_string() }
    }

    pub fn invalid_query<S: ToString>(str: S) -> Self {
        Self::InvalidQuery { reason: str.to_string() }
    }
}

/// A request body that can be shared between clones but consumed only once.
#[derive(Clone)]
pub struct OptionReqBody {
    inner: Arc<Mutex<Option<ReqBody>>>,
}

impl From<ReqBody> for OptionReqBody {
    fn from(body: ReqBody) -> Self {
        OptionReqBody { inner: Arc::new(Mutex::new(Some(body))) }
    }
}

impl fmt::Debug for OptionReqBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionReqBody").finish_non_exhaustive()
    }
}

impl OptionReqBody {
    pub fn new<B>(body: B) -> Self
    where
        B: HttpBody<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        Self::from(UnsyncBoxBody::new(body.map_err(Into::into)))
    }

    pub fn empty() -> Self {
        Self::new(Empty::<Bytes>::new())
    }

    pub async fn can_consume(&self) -> bool {
        let guard = self.inner.lock().await;
        guard.is_some()
    }

    pub async fn apply<T, F, Fut>(&self, f: F) -> Result<T, RequestError>
    where
        F: FnOnce(ReqBody) -> Fut,
        Fut: Future<Output = Result<T, RequestError>>,
    {
        let req_body = {
            let mut guard = self.inner.lock().await;
            guard.take().ok_or(RequestError::BodyConsumed)?
        };

        f(req_body).await
    }

    /// Reads the whole body.
    pub async fn collect(&self) -> Result<Bytes, RequestError> {
        self.apply(|body| async move {
            body.collect().await.map(|collected| collected.to_bytes()).map_err(RequestError::invalid_body)
        })
        .await
    }
}

/// The body written back for a dispatched request.
///
/// Dispatch always produces the whole payload at once, so the body is a single frame.
#[derive(Debug, Default)]
pub struct ResponseBody {
    inner: Option<Bytes>,
}

impl ResponseBody {
    pub fn empty() -> Self {
        Self { inner: None }
    }

    pub fn once(bytes: Bytes) -> Self {
        if bytes.is_empty() { Self::empty() } else { Self { inner: Some(bytes) } }
    }

    /// The payload that hasn't been polled yet.
    pub fn bytes(&self) -> Option<&Bytes> {
        self.inner.as_ref()
    }
}

impl From<Bytes> for ResponseBody {
    fn from(value: Bytes) -> Self {
        Self::once(value)
    }
}

impl From<Vec<u8>> for ResponseBody {
    fn from(value: Vec<u8>) -> Self {
        Self::once(Bytes::from(value))
    }
}

impl From<String> for ResponseBody {
    fn from(value: String) -> Self {
        Self::once(Bytes::from(value))
    }
}

impl From<&'static str> for ResponseBody {
    fn from(value: &'static str) -> Self {
        Self::once(Bytes::from_static(value.as_bytes()))
    }
}

impl From<()> for ResponseBody {
    fn from((): ()) -> Self {
        Self::empty()
    }
}

impl HttpBody for ResponseBody {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        Poll::Ready(self.get_mut().inner.take().map(|bytes| Ok(Frame::data(bytes))))
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_none()
    }

    fn size_hint(&self) -> SizeHint {
        match &self.inner {
            None => SizeHint::with_exact(0),
            Some(bytes) => SizeHint::with_exact(bytes.len() as u64),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::body::{OptionReqBody, RequestError, ResponseBody};
    use bytes::Bytes;
    use http_body::Body as HttpBody;
    use http_body_util::{BodyExt, Full};

    fn check_send<T: Send>() {}
    fn check_sync<T: Sync>() {}

    #[test]
    fn is_send() {
        check_send::<ResponseBody>();
        check_send::<OptionReqBody>();
        check_sync::<OptionReqBody>();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_string_body() {
        let s = "Hello world".to_string();
        let len = s.len() as u64;

        let mut body = ResponseBody::from(s);

        assert_eq!(body.size_hint().exact(), Some(len));
        assert!(!body.is_end_stream());

        let bytes = body.frame().await.unwrap().unwrap().into_data().unwrap();
        assert_eq!(bytes, Bytes::from("Hello world"));

        assert!(body.is_end_stream());
        assert!(body.frame().await.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_empty_body() {
        let mut body = ResponseBody::from("");

        assert!(body.is_end_stream());
        assert_eq!(body.size_hint().exact(), Some(0));

        assert!(body.frame().await.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_request_body_is_consumed_once() {
        let body = OptionReqBody::new(Full::new(Bytes::from_static(b"name=hello")));
        let cloned = body.clone();

        assert!(cloned.can_consume().await);
        assert_eq!(body.collect().await.unwrap(), Bytes::from_static(b"name=hello"));

        assert!(!cloned.can_consume().await);
        assert!(matches!(cloned.collect().await, Err(RequestError::BodyConsumed)));
    }
}
