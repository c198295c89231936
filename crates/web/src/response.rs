use crate::body::ResponseBody;
use http::{HeaderMap, HeaderName, HeaderValue, Response, StatusCode};
use mime::Mime;
use parking_lot::Mutex;
use std::sync::Arc;

/// The response side handed to handlers.
///
/// Handlers can set the status code and headers; the body is the handler's return value.
/// All clones share the same state. Once the dispatcher has finalized the response,
/// further changes have no effect.
#[derive(Debug, Clone, Default)]
pub struct ResponseHandle {
    head: Arc<Mutex<ResponseHead>>,
}

#[derive(Debug, Default)]
struct ResponseHead {
    status: StatusCode,
    headers: HeaderMap,
}

impl ResponseHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> StatusCode {
        self.head.lock().status
    }

    pub fn set_status(&self, status: StatusCode) {
        self.head.lock().status = status;
    }

    pub fn insert_header(&self, name: HeaderName, value: HeaderValue) {
        self.head.lock().headers.insert(name, value);
    }

    pub fn append_header(&self, name: HeaderName, value: HeaderValue) {
        self.head.lock().headers.append(name, value);
    }

    pub fn has_header(&self, name: &HeaderName) -> bool {
        self.head.lock().headers.contains_key(name)
    }

    pub fn set_content_type(&self, mime: &Mime) {
        if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
            self.insert_header(http::header::CONTENT_TYPE, value);
        }
    }

    /// Takes the status and headers set so far and attaches `body`.
    pub(crate) fn finalize(&self, body: ResponseBody) -> Response<ResponseBody> {
        let head = std::mem::take(&mut *self.head.lock());

        let mut response = Response::new(body);
        *response.status_mut() = head.status;
        *response.headers_mut() = head.headers;
        response
    }
}
