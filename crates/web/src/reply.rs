//! Converting handler results into response payloads.
//!
//! Every handler return type implements [`IntoReply`], which declares the
//! [`ReturnKind`] reported in the handler's signature and turns the value into a [`Reply`].
//! The dispatcher then writes the reply onto the response.

use crate::BoxError;
use crate::body::ResponseBody;
use crate::response::ResponseHandle;
use bytes::Bytes;
use http::Response;
use serde::Serialize;
use uniweb_route::ReturnKind;

/// A serialized handler result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Empty,
    Bytes(Bytes),
    Text(String),
    /// Serialized JSON.
    Json(Bytes),
}

impl Reply {
    /// Writes the payload onto `response` and finalizes it.
    ///
    /// JSON payloads get `application/json` unless the handler already chose a content type.
    pub(crate) fn into_response(self, response: &ResponseHandle) -> Response<ResponseBody> {
        let body = match self {
            Reply::Empty => ResponseBody::empty(),
            Reply::Bytes(bytes) => ResponseBody::from(bytes),
            Reply::Text(text) => ResponseBody::from(text),
            Reply::Json(bytes) => {
                if !response.has_header(&http::header::CONTENT_TYPE) {
                    response.set_content_type(&mime::APPLICATION_JSON);
                }
                ResponseBody::from(bytes)
            }
        };
        response.finalize(body)
    }
}

/// A structured value written back as JSON.
///
/// # Example
/// ```
/// # use serde::Serialize;
/// # use uniweb::Json;
/// #[derive(Serialize)]
/// struct Status {
///     running: bool,
/// }
///
/// fn status() -> Json<Status> {
///     Json(Status { running: true })
/// }
/// # let _ = status();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

/// A type a handler can return.
pub trait IntoReply {
    fn return_kind() -> ReturnKind;

    fn into_reply(self) -> Result<Reply, BoxError>;
}

impl IntoReply for () {
    fn return_kind() -> ReturnKind {
        ReturnKind::Unit
    }

    fn into_reply(self) -> Result<Reply, BoxError> {
        Ok(Reply::Empty)
    }
}

impl IntoReply for Bytes {
    fn return_kind() -> ReturnKind {
        ReturnKind::Bytes
    }

    fn into_reply(self) -> Result<Reply, BoxError> {
        Ok(Reply::Bytes(self))
    }
}

impl IntoReply for Vec<u8> {
    fn return_kind() -> ReturnKind {
        ReturnKind::Bytes
    }

    fn into_reply(self) -> Result<Reply, BoxError> {
        Ok(Reply::Bytes(Bytes::from(self)))
    }
}

impl IntoReply for &'static [u8] {
    fn return_kind() -> ReturnKind {
        ReturnKind::Bytes
    }

    fn into_reply(self) -> Result<Reply, BoxError> {
        Ok(Reply::Bytes(Bytes::from_static(self)))
    }
}

impl IntoReply for String {
    fn return_kind() -> ReturnKind {
        ReturnKind::Text
    }

    fn into_reply(self) -> Result<Reply, BoxError> {
        Ok(Reply::Text(self))
    }
}

impl IntoReply for &'static str {
    fn return_kind() -> ReturnKind {
        ReturnKind::Text
    }

    fn into_reply(self) -> Result<Reply, BoxError> {
        Ok(Reply::Text(self.to_string()))
    }
}

impl<T: Serialize> IntoReply for Json<T> {
    fn return_kind() -> ReturnKind {
        ReturnKind::Json
    }

    fn into_reply(self) -> Result<Reply, BoxError> {
        let bytes = serde_json::to_vec(&self.0)?;
        Ok(Reply::Json(Bytes::from(bytes)))
    }
}

/// An `Err` fails the dispatch and is answered with `500`.
impl<T, E> IntoReply for Result<T, E>
where
    T: IntoReply,
    E: Into<BoxError>,
{
    fn return_kind() -> ReturnKind {
        T::return_kind()
    }

    fn into_reply(self) -> Result<Reply, BoxError> {
        self.map_err(Into::<BoxError>::into)?.into_reply()
    }
}

/// `None` leaves the body empty.
impl<T: IntoReply> IntoReply for Option<T> {
    fn return_kind() -> ReturnKind {
        T::return_kind()
    }

    fn into_reply(self) -> Result<Reply, BoxError> {
        match self {
            Some(t) => t.into_reply(),
            None => Ok(Reply::Empty),
        }
    }
}
