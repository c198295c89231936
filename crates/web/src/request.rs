//! The request side handed to handlers.
//!
//! [`RequestHandle`] gives access to the request line, headers, query string and body.
//! It is cheap to clone and can be moved onto the main context together with the rest
//! of a handler's arguments.

use crate::body::{OptionReqBody, RequestError};
use bytes::Bytes;
use http::request::Parts;
use http::{HeaderMap, Method, Uri, Version};
use serde::de::DeserializeOwned;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct RequestHandle {
    head: Arc<Parts>,
    body: OptionReqBody,
}

impl RequestHandle {
    pub fn new(head: Parts, body: OptionReqBody) -> Self {
        Self { head: Arc::new(head), body }
    }

    pub fn method(&self) -> &Method {
        &self.head.method
    }

    pub fn uri(&self) -> &Uri {
        &self.head.uri
    }

    pub fn path(&self) -> &str {
        self.head.uri.path()
    }

    pub fn version(&self) -> Version {
        self.head.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.head.headers
    }

    /// The raw query string, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.head.uri.query()
    }

    /// The declared content type, if it is valid text.
    pub fn content_type(&self) -> Option<&str> {
        self.head.headers.get(http::header::CONTENT_TYPE).and_then(|value| value.to_str().ok())
    }

    /// Decodes the query string into ordered key/value pairs.
    ///
    /// A request without a query string yields no pairs.
    pub fn query_pairs(&self) -> Result<Vec<(String, String)>, RequestError> {
        match self.query() {
            Some(query) => serde_urlencoded::from_str(query).map_err(RequestError::invalid_query),
            None => Ok(vec![]),
        }
    }

    /// Deserializes the query string into `T`.
    pub fn query_as<T: DeserializeOwned>(&self) -> Result<T, RequestError> {
        let query = self.query().ok_or(RequestError::MissingQuery)?;
        serde_qs::from_str::<T>(query).map_err(RequestError::invalid_query)
    }

    /// Reads the whole body. The body can only be read once.
    pub async fn bytes(&self) -> Result<Bytes, RequestError> {
        self.body.collect().await
    }

    pub async fn text(&self) -> Result<String, RequestError> {
        let bytes = self.bytes().await?;
        String::from_utf8(bytes.into()).map_err(RequestError::invalid_body)
    }

    /// Reads an `application/x-www-form-urlencoded` body into `T`.
    pub async fn form<T: DeserializeOwned>(&self) -> Result<T, RequestError> {
        let bytes = self.bytes().await?;
        serde_urlencoded::from_bytes::<T>(&bytes).map_err(RequestError::invalid_body)
    }

    /// Reads a JSON body into `T`.
    pub async fn json<T: DeserializeOwned>(&self) -> Result<T, RequestError> {
        let bytes = self.bytes().await?;
        serde_json::from_slice::<T>(&bytes).map_err(RequestError::invalid_body)
    }

    pub fn body(&self) -> &OptionReqBody {
        &self.body
    }
}
