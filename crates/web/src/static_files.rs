//! Serving files from a directory below a URL prefix.

use crate::BoxError;
use crate::extract::{Arguments, FromArgs};
use crate::handler::{BoxedHandler, RouteHandler};
use crate::reply::Reply;
use crate::request::RequestHandle;
use crate::response::ResponseHandle;
use async_trait::async_trait;
use bytes::Bytes;
use http::{Method, StatusCode};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;
use uniweb_route::{ArgType, Binding, DEFAULT_PAGE, Param, ParseError, ReturnKind, Signature};

const INDEX_HTML: &str = "index.html";

/// Where a static route is mounted and which directory it serves.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StaticRouteSetting {
    pub url_root: String,
    pub root_dir: PathBuf,
    /// Serve the root `index.html` for files that don't exist, as single page apps expect.
    pub fallback_to_index_html: bool,
}

impl Default for StaticRouteSetting {
    fn default() -> Self {
        Self { url_root: DEFAULT_PAGE.to_string(), root_dir: PathBuf::new(), fallback_to_index_html: false }
    }
}

impl StaticRouteSetting {
    pub fn new(url_root: impl Into<String>, root_dir: impl Into<PathBuf>) -> Self {
        Self { url_root: url_root.into(), root_dir: root_dir.into(), ..Self::default() }
    }

    #[must_use]
    pub fn fallback_to_index_html(mut self, fallback: bool) -> Self {
        self.fallback_to_index_html = fallback;
        self
    }
}

/// Builds the binding for `setting`: one literal per segment of the URL root, then a
/// capture that takes the rest of the path.
pub(crate) fn binding(setting: StaticRouteSetting) -> Result<Binding<BoxedHandler>, ParseError> {
    let mut params =
        setting.url_root.split('/').filter(|segment| !segment.trim().is_empty()).map(Param::literal).collect::<Vec<_>>();
    params.push(Param::rest("path", 0));

    let handler = StaticFiles::new(setting);
    let signature = handler.signature.clone();
    let handler: BoxedHandler = Arc::new(handler);
    Binding::new(params, signature, handler)
}

#[derive(Debug)]
struct StaticFiles {
    root_dir: PathBuf,
    fallback_to_index_html: bool,
    signature: Signature,
}

impl StaticFiles {
    fn new(setting: StaticRouteSetting) -> Self {
        let signature = Signature::new(ReturnKind::Bytes)
            .arg("path", ArgType::String)
            .arg("request", ArgType::Request)
            .arg("response", ArgType::Response);
        Self { root_dir: setting.root_dir, fallback_to_index_html: setting.fallback_to_index_html, signature }
    }

    /// Maps the captured path to a file under the root directory.
    ///
    /// Returns `None` when the path tries to leave the root directory.
    fn file_path(&self, path: &str) -> Option<PathBuf> {
        let mut file = self.root_dir.clone();
        for component in path.split('/').filter(|component| !component.is_empty() && *component != ".") {
            if component == ".." {
                return None;
            }
            file.push(component);
        }

        if path.is_empty() || path.ends_with('/') {
            file.push(INDEX_HTML);
        }
        Some(file)
    }

    async fn send_file(&self, path: &str, response: &ResponseHandle) -> Reply {
        let Some(mut file) = self.file_path(path) else {
            response.set_status(StatusCode::NOT_FOUND);
            return Reply::Empty;
        };

        if self.fallback_to_index_html && !is_file(&file).await {
            file = self.root_dir.join(INDEX_HTML);
        }

        if !is_file(&file).await {
            response.set_status(StatusCode::NOT_FOUND);
            return Reply::Empty;
        }

        if file.extension().is_some_and(|extension| extension.eq_ignore_ascii_case("json")) {
            response.set_content_type(&mime::APPLICATION_JSON);
        }

        match tokio::fs::read(&file).await {
            Ok(contents) => Reply::Bytes(Bytes::from(contents)),
            Err(e) => {
                warn!(file = %file.display(), cause = %e, "read static file error");
                Reply::Empty
            }
        }
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path).await.is_ok_and(|metadata| metadata.is_file())
}

#[async_trait]
impl RouteHandler for StaticFiles {
    fn signature(&self) -> &Signature {
        &self.signature
    }

    async fn invoke(&self, args: Arguments) -> Result<Reply, BoxError> {
        let (path, request, response) = <(String, RequestHandle, ResponseHandle)>::from_args(args)?;

        if request.method() != Method::GET {
            response.set_status(StatusCode::METHOD_NOT_ALLOWED);
            return Ok(Reply::Empty);
        }

        Ok(self.send_file(&path, &response).await)
    }
}
