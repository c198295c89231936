//! The sample pages: typed captures, a trailing capture, a form, a query echo and a download.
//!
//! Run with `cargo run --example dynamic_pages [config.json]`. The optional config file can
//! change the address and add static routes, e.g.
//! `{ "static_routes": [{ "url_root": "/static", "root_dir": "www" }] }`.

use http::{HeaderValue, Method, StatusCode};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;
use uniweb::{
    Controller, RequestHandle, ResponseHandle, Route, Router, Server, ServerConfig, handler_fn, sync_handler_fn,
};

const SAMPLE_PAGES: [&str; 6] = [
    "/samplepage/number/1",
    "/samplepage/text/samplepageText",
    "/samplepage/path/foo/bar",
    "/samplepage/form",
    "/samplepage/query?text=Hello%20world!&id=1",
    "/samplepage/filedownload",
];

#[derive(Debug, Default)]
struct DynamicPages {
    visits: AtomicU64,
}

impl DynamicPages {
    fn index(&self) -> String {
        let visits = self.visits.fetch_add(1, Ordering::Relaxed) + 1;
        let links = SAMPLE_PAGES.iter().map(|page| format!(r#"<p><a href="{page}"> {page} </a></p>"#)).collect::<String>();
        format!("<html><body><div>{links}</div><p>visits: {visits}</p></body></html>")
    }
}

async fn number(number: i32) -> String {
    info!(number, "number page");
    format!("number: {number}")
}

async fn text(text: String) -> String {
    info!(%text, "text page");
    format!("text: {text}")
}

async fn path(path: String) -> String {
    info!(%path, "path page");
    format!("path: {path}")
}

async fn form(request: RequestHandle) -> String {
    info!(method = %request.method(), content_type = ?request.content_type(), "form page");

    let post_data = if request.method() == Method::POST { request.text().await.unwrap_or_default() } else { String::new() };

    format!(
        r#"<html><body>
<div>Post data: {post_data}</div>
<form method="post">
<input type="hidden" name="hidden" value="hidden_text"/>
<input type="text" name="text"/>
<input type="submit" value="send"/>
</form>
</body></html>"#
    )
}

async fn query(request: RequestHandle, response: ResponseHandle) -> String {
    let pairs = match request.query_pairs() {
        Ok(pairs) => pairs,
        Err(e) => {
            response.set_status(StatusCode::BAD_REQUEST);
            return e.to_string();
        }
    };

    let rows = pairs.iter().map(|(key, value)| format!("<p>key: {key}, value: {value}</p>")).collect::<String>();
    format!("<html><body>{rows}</body></html>")
}

fn file_download(response: ResponseHandle) -> &'static [u8] {
    response.append_header(
        http::header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"SampleFile.txt\""),
    );
    b"This is sample file."
}

impl Controller for DynamicPages {
    fn routes(self: Arc<Self>) -> Vec<Route> {
        vec![
            Route::new("/", sync_handler_fn(move || self.index())),
            Route::new("samplepage/number/:number/", handler_fn(number).named(["number"])),
            Route::new("samplepage/text/:text", handler_fn(text).named(["text"])),
            Route::new("samplepage/path/::path", handler_fn(path).named(["path"])),
            Route::new("samplepage/form", handler_fn(form)),
            Route::new("samplepage/query", handler_fn(query)),
            Route::new("samplepage/filedownload", sync_handler_fn(file_download)),
        ]
    }
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config = match std::env::args().nth(1) {
        Some(file) => {
            let json = std::fs::read_to_string(&file).expect("read config file failed");
            ServerConfig::from_json_str(&json).expect("parse config file failed")
        }
        None => ServerConfig::default(),
    };

    let router = Router::builder().controller(Arc::new(DynamicPages::default())).build();

    let server = Server::builder().router(router).config(config).build().expect("build server failed");
    if let Err(e) = server.start_with_shutdown(async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
    {
        tracing::error!(cause = %e, "server stopped");
    }
}
