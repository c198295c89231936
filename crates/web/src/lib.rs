//! An embeddable async web server with ordered, typed path routing.
//!
//! Handlers are plain functions. Their argument types decide what they receive: path
//! captures (`String`, `i32`, `f32`, `f64`), the [`RequestHandle`] or the [`ResponseHandle`].
//! Their return type decides what is written back. Every handler body runs on one
//! [`MainContext`], so handlers never run concurrently with each other.
//!
//! ```no_run
//! use uniweb::{Router, Server, handler_fn};
//!
//! async fn number(number: i32) -> String {
//!     format!("number: {number}")
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let router = Router::builder().route("samplepage/number/:number/", handler_fn(number).named(["number"])).build();
//!
//!     let server = Server::builder().router(router).address("127.0.0.1:8080").build().unwrap();
//!     server.start().await.unwrap();
//! }
//! ```

mod body;
mod config;
mod context;
mod dispatch;
mod fn_trait;
mod handler;
mod reply;
mod request;
mod response;
mod server;
mod static_files;

pub mod extract;
pub mod router;

pub use uniweb_route as route;
pub use uniweb_route::{ArgType, ParseError, ReturnKind, Signature};

pub use body::{OptionReqBody, ReqBody, RequestError, ResponseBody};
pub use config::{DEFAULT_ADDRESS, ServerConfig};
pub use context::{ContextError, MainContext, MainLoop};
pub use dispatch::{DispatchError, Dispatcher};
pub use fn_trait::{FnTrait, SyncFnTrait};
pub use handler::{BoxedHandler, FnHandler, RouteHandler, SyncFnHandler, handler_fn, sync_handler_fn};
pub use reply::{IntoReply, Json, Reply};
pub use request::RequestHandle;
pub use response::ResponseHandle;
pub use router::{Controller, Route, Router, RouterBuilder};
pub use server::{Server, ServerBuildError, ServerBuilder, ServerError};
pub use static_files::StaticRouteSetting;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
