use crate::config::ServerConfig;
use crate::context::MainContext;
use crate::dispatch::Dispatcher;
use crate::router::Router;
use crate::static_files;
use http::Request;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

#[derive(Debug, Default)]
pub struct ServerBuilder {
    router: Option<Router>,
    address: Option<String>,
    config: ServerConfig,
}

impl ServerBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Overrides the address from the config.
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn router(mut self, router: Router) -> Self {
        self.router = Some(router);
        self
    }

    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Static routes from the config are appended after the router's own routes.
    pub fn build(self) -> Result<Server, ServerBuildError> {
        let mut router = self.router.ok_or(ServerBuildError::MissingRouter)?;
        let address = self.address.unwrap_or(self.config.address);

        let resolved = address
            .to_socket_addrs()
            .map_err(|e| ServerBuildError::invalid_address(&address, e))?
            .collect::<Vec<_>>();
        if resolved.is_empty() {
            return Err(ServerBuildError::invalid_address(&address, "resolved to nothing"));
        }

        for setting in self.config.static_routes {
            match static_files::binding(setting) {
                Ok(binding) => router.add_binding(binding),
                Err(e) => warn!(cause = %e, "skip static route"),
            }
        }

        Ok(Server { router: Arc::new(router), address: resolved })
    }
}

#[derive(Debug)]
pub struct Server {
    router: Arc<Router>,
    address: Vec<SocketAddr>,
}

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("router must be set")]
    MissingRouter,
    #[error("invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },
}

impl ServerBuildError {
    fn invalid_address<S: ToString>(address: &str, reason: S) -> Self {
        Self::InvalidAddress { address: address.to_string(), reason: reason.to_string() }
    }
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("bind {address:?} error: {source}")]
    Bind {
        address: Vec<SocketAddr>,
        #[source]
        source: io::Error,
    },
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub fn address(&self) -> &[SocketAddr] {
        &self.address
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Binds the configured address and serves until the process ends.
    pub async fn start(self) -> Result<(), ServerError> {
        self.start_with_shutdown(std::future::pending()).await
    }

    /// Binds the configured address and serves until `shutdown` resolves.
    pub async fn start_with_shutdown<S>(self, shutdown: S) -> Result<(), ServerError>
    where
        S: Future<Output = ()>,
    {
        info!(address = ?self.address, "start listening");
        let listener = match TcpListener::bind(self.address.as_slice()).await {
            Ok(listener) => listener,
            Err(source) => {
                error!(address = ?self.address, cause = %source, "bind server error");
                return Err(ServerError::Bind { address: self.address, source });
            }
        };

        self.serve(listener, shutdown).await;
        Ok(())
    }

    /// Accepts connections on `listener` until `shutdown` resolves.
    ///
    /// Each connection is served on its own task. Connections already accepted when the
    /// shutdown arrives run to completion.
    pub async fn serve<S>(self, listener: TcpListener, shutdown: S)
    where
        S: Future<Output = ()>,
    {
        let dispatcher = Arc::new(Dispatcher::new(self.router, MainContext::spawn()));
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((tcp_stream, remote_addr)) => {
                            tokio::spawn(serve_connection(Arc::clone(&dispatcher), tcp_stream, remote_addr));
                        }
                        Err(e) => warn!(cause = %e, "failed to accept"),
                    }
                }
                () = &mut shutdown => {
                    info!("shutdown signal received, stop accepting");
                    break;
                }
            }
        }
    }
}

async fn serve_connection(dispatcher: Arc<Dispatcher>, tcp_stream: TcpStream, remote_addr: SocketAddr) {
    let io = TokioIo::new(tcp_stream);
    let service = service_fn(move |req: Request<Incoming>| {
        let dispatcher = Arc::clone(&dispatcher);
        async move { Ok::<_, Infallible>(dispatcher.handle_request(req).await) }
    });

    match http1::Builder::new().serve_connection(io, service).await {
        Ok(()) => debug!(%remote_addr, "finished process, connection shutdown"),
        Err(e) => error!(%remote_addr, cause = %e, "service has error, connection shutdown"),
    }
}
