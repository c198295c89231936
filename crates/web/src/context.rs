//! The single execution context handler bodies run on.
//!
//! Requests arrive on many connection tasks, but every handler invocation is posted to one
//! queue drained by one task. A job runs to completion, including its awaits, before the
//! next job starts, so handler bodies never interleave. Everything else (reading the request,
//! writing the response) stays on the connection task.

use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

type Job = Pin<Box<dyn Future<Output = ()> + Send>>;

#[derive(Error, Debug)]
pub enum ContextError {
    #[error("main context is closed")]
    Closed,

    #[error("job panicked: {reason}")]
    Panicked { reason: String },
}

impl ContextError {
    fn panicked(payload: Box<dyn Any + Send>) -> Self {
        let reason = match payload.downcast::<String>() {
            Ok(reason) => *reason,
            Err(payload) => payload.downcast_ref::<&str>().map_or("unknown", |reason| *reason).to_string(),
        };
        Self::Panicked { reason }
    }
}

impl<T> From<mpsc::error::SendError<T>> for ContextError {
    fn from(_: mpsc::error::SendError<T>) -> Self {
        Self::Closed
    }
}

impl From<oneshot::error::RecvError> for ContextError {
    fn from(_: oneshot::error::RecvError) -> Self {
        Self::Closed
    }
}

/// A handle for posting jobs onto the main context.
#[derive(Debug, Clone)]
pub struct MainContext {
    sender: mpsc::UnboundedSender<Job>,
}

/// The consumer side of a [`MainContext`]; it must be driven for posted jobs to run.
#[derive(Debug)]
pub struct MainLoop {
    receiver: mpsc::UnboundedReceiver<Job>,
}

impl MainContext {
    pub fn new() -> (Self, MainLoop) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, MainLoop { receiver })
    }

    /// Creates a context whose loop runs on a spawned tokio task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn() -> Self {
        let (context, main_loop) = Self::new();
        tokio::spawn(main_loop.run());
        context
    }

    /// Runs `future` on the main context and waits for its output.
    ///
    /// A panic inside `future` is caught and returned as [`ContextError::Panicked`]; the
    /// context keeps serving later jobs.
    pub async fn run<F, T>(&self, future: F) -> Result<T, ContextError>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let job = async move {
            let result = AssertUnwindSafe(future).catch_unwind().await.map_err(ContextError::panicked);
            // the caller may have gone away, nothing to report then
            let _ = tx.send(result);
        };

        self.sender.send(Box::pin(job))?;
        rx.await?
    }
}

impl MainLoop {
    /// Drains posted jobs one at a time until every [`MainContext`] handle is dropped.
    pub async fn run(mut self) {
        while let Some(job) = self.receiver.recv().await {
            job.await;
        }
        debug!("main context closed");
    }
}
