//! Routing of handler failures to a single error handler.
//!
//! Request handlers built on top of a [`TodoStore`](crate::TodoStore) are
//! async and fallible. Wrapping them with [`catch_error`] forwards every
//! failure to one [`ErrorSink`] instead of leaving each handler to deal with
//! it.

use std::future::Future;

use tokio::sync::mpsc;

use crate::{StoreError, StoreResult};

/// Receives failures from wrapped handlers.
pub trait ErrorSink: Send + Sync {
    /// Takes ownership of a failure.
    fn report(&self, error: StoreError);
}

impl<F> ErrorSink for F
where
    F: Fn(StoreError) + Send + Sync,
{
    fn report(&self, error: StoreError) {
        self(error)
    }
}

/// Error sink that forwards failures to a channel drained by one central
/// handler.
#[derive(Debug, Clone)]
pub struct ErrorChannel {
    sender: mpsc::UnboundedSender<StoreError>,
}

impl ErrorChannel {
    /// Creates a channel and returns the receiving end for the central
    /// handler.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<StoreError>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl ErrorSink for ErrorChannel {
    fn report(&self, error: StoreError) {
        if let Err(mpsc::error::SendError(error)) = self.sender.send(error) {
            tracing::error!(%error, "Error handler is gone, dropping error");
        }
    }
}

/// A handler whose failures are routed to an [`ErrorSink`].
#[derive(Debug, Clone)]
pub struct CatchError<H> {
    handler: H,
}

/// Wraps an async handler so its failures reach the sink passed to
/// [`CatchError::call`].
pub fn catch_error<H>(handler: H) -> CatchError<H> {
    CatchError { handler }
}

impl<H> CatchError<H> {
    /// Runs the handler. Returns its value on success; on failure hands the
    /// error to `next` unchanged and returns `None`.
    pub async fn call<Req, T, Fut>(&self, request: Req, next: &dyn ErrorSink) -> Option<T>
    where
        H: Fn(Req) -> Fut,
        Fut: Future<Output = StoreResult<T>>,
    {
        match (self.handler)(request).await {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::debug!(%error, "Handler failed");
                next.report(error);
                None
            }
        }
    }
}
