//! Per-request execution context
//!
//! Carries the caller's cancellation token and deadline down the chain, and the queue of work
//! that may only run once the request has been charged.

use crate::utils::error::{DispatchError, Result};
use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Execution context of one request.
///
/// Clones share the same cancellation token and deferred queue.
#[derive(Clone)]
pub struct RequestContext {
    request_id: String,
    cancel: CancellationToken,
    deadline: Option<Instant>,
    deferred: Arc<Mutex<Vec<BoxFuture<'static, ()>>>>,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            cancel: CancellationToken::new(),
            deadline: None,
            deferred: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("request_id", &self.request_id)
            .field("cancelled", &self.cancel.is_cancelled())
            .field("deadline", &self.deadline)
            .field("deferred", &self.deferred.lock().len())
            .finish()
    }
}

impl RequestContext {
    /// Create a context without deadline
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    /// Abort in-flight calls once `timeout` has elapsed from now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Use a caller-owned cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Fail fast if the request is already cancelled or past its deadline
    pub fn check(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(DispatchError::Canceled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(DispatchError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Drive `fut` until it completes, the token is cancelled, or the deadline passes.
    ///
    /// On cancellation the future is dropped, which aborts an in-flight network call.
    pub async fn run<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.check()?;

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(DispatchError::Canceled),
            _ = deadline => Err(DispatchError::DeadlineExceeded),
            res = fut => res,
        }
    }

    /// Queue work that must only happen once the request has been charged
    pub fn defer_until_charged<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.deferred.lock().push(Box::pin(fut));
    }

    /// Run queued work in registration order. Not subject to cancellation: the charge it
    /// depends on has already been committed.
    pub async fn run_deferred(&self) -> usize {
        let pending: Vec<_> = std::mem::take(&mut *self.deferred.lock());
        let count = pending.len();
        for task in pending {
            task.await;
        }
        count
    }

    /// Drop queued work without running it
    pub fn discard_deferred(&self) -> usize {
        let mut pending = self.deferred.lock();
        let count = pending.len();
        pending.clear();
        count
    }

    pub fn pending_deferred(&self) -> usize {
        self.deferred.lock().len()
    }
}
