//! Cancellation context for remote calls
//!
//! Every remote call made by the core goes through [`CheckContext::remote`],
//! which races the call against the invocation's cancellation token. When the
//! token fires, the in-flight call is dropped and a `Cancelled` error is
//! returned instead, so callers can abort the remaining steps.

use crate::error::{Result, ReviewGateError};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Cancellation scope shared by every step of one invocation
#[derive(Debug, Clone, Default)]
pub struct CheckContext {
    cancel: CancellationToken,
}

impl CheckContext {
    /// Create a context driven by the given token
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// Create a context that cancels itself after `timeout`
    ///
    /// Must be called from within a tokio runtime.
    pub fn with_timeout(timeout: Duration) -> Self {
        let cancel = CancellationToken::new();
        let timer = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(timeout) => {
                    log::warn!("Deadline of {:?} reached, cancelling", timeout);
                    timer.cancel();
                }
                _ = timer.cancelled() => {}
            }
        });
        Self { cancel }
    }

    /// The underlying token
    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Whether the invocation has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Run a remote call, mapping its error and honouring cancellation
    ///
    /// # Arguments
    ///
    /// * `operation` - Name of the platform operation, used in errors and logs
    /// * `target` - `owner/repo#number` or `owner/repo` the call is about
    /// * `call` - The remote call
    pub async fn remote<T, F>(&self, operation: &'static str, target: &str, call: F) -> Result<T>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        let cancelled = || ReviewGateError::Cancelled {
            target: target.to_string(),
            operation,
        };

        if self.cancel.is_cancelled() {
            return Err(cancelled());
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(cancelled()),
            result = call => result.map_err(|source| ReviewGateError::RemoteApi {
                operation,
                target: target.to_string(),
                source,
            }),
        }
    }
}
