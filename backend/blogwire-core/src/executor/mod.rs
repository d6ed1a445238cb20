//! Bounded, query-preserving redirect follower.
//!
//! The executor owns redirect control: transports never follow redirects
//! themselves, and every hop gets a freshly built (and freshly signed)
//! [`RequestAttempt`] from the caller's factory.
//!
//! # Query merge
//!
//! Blog hosts sometimes redirect to a bare path and drop query parameters
//! the caller needs (API keys, auth tokens). When the current URI has a query
//! and the resolved `Location` has none, the current query is carried over.
//! A `Location` with its own query always wins.
//!
//! # Limits
//!
//! At most [`MAX_REDIRECTS`] redirects are followed per call. Any non-3xx
//! response ends the chain and is returned as data, 4xx/5xx included.

mod attempt;
mod request;
mod transport;

pub use attempt::{HttpResponse, RequestAttempt};
pub use request::SignedRequest;
pub use transport::{ReqwestTransport, Transport, TransportSettings};

use crate::error::ExecutorError;

use std::sync::Arc;

use log::debug;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Redirects followed before giving up on a chain.
pub const MAX_REDIRECTS: usize = 50;

/// Runs one logical request as a sequential hop chain over a [`Transport`].
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    max_redirects: usize,
}

impl RequestExecutor {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            max_redirects: MAX_REDIRECTS,
        }
    }

    /// Issue the request built by `build_request`, following redirects.
    ///
    /// # Errors
    ///
    /// - [`ExecutorError::InvalidRedirect`] for a 3xx without a `Location`
    /// - [`ExecutorError::RedirectLimitExceeded`] after [`MAX_REDIRECTS`] redirects
    /// - whatever `build_request` or the transport fail with
    pub async fn execute<F>(
        &self,
        uri: &Url,
        build_request: F,
    ) -> Result<HttpResponse, ExecutorError>
    where
        F: Fn(&Url) -> Result<RequestAttempt, ExecutorError> + Send + Sync,
    {
        self.run(uri, &build_request, None).await
    }

    /// Same as [`RequestExecutor::execute`], ending the chain with
    /// [`ExecutorError::Cancelled`] as soon as `cancel` fires.
    pub async fn execute_cancellable<F>(
        &self,
        uri: &Url,
        build_request: F,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, ExecutorError>
    where
        F: Fn(&Url) -> Result<RequestAttempt, ExecutorError> + Send + Sync,
    {
        self.run(uri, &build_request, Some(cancel)).await
    }

    async fn run<F>(
        &self,
        initial: &Url,
        build_request: &F,
        cancel: Option<&CancellationToken>,
    ) -> Result<HttpResponse, ExecutorError>
    where
        F: Fn(&Url) -> Result<RequestAttempt, ExecutorError> + Send + Sync,
    {
        let mut visited: Vec<Url> = Vec::new();
        let mut current = initial.clone();

        while visited.len() <= self.max_redirects {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                return Err(ExecutorError::cancelled(initial.as_str()));
            }

            let attempt = build_request(&current)?;
            let response = self.dispatch(attempt, initial, cancel).await?;
            let status = response.status();

            if !status.is_redirection() {
                debug!(
                    "HTTP {status} from {current} after {} redirect(s)",
                    visited.len()
                );
                return Ok(response);
            }

            let location = response
                .location()
                .ok_or_else(|| ExecutorError::invalid_redirect(current.as_str(), status))?;
            let next = merge_redirect_uri(&current, location)?;

            debug!("HTTP {status} redirect {current} -> {next}");
            drop(response);

            visited.push(std::mem::replace(&mut current, next));
        }

        Err(ExecutorError::redirect_limit_exceeded(
            initial.as_str(),
            self.max_redirects,
        ))
    }

    async fn dispatch(
        &self,
        attempt: RequestAttempt,
        initial: &Url,
        cancel: Option<&CancellationToken>,
    ) -> Result<HttpResponse, ExecutorError> {
        match cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(ExecutorError::cancelled(initial.as_str())),
                result = self.transport.send(attempt) => result,
            },
            None => self.transport.send(attempt).await,
        }
    }
}

/// Next hop for a redirect from `current` to `location`.
///
/// `location` is resolved against `current` first, so path-only locations
/// keep the current scheme and host.
pub fn merge_redirect_uri(current: &Url, location: &str) -> Result<Url, ExecutorError> {
    let mut next = current.join(location.trim())?;

    if let Some(query) = current.query()
        && next.query().is_none()
    {
        next.set_query(Some(query));
    }

    Ok(next)
}
