use crate::BLOGWIRE_USER_AGENT;
use crate::error::ExecutorError;
use crate::executor::{HttpResponse, RequestAttempt};

use std::time::Duration;

use async_trait::async_trait;
use log::trace;
use reqwest::Client;
use reqwest::redirect::Policy;

const DEFAULT_TIMEOUT_DURATION: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT_DURATION: Duration = Duration::from_secs(10);

/// Sends exactly one request and hands back exactly one response.
///
/// Implementations must never follow redirects on their own; redirect
/// control belongs to [`crate::executor::RequestExecutor`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, attempt: RequestAttempt) -> Result<HttpResponse, ExecutorError>;
}

/// Timeouts and identification passed through to the HTTP client.
#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT_DURATION,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT_DURATION,
            user_agent: BLOGWIRE_USER_AGENT.to_string(),
        }
    }
}

/// [`Transport`] backed by a `reqwest::Client` with redirects disabled.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(settings: &TransportSettings) -> Result<Self, ExecutorError> {
        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(settings.timeout)
            .connect_timeout(settings.connect_timeout)
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|e| ExecutorError::client_build(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, attempt: RequestAttempt) -> Result<HttpResponse, ExecutorError> {
        let RequestAttempt {
            method,
            uri,
            headers,
            body,
        } = attempt;

        trace!("{method} {uri}");

        let mut request = self.client.request(method, uri.clone()).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ExecutorError::from_reqwest(uri.as_str(), &e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let url = response.url().clone();

        if status.is_redirection() {
            // Only the Location matters; dropping releases the connection.
            drop(response);
            return Ok(HttpResponse::new(status.as_u16(), headers, Vec::new(), url));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ExecutorError::from_reqwest(uri.as_str(), &e))?;

        Ok(HttpResponse::new(status.as_u16(), headers, body.to_vec(), url))
    }
}
