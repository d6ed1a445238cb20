use crate::auth::{AuthSigner, Credentials, attach_header};
use crate::error::ExecutorError;
use crate::executor::RequestAttempt;

use std::sync::Arc;

use log::trace;
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderName, IF_MATCH};
use url::Url;

/// Request factory bound to a method, a signer and a set of credentials.
///
/// [`SignedRequest::build`] is meant to be handed to
/// [`crate::executor::RequestExecutor::execute`]: it is called once per hop
/// and signs every attempt afresh, so nonce-based signers never reuse a
/// digest across a redirect chain.
#[derive(Clone)]
pub struct SignedRequest {
    method: Method,
    signer: Arc<dyn AuthSigner>,
    credentials: Credentials,
    content_type: Option<String>,
    accept: Option<String>,
    if_match: Option<String>,
    extra_headers: Vec<(HeaderName, String)>,
    body: Option<Vec<u8>>,
}

impl SignedRequest {
    pub fn new(method: Method, signer: Arc<dyn AuthSigner>, credentials: Credentials) -> Self {
        Self {
            method,
            signer,
            credentials,
            content_type: None,
            accept: None,
            if_match: None,
            extra_headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_body(mut self, content_type: impl Into<String>, body: Vec<u8>) -> Self {
        self.content_type = Some(content_type.into());
        self.body = Some(body);
        self
    }

    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    /// Adds `If-Match`, skipped when `etag` is `None` or empty.
    pub fn with_if_match(mut self, etag: Option<&str>) -> Self {
        self.if_match = etag.filter(|e| !e.is_empty()).map(str::to_string);
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: impl Into<String>) -> Self {
        self.extra_headers.push((name, value.into()));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn build(&self, uri: &Url) -> Result<RequestAttempt, ExecutorError> {
        let mut attempt = RequestAttempt::new(self.method.clone(), uri.clone());

        if let Some(content_type) = &self.content_type {
            attach_header(&mut attempt, CONTENT_TYPE, content_type)?;
        }
        if let Some(accept) = &self.accept {
            attach_header(&mut attempt, ACCEPT, accept)?;
        }
        if let Some(etag) = &self.if_match {
            attach_header(&mut attempt, IF_MATCH, etag)?;
        }
        for (name, value) in &self.extra_headers {
            attach_header(&mut attempt, name.clone(), value)?;
        }
        attempt.body = self.body.clone();

        self.signer.sign(&mut attempt, &self.credentials)?;

        trace!("Built {} {} ({} signer)", self.method, uri, self.signer.scheme());
        Ok(attempt)
    }
}
