// Unit tests for the redirect loop, driven by a scripted transport

use crate::error::ExecutorError;
use crate::executor::{HttpResponse, MAX_REDIRECTS, RequestAttempt, RequestExecutor, Transport};

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use common::HttpStatusCode;
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderValue, LOCATION};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Replays canned responses and records every attempt it is handed.
struct ScriptedTransport {
    responses: Mutex<VecDeque<(u16, Option<&'static str>)>>,
    sent: Mutex<Vec<RequestAttempt>>,
}

impl ScriptedTransport {
    fn new(script: Vec<(u16, Option<&'static str>)>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(script.into()),
            sent: Mutex::new(Vec::new()),
        })
    }

    fn sent_uris(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|a| a.uri.to_string())
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, attempt: RequestAttempt) -> Result<HttpResponse, ExecutorError> {
        let uri = attempt.uri.clone();
        self.sent.lock().unwrap().push(attempt);

        let (status, location) = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("script exhausted");

        let mut headers = HeaderMap::new();
        if let Some(location) = location {
            headers.insert(LOCATION, HeaderValue::from_static(location));
        }
        Ok(HttpResponse::new(status, headers, b"body".to_vec(), uri))
    }
}

/// Accepts a request and never answers it.
#[derive(Default)]
struct StalledTransport {
    sends: AtomicUsize,
}

#[async_trait]
impl Transport for StalledTransport {
    async fn send(&self, _attempt: RequestAttempt) -> Result<HttpResponse, ExecutorError> {
        self.sends.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}

fn get(uri: &Url) -> Result<RequestAttempt, ExecutorError> {
    Ok(RequestAttempt::new(Method::GET, uri.clone()))
}

fn start() -> Url {
    Url::parse("https://host/start?auth=t1").unwrap()
}

/// **VALUE**: Exactly 50 redirects are allowed.
///
/// **BUG THIS CATCHES**: Off-by-one in the hop bound, in either direction.
#[tokio::test]
async fn given_fifty_redirects_then_ok_when_execute_then_final_response_is_returned() {
    // GIVEN
    let mut script = vec![(302, Some("/next")); MAX_REDIRECTS];
    script.push((200, None));
    let transport = ScriptedTransport::new(script);
    let executor = RequestExecutor::new(transport.clone());

    // WHEN
    let response = executor.execute(&start(), get).await.expect("within limit");

    // THEN
    assert_eq!(response.status(), HttpStatusCode(200));
    assert_eq!(transport.sent_uris().len(), MAX_REDIRECTS + 1);
}

#[tokio::test]
async fn given_fifty_one_redirects_when_execute_then_limit_error_names_original_uri() {
    // GIVEN
    let transport = ScriptedTransport::new(vec![(301, Some("/loop")); MAX_REDIRECTS + 1]);
    let executor = RequestExecutor::new(transport.clone());

    // WHEN
    let result = executor.execute(&start(), get).await;

    // THEN
    match result {
        Err(ExecutorError::RedirectLimitExceeded { uri, limit, .. }) => {
            assert_eq!(uri, start().to_string());
            assert_eq!(limit, MAX_REDIRECTS);
        }
        other => panic!("expected RedirectLimitExceeded, got {other:?}"),
    }
    assert_eq!(transport.sent_uris().len(), MAX_REDIRECTS + 1);
}

/// **VALUE**: A redirect without a target stops the chain at once.
#[tokio::test]
async fn given_redirect_without_location_when_execute_then_invalid_redirect_without_more_hops() {
    let transport = ScriptedTransport::new(vec![(302, None), (200, None)]);
    let executor = RequestExecutor::new(transport.clone());

    let result = executor.execute(&start(), get).await;

    assert!(matches!(
        result,
        Err(ExecutorError::InvalidRedirect { status: HttpStatusCode(302), .. })
    ));
    assert_eq!(transport.sent_uris().len(), 1);
}

#[tokio::test]
async fn given_blank_location_when_execute_then_invalid_redirect() {
    let transport = ScriptedTransport::new(vec![(307, Some("   "))]);
    let executor = RequestExecutor::new(transport);

    let result = executor.execute(&start(), get).await;

    assert!(matches!(result, Err(ExecutorError::InvalidRedirect { .. })));
}

/// **WHY THIS MATTERS**: 304 sits in the redirect range but carries no
/// Location; it must not be mistaken for a final response.
#[tokio::test]
async fn given_not_modified_when_execute_then_treated_as_redirect_without_location() {
    let transport = ScriptedTransport::new(vec![(304, None)]);
    let executor = RequestExecutor::new(transport);

    let result = executor.execute(&start(), get).await;

    assert!(matches!(
        result,
        Err(ExecutorError::InvalidRedirect { status: HttpStatusCode(304), .. })
    ));
}

#[tokio::test]
async fn given_server_error_when_execute_then_returned_as_data() {
    let transport = ScriptedTransport::new(vec![(503, None)]);
    let executor = RequestExecutor::new(transport);

    let response = executor.execute(&start(), get).await.expect("not an error");

    assert_eq!(response.status(), HttpStatusCode(503));
    assert_eq!(response.text(), "body");
}

/// **VALUE**: The factory sees every hop's URI, query merge applied.
#[tokio::test]
async fn given_redirect_chain_when_execute_then_each_hop_is_built_for_merged_uri() {
    // GIVEN
    let transport = ScriptedTransport::new(vec![
        (302, Some("/feed?id=9")),
        (303, Some("https://cdn.example/entries")),
        (200, None),
    ]);
    let executor = RequestExecutor::new(transport.clone());

    // WHEN
    executor.execute(&start(), get).await.expect("ok");

    // THEN
    assert_eq!(
        transport.sent_uris(),
        vec![
            "https://host/start?auth=t1",
            "https://host/feed?id=9",
            "https://cdn.example/entries?id=9",
        ]
    );
}

#[tokio::test]
async fn given_factory_error_when_execute_then_nothing_is_sent() {
    let transport = ScriptedTransport::new(vec![(200, None)]);
    let executor = RequestExecutor::new(transport.clone());

    let result = executor
        .execute(&start(), |_| Err(ExecutorError::client_build("no")))
        .await;

    assert!(matches!(result, Err(ExecutorError::ClientBuild { .. })));
    assert!(transport.sent_uris().is_empty());
}

#[tokio::test]
async fn given_cancelled_token_when_execute_cancellable_then_cancelled_before_first_hop() {
    // GIVEN
    let transport = ScriptedTransport::new(vec![(200, None)]);
    let executor = RequestExecutor::new(transport.clone());
    let token = CancellationToken::new();
    token.cancel();

    // WHEN
    let result = executor.execute_cancellable(&start(), get, &token).await;

    // THEN
    assert!(matches!(result, Err(ExecutorError::Cancelled { .. })));
    assert!(transport.sent_uris().is_empty());
}

#[tokio::test]
async fn given_live_token_when_execute_cancellable_then_behaves_like_execute() {
    let transport = ScriptedTransport::new(vec![(302, Some("/b")), (200, None)]);
    let executor = RequestExecutor::new(transport.clone());

    let response = executor
        .execute_cancellable(&start(), get, &CancellationToken::new())
        .await
        .expect("ok");

    assert_eq!(response.url().as_str(), "https://host/b?auth=t1");
}

/// **VALUE**: Cancelling while a request is in flight ends the call promptly
/// with `Cancelled`.
///
/// **BUG THIS CATCHES**: The token only being checked between hops, leaving
/// the caller stuck on a server that never answers.
#[tokio::test]
async fn given_request_in_flight_when_token_cancelled_then_cancelled_promptly() {
    // GIVEN
    let transport = Arc::new(StalledTransport::default());
    let executor = RequestExecutor::new(transport.clone());
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        canceller.cancel();
    });

    // WHEN
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        executor.execute_cancellable(&start(), get, &token),
    )
    .await
    .expect("cancellation did not interrupt the pending send");

    // THEN
    assert!(matches!(result, Err(ExecutorError::Cancelled { .. })));
    assert_eq!(transport.sends.load(Ordering::SeqCst), 1);
}
