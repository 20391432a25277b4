//! Retrying transport: bounded attempts, exponential backoff, error
//! classification and cancellation.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{Instrument, Span};

use super::error_classifier::ErrorClassifier;
use super::retry::RetryPolicy;
use crate::domain::foundation::SdkError;
use crate::ports::{ApiRequest, CallContext, HttpSender, MAX_RESPONSE_BYTES};

/// Executes provider requests with retries.
///
/// Holds no per-call state: concurrent `execute` calls share only the
/// sender, so each call's backoff schedule is independent.
#[derive(Clone)]
pub struct ResilientTransport {
    sender: Arc<dyn HttpSender>,
    classifier: ErrorClassifier,
    policy: RetryPolicy,
    max_body_bytes: usize,
    span: Span,
}

impl ResilientTransport {
    pub fn new(sender: Arc<dyn HttpSender>, policy: RetryPolicy) -> Self {
        Self {
            sender,
            classifier: ErrorClassifier::new(),
            policy,
            max_body_bytes: MAX_RESPONSE_BYTES,
            span: tracing::info_span!("mercadolibre.transport"),
        }
    }

    /// Records this transport's events under `span`.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Lowers the response body cap. Values above [`MAX_RESPONSE_BYTES`]
    /// are clamped.
    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit.min(MAX_RESPONSE_BYTES);
        self
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Executes `request` with the transport's retry policy and returns the
    /// raw success body.
    pub async fn execute(
        &self,
        request: &ApiRequest,
        ctx: &CallContext,
    ) -> Result<Vec<u8>, SdkError> {
        self.execute_with_policy(request, self.policy, ctx).await
    }

    /// Executes `request` with an explicit retry policy.
    ///
    /// # Errors
    ///
    /// - The classified error of the first non-retryable failure
    /// - The last retryable error once `max_retries + 1` attempts are spent
    /// - `Timeout` as soon as `ctx` is cancelled or its deadline passes,
    ///   whether during a backoff wait or an in-flight attempt
    pub async fn execute_with_policy(
        &self,
        request: &ApiRequest,
        policy: RetryPolicy,
        ctx: &CallContext,
    ) -> Result<Vec<u8>, SdkError> {
        self.run(request, policy, ctx)
            .instrument(self.span.clone())
            .await
    }

    async fn run(
        &self,
        request: &ApiRequest,
        policy: RetryPolicy,
        ctx: &CallContext,
    ) -> Result<Vec<u8>, SdkError> {
        ctx.check()?;

        let mut last_error = None;

        for attempt in 0..policy.max_attempts() {
            if attempt > 0 {
                let backoff = policy.backoff_before_attempt(attempt);
                tracing::debug!(
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    "retrying request"
                );

                tokio::select! {
                    biased;
                    err = ctx.done() => return Err(err),
                    _ = tokio::time::sleep(backoff) => {}
                }
            }

            tracing::debug!(
                method = request.method().as_str(),
                path = request.path(),
                "http request"
            );

            let outcome = tokio::select! {
                biased;
                err = ctx.done() => return Err(err),
                outcome = self.sender.send(request, self.max_body_bytes) => outcome,
            };

            let error = match outcome {
                Ok(response) => {
                    tracing::debug!(
                        status = response.status,
                        bytes = response.body.len(),
                        "http response"
                    );
                    if !response.is_error() {
                        return Ok(response.body);
                    }
                    self.classifier.classify(response.status, &response.body)
                }
                Err(err) => err,
            };

            if !error.is_retryable() {
                return Err(error);
            }
            last_error = Some(error);
        }

        Err(last_error.unwrap_or_else(|| SdkError::internal("no request attempt was made")))
    }

    /// Executes `request` and decodes the JSON body.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        ctx: &CallContext,
    ) -> Result<T, SdkError> {
        let body = self.execute(&request, ctx).await?;
        decode_json(&body)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        path: &str,
    ) -> Result<T, SdkError> {
        self.send_json(ApiRequest::get(path).accept_json(), ctx).await
    }

    pub async fn post_json<B, T>(&self, ctx: &CallContext, path: &str, body: &B) -> Result<T, SdkError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(ApiRequest::post(path).with_json(body)?, ctx).await
    }

    pub async fn put_json<B, T>(&self, ctx: &CallContext, path: &str, body: &B) -> Result<T, SdkError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(ApiRequest::put(path).with_json(body)?, ctx).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        path: &str,
    ) -> Result<T, SdkError> {
        self.send_json(ApiRequest::delete(path).accept_json(), ctx).await
    }

    /// Fetches a binary resource (e.g. a shipping label).
    pub async fn download(&self, ctx: &CallContext, path: &str) -> Result<Vec<u8>, SdkError> {
        self.execute(&ApiRequest::get(path).accept_binary(), ctx).await
    }
}

/// Decodes a success body. An empty body decodes as JSON `null`.
fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, SdkError> {
    let body = if body.is_empty() { &b"null"[..] } else { body };
    serde_json::from_slice(body)
        .map_err(|e| SdkError::internal(format!("failed to unmarshal response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde::Deserialize;
    use tokio::time::Instant;
    use tokio_util::sync::CancellationToken;

    use crate::domain::foundation::ErrorKind;
    use crate::ports::RawResponse;

    /// Replays scripted outcomes, repeating the last one once exhausted.
    struct ScriptedSender {
        script: Mutex<VecDeque<Result<RawResponse, SdkError>>>,
        calls: Mutex<Vec<(Instant, ApiRequest)>>,
    }

    impl ScriptedSender {
        fn new(script: Vec<Result<RawResponse, SdkError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn always(outcome: Result<RawResponse, SdkError>) -> Arc<Self> {
            Self::new(vec![outcome])
        }

        fn attempts(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn gaps_ms(&self) -> Vec<u128> {
            let calls = self.calls.lock().unwrap();
            calls
                .windows(2)
                .map(|w| (w[1].0 - w[0].0).as_millis())
                .collect()
        }

        fn last_request(&self) -> ApiRequest {
            self.calls.lock().unwrap().last().unwrap().1.clone()
        }
    }

    #[async_trait]
    impl HttpSender for ScriptedSender {
        async fn send(
            &self,
            request: &ApiRequest,
            _max_body_bytes: usize,
        ) -> Result<RawResponse, SdkError> {
            self.calls
                .lock()
                .unwrap()
                .push((Instant::now(), request.clone()));
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.pop_front().unwrap()
            } else {
                script.front().cloned().unwrap()
            }
        }
    }

    /// Never answers.
    struct HangingSender;

    #[async_trait]
    impl HttpSender for HangingSender {
        async fn send(&self, _: &ApiRequest, _: usize) -> Result<RawResponse, SdkError> {
            std::future::pending().await
        }
    }

    fn transport(sender: Arc<dyn HttpSender>) -> ResilientTransport {
        ResilientTransport::new(sender, RetryPolicy::default())
    }

    fn status(code: u16, body: &str) -> Result<RawResponse, SdkError> {
        Ok(RawResponse::new(code, body.as_bytes().to_vec()))
    }

    // ══════════════════════════════════════════════════════════════
    // Retry budget
    // ══════════════════════════════════════════════════════════════

    #[tokio::test(start_paused = true)]
    async fn permanently_retryable_failure_uses_every_attempt() {
        for max_retries in [0u32, 1, 3, 5] {
            let sender = ScriptedSender::always(status(429, "{}"));
            let policy = RetryPolicy {
                max_retries,
                ..RetryPolicy::default()
            };

            let err = transport(sender.clone())
                .execute_with_policy(&ApiRequest::get("/v1/payments/1"), policy, &CallContext::new())
                .await
                .unwrap_err();

            assert_eq!(err.kind, ErrorKind::RateLimited);
            assert_eq!(sender.attempts(), max_retries as usize + 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_doubles_and_caps() {
        let sender = ScriptedSender::always(Err(SdkError::network("connection refused")));
        let policy = RetryPolicy {
            max_retries: 8,
            ..RetryPolicy::default()
        };

        let err = transport(sender.clone())
            .execute_with_policy(&ApiRequest::get("/x"), policy, &CallContext::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::NetworkError);
        assert_eq!(
            sender.gaps_ms(),
            vec![100, 200, 400, 800, 1600, 3200, 5000, 5000]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_transient_failures() {
        let sender = ScriptedSender::new(vec![
            status(429, ""),
            status(504, ""),
            Err(SdkError::network("connection reset")),
            status(200, r#"{"id":7}"#),
        ]);

        let body = transport(sender.clone())
            .execute(&ApiRequest::get("/x"), &CallContext::new())
            .await
            .unwrap();

        assert_eq!(body, br#"{"id":7}"#.to_vec());
        assert_eq!(sender.attempts(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_errors_are_returned_on_first_occurrence() {
        for code in [400u16, 401, 403, 404, 409, 500] {
            let sender = ScriptedSender::always(status(code, r#"{"message":"nope"}"#));

            let err = transport(sender.clone())
                .execute(&ApiRequest::get("/x"), &CallContext::new())
                .await
                .unwrap_err();

            assert!(!err.is_retryable());
            assert_eq!(err.message, "nope");
            assert_eq!(sender.attempts(), 1, "status {}", code);
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Cancellation
    // ══════════════════════════════════════════════════════════════

    #[tokio::test(start_paused = true)]
    async fn cancellation_during_backoff_aborts_whole_call() {
        let sender = ScriptedSender::always(status(429, ""));
        let token = CancellationToken::new();
        let ctx = CallContext::with_token(token.clone());

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            token.cancel();
        });

        let start = Instant::now();
        let err = transport(sender.clone())
            .execute(&ApiRequest::get("/x"), &ctx)
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Timeout);
        assert_eq!(err.message, "context cancelled");
        assert_eq!(sender.attempts(), 2);
        assert_eq!(start.elapsed(), Duration::from_millis(150));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_interrupts_in_flight_attempt() {
        let ctx = CallContext::new().with_timeout(Duration::from_secs(3));

        let err = transport(Arc::new(HangingSender))
            .execute(&ApiRequest::get("/x"), &ctx)
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Timeout);
        assert_eq!(err.message, "deadline exceeded");
    }

    #[tokio::test]
    async fn already_cancelled_context_makes_no_attempt() {
        let sender = ScriptedSender::always(status(200, "{}"));
        let ctx = CallContext::new();
        ctx.cancel();

        let err = transport(sender.clone())
            .execute(&ApiRequest::get("/x"), &ctx)
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Timeout);
        assert_eq!(sender.attempts(), 0);
    }

    // ══════════════════════════════════════════════════════════════
    // JSON helpers
    // ══════════════════════════════════════════════════════════════

    #[derive(Debug, Deserialize, PartialEq)]
    struct Created {
        id: i64,
    }

    #[tokio::test]
    async fn post_json_sends_json_and_decodes_response() {
        let sender = ScriptedSender::always(status(201, r#"{"id":42}"#));

        let created: Created = transport(sender.clone())
            .post_json(&CallContext::new(), "/v1/payments", &serde_json::json!({"a": 1}))
            .await
            .unwrap();

        assert_eq!(created, Created { id: 42 });
        let sent = sender.last_request();
        assert_eq!(sent.body(), Some(&br#"{"a":1}"#[..]));
        assert_eq!(sent.header("Content-Type"), Some("application/json"));
    }

    #[tokio::test]
    async fn empty_body_decodes_as_null() {
        let sender = ScriptedSender::always(status(204, ""));
        let t = transport(sender);

        let (): () = t
            .put_json(&CallContext::new(), "/v1/payments/1", &serde_json::json!({}))
            .await
            .unwrap();

        let nothing: Option<Created> = t.delete(&CallContext::new(), "/x").await.unwrap();
        assert!(nothing.is_none());
    }

    #[tokio::test]
    async fn undecodable_body_is_internal_error() {
        let sender = ScriptedSender::always(status(200, "not json"));

        let err = transport(sender)
            .get_json::<Created>(&CallContext::new(), "/x")
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Internal);
        assert!(err.message.starts_with("failed to unmarshal response"));
    }

    #[tokio::test]
    async fn download_requests_binary_content() {
        let sender = ScriptedSender::always(status(200, "%PDF-1.4"));

        let bytes = transport(sender.clone())
            .download(&CallContext::new(), "/shipment_labels")
            .await
            .unwrap();

        assert_eq!(bytes, b"%PDF-1.4".to_vec());
        assert_eq!(
            sender.last_request().header("accept"),
            Some("application/octet-stream")
        );
    }

    #[test]
    fn body_cap_cannot_exceed_hard_limit() {
        let t = transport(ScriptedSender::always(status(200, ""))).with_max_body_bytes(usize::MAX);
        assert_eq!(t.max_body_bytes, MAX_RESPONSE_BYTES);
    }
}
