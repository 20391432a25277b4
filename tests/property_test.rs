//! Property-based tests for the retry schedule, error classification and
//! webhook authentication primitives.

use std::time::Duration;

use mercadolibre_sdk::adapters::mercadolibre::{
    ErrorClassifier, MercadoLibreWebhookHandler, ProviderCodeMap, RetryPolicy,
};
use mercadolibre_sdk::domain::foundation::ErrorKind;
use mercadolibre_sdk::domain::webhook::{
    build_manifest, check_timestamp, compute_signature, SignatureHeader, WebhookAuthError,
    WebhookRequest,
};
use mercadolibre_sdk::ports::WebhookHandler;
use proptest::prelude::*;

/// Strategy for retry policies with sane bounds.
fn policy_strategy() -> impl Strategy<Value = RetryPolicy> {
    (0u32..20, 1u64..2_000, 0u64..60_000).prop_map(|(max_retries, initial_ms, extra_ms)| {
        RetryPolicy::new(
            max_retries,
            Duration::from_millis(initial_ms),
            Duration::from_millis(initial_ms + extra_ms),
        )
    })
}

/// Strategy for webhook bodies in the provider's shape.
fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    (
        any::<i64>(),
        any::<bool>(),
        "[a-z_]{1,12}\\.[a-z_]{1,12}", // action
        any::<i64>(),
        prop_oneof![
            "[0-9]{1,12}".prop_map(|s| format!("\"{}\"", s)),
            any::<u32>().prop_map(|n| n.to_string()),
        ],
    )
        .prop_map(|(id, live_mode, action, user_id, data_id)| {
            format!(
                r#"{{"id":{},"live_mode":{},"action":"{}","user_id":{},"api_version":"v1","data":{{"id":{}}}}}"#,
                id, live_mode, action, user_id, data_id
            )
            .into_bytes()
        })
}

proptest! {
    #[test]
    fn backoff_is_monotone_and_capped(policy in policy_strategy(), attempts in 1u32..64) {
        let mut previous = Duration::ZERO;
        for attempt in 0..attempts {
            let delay = policy.backoff_before_attempt(attempt);
            prop_assert!(delay >= previous);
            prop_assert!(delay <= policy.max_backoff);
            previous = delay;
        }
        prop_assert_eq!(policy.backoff_before_attempt(0), Duration::ZERO);
    }

    #[test]
    fn first_retry_waits_initial_backoff(policy in policy_strategy()) {
        prop_assert_eq!(policy.backoff_before_attempt(1), policy.initial_backoff);
    }

    #[test]
    fn classify_never_panics(status in 400u16..600, body in prop::collection::vec(any::<u8>(), 0..512)) {
        let err = ErrorClassifier::new().classify(status, &body);
        prop_assert!(!err.message.is_empty());
        prop_assert_eq!(err.kind, ErrorClassifier::kind_for_status(status));
        prop_assert_eq!(
            err.is_retryable(),
            matches!(err.kind, ErrorKind::RateLimited | ErrorKind::Timeout | ErrorKind::NetworkError)
        );
    }

    #[test]
    fn remap_only_touches_provider_and_request_errors(status in 400u16..600, code in "[a-z_]{1,40}") {
        let body = format!(r#"{{"cause":[{{"code":"cc_rejected_{}","description":"x"}}]}}"#, code);
        let classified = ErrorClassifier::new().classify(status, body.as_bytes());
        let remapped = ProviderCodeMap::default().remap(classified.clone());

        if !matches!(classified.kind, ErrorKind::ProviderError | ErrorKind::InvalidRequest) {
            prop_assert_eq!(remapped, classified);
        } else {
            prop_assert_eq!(remapped.provider_code, classified.provider_code);
        }
    }

    #[test]
    fn header_parser_never_panics(header in "\\PC{0,200}") {
        let _ = SignatureHeader::parse(&header);
    }

    #[test]
    fn parsed_header_fields_are_non_empty(ts in "[0-9]{1,12}", hash in "[0-9a-f]{1,64}", noise in "[a-z0-9]{0,8}") {
        let header = format!("x={}, ts={} ,junk, v1={}", noise, ts, hash);
        let parsed = SignatureHeader::parse(&header).unwrap();
        prop_assert_eq!(parsed.timestamp, ts);
        prop_assert_eq!(parsed.hash, hash);
    }

    #[test]
    fn timestamp_window_is_symmetric(now in 0i64..4_000_000_000, offset in 0i64..1_000, tolerance in 1u64..600) {
        let tolerance = Duration::from_secs(tolerance);
        let past = check_timestamp(&(now - offset).to_string(), tolerance, now);
        let future = check_timestamp(&(now + offset).to_string(), tolerance, now);

        prop_assert_eq!(past.is_ok(), future.is_ok());
        prop_assert_eq!(past.is_ok(), offset as u64 <= tolerance.as_secs());
    }

    #[test]
    fn any_single_hash_change_is_rejected(
        data_id in "[a-z0-9-]{0,20}",
        request_id in "[a-z0-9-]{0,20}",
        position in 0usize..64,
    ) {
        let now = 1_700_000_000i64;
        let secret = "prop-secret";
        let ts = now.to_string();
        let hash = compute_signature(&build_manifest(&data_id, &request_id, &ts), secret.as_bytes());

        let mut tampered: Vec<char> = hash.chars().collect();
        tampered[position] = if tampered[position] == 'a' { 'b' } else { 'a' };
        let tampered: String = tampered.into_iter().collect();

        let handler = MercadoLibreWebhookHandler::new();
        let request = |hash: &str| WebhookRequest {
            body: Vec::new(),
            signature: format!("ts={},v1={}", ts, hash),
            request_id: request_id.clone(),
            data_id: data_id.clone(),
        };

        prop_assert!(handler.validate_at(&request(&hash), secret, now).is_ok());
        prop_assert_eq!(
            handler.validate_at(&request(&tampered), secret, now),
            Err(WebhookAuthError::SignatureMismatch)
        );
    }

    #[test]
    fn parse_is_deterministic(payload in payload_strategy()) {
        let handler = MercadoLibreWebhookHandler::new();
        let first = handler.parse(&payload).unwrap();
        let second = handler.parse(&payload).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn parse_of_arbitrary_bytes_never_panics(payload in prop::collection::vec(any::<u8>(), 0..256)) {
        match handler_parse(&payload) {
            Ok(_) => prop_assert!(!payload.is_empty()),
            Err(kind) if payload.is_empty() => prop_assert_eq!(kind, ErrorKind::InvalidRequest),
            Err(kind) => prop_assert_eq!(kind, ErrorKind::InvalidWebhook),
        }
    }
}

fn handler_parse(payload: &[u8]) -> Result<(), ErrorKind> {
    MercadoLibreWebhookHandler::new()
        .parse(payload)
        .map(|_| ())
        .map_err(|e| e.kind)
}
