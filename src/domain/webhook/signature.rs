//! Webhook signature verification primitives.
//!
//! The provider signs every notification with HMAC-SHA256 over a manifest
//! built from the resource id, the request id and a Unix timestamp:
//!
//! ```text
//! x-signature: ts=<unix-seconds>,v1=<hex hmac>
//! manifest:    id:<data-id>;request-id:<request-id>;ts:<unix-seconds>;
//! ```
//!
//! The timestamp bounds the replay window in both directions.

use std::time::Duration;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::WebhookAuthError;

type HmacSha256 = Hmac<Sha256>;

/// Default allowed distance between now and the signed timestamp (5 minutes).
pub const DEFAULT_TIMESTAMP_TOLERANCE: Duration = Duration::from_secs(300);

/// Parsed `x-signature` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Timestamp exactly as it appeared in the header.
    pub timestamp: String,

    /// Hex-encoded HMAC exactly as it appeared in the header.
    pub hash: String,
}

impl SignatureHeader {
    /// Parses a signature header.
    ///
    /// Format: `ts=<timestamp>,v1=<hash>[,<key>=<value>...]`
    ///
    /// Entries are split on `,` then on the first `=`; whitespace around
    /// entries, keys and values is ignored, as are unknown keys and entries
    /// without `=`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSignatureFormat` if `ts` or `v1` is missing or empty,
    /// which includes a blank header.
    pub fn parse(header: &str) -> Result<Self, WebhookAuthError> {
        let mut timestamp = "";
        let mut hash = "";

        for part in header.split(',') {
            let Some((key, value)) = part.trim().split_once('=') else {
                continue;
            };

            match key.trim() {
                "ts" => timestamp = value.trim(),
                "v1" => hash = value.trim(),
                _ => {}
            }
        }

        if timestamp.is_empty() || hash.is_empty() {
            return Err(WebhookAuthError::InvalidSignatureFormat);
        }

        Ok(Self {
            timestamp: timestamp.to_string(),
            hash: hash.to_string(),
        })
    }
}

/// Builds the signed manifest. The byte layout is fixed by the provider.
pub fn build_manifest(data_id: &str, request_id: &str, timestamp: &str) -> String {
    format!("id:{};request-id:{};ts:{};", data_id, request_id, timestamp)
}

/// Computes the lowercase hex HMAC-SHA256 of `manifest` keyed by `secret`.
pub fn compute_signature(manifest: &str, secret: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(manifest.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Compares two signatures in constant time.
pub fn signatures_match(computed: &str, provided: &str) -> bool {
    let computed = computed.as_bytes();
    let provided = provided.as_bytes();
    if computed.len() != provided.len() {
        return false;
    }
    computed.ct_eq(provided).into()
}

/// Checks that `timestamp` is within `tolerance` of `now` (both Unix seconds).
///
/// Stale and future-dated timestamps are rejected identically; a distance
/// equal to the tolerance is accepted.
pub fn check_timestamp(
    timestamp: &str,
    tolerance: Duration,
    now: i64,
) -> Result<i64, WebhookAuthError> {
    let ts: i64 = timestamp
        .parse()
        .map_err(|_| WebhookAuthError::InvalidTimestamp)?;

    if now.abs_diff(ts) > tolerance.as_secs() {
        return Err(WebhookAuthError::TimestampOutsideTolerance);
    }

    Ok(ts)
}
