//! Authenticates webhook deliveries from the payment processor.
//!
//! Verifies the `Stripe-Signature` header with HMAC-SHA256 over
//! `"<timestamp>." ++ raw body`. Timestamps are checked against a
//! configurable tolerance to limit replay.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::webhook_errors::WebhookError;
use super::webhook_event::WebhookEvent;

/// Default maximum age for webhook events (5 minutes).
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Future timestamps within this many seconds are accepted.
const MAX_CLOCK_SKEW_SECS: i64 = 60;

type HmacSha256 = Hmac<Sha256>;

/// Whether inbound webhooks must carry a valid signature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationMode {
    /// Signatures are required and checked.
    #[default]
    Enforced,
    /// Payloads are parsed without a signature check. Development only.
    Disabled,
}

impl std::fmt::Display for VerificationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationMode::Enforced => write!(f, "enforced"),
            VerificationMode::Disabled => write!(f, "disabled"),
        }
    }
}

/// A `Stripe-Signature` header split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Signing time, unix seconds.
    pub timestamp: i64,
    /// Every v1 signature present. Stripe sends several while a secret is rolled.
    pub v1_signatures: Vec<Vec<u8>>,
    /// Optional v0 legacy signature. Never used for verification.
    pub v0_signature: Option<Vec<u8>>,
}

impl SignatureHeader {
    /// Splits `t=...,v1=...` pairs. Unknown keys are skipped.
    ///
    /// Format: `t=<timestamp>,v1=<signature>[,v1=<signature>...][,v0=<legacy>]`
    ///
    /// # Errors
    ///
    /// Malformed headers yield `WebhookError::ParseError`.
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp: Option<i64> = None;
        let mut v1_signatures = Vec::new();
        let mut v0_signature: Option<Vec<u8>> = None;

        for part in header.split(',') {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| WebhookError::ParseError("invalid header format".to_string()))?;

            match key.trim() {
                "t" => {
                    timestamp = Some(value.trim().parse().map_err(|_| {
                        WebhookError::ParseError("invalid timestamp".to_string())
                    })?);
                }
                "v1" => {
                    v1_signatures.push(hex::decode(value.trim()).map_err(|_| {
                        WebhookError::ParseError("invalid v1 signature hex".to_string())
                    })?);
                }
                "v0" => {
                    v0_signature = Some(hex::decode(value.trim()).map_err(|_| {
                        WebhookError::ParseError("invalid v0 signature hex".to_string())
                    })?);
                }
                // Unknown schemes are skipped.
                _ => {}
            }
        }

        let timestamp =
            timestamp.ok_or_else(|| WebhookError::ParseError("missing timestamp".to_string()))?;
        if v1_signatures.is_empty() {
            return Err(WebhookError::ParseError("missing v1 signature".to_string()));
        }

        Ok(SignatureHeader {
            timestamp,
            v1_signatures,
            v0_signature,
        })
    }
}

/// Verifier for inbound Stripe webhooks.
#[derive(Clone)]
pub struct WebhookVerifier {
    mode: VerifierMode,
    tolerance_secs: i64,
}

#[derive(Clone)]
enum VerifierMode {
    Enforced { secret: String },
    Disabled,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("mode", &self.mode())
            .field("tolerance_secs", &self.tolerance_secs)
            .finish()
    }
}

impl WebhookVerifier {
    /// Creates a verifier that requires a valid signature on every payload.
    pub fn enforced(secret: impl Into<String>) -> Self {
        Self {
            mode: VerifierMode::Enforced {
                secret: secret.into(),
            },
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }

    /// Creates a verifier that parses payloads without checking signatures.
    pub fn disabled() -> Self {
        Self {
            mode: VerifierMode::Disabled,
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }

    /// Overrides the maximum accepted event age.
    pub fn with_tolerance(mut self, tolerance_secs: i64) -> Self {
        self.tolerance_secs = tolerance_secs;
        self
    }

    pub fn mode(&self) -> VerificationMode {
        match self.mode {
            VerifierMode::Enforced { .. } => VerificationMode::Enforced,
            VerifierMode::Disabled => VerificationMode::Disabled,
        }
    }

    /// Authenticates `payload` against the header, then decodes the event.
    ///
    /// # Errors
    ///
    /// - `MissingSignature` - No header while enforced
    /// - `InvalidSignature` - No v1 signature matched
    /// - `TimestampOutOfRange` - Event is older than the tolerance
    /// - `InvalidTimestamp` - Event timestamp is in the future
    /// - `ParseError` - Failed to parse header or JSON payload
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature_header: Option<&str>,
    ) -> Result<WebhookEvent, WebhookError> {
        self.verify_at(payload, signature_header, chrono::Utc::now().timestamp())
    }

    /// Same as [`verify_and_parse`](Self::verify_and_parse) with an explicit clock.
    pub fn verify_at(
        &self,
        payload: &[u8],
        signature_header: Option<&str>,
        now: i64,
    ) -> Result<WebhookEvent, WebhookError> {
        let secret = match &self.mode {
            VerifierMode::Disabled => return WebhookEvent::parse(payload),
            VerifierMode::Enforced { secret } => secret,
        };

        let header = signature_header
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or(WebhookError::MissingSignature)?;
        let header = SignatureHeader::parse(header)?;

        self.validate_timestamp(header.timestamp, now)?;

        let expected = compute_signature(secret, header.timestamp, payload)?;
        let matched = header
            .v1_signatures
            .iter()
            .any(|candidate| constant_time_compare(&expected, candidate));
        if !matched {
            return Err(WebhookError::InvalidSignature);
        }

        WebhookEvent::parse(payload)
    }

    fn validate_timestamp(&self, timestamp: i64, now: i64) -> Result<(), WebhookError> {
        // `t` is unauthenticated at this point and may be any i64.
        let age = now
            .checked_sub(timestamp)
            .ok_or(WebhookError::InvalidTimestamp)?;

        if age > self.tolerance_secs {
            return Err(WebhookError::TimestampOutOfRange);
        }
        if age < -MAX_CLOCK_SKEW_SECS {
            return Err(WebhookError::InvalidTimestamp);
        }

        Ok(())
    }
}

fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> Result<Vec<u8>, WebhookError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| WebhookError::InvalidSignature)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Byte comparison whose running time does not depend on where inputs differ.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Builds a valid `Stripe-Signature` header for a payload.
///
/// Used by tests and local tooling that replay signed events.
pub fn signature_header_for(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let signature = compute_signature(secret, timestamp, payload)
        .map(hex::encode)
        .unwrap_or_default();
    format!("t={},v1={}", timestamp, signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "whsec_test_secret_12345";
    const NOW: i64 = 1_704_067_200;
    const PAYLOAD: &str = r#"{"id":"evt_test123","type":"payment_intent.succeeded","created":1704067200,"data":{"object":{}},"livemode":false}"#;

    // ══════════════════════════════════════════════════════════════
    // Header parsing
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn header_without_v0_parses() {
        let header_str = format!("t=1234567890,v1={}", "a".repeat(64));

        let header = SignatureHeader::parse(&header_str).unwrap();

        assert_eq!(header.timestamp, 1234567890);
        assert_eq!(header.v1_signatures.len(), 1);
        assert_eq!(header.v1_signatures[0].len(), 32);
        assert!(header.v0_signature.is_none());
    }

    #[test]
    fn parse_header_collects_every_v1() {
        let header_str = format!(
            "t=1234567890,v1={},v1={},v0={}",
            "a".repeat(64),
            "b".repeat(64),
            "c".repeat(64)
        );

        let header = SignatureHeader::parse(&header_str).unwrap();

        assert_eq!(header.v1_signatures.len(), 2);
        assert!(header.v0_signature.is_some());
    }

    #[test]
    fn header_with_extra_keys_still_parses() {
        let header_str = format!("t=1234567890,v1={},v2=future,scheme=hmac", "a".repeat(64));

        let header = SignatureHeader::parse(&header_str).unwrap();

        assert_eq!(header.v1_signatures.len(), 1);
    }

    #[test]
    fn parse_header_rejects_malformed_input() {
        for header in [
            format!("v1={}", "a".repeat(64)),
            "t=1234567890".to_string(),
            format!("t=not_a_number,v1={}", "a".repeat(64)),
            "t=1234567890,v1=not_valid_hex".to_string(),
            "t1234567890".to_string(),
        ] {
            let result = SignatureHeader::parse(&header);
            assert!(
                matches!(result, Err(WebhookError::ParseError(_))),
                "{} should not parse",
                header
            );
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Verification
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn correctly_signed_body_is_accepted() {
        let verifier = WebhookVerifier::enforced(TEST_SECRET);
        let header = signature_header_for(TEST_SECRET, NOW, PAYLOAD.as_bytes());

        let event = verifier
            .verify_at(PAYLOAD.as_bytes(), Some(&header), NOW)
            .unwrap();

        assert_eq!(event.id.as_deref(), Some("evt_test123"));
    }

    #[test]
    fn verify_accepts_any_matching_v1() {
        let verifier = WebhookVerifier::enforced(TEST_SECRET);
        let valid = signature_header_for(TEST_SECRET, NOW, PAYLOAD.as_bytes());
        let valid_sig = valid.split_once("v1=").unwrap().1;
        let header = format!("t={},v1={},v1={}", NOW, "0".repeat(64), valid_sig);

        assert!(verifier
            .verify_at(PAYLOAD.as_bytes(), Some(&header), NOW)
            .is_ok());
    }

    #[test]
    fn garbage_signature_is_rejected() {
        let verifier = WebhookVerifier::enforced(TEST_SECRET);
        let header = format!("t={},v1={}", NOW, "a".repeat(64));

        let result = verifier.verify_at(PAYLOAD.as_bytes(), Some(&header), NOW);

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn signature_from_other_secret_is_rejected() {
        let verifier = WebhookVerifier::enforced("whsec_other");
        let header = signature_header_for(TEST_SECRET, NOW, PAYLOAD.as_bytes());

        let result = verifier.verify_at(PAYLOAD.as_bytes(), Some(&header), NOW);

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn modified_body_is_rejected() {
        let verifier = WebhookVerifier::enforced(TEST_SECRET);
        let header = signature_header_for(TEST_SECRET, NOW, PAYLOAD.as_bytes());
        let tampered = PAYLOAD.replace("evt_test123", "evt_hacked");

        let result = verifier.verify_at(tampered.as_bytes(), Some(&header), NOW);

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn verify_signs_raw_bytes_not_lossy_text() {
        let verifier = WebhookVerifier::enforced(TEST_SECRET);
        let mut payload = br#"{"type":"payment_method.attached","data":{"object":{"name":""#.to_vec();
        payload.extend_from_slice(&[0xff]);
        payload.extend_from_slice(br#""}}}"#);
        let lossy = String::from_utf8_lossy(&payload).into_owned();

        let header = signature_header_for(TEST_SECRET, NOW, lossy.as_bytes());
        let result = verifier.verify_at(&payload, Some(&header), NOW);

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn verify_missing_header_fails_when_enforced() {
        let verifier = WebhookVerifier::enforced(TEST_SECRET);

        assert!(matches!(
            verifier.verify_at(PAYLOAD.as_bytes(), None, NOW),
            Err(WebhookError::MissingSignature)
        ));
        assert!(matches!(
            verifier.verify_at(PAYLOAD.as_bytes(), Some("  "), NOW),
            Err(WebhookError::MissingSignature)
        ));
    }

    #[test]
    fn disabled_mode_parses_without_signature() {
        let verifier = WebhookVerifier::disabled();

        let event = verifier.verify_at(PAYLOAD.as_bytes(), None, NOW).unwrap();

        assert_eq!(event.event_type, "payment_intent.succeeded");
        assert_eq!(verifier.mode(), VerificationMode::Disabled);
    }

    #[test]
    fn disabled_mode_still_rejects_malformed_body() {
        let verifier = WebhookVerifier::disabled();

        let result = verifier.verify_at(b"not json", None, NOW);

        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    #[test]
    fn valid_signature_over_invalid_json_is_a_parse_error() {
        let verifier = WebhookVerifier::enforced(TEST_SECRET);
        let header = signature_header_for(TEST_SECRET, NOW, b"not valid json");

        let result = verifier.verify_at(b"not valid json", Some(&header), NOW);

        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    // ══════════════════════════════════════════════════════════════
    // Timestamp window
    // ══════════════════════════════════════════════════════════════

    fn verify_signed_at(verifier: &WebhookVerifier, timestamp: i64) -> Result<WebhookEvent, WebhookError> {
        let header = signature_header_for(TEST_SECRET, timestamp, PAYLOAD.as_bytes());
        verifier.verify_at(PAYLOAD.as_bytes(), Some(&header), NOW)
    }

    #[test]
    fn timestamp_at_boundary_succeeds() {
        let verifier = WebhookVerifier::enforced(TEST_SECRET);
        assert!(verify_signed_at(&verifier, NOW - 300).is_ok());
    }

    #[test]
    fn timestamp_just_past_boundary_fails() {
        let verifier = WebhookVerifier::enforced(TEST_SECRET);
        assert!(matches!(
            verify_signed_at(&verifier, NOW - 301),
            Err(WebhookError::TimestampOutOfRange)
        ));
    }

    #[test]
    fn custom_tolerance_is_respected() {
        let verifier = WebhookVerifier::enforced(TEST_SECRET).with_tolerance(600);
        assert!(verify_signed_at(&verifier, NOW - 599).is_ok());
        assert!(verify_signed_at(&verifier, NOW - 601).is_err());
    }

    #[test]
    fn timestamp_from_future_within_skew_succeeds() {
        let verifier = WebhookVerifier::enforced(TEST_SECRET);
        assert!(verify_signed_at(&verifier, NOW + 30).is_ok());
    }

    #[test]
    fn timestamp_from_future_beyond_skew_fails() {
        let verifier = WebhookVerifier::enforced(TEST_SECRET);
        assert!(matches!(
            verify_signed_at(&verifier, NOW + 120),
            Err(WebhookError::InvalidTimestamp)
        ));
    }

    #[test]
    fn extreme_timestamps_are_rejected_without_overflow() {
        let verifier = WebhookVerifier::enforced(TEST_SECRET);
        let payload = br#"{"type":"payment_intent.succeeded","data":{"object":{}}}"#;
        let v1 = "a".repeat(64);

        for t in [i64::MIN, i64::MIN + 1, i64::MAX, -1] {
            let header = format!("t={},v1={}", t, v1);
            let result = verifier.verify_at(payload, Some(&header), NOW);
            assert!(
                matches!(
                    result,
                    Err(WebhookError::InvalidTimestamp | WebhookError::TimestampOutOfRange)
                ),
                "t={} gave {:?}",
                t,
                result
            );
        }
    }

    #[test]
    fn verify_and_parse_uses_wall_clock() {
        let verifier = WebhookVerifier::enforced(TEST_SECRET);
        let now = chrono::Utc::now().timestamp();
        let header = signature_header_for(TEST_SECRET, now, PAYLOAD.as_bytes());

        assert!(verifier
            .verify_and_parse(PAYLOAD.as_bytes(), Some(&header))
            .is_ok());
    }

    #[test]
    fn debug_output_hides_secret() {
        let verifier = WebhookVerifier::enforced(TEST_SECRET);
        let debug = format!("{:?}", verifier);
        assert!(!debug.contains(TEST_SECRET));
    }
}
