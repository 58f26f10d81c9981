//! Credential Codec
//! Mission: Inspect bearer credentials without trusting them
//!
//! The identity service issues two credential shapes: structured tokens
//! (dot-separated segments with a base64url JSON claims payload) and
//! opaque static keys. Nothing here verifies a signature; the only
//! decision this module feeds is which Authorization scheme to send and
//! whether an expiry claim is available for local checking.

use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::Deserialize;

/// Claims embedded in a structured credential.
///
/// `exp` (seconds since epoch) is the only claim the client acts on;
/// the rest is retained for diagnostics.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    pub exp: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Credential shape, resolved once at acquisition time.
///
/// Resolving the shape up front keeps header selection consistent for
/// the lifetime of the credential instead of re-deriving it per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    /// Dot-separated segments carrying a claims payload.
    Structured,
    /// No recognizable structure; treated as a static key.
    Opaque,
}

impl CredentialKind {
    pub fn of(token: &str) -> Self {
        if looks_structured(token) {
            Self::Structured
        } else {
            Self::Opaque
        }
    }
}

/// A bearer credential plus its resolved shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    kind: CredentialKind,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        let kind = CredentialKind::of(&token);
        Self { token, kind }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn kind(&self) -> CredentialKind {
        self.kind
    }

    /// Authorization header value for this credential.
    ///
    /// The identity service accepts both schemes and gives no
    /// out-of-band hint about which one it issued; the credential's
    /// shape is the only signal the client has.
    pub fn auth_header(&self) -> String {
        match self.kind {
            CredentialKind::Structured => format!("Bearer {}", self.token),
            CredentialKind::Opaque => format!("Token {}", self.token),
        }
    }
}

/// True iff the credential has at least two dot-separated segments.
///
/// Heuristic only: it selects the header scheme and makes no claim
/// about authenticity.
pub fn looks_structured(token: &str) -> bool {
    token.split('.').count() >= 2
}

/// Decode the embedded claims of a structured credential.
///
/// Returns None for anything malformed (fewer than two segments, bad
/// base64, non-JSON payload). Never panics past this boundary.
pub fn decode_claims(token: &str) -> Option<Claims> {
    let mut parts = token.split('.');
    let _header = parts.next()?;
    let payload = parts.next()?;

    // Issuers differ on padding; accept both forms.
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| URL_SAFE.decode(payload))
        .ok()?;

    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_payload(json: &str) -> String {
        URL_SAFE_NO_PAD.encode(json.as_bytes())
    }

    #[test]
    fn test_single_segment_not_structured() {
        assert!(!looks_structured("d34db33f"));
        assert!(!looks_structured(""));
        assert!(looks_structured("abc.def"));
        assert!(looks_structured("a.b.c"));
    }

    #[test]
    fn test_decode_rejects_single_segment() {
        assert!(decode_claims("opaquekey").is_none());
    }

    #[test]
    fn test_decode_rejects_garbage_payload() {
        assert!(decode_claims("hdr.!!!not-base64!!!").is_none());
        // valid base64 but not JSON
        let not_json = URL_SAFE_NO_PAD.encode(b"hello");
        assert!(decode_claims(&format!("hdr.{}", not_json)).is_none());
    }

    #[test]
    fn test_decode_extracts_exp() {
        let token = format!("hdr.{}.sig", encode_payload(r#"{"exp":1700000000,"sub":"42"}"#));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.exp, Some(1700000000));
        assert_eq!(claims.extra.get("sub").and_then(|v| v.as_str()), Some("42"));
    }

    #[test]
    fn test_decode_accepts_padded_base64() {
        // 10-byte payload, so standard base64url carries padding
        let padded = URL_SAFE.encode(br#"{"exp":12}"#);
        assert!(padded.contains('='));
        let claims = decode_claims(&format!("hdr.{}", padded)).unwrap();
        assert_eq!(claims.exp, Some(12));
    }

    #[test]
    fn test_decode_without_exp() {
        let token = format!("hdr.{}", encode_payload(r#"{"sub":"42"}"#));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.exp, None);
    }

    #[test]
    fn test_kind_resolved_once() {
        let jwt = Credential::new("abc.def");
        assert_eq!(jwt.kind(), CredentialKind::Structured);
        assert_eq!(jwt.auth_header(), "Bearer abc.def");

        let key = Credential::new("d34db33f");
        assert_eq!(key.kind(), CredentialKind::Opaque);
        assert_eq!(key.auth_header(), "Token d34db33f");
    }
}
