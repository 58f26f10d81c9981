//! Session Errors
//! Mission: Typed failure surface for the session pipeline
//!
//! Decode failures are deliberately absent: a malformed credential is
//! not an error, it degrades to the opaque path and the identity
//! service gets the final word.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Transport failure. Never retried automatically.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx from a token/login/registration endpoint. The server
    /// body is kept verbatim for the caller to display.
    #[error("authentication failed ({status}): {body}")]
    Authentication { status: u16, body: String },

    /// Refresh endpoint failure or missing access value. Collapses to
    /// session invalidation rather than a distinct user-facing error.
    #[error("credential refresh failed")]
    RefreshFailure,

    /// Profile endpoint rejected a credential the token endpoint
    /// accepted. Collapses to session invalidation.
    #[error("profile fetch failed ({status})")]
    ProfileFetch { status: u16 },
}
