//! Session Validator
//! Mission: Decide whether a stored credential is still usable
//!
//! Runs the restore pass once at process start: load the persisted
//! credential, check its expiry claim locally, refresh through the
//! renewal credential when expired, and fetch the canonical profile.
//! Every failure path resolves to a well-defined signed-out state.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::authenticator::Authenticator;
use super::codec::{decode_claims, Credential};
use super::store::SessionStore;

/// Validation state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationState {
    /// Nothing persisted; terminal for this pass.
    NoCredential,
    /// Decoding the stored credential.
    Checking,
    /// Credential usable; profile fetched on the way out.
    Valid,
    /// Expiry claim in the past.
    Expired,
    /// Exchanging the renewal credential for a new primary one.
    Refreshing,
    /// Terminal failure; session cleared.
    Invalid,
}

impl fmt::Display for ValidationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredential => write!(f, "NO_CREDENTIAL"),
            Self::Checking => write!(f, "CHECKING"),
            Self::Valid => write!(f, "VALID"),
            Self::Expired => write!(f, "EXPIRED"),
            Self::Refreshing => write!(f, "REFRESHING"),
            Self::Invalid => write!(f, "INVALID"),
        }
    }
}

pub struct SessionValidator {
    auth: Arc<Authenticator>,
    store: Arc<SessionStore>,
}

impl SessionValidator {
    pub fn new(auth: Arc<Authenticator>, store: Arc<SessionStore>) -> Self {
        Self { auth, store }
    }

    /// The startup pass. Holds the store's `loading` flag for its
    /// duration; callers gate login controls on it.
    pub async fn restore(&self) -> ValidationState {
        self.store.set_loading(true);
        let state = self.run().await;
        self.store.set_loading(false);
        state
    }

    async fn run(&self) -> ValidationState {
        let tokens = self.store.load();
        let Some(access) = tokens.access else {
            debug!("No persisted credential, starting signed out");
            return ValidationState::NoCredential;
        };

        debug!(state = %ValidationState::Checking, "Validating persisted credential");
        let mut credential = Credential::new(access);

        match decode_claims(credential.token()).and_then(|c| c.exp) {
            Some(exp) => {
                let now = Utc::now().timestamp();
                if exp < now {
                    info!(state = %ValidationState::Expired, exp, now, "Credential expired");
                    let Some(renewal) = self.store.renewal() else {
                        warn!("Expired credential with no renewal credential");
                        return self.invalidate();
                    };

                    debug!(state = %ValidationState::Refreshing, "Attempting credential refresh");
                    match self.auth.refresh_with(&renewal).await {
                        Ok(fresh) => credential = fresh,
                        Err(e) => {
                            warn!("Refresh failed, session invalidated: {}", e);
                            return self.invalidate();
                        }
                    }
                }
            }
            None => {
                // Opaque or malformed: no local expiry to check, the
                // profile endpoint gets the final word.
                debug!("Credential carries no expiry claim, treating as opaque");
            }
        }

        match self.auth.fetch_profile(&credential).await {
            Ok(profile) => {
                info!(state = %ValidationState::Valid, username = %profile.username, "Session restored");
                self.store.set_profile(profile);
                ValidationState::Valid
            }
            Err(e) => {
                warn!("Profile fetch failed, session invalidated: {}", e);
                self.invalidate()
            }
        }
    }

    fn invalidate(&self) -> ValidationState {
        self.store.clear();
        ValidationState::Invalid
    }
}
