//! Kitchen Konnect Session Client Library
//!
//! Client-side session management for the Kitchen Konnect multi-role
//! API: credential inspection, durable session storage, transparent
//! refresh, and role-based access predicates. The rest of an
//! application reads the session store and the access gate; nothing
//! else carries protocol state.

pub mod config;
pub mod session;

pub use config::ClientConfig;
pub use session::{
    can_access, Authenticator, Credential, CredentialKind, RegisterOutcome, Requirement, Role,
    SessionError, SessionStore, SessionValidator, UserProfile, ValidationState,
};
