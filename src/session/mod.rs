//! Session management for the Kitchen Konnect API.
//!
//! The pipeline: the store loads any persisted credential, the
//! validator checks and refreshes it, the authenticator fetches the
//! canonical profile, and the access gate predicates become evaluable.
//! Login, registration, and logout re-enter the same pipeline at
//! different points.

pub mod access;
pub mod authenticator;
pub mod codec;
pub mod errors;
pub mod models;
pub mod store;
pub mod validator;

// Re-exports for convenience
pub use access::{can_access, Requirement, ADMIN_LEVEL_THRESHOLD};
pub use authenticator::{endpoints, Authenticator};
pub use codec::{decode_claims, looks_structured, Claims, Credential, CredentialKind};
pub use errors::SessionError;
pub use models::{RegisterOutcome, RegisterRequest, Role, TokenResponse, UserProfile};
pub use store::{FileTokenStorage, MemoryTokenStorage, SessionStore, StoredTokens, TokenStorage};
pub use validator::{SessionValidator, ValidationState};
