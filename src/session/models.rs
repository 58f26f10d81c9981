//! Session Models
//! Mission: Typed request/response bodies for the identity service

use serde::{Deserialize, Serialize};

/// User roles for RBAC
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Regular,
    Nutritionist,
    Regulator,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Regular => "regular",
            Role::Nutritionist => "nutritionist",
            Role::Regulator => "regulator",
            Role::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "regular" => Some(Role::Regular),
            "nutritionist" => Some(Role::Nutritionist),
            "regulator" => Some(Role::Regulator),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Regular
    }
}

/// Canonical user profile.
///
/// Always fetched fresh with a valid credential, never trusted stale
/// across a refresh. The service omits `role`/`admin_level` for plain
/// accounts, so both default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub admin_level: u32,
}

/// Login request body
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Token issue / refresh response.
///
/// The service answers with one of several field names depending on
/// which auth backend handled the request. Extraction priority is
/// fixed: `token`, then `access`, then `key`.
#[derive(Debug, Default, Deserialize)]
pub struct TokenResponse {
    pub token: Option<String>,
    pub access: Option<String>,
    pub key: Option<String>,
    pub refresh: Option<String>,
}

impl TokenResponse {
    /// First matching credential field, fixed priority order.
    pub fn primary(&self) -> Option<&str> {
        self.token
            .as_deref()
            .or(self.access.as_deref())
            .or(self.key.as_deref())
    }
}

/// Registration request body
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_role: Option<&'a str>,
}

/// Token refresh request body
#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

/// Anti-forgery token response
#[derive(Debug, Deserialize)]
pub struct CsrfResponse {
    #[serde(rename = "csrfToken")]
    pub csrf_token: Option<String>,
}

/// Outcome of a registration call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// The registration response carried a usable credential and the
    /// session was established.
    LoggedIn(UserProfile),
    /// Registered, not logged in. The caller must invoke login.
    Registered,
}
