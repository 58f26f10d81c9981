//! Authenticator
//! Mission: Orchestrate login, registration, refresh, and logout
//!
//! Every authenticated call picks its Authorization scheme from the
//! credential's resolved shape: `Bearer` for structured tokens,
//! `Token` for opaque keys. Requests carry no explicit timeout and are
//! never retried; a refresh is attempted at most once per pass.

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use tracing::{debug, info, warn};

use super::codec::Credential;
use super::errors::SessionError;
use super::models::{
    CsrfResponse, LoginRequest, RefreshRequest, RegisterOutcome, RegisterRequest, TokenResponse,
    UserProfile,
};
use super::store::SessionStore;

/// Identity service paths.
pub mod endpoints {
    pub const TOKEN: &str = "/api/auth/token/";
    pub const COOKIE_TOKEN: &str = "/api/auth/cookie/token/";
    pub const COOKIE_REFRESH: &str = "/api/auth/cookie/refresh/";
    pub const TOKEN_REFRESH: &str = "/api/auth/token/refresh/";
    pub const LOGOUT: &str = "/api/auth/cookie/logout/";
    pub const PROFILE: &str = "/api/auth/me/";
    pub const REGISTER: &str = "/api/auth/register/";
    pub const CSRF: &str = "/api/csrf/";
}

const CSRF_HEADER: &str = "X-CSRFToken";

pub struct Authenticator {
    http: reqwest::Client,
    base_url: String,
    store: Arc<SessionStore>,
}

impl Authenticator {
    /// `base_url` without a trailing slash, e.g. `http://127.0.0.1:8000`.
    pub fn new(base_url: impl Into<String>, store: Arc<SessionStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            store,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Exchange username/password for a credential and establish the
    /// session. Non-2xx surfaces the server body for display.
    pub async fn login(&self, username: &str, password: &str) -> Result<UserProfile, SessionError> {
        info!("🔐 Login attempt: {}", username);

        let res = self
            .http
            .post(self.url(endpoints::TOKEN))
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!("❌ Login rejected for {} ({})", username, status);
            return Err(SessionError::Authentication {
                status: status.as_u16(),
                body,
            });
        }

        let tokens: TokenResponse = res.json().await?;
        let Some(primary) = tokens.primary().map(String::from) else {
            warn!("❌ Token endpoint answered 2xx with no token field");
            return Err(SessionError::Authentication {
                status: status.as_u16(),
                body: "no token in response".to_string(),
            });
        };

        self.establish(&primary, tokens.refresh.as_deref()).await
    }

    /// Register an account, auto-logging in when the response carries a
    /// usable credential. The anti-forgery token is fetched fresh per
    /// call, never cached.
    pub async fn register_and_login(
        &self,
        fields: &RegisterRequest<'_>,
    ) -> Result<RegisterOutcome, SessionError> {
        info!("🔐 Registering account: {}", fields.username);

        let csrf = self.fetch_csrf().await;

        let res = self
            .http
            .post(self.url(endpoints::REGISTER))
            .header(CSRF_HEADER, csrf.as_deref().unwrap_or(""))
            .json(fields)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!("❌ Registration rejected for {} ({})", fields.username, status);
            return Err(SessionError::Authentication {
                status: status.as_u16(),
                body,
            });
        }

        // Registration responses are not required to carry a token;
        // anything unparseable counts as "no credential issued".
        let tokens: TokenResponse = res.json().await.unwrap_or_default();
        match tokens.primary().map(String::from) {
            Some(primary) => {
                let profile = self.establish(&primary, tokens.refresh.as_deref()).await?;
                Ok(RegisterOutcome::LoggedIn(profile))
            }
            None => {
                info!("✅ Registered {}, login required", fields.username);
                Ok(RegisterOutcome::Registered)
            }
        }
    }

    /// Tear down the session. The server call is best-effort: logout
    /// always succeeds locally. Idempotent.
    pub async fn logout(&self) {
        let mut req = self.http.post(self.url(endpoints::LOGOUT));
        if let Some(credential) = self.store.credential() {
            req = req.header(AUTHORIZATION, credential.auth_header());
        }
        match req.send().await {
            Ok(res) if !res.status().is_success() => {
                debug!("Logout endpoint answered {}", res.status());
            }
            Ok(_) => {}
            Err(e) => debug!("Logout endpoint unreachable: {}", e),
        }
        self.store.clear();
        info!("Signed out");
    }

    /// Exchange the stored renewal credential for a new primary one.
    pub async fn refresh(&self) -> Result<Credential, SessionError> {
        let Some(renewal) = self.store.renewal() else {
            return Err(SessionError::RefreshFailure);
        };
        self.refresh_with(&renewal).await
    }

    /// One refresh attempt. Every failure shape (non-2xx, transport,
    /// missing access value) collapses to `RefreshFailure`.
    pub(crate) async fn refresh_with(&self, renewal: &str) -> Result<Credential, SessionError> {
        let res = self
            .http
            .post(self.url(endpoints::TOKEN_REFRESH))
            .json(&RefreshRequest { refresh: renewal })
            .send()
            .await
            .map_err(|e| {
                warn!("Refresh transport failure: {}", e);
                SessionError::RefreshFailure
            })?;

        if !res.status().is_success() {
            warn!("Refresh rejected ({})", res.status());
            return Err(SessionError::RefreshFailure);
        }

        let tokens: TokenResponse = res
            .json()
            .await
            .map_err(|_| SessionError::RefreshFailure)?;
        let Some(access) = tokens.access.as_deref() else {
            warn!("Refresh response carried no access value");
            return Err(SessionError::RefreshFailure);
        };

        self.store.save(access, tokens.refresh.as_deref());
        debug!("Credential refreshed");
        Ok(Credential::new(access))
    }

    /// Fetch the canonical profile with the given credential.
    pub(crate) async fn fetch_profile(
        &self,
        credential: &Credential,
    ) -> Result<UserProfile, SessionError> {
        let res = self
            .http
            .get(self.url(endpoints::PROFILE))
            .header(AUTHORIZATION, credential.auth_header())
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(SessionError::ProfileFetch {
                status: status.as_u16(),
            });
        }

        Ok(res.json().await?)
    }

    /// Post-credential path shared by login and auto-login: persist the
    /// freshly issued credential (trusted not-expired) and fetch the
    /// profile with it. A profile failure invalidates the session.
    async fn establish(
        &self,
        access: &str,
        renewal: Option<&str>,
    ) -> Result<UserProfile, SessionError> {
        self.store.save(access, renewal);
        let credential = Credential::new(access);

        match self.fetch_profile(&credential).await {
            Ok(profile) => {
                self.store.set_profile(profile.clone());
                info!("✅ Logged in: {} ({})", profile.username, profile.role.as_str());
                Ok(profile)
            }
            Err(e) => {
                warn!("Profile fetch after login failed: {}", e);
                self.store.clear();
                Err(e)
            }
        }
    }

    /// Best-effort anti-forgery token fetch; absence degrades to an
    /// empty header value.
    async fn fetch_csrf(&self) -> Option<String> {
        let res = self.http.get(self.url(endpoints::CSRF)).send().await.ok()?;
        if !res.status().is_success() {
            return None;
        }
        res.json::<CsrfResponse>().await.ok()?.csrf_token
    }
}
