//! REST client for the hosted backend.
//!
//! Thin HTTP wrapper over the auth endpoints (`/auth/v1/*`) and the row API
//! (`/rest/v1/{table}`). Pure parsing lives in free functions for
//! testability.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become [`BackendError::Api`] carrying the backend's own
//! message. The auth service has used two error body shapes over time
//! (`{error, error_description}` and `{code, error_code, msg}`); both are
//! understood.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::{Value, json};
use time::OffsetDateTime;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::config::BackendConfig;
use crate::contract::{AuthSubscription, Backend, RowFilter};
use crate::error::BackendError;
use crate::storage::{MemoryStorage, SessionStorage};
use crate::types::{AuthChangeEvent, AuthResponse, AuthStateChange, Session, User};

const AUTH_EVENT_CAPACITY: usize = 16;
/// A session this close to `expires_at` is refreshed before use.
const EXPIRY_MARGIN_SECS: i64 = 10;
const SINGLE_OBJECT_MEDIA_TYPE: &str = "application/vnd.pgrst.object+json";

// =============================================================================
// CLIENT
// =============================================================================

pub struct RestBackend {
    http: reqwest::Client,
    config: BackendConfig,
    storage: Box<dyn SessionStorage>,
    events: broadcast::Sender<AuthStateChange>,
}

impl RestBackend {
    /// Client with in-memory session storage.
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self::with_storage(config, Box::new(MemoryStorage::default()))
    }

    #[must_use]
    pub fn with_storage(config: BackendConfig, storage: Box<dyn SessionStorage>) -> Self {
        let (events, _) = broadcast::channel(AUTH_EVENT_CAPACITY);
        Self { http: reqwest::Client::new(), config, storage, events }
    }

    #[must_use]
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn stored_session(&self) -> Option<Session> {
        let key = self.config.storage_key();
        let raw = self.storage.load(&key)?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(error = %e, "discarding unreadable stored session");
                self.storage.remove(&key);
                None
            }
        }
    }

    fn persist_session(&self, session: &Session) {
        match serde_json::to_string(session) {
            Ok(raw) => self.storage.store(&self.config.storage_key(), &raw),
            Err(e) => warn!(error = %e, "session not persisted"),
        }
    }

    fn emit(&self, event: AuthChangeEvent, session: Option<Session>) {
        debug!(?event, user_id = session.as_ref().map(|s| s.user.id.as_str()), "auth state change");
        // No subscribers is not an error.
        let _ = self.events.send(AuthStateChange::new(event, session));
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        let bearer = self
            .stored_session()
            .map_or_else(|| self.config.anon_key.clone(), |s| s.access_token);
        self.http
            .request(method, url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(bearer)
    }

    /// Request authorized by the anon key alone, for calls made while the
    /// stored access token is known to be dead.
    fn anon_request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
    }

    /// Exchange the refresh token for a new session, persist it and emit
    /// `TokenRefreshed`.
    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, BackendError> {
        let url = auth_endpoint(&self.config.url, "token");
        let body = self
            .send(
                self.anon_request(reqwest::Method::POST, url)
                    .query(&[("grant_type", "refresh_token")])
                    .json(&json!({ "refresh_token": refresh_token })),
            )
            .await?;
        let session = with_expiry(parse_session(&body)?, now_unix());
        info!(user_id = %session.user.id, "session refreshed");
        self.persist_session(&session);
        self.emit(AuthChangeEvent::TokenRefreshed, Some(session.clone()));
        Ok(session)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;
        if !(200..300).contains(&status) {
            return Err(parse_error(status, &text));
        }
        Ok(text)
    }
}

#[async_trait(?Send)]
impl Backend for RestBackend {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthResponse, BackendError> {
        let url = auth_endpoint(&self.config.url, "token");
        let body = self
            .send(
                self.request(reqwest::Method::POST, url)
                    .query(&[("grant_type", "password")])
                    .json(&json!({ "email": email, "password": password })),
            )
            .await?;
        let session = with_expiry(parse_session(&body)?, now_unix());
        info!(user_id = %session.user.id, "signed in");
        self.persist_session(&session);
        self.emit(AuthChangeEvent::SignedIn, Some(session.clone()));
        Ok(AuthResponse { user: Some(session.user.clone()), session: Some(session) })
    }

    async fn sign_up(&self, email: &str, password: &str, full_name: Option<&str>) -> Result<AuthResponse, BackendError> {
        let url = auth_endpoint(&self.config.url, "signup");
        let body = self
            .send(self.request(reqwest::Method::POST, url).json(&json!({
                "email": email,
                "password": password,
                "data": { "full_name": full_name },
            })))
            .await?;
        let mut response = parse_sign_up_response(&body)?;
        response.session = response.session.map(|s| with_expiry(s, now_unix()));
        if let Some(session) = &response.session {
            self.persist_session(session);
            self.emit(AuthChangeEvent::SignedIn, Some(session.clone()));
        }
        info!(confirmed = response.session.is_some(), "signed up");
        Ok(response)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        if self.stored_session().is_some() {
            let url = auth_endpoint(&self.config.url, "logout");
            let result = self.send(self.request(reqwest::Method::POST, url)).await.map(|_| ());
            logout_outcome(result)?;
        }
        self.storage.remove(&self.config.storage_key());
        self.emit(AuthChangeEvent::SignedOut, None);
        Ok(())
    }

    async fn reset_password_for_email(&self, email: &str) -> Result<(), BackendError> {
        let url = auth_endpoint(&self.config.url, "recover");
        self.send(self.request(reqwest::Method::POST, url).json(&json!({ "email": email })))
            .await?;
        Ok(())
    }

    /// Stored session, refreshed first when it has expired.
    ///
    /// A refresh the backend rejects clears the stored session. A refresh that
    /// never reached the backend is returned as an error and the stored
    /// session is kept for the next attempt.
    async fn get_session(&self) -> Result<Option<Session>, BackendError> {
        let Some(session) = self.stored_session() else {
            return Ok(None);
        };
        if !is_expired(&session, now_unix()) {
            return Ok(Some(session));
        }

        debug!(user_id = %session.user.id, "stored session expired; refreshing");
        match self.refresh_session(&session.refresh_token).await {
            Ok(fresh) => Ok(Some(fresh)),
            Err(e) if e.status().is_some() => {
                warn!(error = %e, "session refresh rejected; discarding stored session");
                self.storage.remove(&self.config.storage_key());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn on_auth_state_change(&self) -> AuthSubscription {
        AuthSubscription::new(self.events.subscribe())
    }

    async fn select_single(&self, table: &str, columns: &str, filter: &RowFilter) -> Result<Value, BackendError> {
        let url = rest_endpoint(&self.config.url, table);
        let body = self
            .send(
                self.request(reqwest::Method::GET, url)
                    .query(&[("select", columns)])
                    .query(&[filter.query_pair()])
                    .header(ACCEPT, SINGLE_OBJECT_MEDIA_TYPE),
            )
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn update_single(&self, table: &str, patch: &Value, filter: &RowFilter) -> Result<Value, BackendError> {
        let url = rest_endpoint(&self.config.url, table);
        let body = self
            .send(
                self.request(reqwest::Method::PATCH, url)
                    .query(&[filter.query_pair()])
                    .header(ACCEPT, SINGLE_OBJECT_MEDIA_TYPE)
                    .header("Prefer", "return=representation")
                    .json(patch),
            )
            .await?;
        Ok(serde_json::from_str(&body)?)
    }
}

// =============================================================================
// ENDPOINTS
// =============================================================================

fn auth_endpoint(base: &str, path: &str) -> String {
    format!("{base}/auth/v1/{path}")
}

fn rest_endpoint(base: &str, table: &str) -> String {
    format!("{base}/rest/v1/{table}")
}

// =============================================================================
// EXPIRY
// =============================================================================

fn now_unix() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

/// Fill in `expires_at` from `expires_in` when the backend sent only the latter.
fn with_expiry(mut session: Session, now: i64) -> Session {
    if session.expires_at.is_none() {
        session.expires_at = session.expires_in.map(|secs| now + secs);
    }
    session
}

/// Sessions without any expiry are trusted until the backend rejects them.
fn is_expired(session: &Session, now: i64) -> bool {
    session
        .expires_at
        .is_some_and(|expires_at| expires_at - EXPIRY_MARGIN_SECS <= now)
}

/// A logout the backend refuses because the token is already revoked or
/// expired still ends the session.
fn logout_outcome(result: Result<(), BackendError>) -> Result<(), BackendError> {
    match result {
        Err(e) if matches!(e.status(), Some(401 | 403 | 404)) => {
            debug!(error = %e, "logout on expired session");
            Ok(())
        }
        other => other,
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_session(json: &str) -> Result<Session, BackendError> {
    Ok(serde_json::from_str(json)?)
}

/// Sign-up answers with a session when email confirmation is off, and with
/// the bare user when a confirmation mail was sent instead.
fn parse_sign_up_response(json: &str) -> Result<AuthResponse, BackendError> {
    let value: Value = serde_json::from_str(json)?;
    if value.get("access_token").is_some() {
        let session: Session = serde_json::from_value(value)?;
        return Ok(AuthResponse { user: Some(session.user.clone()), session: Some(session) });
    }
    let user: User = match value.get("user") {
        Some(user) => serde_json::from_value(user.clone())?,
        None => serde_json::from_value(value)?,
    };
    Ok(AuthResponse { user: Some(user), session: None })
}

fn parse_error(status: u16, body: &str) -> BackendError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|v| v.get(name))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    };

    let message = field("msg")
        .or_else(|| field("error_description"))
        .or_else(|| field("message"))
        .or_else(|| field("error"))
        .unwrap_or_else(|| format!("request failed with status {status}"));
    let code = field("error_code").or_else(|| field("code"));

    BackendError::Api { status, code, message }
}

#[cfg(test)]
#[path = "rest_test.rs"]
mod tests;
