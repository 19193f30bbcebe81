//! The backend collaborator contract.
//!
//! SYSTEM CONTEXT
//! ==============
//! `client::state::session::SessionManager` is written against [`Backend`]
//! only. Every call returns `Result`; callers decide how to surface errors.
//!
//! TRADE-OFFS
//! ==========
//! The trait is `?Send` because browser HTTP futures are not `Send`. The UI
//! runs on a single-threaded executor, so nothing is lost.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use crate::error::BackendError;
use crate::schema::Table;
use crate::types::{AuthResponse, AuthStateChange, Session};

/// Equality filter on a single column (`col = value`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowFilter {
    pub column: String,
    pub value: String,
}

impl RowFilter {
    #[must_use]
    pub fn eq(column: &str, value: &str) -> Self {
        Self { column: column.to_owned(), value: value.to_owned() }
    }

    /// Query-string pair in the row API's operator syntax (`user_id=eq.u1`).
    #[must_use]
    pub fn query_pair(&self) -> (String, String) {
        (self.column.clone(), format!("eq.{}", self.value))
    }
}

/// Auth and row operations offered by the hosted backend.
#[async_trait(?Send)]
pub trait Backend: Send + Sync {
    /// Exchange email + password for a session. Emits `SignedIn` on success.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthResponse, BackendError>;

    /// Register a new account, attaching `full_name` to the user metadata.
    async fn sign_up(&self, email: &str, password: &str, full_name: Option<&str>) -> Result<AuthResponse, BackendError>;

    /// End the current session. Emits `SignedOut` on success.
    async fn sign_out(&self) -> Result<(), BackendError>;

    /// Ask the backend to email a password recovery link.
    async fn reset_password_for_email(&self, email: &str) -> Result<(), BackendError>;

    /// Current session, if one is held.
    async fn get_session(&self) -> Result<Option<Session>, BackendError>;

    /// Subscribe to auth-state changes from this point on.
    fn on_auth_state_change(&self) -> AuthSubscription;

    /// Fetch exactly one row. Zero or several matches is an error.
    async fn select_single(&self, table: &str, columns: &str, filter: &RowFilter) -> Result<Value, BackendError>;

    /// Patch exactly one row and return it as stored after the write.
    async fn update_single(&self, table: &str, patch: &Value, filter: &RowFilter) -> Result<Value, BackendError>;
}

/// Fetch a single typed row.
///
/// # Errors
///
/// Propagates backend errors and returns [`BackendError::Parse`] when the row
/// does not match `T`.
pub async fn fetch_row<T: Table>(backend: &dyn Backend, filter: &RowFilter) -> Result<T, BackendError> {
    let row = backend.select_single(T::NAME, "*", filter).await?;
    Ok(serde_json::from_value(row)?)
}

/// Patch a single typed row and return the post-write row.
///
/// # Errors
///
/// Same as [`fetch_row`], plus serialization failures of `patch`.
pub async fn update_row<T: Table, P: Serialize>(
    backend: &dyn Backend,
    patch: &P,
    filter: &RowFilter,
) -> Result<T, BackendError> {
    let patch = serde_json::to_value(patch)?;
    let row = backend.update_single(T::NAME, &patch, filter).await?;
    Ok(serde_json::from_value(row)?)
}

// =============================================================================
// SUBSCRIPTION
// =============================================================================

/// Receiving end of the auth-state broadcast.
///
/// Dropping it detaches the listener.
pub struct AuthSubscription {
    rx: broadcast::Receiver<AuthStateChange>,
}

impl AuthSubscription {
    #[must_use]
    pub fn new(rx: broadcast::Receiver<AuthStateChange>) -> Self {
        Self { rx }
    }

    /// Wait for the next change. Returns `None` once the sender is gone.
    ///
    /// A subscriber that falls behind skips to the oldest retained change;
    /// every change carries the full session, so nothing is lost but history.
    pub async fn next(&mut self) -> Option<AuthStateChange> {
        loop {
            match self.rx.recv().await {
                Ok(change) => return Some(change),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "auth subscriber lagged; skipping ahead"),
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
#[path = "contract_test.rs"]
mod tests;
