//! Session/profile state manager: the only writer of [`AuthState`].
//!
//! ARCHITECTURE
//! ============
//! One manager per app instance, built in `App` and handed to
//! `AuthProvider`. State is published on a `tokio::sync::watch` channel so
//! the reactive layer (and tests) can observe it without owning it.
//!
//! ORDERING
//! ========
//! The initial session check and every auth-state change are processed by a
//! single sequential pump ([`SessionManager::listen`]). The subscription is
//! opened before the initial check, so changes arriving meanwhile queue up
//! instead of racing it.
//!
//! Writes that replace the identity carry an epoch ticket taken when their
//! work started. A write whose ticket is no longer the newest is dropped, so
//! e.g. a sign-out issued during an in-flight profile fetch cannot be undone
//! by that fetch completing later.
//!
//! ERROR HANDLING
//! ==============
//! Public operations never panic. Failures are returned as [`AuthError`] and
//! mirrored into `AuthState::error`. Profile fetch failures are logged and
//! degrade to "no profile"; the user stays authenticated.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use backend::schema::{Profile, ProfileUpdate};
use backend::{AuthResponse, AuthStateChange, AuthSubscription, Backend, BackendError, RowFilter, Session};
use futures::future::{AbortHandle, Abortable};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::auth::{AuthError, AuthState};

const SIGN_IN_FAILED: &str = "Erro ao fazer login";
const SIGN_UP_FAILED: &str = "Erro ao criar conta";
const SIGN_OUT_FAILED: &str = "Erro ao fazer logout";
const UPDATE_PROFILE_FAILED: &str = "Erro ao atualizar perfil";
const RESET_PASSWORD_FAILED: &str = "Erro ao enviar email de recuperação";

pub struct SessionManager {
    backend: Arc<dyn Backend>,
    state: watch::Sender<AuthState>,
    epoch: AtomicU64,
}

/// Stops the pump started by [`SessionManager::listen`] and releases the
/// auth subscription.
pub struct Listener {
    abort: AbortHandle,
}

impl Listener {
    pub fn detach(self) {
        self.abort.abort();
    }
}

impl SessionManager {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self { backend, state, epoch: AtomicU64::new(0) }
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Open the auth subscription and return the pump that drains it.
    ///
    /// The returned future runs the initial session check, then applies each
    /// auth-state change in arrival order until the backend closes the
    /// subscription or the [`Listener`] is detached.
    pub fn listen(self: Arc<Self>) -> (impl Future<Output = ()> + 'static, Listener) {
        let subscription = self.backend.on_auth_state_change();
        let (abort, registration) = AbortHandle::new_pair();
        let pump = Abortable::new(async move { self.pump(subscription).await }, registration);
        let task = async move {
            if pump.await.is_err() {
                debug!("auth listener detached");
            }
        };
        (task, Listener { abort })
    }

    async fn pump(&self, mut subscription: AuthSubscription) {
        self.load_initial_session().await;
        while let Some(change) = subscription.next().await {
            self.handle_auth_change(change).await;
        }
        debug!("auth subscription closed");
    }

    async fn load_initial_session(&self) {
        let ticket = self.begin();
        match self.backend.get_session().await {
            Ok(session) => self.apply_session(ticket, session).await,
            Err(e) => {
                error!(error = %e, "error getting initial session");
                self.settle();
            }
        }
    }

    /// Apply one auth-state change: refetch the profile when a user is
    /// present, then replace the identity wholesale.
    pub async fn handle_auth_change(&self, change: AuthStateChange) {
        info!(event = ?change.event, user_id = change.user().map(|u| u.id.as_str()), "auth state changed");
        let ticket = self.begin();
        self.apply_session(ticket, change.session).await;
    }

    async fn apply_session(&self, ticket: u64, session: Option<Session>) {
        let profile = match &session {
            Some(session) => self.fetch_profile(&session.user.id).await,
            None => None,
        };
        self.commit(ticket, |state| state.replace_identity(session, profile));
        self.settle();
    }

    async fn fetch_profile(&self, user_id: &str) -> Option<Profile> {
        match backend::fetch_row::<Profile>(self.backend.as_ref(), &RowFilter::eq("user_id", user_id)).await {
            Ok(profile) => Some(profile),
            Err(e) if e.is_not_single_row() => {
                warn!(user_id, "no single profile row for user");
                None
            }
            Err(e) => {
                error!(user_id, error = %e, "error fetching profile");
                None
            }
        }
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// Sign in with email and password.
    ///
    /// Local state is not touched on success; the backend's `SignedIn`
    /// notification populates it.
    ///
    /// # Errors
    ///
    /// Returns the backend's message (e.g. "Invalid login credentials").
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        self.set_error(None);
        self.backend
            .sign_in_with_password(email, password)
            .await
            .map_err(|e| self.fail("sign_in", &e, SIGN_IN_FAILED))
    }

    /// Resolve once `user_id` is the committed user.
    ///
    /// A successful [`SessionManager::sign_in`] only starts the sign-in; the
    /// identity lands when the pump applies the backend's notification.
    /// Callers that navigate to a protected route await this first so the
    /// route guard does not see the gap.
    pub async fn wait_for_user(&self, user_id: &str) {
        let mut changes = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = changes
            .wait_for(|state| state.user.as_ref().is_some_and(|u| u.id() == user_id))
            .await;
    }

    /// Create an account, optionally recording a display name.
    ///
    /// # Errors
    ///
    /// Returns the backend's message when registration is rejected.
    pub async fn sign_up(&self, email: &str, password: &str, full_name: Option<&str>) -> Result<AuthResponse, AuthError> {
        self.set_error(None);
        self.backend
            .sign_up(email, password, full_name)
            .await
            .map_err(|e| self.fail("sign_up", &e, SIGN_UP_FAILED))
    }

    /// Sign out and clear user, profile and session immediately.
    ///
    /// # Errors
    ///
    /// Returns the backend's message; local state is kept in that case.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.set_error(None);
        self.backend
            .sign_out()
            .await
            .map_err(|e| self.fail("sign_out", &e, SIGN_OUT_FAILED))?;
        let ticket = self.begin();
        self.commit(ticket, AuthState::clear_identity);
        Ok(())
    }

    /// Patch the signed-in user's profile row and adopt the row the backend
    /// returns.
    ///
    /// # Errors
    ///
    /// [`AuthError::NotAuthenticated`] without contacting the backend when no
    /// user is loaded; otherwise the backend's message.
    pub async fn update_profile(&self, updates: &ProfileUpdate) -> Result<Profile, AuthError> {
        let Some(user_id) = self.current_user_id() else {
            let err = AuthError::NotAuthenticated;
            self.set_error(Some(err.to_string()));
            return Err(err);
        };

        self.set_error(None);
        let profile: Profile =
            backend::update_row(self.backend.as_ref(), updates, &RowFilter::eq("user_id", &user_id))
                .await
                .map_err(|e| self.fail("update_profile", &e, UPDATE_PROFILE_FAILED))?;

        self.state.send_if_modified(|state| match state.user.as_mut() {
            Some(user) if user.id() == user_id => {
                user.profile = Some(profile.clone());
                state.profile = Some(profile.clone());
                true
            }
            _ => {
                warn!(user_id = %user_id, "user changed during profile update; keeping current state");
                false
            }
        });
        Ok(profile)
    }

    /// Send a password recovery email.
    ///
    /// # Errors
    ///
    /// Returns the backend's message.
    pub async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        self.set_error(None);
        self.backend
            .reset_password_for_email(email)
            .await
            .map_err(|e| self.fail("reset_password", &e, RESET_PASSWORD_FAILED))
    }

    // =========================================================================
    // STATE WRITES
    // =========================================================================

    fn current_user_id(&self) -> Option<String> {
        self.state.borrow().user.as_ref().map(|u| u.id().to_owned())
    }

    fn begin(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn commit(&self, ticket: u64, apply: impl FnOnce(&mut AuthState)) {
        let current = self.epoch.load(Ordering::SeqCst);
        if current != ticket {
            debug!(ticket, current, "discarding stale auth state write");
            return;
        }
        self.state.send_modify(apply);
    }

    fn settle(&self) {
        self.state.send_if_modified(|state| std::mem::replace(&mut state.loading, false));
    }

    fn set_error(&self, error: Option<String>) {
        self.state.send_if_modified(|state| {
            if state.error == error {
                return false;
            }
            state.error = error;
            true
        });
    }

    fn fail(&self, op: &'static str, err: &BackendError, fallback: &str) -> AuthError {
        let err = AuthError::from_backend(err, fallback);
        warn!(op, error = %err, "auth operation failed");
        self.set_error(Some(err.to_string()));
        err
    }
}
