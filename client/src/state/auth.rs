//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Written only by `state::session::SessionManager`; read by route guards and
//! user-aware components through the `AuthProvider` context.
//!
//! DESIGN
//! ======
//! `user`, `profile` and `session` are a cache of backend-owned records.
//! They are replaced together on every auth event and cleared together on
//! sign-out; only an explicit profile update touches `profile` alone.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use backend::schema::Profile;
use backend::{BackendError, Session, User};

/// Signed-in identity plus its profile row, when one could be loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthUser {
    pub user: User,
    pub profile: Option<Profile>,
}

impl AuthUser {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.user.id
    }

    /// Best display name: profile first, then sign-up metadata, then email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.profile
            .as_ref()
            .and_then(|p| p.full_name.as_deref())
            .or_else(|| self.user.full_name())
            .or(self.user.email.as_deref())
            .unwrap_or(self.user.id.as_str())
    }
}

/// Coarse lifecycle phase derived from [`AuthState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthPhase {
    /// Initial session check still running.
    Initializing,
    Unauthenticated,
    Authenticated,
}

/// Client-side mirror of who is signed in.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthState {
    pub user: Option<AuthUser>,
    pub profile: Option<Profile>,
    pub session: Option<Session>,
    pub loading: bool,
    /// Message from the most recent failed operation.
    pub error: Option<String>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self { user: None, profile: None, session: None, loading: true, error: None }
    }
}

impl AuthState {
    #[must_use]
    pub fn phase(&self) -> AuthPhase {
        if self.loading {
            AuthPhase::Initializing
        } else if self.user.is_some() {
            AuthPhase::Authenticated
        } else {
            AuthPhase::Unauthenticated
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Replace user, profile and session in one step.
    pub(crate) fn replace_identity(&mut self, session: Option<Session>, profile: Option<Profile>) {
        match session {
            Some(session) => {
                self.user = Some(AuthUser { user: session.user.clone(), profile: profile.clone() });
                self.profile = profile;
                self.session = Some(session);
            }
            None => self.clear_identity(),
        }
    }

    pub(crate) fn clear_identity(&mut self) {
        self.user = None;
        self.profile = None;
        self.session = None;
    }
}

/// Failure returned by session-manager operations.
///
/// Displays as the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Backend(String),

    #[error("Usuário não autenticado")]
    NotAuthenticated,
}

impl AuthError {
    /// Wrap a backend error, substituting `fallback` when it carries no text.
    #[must_use]
    pub fn from_backend(err: &BackendError, fallback: &str) -> Self {
        let message = err.to_string();
        if message.trim().is_empty() {
            Self::Backend(fallback.to_owned())
        } else {
            Self::Backend(message)
        }
    }
}
