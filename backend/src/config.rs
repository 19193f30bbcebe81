//! Backend connection settings.
//!
//! Native builds (server, tests) read the process environment. The browser
//! bundle has no environment at runtime, so it bakes the same variables in at
//! compile time via [`BackendConfig::from_build_env`].

use crate::error::BackendError;

pub const URL_VAR: &str = "SUPABASE_URL";
pub const ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";
pub const DEFAULT_URL: &str = "http://localhost:54321";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Project base URL without trailing slash.
    pub url: String,
    /// Public anon key sent as `apikey` on every request.
    pub anon_key: String,
}

impl BackendConfig {
    #[must_use]
    pub fn new(url: &str, anon_key: &str) -> Self {
        Self { url: url.trim_end_matches('/').to_owned(), anon_key: anon_key.to_owned() }
    }

    /// Build config from `SUPABASE_URL` and `SUPABASE_ANON_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Config`] when the anon key is absent or the URL
    /// is not http(s).
    pub fn from_env() -> Result<Self, BackendError> {
        let url = std::env::var(URL_VAR).unwrap_or_else(|_| DEFAULT_URL.to_owned());
        let anon_key = std::env::var(ANON_KEY_VAR).map_err(|_| BackendError::Config(format!("{ANON_KEY_VAR} not set")))?;
        Self::parse(&url, &anon_key)
    }

    /// Build config from variables captured when the crate was compiled.
    ///
    /// # Errors
    ///
    /// Same conditions as [`BackendConfig::from_env`].
    pub fn from_build_env() -> Result<Self, BackendError> {
        let url = option_env!("SUPABASE_URL").unwrap_or(DEFAULT_URL);
        let anon_key =
            option_env!("SUPABASE_ANON_KEY").ok_or_else(|| BackendError::Config(format!("{ANON_KEY_VAR} not set at build time")))?;
        Self::parse(url, anon_key)
    }

    fn parse(url: &str, anon_key: &str) -> Result<Self, BackendError> {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(BackendError::Config(format!("{URL_VAR} must be an http(s) URL, got '{url}'")));
        }
        if anon_key.trim().is_empty() {
            return Err(BackendError::Config(format!("{ANON_KEY_VAR} is empty")));
        }
        Ok(Self::new(url, anon_key.trim()))
    }

    /// Project reference: the first host label (`abcd` for `https://abcd.supabase.co`).
    #[must_use]
    pub fn project_ref(&self) -> &str {
        let host = self
            .url
            .split_once("://")
            .map_or(self.url.as_str(), |(_, rest)| rest);
        let host = host.split(['/', ':']).next().unwrap_or(host);
        host.split('.').next().unwrap_or(host)
    }

    /// Key under which the persisted session is stored.
    #[must_use]
    pub fn storage_key(&self) -> String {
        format!("sb-{}-auth-token", self.project_ref())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
