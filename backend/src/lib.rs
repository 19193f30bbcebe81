//! Hosted backend contract shared by the `client` and `server` crates.
//!
//! This crate owns everything the app knows about the external
//! database-as-a-service: the auth/row [`Backend`] trait the UI talks to,
//! the REST implementation ([`RestBackend`]), the typed table rows, and the
//! session persistence seam.
//!
//! ARCHITECTURE
//! ============
//! The UI never talks HTTP directly. It holds an `Arc<dyn Backend>` so the
//! session manager can be driven by a mock in tests and by [`RestBackend`]
//! in the browser.

pub mod config;
pub mod contract;
pub mod error;
pub mod rest;
pub mod schema;
pub mod storage;
pub mod types;

pub use config::BackendConfig;
pub use contract::{AuthSubscription, Backend, RowFilter, fetch_row, update_row};
pub use error::BackendError;
pub use rest::RestBackend;
pub use storage::{MemoryStorage, SessionStorage};
pub use types::{AuthChangeEvent, AuthResponse, AuthStateChange, Session, User};
