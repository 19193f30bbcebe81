//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read auth state from the `AuthProvider` context and never write
//! it directly; mutations go through `SessionManager`.

pub mod auth_provider;
pub mod page_shell;
pub mod protected_route;
