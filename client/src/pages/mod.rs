//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates rendering details
//! to `components`. Business screens are placeholders inside `PageShell`.

pub mod admin;
pub mod customer;
pub mod index;
pub mod login;
pub mod not_found;
pub mod store;
