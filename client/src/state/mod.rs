//! Client-side auth state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth` holds the plain state types; `session` owns the only writer.

pub mod auth;
pub mod session;
