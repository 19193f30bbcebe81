//! # client
//!
//! Leptos + WASM frontend for the appointment booking app.
//!
//! This crate contains the session manager that mirrors the hosted backend's
//! auth state, the provider and route guard that expose it to the UI, the
//! route table, and the pages. The `server` crate renders it with SSR; the
//! `hydrate` feature builds the browser bundle.

pub mod app;
pub mod components;
pub mod pages;
pub mod routes;
pub mod state;
pub mod util;

/// Browser entry point: hydrate the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(app::App);
}
