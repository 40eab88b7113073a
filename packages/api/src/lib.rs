//! # API crate: client for the hosted auth and data services
//!
//! This crate implements the backend traits from the `store` crate against a
//! Supabase-compatible project. The web, and any future native, frontends use
//! [`SupabaseClient`] as their only way to reach persistent state.
//!
//! ## Modules
//!
//! | Module | Target | Purpose |
//! |--------|--------|---------|
//! | [`auth`] | all | Password and PKCE federated sign-in, sign-up, token refresh, sign-out, session persistence |
//! | [`config`] | all | Environment overlay for the client configuration (`dotenvy` natively) |
//! | `rest` | all | `notes` list / insert / delete over the data service |
//! | `models` | all | Wire formats of token responses, user objects and error bodies |
//! | [`local_storage`] | wasm32 | `localStorage`-backed session storage and redirect query access |
//!
//! ## Session flow
//!
//! [`SupabaseClient`] owns the one [`SessionHub`](store::SessionHub) of the
//! application. Sign-in, refresh, expiry and sign-out all publish into it;
//! the UI subscribes through [`AuthBackend::subscribe`](store::AuthBackend::subscribe).

pub mod auth;
mod client;
pub mod config;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;
mod models;
mod rest;

pub use client::SupabaseClient;

/// Query string of the page the app was loaded on, if it carries one.
pub fn redirect_query() -> Option<String> {
    #[cfg(target_arch = "wasm32")]
    {
        local_storage::current_query()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}

/// Remove a consumed redirect query from the address bar.
pub fn clear_redirect_query() {
    #[cfg(target_arch = "wasm32")]
    local_storage::clear_query();
}
