//! # Portal
//!
//! Client-side rendered leptos app for booking appointments and logging health entries.
//!
//!
//!
//! ## Session
//! - One immutable [`session::Session`] (token + profile) at a time, persisted in `localStorage`
//! - Re-derived once at startup, see [`session::derive`]
//! - Passed explicitly into every page and every [`api::ApiClient`], never read from ambient context
//!
//!
//!
//! ## Pages
//! - `/`: login/register, bounces to the dashboard when already signed in
//! - `/dashboard`: guarded, see [`guard`]
//!
//! Every submit is one round trip followed by a full refetch of the affected list.
pub mod api;
pub mod app;
pub mod guard;
pub mod pages;
pub mod session;

pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

pub fn console_error(message: &str) {
    web_sys::console::error_1(&message.into());
}
