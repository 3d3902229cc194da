//! # storefront-client
//!
//! Leptos binding for the `storefront` session core. Provides the session
//! context to components, wires the route guard to `leptos_router`, and
//! renders the blocking loading overlays.
//!
//! Screens live elsewhere; the pages here are the two guard entry points.

pub mod app;
pub mod components;
pub mod pages;
pub mod state;
pub mod util;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
