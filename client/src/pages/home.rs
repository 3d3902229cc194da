//! Authenticated home entry point.
//!
//! SYSTEM CONTEXT
//! ==============
//! Landing route for signed-in users. Signing out only clears the session;
//! the guard performs the redirect back to login.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use leptos::prelude::*;
use storefront::{Profile, SessionContext};

use crate::state::session::SessionSignals;

fn greeting(profile: Option<&Profile>) -> String {
    match profile.map(|p| p.name.trim()).filter(|name| !name.is_empty()) {
        Some(name) => format!("Welcome back, {name}"),
        None => "Welcome back".to_owned(),
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let signals = expect_context::<SessionSignals>();

    let on_sign_out = move |_| {
        if let Err(e) = ctx.auth.logout() {
            #[cfg(feature = "hydrate")]
            log::warn!("sign out did not clear stored profile: {e}");
            #[cfg(not(feature = "hydrate"))]
            let _ = e;
        }
    };

    view! {
        <div class="home-page">
            <h1>{move || greeting(signals.auth.get().profile.as_ref())}</h1>
            <button class="home-page__sign-out" on:click=on_sign_out>"Sign out"</button>
        </div>
    }
}
