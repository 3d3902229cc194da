//! Route guard wiring for `leptos_router`.
//!
//! SYSTEM CONTEXT
//! ==============
//! Must run inside `<Router>`. The core guard decides; this module feeds it
//! the auth signal and the current pathname and performs the replace through
//! the masked navigator, so a redirect also raises the navigation overlay.

use leptos::prelude::*;
use leptos_router::hooks::use_location;
use storefront::{Location, RouteGuard, SessionContext};

use crate::state::session::SessionSignals;
use crate::util::navigation::use_masked_navigate;

/// Re-evaluate the guard whenever auth state or pathname changes.
pub fn install_route_guard(ctx: &SessionContext, signals: SessionSignals) {
    let navigator = use_masked_navigate();
    let location = use_location();
    let guard = StoredValue::new(ctx.guard());

    Effect::new(move || {
        let auth = signals.auth.get();
        let current = Location::parse(&location.pathname.get());
        guard.update_value(|guard: &mut RouteGuard| {
            guard.on_change(&auth, Some(&current), &navigator);
        });
    });
}

/// Mounts the guard. Place it as the first child of `<Router>`.
#[component]
pub fn SessionGuard() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let signals = expect_context::<SessionSignals>();
    install_route_guard(&ctx, signals);
}
