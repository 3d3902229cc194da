//! Session context and its reactive signals.
//!
//! SYSTEM CONTEXT
//! ==============
//! `provide_session` is called once in `App`. Components read
//! `SessionSignals` for rendering and `SessionContext` for actions
//! (`with_loading`, query fetches, login/logout).

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use leptos::prelude::*;
use storefront::{AuthState, LoadingKind, SessionContext};

/// Signals mirroring the auth store and the three loading counters.
#[derive(Clone, Copy, Debug)]
pub struct SessionSignals {
    pub auth: RwSignal<AuthState>,
    pub generic: RwSignal<bool>,
    pub query: RwSignal<bool>,
    pub navigation: RwSignal<bool>,
}

impl SessionSignals {
    /// Signals seeded from the current core state.
    pub fn from_context(ctx: &SessionContext) -> Self {
        let signals = Self {
            auth: RwSignal::new(ctx.auth.snapshot()),
            generic: RwSignal::new(false),
            query: RwSignal::new(false),
            navigation: RwSignal::new(false),
        };
        for kind in LoadingKind::ALL {
            signals.sync_loading(kind, ctx.loading.coordinator(kind).in_flight());
        }
        signals
    }

    /// Mirror an in-flight count onto the overlay signal for `kind`. The
    /// signal is true exactly while the count is above zero and is only
    /// written when the flag flips.
    pub fn sync_loading(&self, kind: LoadingKind, in_flight: usize) {
        let signal = self.loading(kind);
        let loading = in_flight > 0;
        if signal.get_untracked() != loading {
            signal.set(loading);
        }
    }

    pub fn loading(&self, kind: LoadingKind) -> RwSignal<bool> {
        match kind {
            LoadingKind::Generic => self.generic,
            LoadingKind::Query => self.query,
            LoadingKind::Navigation => self.navigation,
        }
    }
}

/// Put the context and its signals into Leptos context and start the
/// bridges that keep the signals current.
pub fn provide_session(ctx: SessionContext) -> SessionSignals {
    let signals = SessionSignals::from_context(&ctx);

    #[cfg(feature = "hydrate")]
    {
        bridge_auth(ctx.auth.subscribe(), signals.auth);
        for kind in LoadingKind::ALL {
            bridge_loading(ctx.loading.coordinator(kind).subscribe(), signals, kind);
        }
    }

    provide_context(ctx);
    provide_context(signals);
    signals
}

#[cfg(feature = "hydrate")]
fn bridge_auth(mut rx: tokio::sync::watch::Receiver<AuthState>, signal: RwSignal<AuthState>) {
    leptos::task::spawn_local(async move {
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            signal.set(state);
        }
    });
}

#[cfg(feature = "hydrate")]
fn bridge_loading(mut rx: tokio::sync::watch::Receiver<usize>, signals: SessionSignals, kind: LoadingKind) {
    leptos::task::spawn_local(async move {
        while rx.changed().await.is_ok() {
            let in_flight = *rx.borrow_and_update();
            signals.sync_loading(kind, in_flight);
        }
    });
}
