//! Root application component with routing and context providers.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};
use storefront::{LoadingKind, ProfileStorage, SessionConfig, SessionContext};

use crate::components::loading_overlay::LoadingOverlay;
use crate::pages::{home::HomePage, login::LoginPage};
use crate::state::session::provide_session;
use crate::util::guard::SessionGuard;

/// How often a signed-in session is checked for token expiry.
#[cfg(feature = "hydrate")]
const TOKEN_CHECK_INTERVAL_MS: u64 = 60_000;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

fn profile_storage() -> Arc<dyn ProfileStorage> {
    #[cfg(feature = "hydrate")]
    {
        Arc::new(crate::util::storage::LocalStorageProfileStorage::default())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Arc::new(storefront::MemoryProfileStorage::new())
    }
}

/// Root application component.
///
/// Builds the session context once, provides it, and mounts the guard and
/// the three loading overlays around the routes.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let ctx = SessionContext::new(SessionConfig::default(), profile_storage());

    // Hydration reads localStorage, so it only ever runs in the browser. On
    // the server the store stays unhydrated and the guard stays idle.
    #[cfg(feature = "hydrate")]
    {
        let hydrate_ctx = ctx.clone();
        Effect::new(move || {
            hydrate_ctx.auth.hydrate_at(crate::util::time::unix_now());
            log::debug!("session hydrated; authenticated={}", hydrate_ctx.auth.is_authenticated());
        });

        let expiry_ctx = ctx.clone();
        leptos::task::spawn_local(async move {
            loop {
                crate::util::time::sleep_ms(TOKEN_CHECK_INTERVAL_MS).await;
                if expiry_ctx.auth.expire_if_stale(crate::util::time::unix_now()) {
                    log::info!("session token expired; signed out");
                }
            }
        });
    }
    provide_session(ctx);

    view! {
        <Stylesheet id="leptos" href="/pkg/storefront.css"/>
        <Title text="Storefront"/>

        <Router>
            <SessionGuard/>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=(StaticSegment("(auth)"), StaticSegment("login")) view=LoginPage/>
                <Route path=(StaticSegment("(tabs)"), StaticSegment("home")) view=HomePage/>
                <Route path=StaticSegment("") view=HomePage/>
            </Routes>
        </Router>

        <LoadingOverlay kind=LoadingKind::Generic/>
        <LoadingOverlay kind=LoadingKind::Query/>
        <LoadingOverlay kind=LoadingKind::Navigation/>
    }
}
