//! Authenticated-route guard.
//!
//! DESIGN
//! ======
//! The redirect decision is a pure function of auth phase, location and
//! hydration ([`evaluate`]). [`RouteGuard`] wraps it with a memo so repeated
//! evaluations with unchanged inputs never issue a second redirect, and
//! [`RouteGuard::run`] drives it from change notifications.
//!
//! ERROR HANDLING
//! ==============
//! A failed `replace` is logged and not retried. The memo keeps the guard from
//! hammering the router with the same redirect on every tick.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::pin::pin;

use futures::future::{self, Either};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::auth::AuthState;
use crate::config::RouteGroups;
use crate::error::SessionError;

// =============================================================================
// LOCATION
// =============================================================================

/// Ordered route segments describing where the user currently is.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Location {
    segments: Vec<String>,
}

impl Location {
    /// Parse a router path. Query strings and fragments are ignored, as are
    /// empty segments, so `"/(auth)//login?next=x"` is `["(auth)", "login"]`.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        path.split('/').filter(|s| !s.is_empty()).map(str::to_owned).collect()
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    #[must_use]
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

impl FromIterator<String> for Location {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self { segments: iter.into_iter().collect() }
    }
}

impl From<&str> for Location {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

// =============================================================================
// DECISION
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthPhase {
    Authenticated,
    Unauthenticated,
}

impl From<&AuthState> for AuthPhase {
    fn from(state: &AuthState) -> Self {
        if state.is_authenticated() { Self::Authenticated } else { Self::Unauthenticated }
    }
}

/// Where the guard sends the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RedirectTarget {
    Login,
    Home,
}

impl RedirectTarget {
    #[must_use]
    pub fn path(self, routes: &RouteGroups) -> &str {
        match self {
            Self::Login => &routes.login_path,
            Self::Home => &routes.home_path,
        }
    }
}

/// Whether `location` belongs to the unauthenticated route group.
#[must_use]
pub fn in_auth_group(location: &Location, routes: &RouteGroups) -> bool {
    location.first() == Some(routes.auth_group.as_str()) || *location == Location::parse(&routes.login_path)
}

/// Decide whether the user must be moved. A missing location counts as
/// outside the unauthenticated group.
#[must_use]
pub fn evaluate(
    phase: AuthPhase,
    location: Option<&Location>,
    hydrated: bool,
    routes: &RouteGroups,
) -> Option<RedirectTarget> {
    if !hydrated {
        return None;
    }
    let in_group = location.is_some_and(|loc| in_auth_group(loc, routes));
    match (phase, in_group) {
        (AuthPhase::Unauthenticated, false) => Some(RedirectTarget::Login),
        (AuthPhase::Authenticated, true) => Some(RedirectTarget::Home),
        _ => None,
    }
}

// =============================================================================
// GUARD
// =============================================================================

/// Imperative router capability used by the guard.
pub trait Navigator {
    /// Replace the current history entry with `path`.
    fn replace(&self, path: &str) -> Result<(), SessionError>;
}

impl<N: Navigator + ?Sized> Navigator for &N {
    fn replace(&self, path: &str) -> Result<(), SessionError> {
        (**self).replace(path)
    }
}

/// Stateful guard: evaluates on each change and redirects at most once per
/// distinct mismatch.
#[derive(Clone, Debug)]
pub struct RouteGuard {
    routes: RouteGroups,
    last_redirect: Option<(RedirectTarget, Location)>,
}

impl RouteGuard {
    #[must_use]
    pub fn new(routes: RouteGroups) -> Self {
        Self { routes, last_redirect: None }
    }

    #[must_use]
    pub fn routes(&self) -> &RouteGroups {
        &self.routes
    }

    /// Evaluate and return a redirect only if it was not already issued for
    /// the same location.
    pub fn decide(&mut self, auth: &AuthState, location: Option<&Location>) -> Option<RedirectTarget> {
        let Some(target) = evaluate(AuthPhase::from(auth), location, auth.hydrated, &self.routes) else {
            self.last_redirect = None;
            return None;
        };
        let key = (target, location.cloned().unwrap_or_default());
        if self.last_redirect.as_ref() == Some(&key) {
            debug!(?target, "redirect already issued for this location");
            return None;
        }
        self.last_redirect = Some(key);
        Some(target)
    }

    /// Evaluate and, on mismatch, replace the current route.
    pub fn on_change<N: Navigator + ?Sized>(
        &mut self,
        auth: &AuthState,
        location: Option<&Location>,
        navigator: &N,
    ) -> Option<RedirectTarget> {
        let target = self.decide(auth, location)?;
        let path = target.path(&self.routes);
        let from = location.map_or_else(|| "<none>".to_owned(), Location::path);
        info!(?target, %from, to = path, "route guard redirect");
        if let Err(e) = navigator.replace(path) {
            warn!(error = %e, to = path, "route guard redirect failed");
        }
        Some(target)
    }

    /// Evaluate once now and again on every auth or location change. Returns
    /// when either sender is dropped.
    pub async fn run<N: Navigator>(
        mut self,
        mut auth: watch::Receiver<AuthState>,
        mut location: watch::Receiver<Location>,
        navigator: N,
    ) {
        loop {
            let state = auth.borrow_and_update().clone();
            let current = location.borrow_and_update().clone();
            self.on_change(&state, Some(&current), &navigator);

            let changed = {
                let auth_changed = pin!(auth.changed());
                let location_changed = pin!(location.changed());
                match future::select(auth_changed, location_changed).await {
                    Either::Left((result, _)) | Either::Right((result, _)) => result,
                }
            };
            if changed.is_err() {
                debug!("route guard inputs closed; stopping");
                return;
            }
        }
    }
}
