//! Authentication state for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The route guard reads this state on every navigation change. A stored
//! profile means "authenticated"; the store starts unhydrated until the
//! durable copy has been read, and the guard stays idle until then.
//!
//! TRADE-OFFS
//! ==========
//! A failed write on login still signs the user in for this process. The
//! caller gets the error and may warn that the session will not survive a
//! restart.
//!
//! A failed clear on logout still signs the user out for this process, but
//! the stored profile survives and the next hydrate restores it. The caller
//! gets the error and must surface it.

mod storage;


use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{info, warn};

pub use storage::{FileProfileStorage, MemoryProfileStorage, ProfileStorage};

use crate::error::SessionError;

/// Signed-in user as persisted across restarts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub token: String,
    /// Unix timestamp (seconds) after which the token is no longer valid.
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl Profile {
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}

/// Snapshot of the auth collaborator, as seen by the guard.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub profile: Option<Profile>,
    /// Set once the durable profile has been read.
    pub hydrated: bool,
}

impl AuthState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.profile.is_some()
    }
}

/// Shared handle over the auth state and its durable copy.
#[derive(Clone)]
pub struct AuthStore {
    storage: Arc<dyn ProfileStorage>,
    state: Arc<watch::Sender<AuthState>>,
}

impl std::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStore").field("state", &*self.state.borrow()).finish_non_exhaustive()
    }
}

impl AuthStore {
    #[must_use]
    pub fn new(storage: Arc<dyn ProfileStorage>) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self { storage, state: Arc::new(state) }
    }

    /// Read the durable profile using the system clock for expiry.
    pub fn hydrate(&self) {
        self.hydrate_at(unix_now());
    }

    /// Read the durable profile and mark the store hydrated.
    ///
    /// Expired profiles are discarded and cleared from storage. Unreadable
    /// storage counts as "no profile". Calling this again is a no-op.
    pub fn hydrate_at(&self, now: i64) {
        if self.is_hydrated() {
            return;
        }

        let stored = match self.storage.load() {
            Ok(Some(profile)) if profile.is_expired_at(now) => {
                info!(user_id = %profile.id, "stored profile expired; discarding");
                if let Err(e) = self.storage.clear() {
                    warn!(error = %e, "failed to clear expired profile");
                }
                None
            }
            Ok(profile) => profile,
            Err(e) => {
                warn!(error = %e, "failed to load stored profile; starting signed out");
                None
            }
        };

        self.state.send_modify(|state| {
            // A login that raced hydration wins over the stored copy.
            if state.profile.is_none() {
                state.profile = stored;
            }
            state.hydrated = true;
        });
        info!(authenticated = self.is_authenticated(), "auth state hydrated");
    }

    /// Sign in: persist the profile, then publish it.
    pub fn login(&self, profile: Profile) -> Result<(), SessionError> {
        let persisted = self.storage.save(&profile);
        info!(user_id = %profile.id, "user signed in");
        self.state.send_modify(|state| {
            state.profile = Some(profile);
            state.hydrated = true;
        });
        persisted.map_err(SessionError::from)
    }

    /// Sign out: clear storage, then publish the signed-out state.
    pub fn logout(&self) -> Result<(), SessionError> {
        let cleared = self.storage.clear();
        self.state.send_modify(|state| {
            state.profile = None;
            state.hydrated = true;
        });
        info!("user signed out");
        cleared.map_err(SessionError::from)
    }

    /// Drop the profile if its token has expired. Returns `true` when the
    /// user was signed out.
    pub fn expire_if_stale(&self, now: i64) -> bool {
        let expired = self.state.borrow().profile.as_ref().is_some_and(|p| p.is_expired_at(now));
        if !expired {
            return false;
        }
        info!("session expired");
        if let Err(e) = self.logout() {
            warn!(error = %e, "failed to clear expired profile");
        }
        true
    }

    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn profile(&self) -> Option<Profile> {
        self.state.borrow().profile.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.state.borrow().hydrated
    }

    /// Receiver notified on every auth change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}
