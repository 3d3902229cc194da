//! Session capability object.
//!
//! DESIGN
//! ======
//! Built once at process start and passed to whatever needs it. Nothing in
//! this crate reaches for a global; tests build a fresh context each time.

use std::sync::Arc;

use tracing::info;

use crate::auth::{AuthStore, FileProfileStorage, ProfileStorage};
use crate::config::SessionConfig;
use crate::guard::RouteGuard;
use crate::loading::{LoadingCoordinator, LoadingHub, LoadingKind, NavigationLoader, QueryTracker};

#[derive(Clone, Debug)]
pub struct SessionContext {
    pub config: SessionConfig,
    pub auth: AuthStore,
    pub loading: LoadingHub,
    pub queries: QueryTracker,
    pub navigation: NavigationLoader,
}

impl SessionContext {
    #[must_use]
    pub fn new(config: SessionConfig, storage: Arc<dyn ProfileStorage>) -> Self {
        let loading = LoadingHub::new();
        let queries = QueryTracker::new(loading.coordinator(LoadingKind::Query).clone());
        let navigation = NavigationLoader::new(loading.coordinator(LoadingKind::Navigation).clone());
        Self { config, auth: AuthStore::new(storage), loading, queries, navigation }
    }

    /// Context for native shells: the profile lives in a JSON file at
    /// `config.profile_path`.
    #[must_use]
    pub fn native(config: SessionConfig) -> Self {
        info!(profile_path = %config.profile_path.display(), "session context with file storage");
        let storage = Arc::new(FileProfileStorage::new(config.profile_path.clone()));
        Self::new(config, storage)
    }

    /// Coordinator for manual `show`/`hide`/`with_loading` call sites.
    #[must_use]
    pub fn loader(&self) -> &LoadingCoordinator {
        self.loading.generic()
    }

    /// Fresh guard over the configured route groups.
    #[must_use]
    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(self.config.routes.clone())
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
