//! Query-bound loading: the overlay follows registered data fetches.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use super::LoadingCoordinator;

/// Tracks in-flight fetches by query key on top of a coordinator.
#[derive(Clone, Debug)]
pub struct QueryTracker {
    coordinator: LoadingCoordinator,
    keys: Arc<Mutex<HashMap<String, usize>>>,
}

impl QueryTracker {
    #[must_use]
    pub fn new(coordinator: LoadingCoordinator) -> Self {
        Self { coordinator, keys: Arc::new(Mutex::new(HashMap::new())) }
    }

    /// Run `fetch` registered under `key`. Registration starts immediately and
    /// ends when the returned future completes or is dropped.
    pub fn fetch<F: Future>(&self, key: &str, fetch: F) -> impl Future<Output = F::Output> + use<F> {
        let registration = KeyRegistration::new(self.keys.clone(), key);
        let tracked = self.coordinator.with_loading(fetch);
        async move {
            let _registration = registration;
            tracked.await
        }
    }

    /// True while any registered fetch is in flight.
    #[must_use]
    pub fn is_fetching(&self) -> bool {
        self.coordinator.is_loading()
    }

    #[must_use]
    pub fn fetching_count(&self) -> usize {
        self.coordinator.in_flight()
    }

    #[must_use]
    pub fn is_fetching_key(&self, key: &str) -> bool {
        lock(&self.keys).contains_key(key)
    }

    #[must_use]
    pub fn coordinator(&self) -> &LoadingCoordinator {
        &self.coordinator
    }
}

struct KeyRegistration {
    keys: Arc<Mutex<HashMap<String, usize>>>,
    key: String,
}

impl KeyRegistration {
    fn new(keys: Arc<Mutex<HashMap<String, usize>>>, key: &str) -> Self {
        *lock(&keys).entry(key.to_owned()).or_default() += 1;
        Self { keys, key: key.to_owned() }
    }
}

impl Drop for KeyRegistration {
    fn drop(&mut self) {
        let mut keys = lock(&self.keys);
        if let Some(count) = keys.get_mut(&self.key) {
            *count -= 1;
            if *count == 0 {
                keys.remove(&self.key);
            }
        }
    }
}

fn lock(keys: &Mutex<HashMap<String, usize>>) -> MutexGuard<'_, HashMap<String, usize>> {
    keys.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
