//! Browser `localStorage` backend for the signed-in profile.
//!
//! SYSTEM CONTEXT
//! ==============
//! Survives reloads the way the native JSON file does. Off the browser
//! (SSR, tests) it behaves as an always-empty store.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use storefront::{Profile, ProfileStorage, StorageError};

pub const PROFILE_STORAGE_KEY: &str = "storefront_profile";

#[derive(Clone, Copy, Debug)]
pub struct LocalStorageProfileStorage {
    key: &'static str,
}

impl Default for LocalStorageProfileStorage {
    fn default() -> Self {
        Self { key: PROFILE_STORAGE_KEY }
    }
}

impl LocalStorageProfileStorage {
    pub fn with_key(key: &'static str) -> Self {
        Self { key }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }
}

#[cfg(feature = "hydrate")]
fn local_storage() -> Result<web_sys::Storage, StorageError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or_else(|| StorageError::Unavailable("localStorage is not available".to_owned()))
}

impl ProfileStorage for LocalStorageProfileStorage {
    fn load(&self) -> Result<Option<Profile>, StorageError> {
        #[cfg(feature = "hydrate")]
        {
            let raw = local_storage()?
                .get_item(self.key)
                .map_err(|_| StorageError::Unavailable("localStorage read rejected".to_owned()))?;
            match raw {
                Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
                None => Ok(None),
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Ok(None)
        }
    }

    fn save(&self, profile: &Profile) -> Result<(), StorageError> {
        let raw = serde_json::to_string(profile)?;
        #[cfg(feature = "hydrate")]
        {
            local_storage()?
                .set_item(self.key, &raw)
                .map_err(|_| StorageError::Unavailable("localStorage write rejected".to_owned()))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = raw;
            Ok(())
        }
    }

    fn clear(&self) -> Result<(), StorageError> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?
                .remove_item(self.key)
                .map_err(|_| StorageError::Unavailable("localStorage delete rejected".to_owned()))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Ok(())
        }
    }
}
