//! Session configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Every knob has a compiled-in default so a missing or unparsable variable
//! never prevents startup. The client embeds the defaults directly; native
//! shells call [`SessionConfig::from_env`].

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_AUTH_GROUP: &str = "(auth)";
pub const DEFAULT_LOGIN_PATH: &str = "/(auth)/login";
pub const DEFAULT_HOME_PATH: &str = "/(tabs)/home";
pub const DEFAULT_NAV_MASK_MS: u64 = 500;
pub const DEFAULT_PROFILE_PATH: &str = "storefront-profile.json";

/// Route layout the guard enforces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteGroups {
    /// First path segment that marks the unauthenticated route group.
    pub auth_group: String,
    /// Entry point for unauthenticated users.
    pub login_path: String,
    /// Entry point for authenticated users.
    pub home_path: String,
}

impl Default for RouteGroups {
    fn default() -> Self {
        Self {
            auth_group: DEFAULT_AUTH_GROUP.to_owned(),
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
            home_path: DEFAULT_HOME_PATH.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub routes: RouteGroups,
    /// How long a navigation transition is masked by the overlay, at most.
    pub nav_mask_ms: u64,
    /// Location of the durable profile document for native shells.
    pub profile_path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            routes: RouteGroups::default(),
            nav_mask_ms: DEFAULT_NAV_MASK_MS,
            profile_path: PathBuf::from(DEFAULT_PROFILE_PATH),
        }
    }
}

impl SessionConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `STOREFRONT_AUTH_GROUP`: default `(auth)`
    /// - `STOREFRONT_LOGIN_PATH`: default `/(auth)/login`
    /// - `STOREFRONT_HOME_PATH`: default `/(tabs)/home`
    /// - `STOREFRONT_NAV_MASK_MS`: default 500
    /// - `STOREFRONT_PROFILE_PATH`: default `storefront-profile.json`
    #[must_use]
    pub fn from_env() -> Self {
        let routes = RouteGroups {
            auth_group: env_string("STOREFRONT_AUTH_GROUP", DEFAULT_AUTH_GROUP),
            login_path: env_string("STOREFRONT_LOGIN_PATH", DEFAULT_LOGIN_PATH),
            home_path: env_string("STOREFRONT_HOME_PATH", DEFAULT_HOME_PATH),
        };
        Self {
            routes,
            nav_mask_ms: env_parse("STOREFRONT_NAV_MASK_MS", DEFAULT_NAV_MASK_MS),
            profile_path: PathBuf::from(env_string("STOREFRONT_PROFILE_PATH", DEFAULT_PROFILE_PATH)),
        }
    }

    #[must_use]
    pub fn nav_mask(&self) -> Duration {
        Duration::from_millis(self.nav_mask_ms)
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
