use std::sync::{Mutex, MutexGuard};

use super::*;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// # Safety
/// Callers must hold `lock_env()` so no other test touches the environment.
unsafe fn clear_storefront_env() {
    unsafe {
        std::env::remove_var("STOREFRONT_AUTH_GROUP");
        std::env::remove_var("STOREFRONT_LOGIN_PATH");
        std::env::remove_var("STOREFRONT_HOME_PATH");
        std::env::remove_var("STOREFRONT_NAV_MASK_MS");
        std::env::remove_var("STOREFRONT_PROFILE_PATH");
    }
}

#[test]
fn from_env_uses_defaults() {
    let _env = lock_env();
    unsafe { clear_storefront_env() };

    let cfg = SessionConfig::from_env();
    assert_eq!(cfg, SessionConfig::default());
    assert_eq!(cfg.routes.auth_group, DEFAULT_AUTH_GROUP);
    assert_eq!(cfg.nav_mask(), Duration::from_millis(DEFAULT_NAV_MASK_MS));
}

#[test]
fn from_env_parses_overrides() {
    let _env = lock_env();
    unsafe {
        clear_storefront_env();
        std::env::set_var("STOREFRONT_AUTH_GROUP", "guest");
        std::env::set_var("STOREFRONT_LOGIN_PATH", "/guest/sign-in");
        std::env::set_var("STOREFRONT_HOME_PATH", "/shops");
        std::env::set_var("STOREFRONT_NAV_MASK_MS", "250");
        std::env::set_var("STOREFRONT_PROFILE_PATH", "/tmp/profile.json");
    }

    let cfg = SessionConfig::from_env();
    assert_eq!(cfg.routes.auth_group, "guest");
    assert_eq!(cfg.routes.login_path, "/guest/sign-in");
    assert_eq!(cfg.routes.home_path, "/shops");
    assert_eq!(cfg.nav_mask_ms, 250);
    assert_eq!(cfg.profile_path, PathBuf::from("/tmp/profile.json"));

    unsafe { clear_storefront_env() };
}

#[test]
fn from_env_ignores_unparsable_and_blank_values() {
    let _env = lock_env();
    unsafe {
        clear_storefront_env();
        std::env::set_var("STOREFRONT_NAV_MASK_MS", "soon");
        std::env::set_var("STOREFRONT_HOME_PATH", "   ");
    }

    let cfg = SessionConfig::from_env();
    assert_eq!(cfg.nav_mask_ms, DEFAULT_NAV_MASK_MS);
    assert_eq!(cfg.routes.home_path, DEFAULT_HOME_PATH);

    unsafe { clear_storefront_env() };
}

#[test]
fn deserialize_fills_missing_fields_with_defaults() {
    let cfg: SessionConfig = serde_json::from_str(r#"{"nav_mask_ms": 120}"#).unwrap();
    assert_eq!(cfg.nav_mask_ms, 120);
    assert_eq!(cfg.routes, RouteGroups::default());
}
