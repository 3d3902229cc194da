//! Guard entry-point routes.
//!
//! ARCHITECTURE
//! ============
//! The catalog, cart and admin screens mount under these two entry points;
//! only the pieces the guard and loaders touch live here.

pub mod home;
pub mod login;
