//! # storefront
//!
//! Session core of the storefront client: the authenticated-route guard and
//! the loading coordinators behind the blocking overlays.
//!
//! This crate is runtime-agnostic. It depends on `tokio` for its `sync`
//! primitives only, so the same code runs under the tokio runtime natively
//! and on `wasm-bindgen-futures` in the `storefront-client` Leptos crate.

pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod guard;
pub mod loading;

pub use auth::{AuthState, AuthStore, FileProfileStorage, MemoryProfileStorage, Profile, ProfileStorage};
pub use config::{RouteGroups, SessionConfig};
pub use context::SessionContext;
pub use error::{Cancelled, SessionError, StorageError};
pub use guard::{AuthPhase, Location, Navigator, RedirectTarget, RouteGuard, evaluate};
pub use loading::{LoadingCoordinator, LoadingHub, LoadingKind, LoadingTicket, NavigationLoader, QueryTracker};
