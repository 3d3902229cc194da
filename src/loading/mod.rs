//! Async-progress counters behind the blocking loading overlays.
//!
//! DESIGN
//! ======
//! One counter type, instantiated per trigger domain ([`LoadingKind`]).
//! The count lives inside a `watch` channel and every update goes through
//! `send_modify`/`send_if_modified`, so increments and decrements from any
//! thread are serialized and overlays observe each transition.
//!
//! Acquisition is scoped: [`LoadingTicket`] decrements exactly once when it is
//! released or dropped, which covers success, failure, panics and futures
//! dropped mid-flight.
//!
//! TRADE-OFFS
//! ==========
//! An unmatched `hide()` clamps at zero instead of going negative. That keeps
//! the overlay from getting stuck but can mask a double release, so it is
//! logged at `warn`.

mod navigation;
mod query;


use std::future::Future;
use std::pin::pin;
use std::sync::Arc;

use futures::future::{self, Either};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

pub use navigation::NavigationLoader;
pub use query::QueryTracker;

use crate::error::Cancelled;

/// Trigger domain of a coordinator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoadingKind {
    /// Manual show/hide and `with_loading` call sites.
    Generic,
    /// Registered data fetches.
    Query,
    /// Navigation transitions.
    Navigation,
}

impl LoadingKind {
    pub const ALL: [Self; 3] = [Self::Generic, Self::Query, Self::Navigation];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Query => "query",
            Self::Navigation => "navigation",
        }
    }
}

// =============================================================================
// COORDINATOR
// =============================================================================

/// Clonable handle over one in-flight counter. Clones share the count.
#[derive(Clone, Debug)]
pub struct LoadingCoordinator {
    kind: LoadingKind,
    count: Arc<watch::Sender<usize>>,
}

impl LoadingCoordinator {
    #[must_use]
    pub fn new(kind: LoadingKind) -> Self {
        let (count, _) = watch::channel(0);
        Self { kind, count: Arc::new(count) }
    }

    #[must_use]
    pub fn kind(&self) -> LoadingKind {
        self.kind
    }

    pub fn show(&self) {
        self.count.send_modify(|count| *count += 1);
        trace!(kind = self.kind.as_str(), in_flight = self.in_flight(), "loading show");
    }

    /// Decrement, clamped at zero.
    pub fn hide(&self) {
        let mut unmatched = false;
        self.count.send_if_modified(|count| {
            if *count == 0 {
                unmatched = true;
                return false;
            }
            *count -= 1;
            true
        });
        if unmatched {
            warn!(kind = self.kind.as_str(), "hide without matching show; counter stays at zero");
        } else {
            trace!(kind = self.kind.as_str(), in_flight = self.in_flight(), "loading hide");
        }
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        *self.count.borrow()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight() > 0
    }

    /// Receiver for overlays; the overlay is visible iff the value is > 0.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.count.subscribe()
    }

    /// Show now; hide when the ticket is released or dropped.
    pub fn acquire(&self) -> LoadingTicket {
        self.show();
        LoadingTicket { coordinator: Some(self.clone()) }
    }

    /// Track `op` for its whole lifetime and return its output unchanged.
    ///
    /// The counter is incremented when this is called, not when the returned
    /// future is first polled, and decremented once when that future
    /// completes or is dropped.
    pub fn with_loading<F: Future>(&self, op: F) -> impl Future<Output = F::Output> + use<F> {
        let ticket = self.acquire();
        async move {
            let _ticket = ticket;
            op.await
        }
    }

    /// Like [`with_loading`](Self::with_loading), but gives up when `token`
    /// fires. The operation is dropped and the counter decremented once.
    pub fn with_loading_cancellable<F: Future>(
        &self,
        token: CancellationToken,
        op: F,
    ) -> impl Future<Output = Result<F::Output, Cancelled>> + use<F> {
        let ticket = self.acquire();
        let kind = self.kind;
        async move {
            let _ticket = ticket;
            if token.is_cancelled() {
                debug!(kind = kind.as_str(), "tracked operation cancelled before start");
                return Err(Cancelled);
            }
            let op = pin!(op);
            let cancelled = pin!(token.cancelled());
            match future::select(op, cancelled).await {
                Either::Left((output, _)) => Ok(output),
                Either::Right(((), _)) => {
                    debug!(kind = kind.as_str(), "tracked operation cancelled");
                    Err(Cancelled)
                }
            }
        }
    }
}

/// Scoped hold on a coordinator.
#[derive(Debug)]
#[must_use = "dropping the ticket hides the loading flag immediately"]
pub struct LoadingTicket {
    coordinator: Option<LoadingCoordinator>,
}

impl LoadingTicket {
    /// Release explicitly. Equivalent to dropping the ticket.
    pub fn release(mut self) {
        if let Some(coordinator) = self.coordinator.take() {
            coordinator.hide();
        }
    }
}

impl Drop for LoadingTicket {
    fn drop(&mut self) {
        if let Some(coordinator) = self.coordinator.take() {
            coordinator.hide();
        }
    }
}

// =============================================================================
// HUB
// =============================================================================

/// The three coordinators of a session. Each drives its own overlay.
#[derive(Clone, Debug)]
pub struct LoadingHub {
    generic: LoadingCoordinator,
    query: LoadingCoordinator,
    navigation: LoadingCoordinator,
}

impl LoadingHub {
    #[must_use]
    pub fn new() -> Self {
        Self {
            generic: LoadingCoordinator::new(LoadingKind::Generic),
            query: LoadingCoordinator::new(LoadingKind::Query),
            navigation: LoadingCoordinator::new(LoadingKind::Navigation),
        }
    }

    #[must_use]
    pub fn coordinator(&self, kind: LoadingKind) -> &LoadingCoordinator {
        match kind {
            LoadingKind::Generic => &self.generic,
            LoadingKind::Query => &self.query,
            LoadingKind::Navigation => &self.navigation,
        }
    }

    #[must_use]
    pub fn generic(&self) -> &LoadingCoordinator {
        &self.generic
    }

    /// True while any of the three counters is non-zero.
    #[must_use]
    pub fn any_loading(&self) -> bool {
        LoadingKind::ALL.iter().any(|kind| self.coordinator(*kind).is_loading())
    }
}

impl Default for LoadingHub {
    fn default() -> Self {
        Self::new()
    }
}
