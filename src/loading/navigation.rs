//! Navigation-bound loading: masks the delay of a route transition.
//!
//! The masking window is passed in as a future so the same code runs on
//! tokio timers natively and on browser timers in the client.

use std::future::Future;
use std::pin::pin;

use futures::future::{self, Either};
use tracing::debug;

use super::{LoadingCoordinator, LoadingTicket};

#[derive(Clone, Debug)]
pub struct NavigationLoader {
    coordinator: LoadingCoordinator,
}

impl NavigationLoader {
    #[must_use]
    pub fn new(coordinator: LoadingCoordinator) -> Self {
        Self { coordinator }
    }

    /// Start a transition whose end the caller signals by dropping the ticket.
    pub fn begin(&self) -> LoadingTicket {
        self.coordinator.acquire()
    }

    /// Show the overlay until `window` resolves.
    pub fn mask<W: Future<Output = ()>>(&self, window: W) -> impl Future<Output = ()> + use<W> {
        self.coordinator.with_loading(window)
    }

    /// Show the overlay while `navigation` runs, but no longer than `window`.
    /// The navigation itself always runs to completion.
    pub fn transition<N, W>(&self, navigation: N, window: W) -> impl Future<Output = N::Output> + use<N, W>
    where
        N: Future,
        W: Future<Output = ()>,
    {
        let ticket = self.coordinator.acquire();
        async move {
            let navigation = pin!(navigation);
            let window = pin!(window);
            match future::select(navigation, window).await {
                Either::Left((output, _)) => {
                    ticket.release();
                    output
                }
                Either::Right(((), navigation)) => {
                    ticket.release();
                    debug!("navigation outlasted its mask window");
                    navigation.await
                }
            }
        }
    }

    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.coordinator.is_loading()
    }

    #[must_use]
    pub fn coordinator(&self) -> &LoadingCoordinator {
        &self.coordinator
    }
}
