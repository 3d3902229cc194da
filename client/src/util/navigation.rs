//! Router navigation that masks the transition with the navigation overlay.

#[cfg(all(test, not(feature = "hydrate")))]
#[path = "navigation_test.rs"]
mod navigation_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use storefront::{Navigator, SessionContext, SessionError};

/// Wraps the router's navigate function. Every call shows the navigation
/// overlay for the configured mask window.
#[derive(Clone)]
pub struct MaskedNavigator<F> {
    navigate: F,
    ctx: SessionContext,
}

impl<F> MaskedNavigator<F>
where
    F: Fn(&str, NavigateOptions),
{
    pub fn new(navigate: F, ctx: SessionContext) -> Self {
        Self { navigate, ctx }
    }

    pub fn go(&self, path: &str, options: NavigateOptions) {
        // The overlay is raised when the mask is created, before the router
        // starts the transition.
        let mask = self.ctx.navigation.mask(crate::util::time::sleep_ms(self.ctx.config.nav_mask_ms));
        (self.navigate)(path, options);
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(mask);
        #[cfg(not(feature = "hydrate"))]
        drop(mask);
    }
}

impl<F> Navigator for MaskedNavigator<F>
where
    F: Fn(&str, NavigateOptions),
{
    fn replace(&self, path: &str) -> Result<(), SessionError> {
        self.go(path, NavigateOptions { replace: true, ..NavigateOptions::default() });
        Ok(())
    }
}

/// Masked counterpart of `use_navigate`. Must be called inside `<Router>`.
pub fn use_masked_navigate() -> MaskedNavigator<impl Fn(&str, NavigateOptions) + Clone + 'static> {
    MaskedNavigator::new(use_navigate(), expect_context::<SessionContext>())
}
