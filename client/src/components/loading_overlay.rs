//! Blocking overlay shown while a loading counter is non-zero.

use leptos::prelude::*;
use storefront::LoadingKind;

use crate::state::session::SessionSignals;

/// Full-screen modal spinner for one coordinator. Visible iff its counter is
/// above zero; renders nothing otherwise.
#[component]
pub fn LoadingOverlay(kind: LoadingKind) -> impl IntoView {
    let signals = expect_context::<SessionSignals>();
    let visible = signals.loading(kind);

    view! {
        <Show when=move || visible.get()>
            <div class="loading-overlay" data-kind=kind.as_str() role="progressbar" aria-busy="true">
                <span class="spinner"></span>
            </div>
        </Show>
    }
}
