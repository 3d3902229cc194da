//! Login entry point for the unauthenticated route group.

use leptos::prelude::*;

#[component]
pub fn LoginPage() -> impl IntoView {
    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Storefront"</h1>
                <p class="login-card__subtitle">"Sign in to browse shops, leaflets and your orders."</p>
            </div>
        </div>
    }
}
