//! Top navigation bar with session-aware login/logout controls.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::session::{BrowserSession, SessionState};

/// Navigation bar. Public links always show; the dashboard link and the
/// sign-out button appear only for an authenticated session.
#[component]
pub fn NavBar() -> impl IntoView {
    let state = expect_context::<RwSignal<SessionState>>();
    let session = expect_context::<BrowserSession>();
    let navigate = use_navigate();

    let on_logout = move |_| {
        session.logout();
        navigate("/", NavigateOptions::default());
    };

    view! {
        <nav class="nav-bar">
            <a class="nav-bar__brand" href="/">"Portal"</a>
            <div class="nav-bar__links">
                <a href="/about">"About"</a>
                <a href="/activities">"Activities"</a>
                <a href="/donate">"Donate"</a>
                <Show when=move || state.get().authenticated>
                    <a href="/dashboard">"Dashboard"</a>
                </Show>
            </div>
            <div class="nav-bar__session">
                <Show
                    when=move || state.get().authenticated
                    fallback=|| view! { <a class="nav-bar__login" href="/login">"Sign in"</a> }
                >
                    <button class="nav-bar__logout" on:click=on_logout.clone()>
                        "Sign out"
                    </button>
                </Show>
            </div>
        </nav>
    }
}
