//! Route guards for protected views.
//!
//! While startup hydration is still running the guard renders a neutral
//! placeholder and makes no navigation decision, so a reload of a
//! protected page never flashes a redirect before the persisted session
//! has been read. Once loading clears, an unauthenticated visitor is
//! sent to the login page carrying the originally requested location.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use crate::session::{Role, SessionState};

/// Wrap a view that requires a signed-in session.
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    guarded(children, None)
}

/// Wrap a view that requires a signed-in session with a specific role.
/// Authenticated users with a different role are sent to the home page.
#[component]
pub fn RequireRole(role: Role, children: ChildrenFn) -> impl IntoView {
    guarded(children, Some(role))
}

fn guarded(children: ChildrenFn, required_role: Option<Role>) -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let navigate = use_navigate();
    let location = use_location();

    Effect::new(move || {
        let state = session.get();
        if state.loading {
            return;
        }
        if !state.authenticated {
            let from = location.pathname.get_untracked();
            navigate(&format!("/login?from={from}"), NavigateOptions::default());
        } else if required_role.is_some() && state.role != required_role {
            navigate("/", NavigateOptions::default());
        }
    });

    move || {
        let state = session.get();
        if state.loading {
            view! { <div class="guard__placeholder">"Checking session..."</div> }.into_any()
        } else if !state.authenticated || (required_role.is_some() && state.role != required_role) {
            // The effect above is navigating away; render nothing visible.
            view! { <div class="guard__placeholder"></div> }.into_any()
        } else {
            children().into_any()
        }
    }
}
