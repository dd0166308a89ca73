//! Login page with role selection.
//!
//! A guard that bounced the visitor here put the originally requested
//! location in the `from` query parameter; a successful login returns
//! there, otherwise it lands on the dashboard.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::net::api;
use crate::session::BrowserSession;

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = expect_context::<BrowserSession>();
    let navigate = use_navigate();
    let query = use_query_map();

    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let role = RwSignal::new("user".to_owned());
    let error = RwSignal::new(None::<String>);
    let pending = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        pending.set(true);
        error.set(None);

        let body = serde_json::json!({
            "username": username.get_untracked(),
            "password": password.get_untracked(),
            "role": role.get_untracked(),
        });
        let target = query
            .read_untracked()
            .get("from")
            .filter(|from| from.starts_with('/'))
            .unwrap_or_else(|| "/dashboard".to_owned());

        let session = session.clone();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match api::login(&session, body).await {
                Ok(()) => navigate(&target, NavigateOptions::default()),
                Err(err) => {
                    error.set(Some(err.to_string()));
                    pending.set(false);
                }
            }
        });
    };

    view! {
        <div class="login-page">
            <h1>"Sign in"</h1>
            <form class="login-page__form" on:submit=on_submit>
                <label>
                    "Role"
                    <select on:change=move |ev| role.set(event_target_value(&ev))>
                        <option value="user" selected>"Member"</option>
                        <option value="district-admin">"District admin"</option>
                        <option value="admin">"Admin"</option>
                    </select>
                </label>
                <label>
                    "Username"
                    <input
                        type="text"
                        prop:value=username
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Password"
                    <input
                        type="password"
                        prop:value=password
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                </label>
                <button type="submit" disabled=move || pending.get()>
                    {move || if pending.get() { "Signing in..." } else { "Sign in" }}
                </button>
            </form>
            {move || error.get().map(|message| view! { <p class="login-page__error">{message}</p> })}
        </div>
    }
}
