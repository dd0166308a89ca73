//! Role-gated dashboard. The guard handles authentication; this page
//! only dispatches on the session's role and renders the matching panel.
//! All data comes through the authenticated-fetch wrapper, so an expired
//! session surfaces here as a sign-in prompt rather than a raw error.

use leptos::prelude::*;
use serde_json::Value;

use crate::components::route_guard::{RequireAuth, RequireRole};
use crate::net::{ApiError, BrowserFetch};
use crate::session::{Role, SessionState};

#[component]
pub fn DashboardPage() -> impl IntoView {
    view! {
        <RequireAuth>
            <DashboardBody/>
        </RequireAuth>
    }
}

/// Direct route to the admin panel, for bookmarked `/admin` links.
#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    view! {
        <RequireRole role=Role::Admin>
            <AdminPanel/>
        </RequireRole>
    }
}

/// Direct route to the district panel.
#[component]
pub fn DistrictDashboardPage() -> impl IntoView {
    view! {
        <RequireRole role=Role::DistrictAdmin>
            <DistrictPanel/>
        </RequireRole>
    }
}

#[component]
fn DashboardBody() -> impl IntoView {
    let state = expect_context::<RwSignal<SessionState>>();

    view! {
        <div class="dashboard-page">
            {move || match state.get().role {
                Some(Role::Admin) => view! { <AdminPanel/> }.into_any(),
                Some(Role::DistrictAdmin) => view! { <DistrictPanel/> }.into_any(),
                _ => view! { <MemberPanel/> }.into_any(),
            }}
        </div>
    }
}

/// Regular member view: upcoming activities and the member's donations.
#[component]
fn MemberPanel() -> impl IntoView {
    let fetch = expect_context::<BrowserFetch>();

    let activities = {
        let fetch = fetch.clone();
        LocalResource::new(move || {
            let fetch = fetch.clone();
            async move { fetch.list_activities().await.map_err(describe) }
        })
    };
    let donations = LocalResource::new(move || {
        let fetch = fetch.clone();
        async move { fetch.list_donations().await.map_err(describe) }
    });

    view! {
        <section class="panel">
            <h1>"My dashboard"</h1>
            <h2>"Activities"</h2>
            <ItemList resource=activities label_keys=&["title", "name"]/>
            <h2>"My donations"</h2>
            <ItemList resource=donations label_keys=&["purpose", "amount"]/>
        </section>
    }
}

/// Admin view: member roster with a quick-add form, wings, and mail.
#[component]
fn AdminPanel() -> impl IntoView {
    let fetch = expect_context::<BrowserFetch>();

    let members = {
        let fetch = fetch.clone();
        LocalResource::new(move || {
            let fetch = fetch.clone();
            async move { fetch.list_members().await.map_err(describe) }
        })
    };
    let wings = {
        let fetch = fetch.clone();
        LocalResource::new(move || {
            let fetch = fetch.clone();
            async move { fetch.list_wings().await.map_err(describe) }
        })
    };

    let new_member_name = RwSignal::new(String::new());
    let new_member_district = RwSignal::new(String::new());
    let form_error = RwSignal::new(None::<String>);

    let on_add_member = {
        let fetch = fetch.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            let name = new_member_name.get_untracked();
            if name.trim().is_empty() {
                return;
            }
            let body = serde_json::json!({
                "name": name,
                "district": new_member_district.get_untracked(),
            });
            let fetch = fetch.clone();
            leptos::task::spawn_local(async move {
                match fetch.create_member(body).await {
                    Ok(_) => {
                        new_member_name.set(String::new());
                        new_member_district.set(String::new());
                        form_error.set(None);
                        members.refetch();
                    }
                    Err(err) => form_error.set(Some(describe(err))),
                }
            });
        }
    };

    view! {
        <section class="panel">
            <h1>"Admin dashboard"</h1>

            <h2>"Members"</h2>
            <ItemList resource=members label_keys=&["name", "username"]/>
            <form class="panel__form" on:submit=on_add_member>
                <input
                    type="text"
                    placeholder="Member name"
                    prop:value=new_member_name
                    on:input=move |ev| new_member_name.set(event_target_value(&ev))
                />
                <input
                    type="text"
                    placeholder="District"
                    prop:value=new_member_district
                    on:input=move |ev| new_member_district.set(event_target_value(&ev))
                />
                <button type="submit">"Add member"</button>
            </form>
            {move || form_error.get().map(|message| view! { <p class="panel__error">{message}</p> })}

            <h2>"Wings"</h2>
            <ItemList resource=wings label_keys=&["name", "title"]/>
        </section>
    }
}

/// District admin view: the roster the backend scopes to this district.
#[component]
fn DistrictPanel() -> impl IntoView {
    let fetch = expect_context::<BrowserFetch>();

    let members = LocalResource::new(move || {
        let fetch = fetch.clone();
        async move { fetch.list_members().await.map_err(describe) }
    });

    view! {
        <section class="panel">
            <h1>"District dashboard"</h1>
            <h2>"District members"</h2>
            <ItemList resource=members label_keys=&["name", "username"]/>
        </section>
    }
}

/// Render a fetched list, its loading placeholder, or its error text.
#[component]
fn ItemList(
    resource: LocalResource<Result<Vec<Value>, String>>,
    label_keys: &'static [&'static str],
) -> impl IntoView {
    view! {
        <Suspense fallback=|| view! { <p>"Loading..."</p> }>
            {move || {
                resource.get().map(|outcome| match outcome {
                    Ok(items) if items.is_empty() => {
                        view! { <p class="panel__empty">"Nothing here yet."</p> }.into_any()
                    }
                    Ok(items) => view! {
                        <ul class="panel__list">
                            {items
                                .iter()
                                .map(|item| view! { <li>{label_for(item, label_keys)}</li> })
                                .collect::<Vec<_>>()}
                        </ul>
                    }
                    .into_any(),
                    Err(message) => view! { <p class="panel__error">{message}</p> }.into_any(),
                })
            }}
        </Suspense>
    }
}

/// Best-effort display label for a loosely-shaped record.
fn label_for(item: &Value, keys: &'static [&'static str]) -> String {
    keys.iter()
        .filter_map(|key| item.get(key))
        .find_map(|value| match value {
            Value::String(text) if !text.is_empty() => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| "(unnamed)".to_owned())
}

/// Page-facing error text; an expired session gets a friendlier prompt.
fn describe(error: ApiError) -> String {
    if error.is_session_expired() {
        "Session expired, please sign in again.".to_owned()
    } else {
        error.to_string()
    }
}
