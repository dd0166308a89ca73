//! Public activities listing. Uses the bare transport — no session
//! required to browse what's coming up.

use leptos::prelude::*;
use serde_json::Value;

use crate::net::api;
use crate::session::BrowserSession;

#[component]
pub fn ActivitiesPage() -> impl IntoView {
    let session = expect_context::<BrowserSession>();

    let activities = LocalResource::new(move || {
        let session = session.clone();
        async move {
            api::public_activities(&session)
                .await
                .map_err(|error| error.to_string())
        }
    });

    view! {
        <div class="activities-page">
            <h1>"Activities"</h1>
            <Suspense fallback=|| view! { <p>"Loading activities..."</p> }>
                {move || {
                    activities.get().map(|outcome| match outcome {
                        Ok(items) if items.is_empty() => {
                            view! { <p>"No activities announced yet."</p> }.into_any()
                        }
                        Ok(items) => view! {
                            <ul class="activities-page__list">
                                {items.iter().map(activity_row).collect::<Vec<_>>()}
                            </ul>
                        }
                        .into_any(),
                        Err(message) => {
                            view! { <p class="activities-page__error">{message}</p> }.into_any()
                        }
                    })
                }}
            </Suspense>
        </div>
    }
}

fn activity_row(activity: &Value) -> impl IntoView + use<> {
    let title = activity
        .get("title")
        .or_else(|| activity.get("name"))
        .and_then(Value::as_str)
        .unwrap_or("(untitled)")
        .to_owned();
    let date = activity
        .get("date")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();

    view! {
        <li class="activities-page__item">
            <span class="activities-page__title">{title}</span>
            <span class="activities-page__date">{date}</span>
        </li>
    }
}
