//! Public donation form. Submits straight to the donations endpoint;
//! payment confirmation and receipts are the backend's business.

use leptos::prelude::*;

use crate::net::api;
use crate::session::BrowserSession;

#[component]
pub fn DonatePage() -> impl IntoView {
    let session = expect_context::<BrowserSession>();

    let donor = RwSignal::new(String::new());
    let amount = RwSignal::new(String::new());
    let purpose = RwSignal::new(String::new());
    let outcome = RwSignal::new(None::<Result<(), String>>);
    let pending = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        pending.set(true);
        outcome.set(None);

        let body = serde_json::json!({
            "donor": donor.get_untracked(),
            "amount": amount.get_untracked(),
            "purpose": purpose.get_untracked(),
        });
        let session = session.clone();
        leptos::task::spawn_local(async move {
            let result = api::submit_donation(&session, body)
                .await
                .map(|_| ())
                .map_err(|error| error.to_string());
            if result.is_ok() {
                donor.set(String::new());
                amount.set(String::new());
                purpose.set(String::new());
            }
            outcome.set(Some(result));
            pending.set(false);
        });
    };

    view! {
        <div class="donate-page">
            <h1>"Donate"</h1>
            <form class="donate-page__form" on:submit=on_submit>
                <label>
                    "Your name"
                    <input
                        type="text"
                        prop:value=donor
                        on:input=move |ev| donor.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Amount"
                    <input
                        type="number"
                        min="1"
                        prop:value=amount
                        on:input=move |ev| amount.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Purpose (optional)"
                    <input
                        type="text"
                        prop:value=purpose
                        on:input=move |ev| purpose.set(event_target_value(&ev))
                    />
                </label>
                <button type="submit" disabled=move || pending.get()>
                    {move || if pending.get() { "Submitting..." } else { "Donate" }}
                </button>
            </form>
            {move || {
                outcome.get().map(|result| match result {
                    Ok(()) => view! { <p class="donate-page__thanks">"Thank you for your support!"</p> }
                        .into_any(),
                    Err(message) => view! { <p class="donate-page__error">{message}</p> }.into_any(),
                })
            }}
        </div>
    }
}
