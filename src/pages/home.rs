//! Public landing page.

use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="home-page">
            <section class="home-page__hero">
                <h1>"Serving communities, one district at a time"</h1>
                <p>
                    "We organize relief drives, education programs, and local "
                    "wings across every district. Join an activity or support "
                    "the work with a donation."
                </p>
                <div class="home-page__actions">
                    <a class="btn btn--primary" href="/activities">"See activities"</a>
                    <a class="btn" href="/donate">"Donate"</a>
                </div>
            </section>
        </div>
    }
}
