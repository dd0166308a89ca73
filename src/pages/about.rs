//! Public about page.

use leptos::prelude::*;

#[component]
pub fn AboutPage() -> impl IntoView {
    view! {
        <div class="about-page">
            <h1>"About us"</h1>
            <p>
                "The portal connects members, district administrators, and the "
                "central office. Wings run local programs; districts coordinate "
                "them; donations keep the lights on."
            </p>
            <p>
                "Members sign in to track their activities and donations. "
                "District admins manage their rosters, and the central admin "
                "team oversees wings, members, and outreach mail."
            </p>
        </div>
    }
}
