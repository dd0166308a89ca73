//! Root application component with routing, context providers, and
//! session wiring.
//!
//! One `SessionStore` is built here and injected everywhere: the
//! authenticated-fetch wrapper wraps it, the route guards read its
//! reactive snapshot, and startup hydration is spawned before any
//! guarded route can make a navigation decision.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::nav_bar::NavBar;
use crate::net::auth_fetch::BrowserFetch;
use crate::net::http::GlooTransport;
use crate::pages::about::AboutPage;
use crate::pages::activities::ActivitiesPage;
use crate::pages::dashboard::{AdminDashboardPage, DashboardPage, DistrictDashboardPage};
use crate::pages::donate::DonatePage;
use crate::pages::home::HomePage;
use crate::pages::login::LoginPage;
use crate::session::{BrowserSession, LocalStorageVault, SessionState, SystemClock, TimeoutSchedule};

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    // Single session store for the whole app. Its observer mirrors every
    // transition into a reactive snapshot that guards and the nav bar read.
    let session_state = RwSignal::new(SessionState::default());
    let session = BrowserSession::new(
        SystemClock,
        LocalStorageVault,
        GlooTransport,
        TimeoutSchedule::default(),
    );
    session.set_observer(move |state| session_state.set(state));

    provide_context(session_state);
    provide_context(BrowserFetch::new(session.clone()));
    provide_context(session.clone());

    // Rebuild the session from storage; guards hold their decision until
    // this clears `loading`.
    #[cfg(feature = "hydrate")]
    {
        let session = session.clone();
        leptos::task::spawn_local(async move { session.hydrate().await });
    }

    view! {
        <Stylesheet id="leptos" href="/pkg/portal-ui.css"/>
        <Title text="Portal"/>

        <Router>
            <NavBar/>
            <main class="app-main">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=HomePage/>
                    <Route path=StaticSegment("about") view=AboutPage/>
                    <Route path=StaticSegment("activities") view=ActivitiesPage/>
                    <Route path=StaticSegment("donate") view=DonatePage/>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("dashboard") view=DashboardPage/>
                    <Route path=StaticSegment("admin") view=AdminDashboardPage/>
                    <Route path=StaticSegment("district") view=DistrictDashboardPage/>
                </Routes>
            </main>
        </Router>
    }
}
