use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    components::{Route, Router, Routes},
    path,
};

use crate::{
    guard::Protected,
    pages::{dashboard::Dashboard, login::LoginPage},
    session::{self, BrowserStorage, Session, SessionState},
};

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let state = RwSignal::new(SessionState::Loading);

    // Resolve the stored session once, after the first render shows the loading state.
    Effect::new(move |_| {
        state.set(session::derive(&BrowserStorage::local()));
    });

    let on_login = Callback::new(move |session: Session| {
        session::persist(&BrowserStorage::local(), &session);
        state.set(SessionState::Authenticated(session));
    });

    let on_logout = Callback::new(move |_: ()| {
        session::clear(&BrowserStorage::local());
        state.set(SessionState::Anonymous);
    });

    view! {
        <Title text="Carelog"/>
        <Router>
            <main>
                <Routes fallback=|| view! { <p>"Page not found."</p> }>
                    <Route
                        path=path!("/")
                        view=move || view! { <LoginPage state=state on_login=on_login/> }
                    />
                    <Route
                        path=path!("/dashboard")
                        view=move || {
                            view! {
                                <Protected
                                    state=state
                                    render=move |session: Session| {
                                        view! { <Dashboard session=session on_logout=on_logout/> }
                                            .into_any()
                                    }
                                />
                            }
                        }
                    />
                </Routes>
            </main>
        </Router>
    }
}
