//! Route guard for pages that need a signed-in user.
use leptos::prelude::*;
use leptos_router::components::Redirect;

use crate::session::{Session, SessionState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// Storage not read yet.
    Wait,
    Redirect,
    Allow(Session),
}

pub fn resolve(state: &SessionState) -> Guard {
    match state {
        SessionState::Loading => Guard::Wait,
        SessionState::Anonymous => Guard::Redirect,
        SessionState::Authenticated(session) => Guard::Allow(session.clone()),
    }
}

#[component]
pub fn Protected<F>(#[prop(into)] state: Signal<SessionState>, render: F) -> impl IntoView
where
    F: Fn(Session) -> AnyView + Send + Sync + 'static,
{
    move || match resolve(&state.get()) {
        Guard::Wait => view! {
            <div class="loading">"Loading..."</div>
        }
        .into_any(),
        Guard::Redirect => view! { <Redirect path="/"/> }.into_any(),
        Guard::Allow(session) => render(session),
    }
}
