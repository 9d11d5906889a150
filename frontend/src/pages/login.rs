use leptos::{ev::SubmitEvent, prelude::*, task::spawn_local};
use leptos_router::{components::Redirect, hooks::use_navigate};
use records::payloads::{LoginRequest, RegisterRequest};

use crate::{
    alert,
    api::{API_BASE_URL, ApiClient},
    session::{Session, SessionState},
};

#[component]
pub fn LoginPage(
    #[prop(into)] state: Signal<SessionState>,
    on_login: Callback<Session>,
) -> impl IntoView {
    let navigate = use_navigate();

    let (registering, set_registering) = signal(false);
    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (loading, set_loading) = signal(false);

    let submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        set_loading.set(true);

        let client = ApiClient::new(API_BASE_URL, None);
        let navigate = navigate.clone();
        let registering = registering.get_untracked();
        let (name, email, password) = (
            name.get_untracked(),
            email.get_untracked(),
            password.get_untracked(),
        );

        spawn_local(async move {
            let result = if registering {
                client
                    .register(&RegisterRequest { name, email, password })
                    .await
            } else {
                client.login(&LoginRequest { email, password }).await
            };

            match result {
                Ok(response) => {
                    on_login.run(Session::from(response));
                    navigate("/dashboard", Default::default());
                }
                Err(e) => alert(&e.0),
            }

            set_loading.set(false);
        });
    };

    view! {
        {move || {
            matches!(state.get(), SessionState::Authenticated(_))
                .then(|| view! { <Redirect path="/dashboard"/> })
        }}
        <div class="auth">
            <h1>{move || if registering.get() { "Create an account" } else { "Sign in" }}</h1>
            <form on:submit=submit>
                <Show when=move || registering.get()>
                    <label>
                        "Name"
                        <input
                            type="text"
                            required
                            prop:value=move || name.get()
                            on:input=move |ev| set_name.set(event_target_value(&ev))
                        />
                    </label>
                </Show>
                <label>
                    "Email"
                    <input
                        type="email"
                        required
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Password"
                    <input
                        type="password"
                        required
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                </label>
                <button type="submit" disabled=move || loading.get()>
                    {move || match (loading.get(), registering.get()) {
                        (true, _) => "Please wait...",
                        (false, true) => "Register",
                        (false, false) => "Login",
                    }}
                </button>
            </form>
            <button class="link" on:click=move |_| set_registering.update(|r| *r = !*r)>
                {move || {
                    if registering.get() {
                        "Already have an account? Sign in"
                    } else {
                        "New here? Create an account"
                    }
                }}
            </button>
        </div>
    }
}
