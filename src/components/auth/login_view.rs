use dioxus::prelude::*;

use crate::error::ApiError;
use crate::session::{self, forms, SessionState};

use super::super::{use_api, use_cache, use_location, use_session, use_view, View};

/// Login form.
///
/// Validation runs client-side before any request; network and auth
/// failures surface as an inline banner, never as a crash. On success the
/// session becomes the source of truth and the user returns to where the
/// gated action interrupted them (the `redirect` target), or the catalog.
#[component]
pub fn LoginView(redirect: Option<String>) -> Element {
    let api = use_api();
    let cache = use_cache();
    let location = use_location();
    let mut session = use_session();
    let mut view = use_view();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut banner = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let submit = {
        let api = api.clone();
        let cache = cache.clone();
        let location = location.clone();
        let redirect = redirect.clone();
        move |_| {
            if busy() {
                return;
            }
            let email_value = email.peek().trim().to_string();
            let password_value = password.peek().clone();
            if let Err(err) = forms::validate_login(&email_value, &password_value) {
                banner.set(Some(err.to_string()));
                return;
            }
            banner.set(None);
            busy.set(true);

            let api = api.clone();
            let cache = cache.clone();
            let location = location.clone();
            let redirect = redirect.clone();
            spawn(async move {
                match session::login(api.0.as_ref(), &email_value, &password_value).await {
                    Ok(user) => {
                        // Anything user-scoped cached while signed out (or
                        // for a previous account) is void now.
                        cache.invalidate_user_scoped();
                        session.set(SessionState::Authenticated(user));
                        match redirect {
                            Some(target) => location.0.push(&target),
                            None => location.0.push("/"),
                        }
                        view.set(View::Catalog);
                    }
                    Err(ApiError::Unauthorized) => {
                        banner.set(Some("Incorrect email or password".to_string()));
                        busy.set(false);
                    }
                    Err(ApiError::Status { detail, .. }) => {
                        banner.set(Some(detail));
                        busy.set(false);
                    }
                    Err(err) => {
                        banner.set(Some(err.to_string()));
                        busy.set(false);
                    }
                }
            });
        }
    };

    rsx! {
        section { class: "bw-view bw-view--auth",
            form {
                class: "bw-auth-card",
                onsubmit: {
                    let mut submit = submit.clone();
                    move |evt: FormEvent| {
                        evt.prevent_default();
                        submit(());
                    }
                },

                h2 { class: "bw-auth-title", "Welcome back" }

                if let Some(message) = banner() {
                    div { class: "bw-form-banner", "{message}" }
                }

                label { class: "bw-field",
                    span { class: "bw-field-label", "Email" }
                    input {
                        class: "bw-input",
                        r#type: "email",
                        placeholder: "you@example.com",
                        value: "{email}",
                        oninput: move |evt| email.set(evt.value()),
                    }
                }

                label { class: "bw-field",
                    span { class: "bw-field-label", "Password" }
                    input {
                        class: "bw-input",
                        r#type: "password",
                        placeholder: "At least 8 characters",
                        value: "{password}",
                        oninput: move |evt| password.set(evt.value()),
                    }
                }

                button {
                    class: "bw-btn bw-btn--primary bw-btn--block",
                    r#type: "submit",
                    disabled: busy(),
                    if busy() { "Signing in…" } else { "Sign in" }
                }

                p { class: "bw-auth-switch",
                    "New here? "
                    a {
                        href: "#",
                        onclick: move |evt| {
                            evt.prevent_default();
                            view.set(View::Signup);
                        },
                        "Create an account"
                    }
                }
            }
        }
    }
}
