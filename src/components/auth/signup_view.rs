use dioxus::prelude::*;

use crate::error::ApiError;
use crate::session::{self, forms, SessionState};

use super::super::{use_api, use_cache, use_location, use_session, use_view, View};

/// Signup form: name, email, password + confirmation.
///
/// Same failure discipline as login: client-side validation first, inline
/// banner for backend rejections (e.g. the duplicate-email 400).
#[component]
pub fn SignupView() -> Element {
    let api = use_api();
    let cache = use_cache();
    let location = use_location();
    let mut session = use_session();
    let mut view = use_view();

    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm = use_signal(String::new);
    let mut banner = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let submit = {
        let api = api.clone();
        let cache = cache.clone();
        let location = location.clone();
        move |_| {
            if busy() {
                return;
            }
            let name_value = name.peek().trim().to_string();
            let email_value = email.peek().trim().to_string();
            let password_value = password.peek().clone();
            let confirm_value = confirm.peek().clone();
            if let Err(err) =
                forms::validate_signup(&name_value, &email_value, &password_value, &confirm_value)
            {
                banner.set(Some(err.to_string()));
                return;
            }
            banner.set(None);
            busy.set(true);

            let api = api.clone();
            let cache = cache.clone();
            let location = location.clone();
            spawn(async move {
                match session::signup(api.0.as_ref(), &name_value, &email_value, &password_value)
                    .await
                {
                    Ok(user) => {
                        cache.invalidate_user_scoped();
                        session.set(SessionState::Authenticated(user));
                        location.0.push("/");
                        view.set(View::Catalog);
                    }
                    Err(ApiError::Status { detail, .. }) => {
                        // e.g. "Email already registered"
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

                h2 { class: "bw-auth-title", "Create your account" }

                if let Some(message) = banner() {
                    div { class: "bw-form-banner", "{message}" }
                }

                label { class: "bw-field",
                    span { class: "bw-field-label", "Name" }
                    input {
                        class: "bw-input",
                        r#type: "text",
                        placeholder: "How should we greet you?",
                        value: "{name}",
                        oninput: move |evt| name.set(evt.value()),
                    }
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

                label { class: "bw-field",
                    span { class: "bw-field-label", "Confirm password" }
                    input {
                        class: "bw-input",
                        r#type: "password",
                        placeholder: "Same as above",
                        value: "{confirm}",
                        oninput: move |evt| confirm.set(evt.value()),
                    }
                }

                button {
                    class: "bw-btn bw-btn--primary bw-btn--block",
                    r#type: "submit",
                    disabled: busy(),
                    if busy() { "Creating account…" } else { "Sign up" }
                }

                p { class: "bw-auth-switch",
                    "Already have an account? "
                    a {
                        href: "#",
                        onclick: move |evt| {
                            evt.prevent_default();
                            view.set(View::Login { redirect: None });
                        },
                        "Sign in"
                    }
                }
            }
        }
    }
}
