//! Registration page view with email/password form.

use api::Registration;
use dioxus::prelude::*;
use ui::{spawn_guest_transfer, use_guest_bridge, use_session_store};

use super::sign_in_error;
use crate::Route;

/// Register page component.
#[component]
pub fn Register() -> Element {
    let store = use_session_store();
    let guest = use_guest_bridge();
    let nav = use_navigator();
    let mut first_name = use_signal(String::new);
    let mut last_name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let handle_register = move |evt: FormEvent| {
        evt.prevent_default();
        let store = store.clone();
        let guest = guest.clone();
        spawn(async move {
            error.set(None);

            let e = email().trim().to_string();
            let p = password();
            let cp = confirm_password();

            if e.is_empty() || !e.contains('@') {
                error.set(Some("Please enter a valid email".to_string()));
                return;
            }
            if p.len() < 8 {
                error.set(Some("Password must be at least 8 characters".to_string()));
                return;
            }
            if p != cp {
                error.set(Some("Passwords do not match".to_string()));
                return;
            }

            let optional = |value: String| {
                let value = value.trim().to_string();
                (!value.is_empty()).then_some(value)
            };
            let registration = Registration {
                email: e,
                password: p,
                first_name: optional(first_name()),
                last_name: optional(last_name()),
            };

            loading.set(true);
            match store.register(&registration).await {
                Ok(_) => {
                    spawn_guest_transfer(store.clone(), guest);
                    nav.replace(Route::Home {});
                }
                Err(err) => {
                    loading.set(false);
                    error.set(sign_in_error(&err));
                }
            }
        });
    };

    rsx! {
        div {
            class: "auth-page",

            h1 { "Create your account" }
            p { class: "muted", "Your guest progress comes with you" }

            form {
                onsubmit: handle_register,
                class: "auth-form",

                if let Some(err) = error() {
                    div { class: "alert alert-error", "{err}" }
                }

                div {
                    class: "form-row",
                    input {
                        placeholder: "First name",
                        value: first_name(),
                        oninput: move |evt: FormEvent| first_name.set(evt.value()),
                    }
                    input {
                        placeholder: "Last name",
                        value: last_name(),
                        oninput: move |evt: FormEvent| last_name.set(evt.value()),
                    }
                }

                input {
                    r#type: "email",
                    placeholder: "Email",
                    value: email(),
                    oninput: move |evt: FormEvent| email.set(evt.value()),
                }

                input {
                    r#type: "password",
                    placeholder: "Password (at least 8 characters)",
                    value: password(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }

                input {
                    r#type: "password",
                    placeholder: "Confirm password",
                    value: confirm_password(),
                    oninput: move |evt: FormEvent| confirm_password.set(evt.value()),
                }

                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Creating account..." } else { "Sign up" }
                }
            }

            p {
                class: "muted",
                "Already have an account? "
                Link { to: Route::Login {}, "Log in" }
            }
        }
    }
}
