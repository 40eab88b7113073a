//! Sign-in form: federated provider buttons and email/password.

use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_brands_icons::{FaGithub, FaGitlab, FaGoogle, FaMicrosoft};
use dioxus_free_icons::Icon;
use store::{AuthBackend, Provider, SignUp};

use crate::session::use_backend;
use crate::time::navigate_to;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    SignIn,
    SignUp,
}

/// Inline message below the form.
#[derive(Clone, Debug, PartialEq)]
enum Notice {
    Info(String),
    Error(String),
}

/// Button that starts federated sign-in with `provider`.
#[component]
pub fn ProviderButton(provider: Provider, on_error: EventHandler<String>) -> Element {
    let backend = use_backend();
    let mut loading = use_signal(|| false);

    let onclick = move |_| {
        let backend = backend.clone();
        async move {
            loading.set(true);
            match backend.provider_sign_in_url(provider).await {
                // The page is left; `loading` stays set.
                Ok(url) => navigate_to(&url),
                Err(e) => {
                    tracing::error!("Failed to get sign-in URL: {}", e);
                    on_error.call(e.user_message());
                    loading.set(false);
                }
            }
        }
    };

    rsx! {
        button {
            class: "auth-btn auth-btn--{provider.as_str()}",
            r#type: "button",
            disabled: loading(),
            onclick,
            ProviderIcon { provider }
            if loading() {
                "Redirecting..."
            } else {
                "{provider.label()}"
            }
        }
    }
}

#[component]
fn ProviderIcon(provider: Provider) -> Element {
    match provider {
        Provider::Google => rsx! { Icon { icon: FaGoogle, width: 16, height: 16 } },
        Provider::Github => rsx! { Icon { icon: FaGithub, width: 16, height: 16 } },
        Provider::Gitlab => rsx! { Icon { icon: FaGitlab, width: 16, height: 16 } },
        Provider::Azure => rsx! { Icon { icon: FaMicrosoft, width: 16, height: 16 } },
    }
}

/// Everything the sign-in screen offers.
///
/// A successful sign-in is not reported here: the backend publishes the new
/// session and the route guard moves on to the notes.
#[component]
pub fn AuthForm(providers: Vec<Provider>) -> Element {
    let backend = use_backend();
    let mut mode = use_signal(|| Mode::SignIn);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut busy = use_signal(|| false);
    let mut notice = use_signal(|| Option::<Notice>::None);

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        let backend = backend.clone();
        async move {
            let (address, secret) = (email(), password());
            if address.trim().is_empty() || secret.is_empty() {
                notice.set(Some(Notice::Error(
                    "Enter your email address and password".to_string(),
                )));
                return;
            }

            busy.set(true);
            notice.set(None);
            let result = match mode() {
                Mode::SignIn => backend
                    .sign_in_with_password(&address, &secret)
                    .await
                    .map(|_| None),
                Mode::SignUp => backend.sign_up(&address, &secret).await.map(|outcome| {
                    match outcome {
                        SignUp::SignedIn => None,
                        SignUp::ConfirmationSent => Some(Notice::Info(
                            "Check your email for the confirmation link".to_string(),
                        )),
                    }
                }),
            };

            match result {
                Ok(next) => {
                    password.set(String::new());
                    notice.set(next);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "password authentication failed");
                    notice.set(Some(Notice::Error(e.user_message())));
                }
            }
            busy.set(false);
        }
    };

    let (submit_label, toggle_prompt, toggle_label, password_hint) = match mode() {
        Mode::SignIn => ("Sign in", "Don't have an account?", "Sign up", "current-password"),
        Mode::SignUp => ("Sign up", "Already have an account?", "Sign in", "new-password"),
    };

    rsx! {
        div {
            class: "auth-form",

            div {
                class: "auth-providers",
                for provider in providers {
                    ProviderButton {
                        key: "{provider.as_str()}",
                        provider,
                        on_error: move |message| notice.set(Some(Notice::Error(message))),
                    }
                }
            }

            div { class: "auth-divider", span { "or" } }

            form {
                class: "auth-password",
                onsubmit,

                label { r#for: "auth-email", "Email address" }
                input {
                    id: "auth-email",
                    r#type: "email",
                    autocomplete: "email",
                    placeholder: "you@example.com",
                    value: email(),
                    oninput: move |evt: FormEvent| email.set(evt.value()),
                }

                label { r#for: "auth-password", "Password" }
                input {
                    id: "auth-password",
                    r#type: "password",
                    autocomplete: password_hint,
                    value: password(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }

                button {
                    class: "auth-btn auth-btn--primary",
                    r#type: "submit",
                    disabled: busy(),
                    if busy() { "Please wait..." } else { "{submit_label}" }
                }
            }

            {notice().map(|current| match current {
                Notice::Info(message) => rsx! { p { class: "auth-notice", "{message}" } },
                Notice::Error(message) => rsx! {
                    p { class: "auth-notice auth-notice--error", role: "alert", "{message}" }
                },
            })}

            p {
                class: "auth-toggle",
                "{toggle_prompt} "
                button {
                    r#type: "button",
                    class: "link-btn",
                    onclick: move |_| {
                        notice.set(None);
                        mode.set(match mode() {
                            Mode::SignIn => Mode::SignUp,
                            Mode::SignUp => Mode::SignIn,
                        });
                    },
                    "{toggle_label}"
                }
            }
        }
    }
}
