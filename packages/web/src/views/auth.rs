//! Sign-in page.

use dioxus::prelude::*;
use store::guard::Destination;
use store::NotebookConfig;
use ui::AuthForm;

use super::RouteGuard;

#[component]
pub fn Auth() -> Element {
    let config = use_context::<NotebookConfig>();

    rsx! {
        RouteGuard {
            protects: Destination::Auth,
            div {
                class: "auth-page",
                h1 { class: "auth-page__title", "NotebookWeb" }
                p { class: "auth-page__subtitle", "Sign in to keep your notes in one place" }
                AuthForm { providers: config.auth.providers.clone() }
            }
        }
    }
}
