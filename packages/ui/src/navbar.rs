use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_solid_icons::{FaBook, FaRightFromBracket};
use dioxus_free_icons::Icon;
use store::UserInfo;

#[component]
pub fn Navbar(user: Option<UserInfo>, signing_out: bool, on_sign_out: EventHandler<()>) -> Element {
    rsx! {
        header {
            class: "navbar",
            div {
                class: "navbar__brand",
                Icon { icon: FaBook, width: 18, height: 18 }
                span { "NotebookWeb" }
            }
            div {
                class: "navbar__account",
                if let Some(user) = user {
                    span { class: "navbar__user", title: user.email.clone().unwrap_or_default(), "{user.display_name()}" }
                }
                button {
                    class: "navbar__sign-out",
                    disabled: signing_out,
                    onclick: move |_| on_sign_out.call(()),
                    Icon { icon: FaRightFromBracket, width: 14, height: 14 }
                    "Sign out"
                }
            }
        }
    }
}
