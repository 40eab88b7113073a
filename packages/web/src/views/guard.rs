//! Session-dependent routing.

use dioxus::prelude::*;
use store::guard::{auth_access, notes_access, Access, Destination};
use ui::use_session;

use crate::Route;

/// Renders `children` only when the session allows `protects`, otherwise
/// replaces the current route. Renders nothing until the initial session is
/// known.
#[component]
pub fn RouteGuard(protects: Destination, children: Element) -> Element {
    let session = use_session();
    let nav = use_navigator();

    let check = move || match protects {
        Destination::Notes => notes_access(&session.read()),
        Destination::Auth => auth_access(&session.read()),
    };

    use_effect(move || {
        if let Access::Redirect(to) = check() {
            tracing::debug!(from = protects.path(), to = to.path(), "redirecting");
            nav.replace(Route::from(to));
        }
    });

    match check() {
        Access::Allow => rsx! { {children} },
        Access::Pending | Access::Redirect(_) => rsx! {},
    }
}
