use dioxus::prelude::*;
use store::guard::Destination;
use ui::NotesScreen;

use super::RouteGuard;

#[component]
pub fn Notes() -> Element {
    rsx! {
        RouteGuard {
            protects: Destination::Notes,
            NotesScreen {}
        }
    }
}
