use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_solid_icons::FaTrash;
use dioxus_free_icons::Icon;
use store::{Note, NoteId};

/// One note in the list with its delete control.
#[component]
pub fn NoteCard(note: Note, on_delete: EventHandler<NoteId>) -> Element {
    let id = note.id.clone();

    rsx! {
        article {
            class: "note-card",
            div {
                class: "note-card__header",
                h3 { class: "note-card__title", "{note.title}" }
                button {
                    class: "note-card__delete",
                    title: "Delete note",
                    aria_label: "Delete note",
                    onclick: move |_| on_delete.call(id.clone()),
                    Icon { icon: FaTrash, width: 14, height: 14 }
                }
            }
            p { class: "note-card__content", "{note.content}" }
            time {
                class: "note-card__date",
                datetime: note.created_at.to_rfc3339(),
                "{note.created_label()}"
            }
        }
    }
}
