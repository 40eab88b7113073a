//! The signed-in screen: new-note form, note list and sign-out.

use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_solid_icons::FaCirclePlus;
use dioxus_free_icons::Icon;
use store::notes::{self, NotesModel, NotesView};
use store::{NoteId, Toast, Toasts};
use tokio_util::sync::CancellationToken;

use crate::navbar::Navbar;
use crate::note_card::NoteCard;
use crate::session::{use_backend, use_session};
use crate::toaster::use_toasts;

/// Workflow sink backed by the screen's signals.
#[derive(Clone, Copy)]
struct ScreenView {
    model: Signal<NotesModel>,
    toasts: Signal<Toasts>,
}

impl NotesView for ScreenView {
    fn update<R>(&mut self, f: impl FnOnce(&mut NotesModel) -> R) -> R {
        f(&mut self.model.write())
    }

    fn notify(&mut self, toast: Toast) {
        self.toasts.write().push(toast);
    }
}

#[component]
pub fn NotesScreen() -> Element {
    let backend = use_backend();
    let session = use_session();
    let mut model = use_signal(NotesModel::new);
    let view = ScreenView {
        model,
        toasts: use_toasts(),
    };
    let mut signing_out = use_signal(|| false);

    // Cancelled on unmount so late responses touch nothing.
    let lifetime = use_hook(CancellationToken::new);
    use_drop({
        let lifetime = lifetime.clone();
        move || lifetime.cancel()
    });

    // List notes on mount
    use_hook({
        let backend = backend.clone();
        let lifetime = lifetime.clone();
        move || {
            spawn(async move {
                let mut view = view;
                notes::refresh_notes(&backend, &mut view, &lifetime).await;
            })
        }
    });

    let on_delete = use_callback({
        let backend = backend.clone();
        let lifetime = lifetime.clone();
        move |id: NoteId| {
            let backend = backend.clone();
            let lifetime = lifetime.clone();
            spawn(async move {
                let mut view = view;
                notes::delete_note(&backend, &mut view, &id, &lifetime).await;
            });
        }
    });

    let on_submit = {
        let backend = backend.clone();
        let lifetime = lifetime.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let Some(user_id) = session.read().session.as_ref().map(|s| s.user_id().to_string())
            else {
                return;
            };
            let backend = backend.clone();
            let lifetime = lifetime.clone();
            spawn(async move {
                let mut view = view;
                notes::create_note(&backend, &mut view, &user_id, &lifetime).await;
            });
        }
    };

    let on_sign_out = move |_: ()| {
        let backend = backend.clone();
        let lifetime = lifetime.clone();
        spawn(async move {
            signing_out.set(true);
            let mut view = view;
            if notes::sign_out(&backend, &mut view, &lifetime).await != notes::Outcome::Cancelled {
                signing_out.set(false);
            }
        });
    };

    let user = session.read().session.as_ref().map(|s| s.user.clone());
    let (draft, listed, loading) = {
        let current = model.read();
        (
            current.draft.clone(),
            current.notes.clone(),
            current.is_loading() && current.notes.is_empty(),
        )
    };

    rsx! {
        div {
            class: "notes-page",
            Navbar { user, signing_out: signing_out(), on_sign_out }

            main {
                class: "notes-main",

                form {
                    class: "note-form",
                    onsubmit: on_submit,
                    h2 { "New note" }
                    input {
                        class: "note-form__title",
                        r#type: "text",
                        placeholder: "Title",
                        value: "{draft.title}",
                        oninput: move |evt: FormEvent| model.write().draft.title = evt.value(),
                    }
                    textarea {
                        class: "note-form__content",
                        placeholder: "Write something...",
                        rows: 4,
                        value: "{draft.content}",
                        oninput: move |evt: FormEvent| model.write().draft.content = evt.value(),
                    }
                    button {
                        class: "note-form__submit",
                        r#type: "submit",
                        disabled: !draft.is_submittable(),
                        Icon { icon: FaCirclePlus, width: 14, height: 14 }
                        "Add note"
                    }
                }

                section {
                    class: "note-list",
                    if loading {
                        p { class: "note-list__status", "Loading notes..." }
                    } else if listed.is_empty() {
                        p { class: "note-list__status", "No notes yet. Create your first one above." }
                    }
                    for note in listed {
                        NoteCard { key: "{note.id}", note, on_delete }
                    }
                }
            }
        }
    }
}
