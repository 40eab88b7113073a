//! This crate contains all shared UI for the workspace.

use dioxus::prelude::*;

pub const NOTEBOOK_CSS: Asset = asset!("/assets/notebook.css");

mod time;

mod session;
pub use session::{use_backend, use_session, SessionProvider};

mod toaster;
pub use toaster::{use_toasts, ToastProvider};

mod auth_form;
pub use auth_form::{AuthForm, ProviderButton};

mod navbar;
pub use navbar::Navbar;

mod note_card;
pub use note_card::NoteCard;

mod notes_screen;
pub use notes_screen::NotesScreen;
