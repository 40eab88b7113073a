pub mod backend;
pub mod config;
pub mod error;
pub mod guard;
pub mod models;
pub mod notes;
pub mod session;
pub mod storage;
pub mod toast;

pub mod memory;
pub use memory::MemoryBackend;

pub use backend::{AuthBackend, NotesBackend, Provider, SignUp};
pub use config::NotebookConfig;
pub use error::{BackendError, BackendResult};
pub use models::{NewNote, Note, NoteId, Session, UserInfo};
pub use session::{AuthEvent, SessionChange, SessionHub, SessionState};
pub use storage::{KeyValueStore, MemoryKeyValueStore};
pub use toast::{Toast, ToastKind, Toasts};
