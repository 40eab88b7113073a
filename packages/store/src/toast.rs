//! Transient notifications.
//!
//! A [`Toast`] is pushed into [`Toasts`] and removed again by the toaster
//! component once its display time ran out. Nothing here is persisted.

use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    /// Default display time.
    pub fn default_duration(&self) -> Duration {
        match self {
            ToastKind::Success => Duration::from_millis(2000),
            ToastKind::Error => Duration::from_millis(4000),
        }
    }
}

/// A notification before it was queued.
#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

/// A queued notification.
#[derive(Clone, Debug, PartialEq)]
pub struct ToastEntry {
    pub id: u64,
    pub toast: Toast,
}

/// The visible notifications, oldest first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Toasts {
    entries: Vec<ToastEntry>,
    next_id: u64,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a toast and return its id.
    pub fn push(&mut self, toast: Toast) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(ToastEntry { id, toast });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.entries.retain(|entry| entry.id != id);
    }

    pub fn entries(&self) -> &[ToastEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_dismiss() {
        let mut toasts = Toasts::new();
        let first = toasts.push(Toast::error("Failed to fetch notes"));
        let second = toasts.push(Toast::success("Note created successfully"));
        assert_ne!(first, second);
        assert_eq!(toasts.entries().len(), 2);

        toasts.dismiss(first);
        assert_eq!(toasts.entries().len(), 1);
        assert_eq!(toasts.entries()[0].toast.message, "Note created successfully");

        // Dismissing twice is harmless
        toasts.dismiss(first);
        toasts.dismiss(second);
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_errors_stay_longer() {
        assert!(ToastKind::Error.default_duration() > ToastKind::Success.default_duration());
    }
}
