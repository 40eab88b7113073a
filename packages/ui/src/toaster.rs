//! Transient notifications in the top-right corner.

use dioxus::prelude::*;
use store::config::ToastSettings;
use store::toast::ToastEntry;
use store::{ToastKind, Toasts};

use crate::time::sleep;

pub fn use_toasts() -> Signal<Toasts> {
    use_context::<Signal<Toasts>>()
}

/// Provides the toast queue and renders it above `children`.
#[component]
pub fn ToastProvider(settings: ToastSettings, children: Element) -> Element {
    let toasts = use_signal(Toasts::new);
    use_context_provider(|| toasts);
    use_context_provider(|| settings);

    rsx! {
        {children}
        Toaster {}
    }
}

#[component]
fn Toaster() -> Element {
    let toasts = use_toasts();
    let entries = toasts.read().entries().to_vec();

    rsx! {
        div {
            class: "toaster",
            for entry in entries {
                ToastItem { key: "{entry.id}", entry }
            }
        }
    }
}

#[component]
fn ToastItem(entry: ToastEntry) -> Element {
    let mut toasts = use_toasts();
    let settings = use_context::<ToastSettings>();
    let id = entry.id;
    let duration = settings.duration_for(entry.toast.kind);

    // Auto-dismiss; the task dies with the item.
    use_hook(move || {
        spawn(async move {
            sleep(duration).await;
            toasts.write().dismiss(id);
        })
    });

    let modifier = match entry.toast.kind {
        ToastKind::Success => "success",
        ToastKind::Error => "error",
    };

    rsx! {
        div {
            class: "toast toast--{modifier}",
            role: "status",
            onclick: move |_| toasts.write().dismiss(id),
            "{entry.toast.message}"
        }
    }
}
