//! Session context and hooks for the UI.

use api::SupabaseClient;
use chrono::Utc;
use dioxus::prelude::*;
use store::session::{needs_refresh, REFRESH_TICK};
use store::{AuthBackend, SessionState};

use crate::time::sleep;

/// Get the current session state.
/// Returns a signal that updates whenever the backend reports a change.
pub fn use_session() -> Signal<SessionState> {
    use_context::<Signal<SessionState>>()
}

/// The backend client provided by [`SessionProvider`].
pub fn use_backend() -> SupabaseClient {
    use_context::<SupabaseClient>()
}

/// Provider component that mirrors the backend's session.
/// Wrap your app with this component to enable authentication.
#[component]
pub fn SessionProvider(backend: SupabaseClient, children: Element) -> Element {
    let mut session_state = use_signal(SessionState::default);
    let backend = use_context_provider(|| backend);

    // Report the initial session, then follow backend-pushed changes
    let client = backend.clone();
    use_future(move || {
        let backend = client.clone();
        async move {
            let mut changes = backend.subscribe();

            let query = api::redirect_query();
            if let Err(e) = backend.initialize(query.as_deref()).await {
                tracing::warn!("Failed to restore session: {}", e);
            }
            if query.is_some() {
                api::clear_redirect_query();
            }

            loop {
                let next = SessionState::mirror(changes.borrow_and_update().as_ref());
                if *session_state.peek() != next {
                    session_state.set(next);
                }
                if changes.changed().await.is_err() {
                    break;
                }
            }
        }
    });

    // Token refresh ticker
    use_future(move || {
        let backend = backend.clone();
        async move {
            loop {
                sleep(REFRESH_TICK).await;

                let Some(session) = backend.current_session() else {
                    continue;
                };
                if needs_refresh(&session, Utc::now()) {
                    if let Err(e) = backend.refresh_session().await {
                        tracing::warn!("Failed to refresh session: {}", e);
                    }
                }
            }
        }
    });

    use_context_provider(|| session_state);

    rsx! {
        {children}
    }
}
