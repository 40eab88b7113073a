//! Browser `localStorage` as session storage.

use store::KeyValueStore;

/// The window's `localStorage`. Silently does nothing where it is unavailable
/// (private mode, sandboxed frames).
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            if let Err(e) = storage.set_item(key, value) {
                tracing::warn!(?e, key, "localStorage write failed");
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// Query string of the current page, used to pick up sign-in redirects.
pub fn current_query() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    (!search.is_empty()).then_some(search)
}

/// Drop the redirect query from the address bar so a reload does not try to
/// redeem the same auth code again.
pub fn clear_query() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(path) = window.location().pathname() else {
        return;
    };
    if let Ok(history) = window.history() {
        let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&path));
    }
}
