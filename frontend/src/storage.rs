//! `localStorage` for [`common::Preferences`].
//!
//! Outside a browser (native builds, workers without `window`, storage
//! disabled by the user) every read is `None` and every write is dropped.

use common::KeyValueStore;

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

#[cfg(not(target_arch = "wasm32"))]
fn local_storage() -> Option<web_sys::Storage> {
    None
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) {
        if let Some(storage) = local_storage() {
            if storage.set_item(key, value).is_err() {
                web_sys::console::warn_1(&format!("Failed to persist {key}").into());
            }
        }
    }

    fn remove_item(&self, key: &str) {
        if let Some(storage) = local_storage() {
            if storage.remove_item(key).is_err() {
                web_sys::console::warn_1(&format!("Failed to remove {key}").into());
            }
        }
    }
}
