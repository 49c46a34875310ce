use lab_engine::PreferenceStore;
use web_sys::Storage;

/// Preferences kept in the browser's `localStorage`.
///
/// A page without storage access (private mode, sandboxed iframe) still
/// works; reads return nothing and writes are dropped with a warning.
pub struct LocalStorageStore {
    storage: Option<Storage>,
}

impl LocalStorageStore {
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("localStorage unavailable, preferences will not persist");
        }
        Self { storage }
    }
}

impl PreferenceStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        let Some(storage) = self.storage.as_ref() else {
            return;
        };
        if let Err(e) = storage.set_item(key, value) {
            log::warn!("could not store preference '{}': {:?}", key, e);
        }
    }
}
