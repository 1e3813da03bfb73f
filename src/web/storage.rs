use web_sys::{window, Storage};

use crate::error::BackdropError;
use crate::preferences::PreferenceStore;

/// Preferences kept in `window.localStorage`.
///
/// Private browsing modes may deny storage access; reads then see nothing and
/// writes report an error.
#[derive(Debug, Clone)]
pub struct LocalStoragePreferences {
    storage: Option<Storage>,
}

impl LocalStoragePreferences {
    pub fn open() -> Self {
        let storage = window().and_then(|window| window.local_storage().ok().flatten());
        Self { storage }
    }
}

impl PreferenceStore for LocalStoragePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackdropError> {
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| BackdropError::Preferences("localStorage is not available".into()))?;
        storage
            .set_item(key, value)
            .map_err(|err| BackdropError::Preferences(format!("{err:?}")))
    }
}
