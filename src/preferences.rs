#[cfg(not(target_arch = "wasm32"))]
use std::collections::BTreeMap;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::fs;
#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::warn;
use parking_lot::RwLock;

use crate::error::BackdropError;

/// Key holding the saved theme (`day` or `night`).
pub const THEME_KEY: &str = "theme";
/// Key present once the visitor accepted cookies.
pub const CONSENT_KEY: &str = "cookieAccepted";

/// String key-value store that survives page reloads.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), BackdropError>;
}

impl<T> PreferenceStore for &T
where
    T: PreferenceStore + ?Sized,
{
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackdropError> {
        (**self).set(key, value)
    }
}

impl<T> PreferenceStore for Arc<T>
where
    T: PreferenceStore + ?Sized,
{
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackdropError> {
        (**self).set(key, value)
    }
}

/// Volatile store used by tests and when nothing better is configured.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackdropError> {
        self.values
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a small TOML table on disk.
///
/// The whole table is rewritten on every `set`.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

#[cfg(not(target_arch = "wasm32"))]
impl FilePreferences {
    /// Loads the store; a missing file starts out empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, BackdropError> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents).map_err(|err| {
                BackdropError::Preferences(format!("{} is not valid TOML: {err}", path.display()))
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(BackdropError::Preferences(format!(
                    "unable to read {}: {err}",
                    path.display()
                )))
            }
        };
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackdropError> {
        let mut values = self.values.write();
        values.insert(key.to_string(), value.to_string());
        let contents = toml::to_string(&*values)
            .map_err(|err| BackdropError::Preferences(err.to_string()))?;
        fs::write(&self.path, contents).map_err(|err| {
            BackdropError::Preferences(format!("unable to write {}: {err}", self.path.display()))
        })
    }
}

/// Cookie banner decision logic.
pub struct ConsentBanner<S> {
    store: S,
}

impl<S: PreferenceStore> ConsentBanner<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Any stored consent value counts as accepted.
    pub fn should_show(&self) -> bool {
        self.store.get(CONSENT_KEY).is_none()
    }

    /// Records consent. Returns whether the choice was persisted.
    pub fn accept(&self) -> bool {
        match self.store.set(CONSENT_KEY, "true") {
            Ok(()) => true,
            Err(err) => {
                warn!("failed to persist cookie consent: {err}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn banner_shows_until_accepted() {
        let store = MemoryPreferences::new();
        let banner = ConsentBanner::new(&store);
        assert!(banner.should_show());
        assert!(banner.accept());
        assert!(!banner.should_show());
        assert_eq!(store.get(CONSENT_KEY).as_deref(), Some("true"));
    }

    #[test]
    fn any_consent_value_hides_banner() {
        let store = MemoryPreferences::new();
        store.set(CONSENT_KEY, "yes").unwrap();
        assert!(!ConsentBanner::new(&store).should_show());
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.toml");

        let store = FilePreferences::open(&path).unwrap();
        assert_eq!(store.get(THEME_KEY), None);
        store.set(THEME_KEY, "day").unwrap();
        store.set(CONSENT_KEY, "true").unwrap();

        let reopened = FilePreferences::open(&path).unwrap();
        assert_eq!(reopened.get(THEME_KEY).as_deref(), Some("day"));
        assert_eq!(reopened.get(CONSENT_KEY).as_deref(), Some("true"));
    }

    #[test]
    fn file_store_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        fs::write(&path, "theme = [").unwrap();
        let err = FilePreferences::open(&path).unwrap_err();
        assert!(matches!(err, BackdropError::Preferences(_)));
    }
}
