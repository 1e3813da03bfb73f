use std::sync::Arc;

use log::{info, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::preferences::{PreferenceStore, THEME_KEY};

/// Site color scheme. Night is the default when nothing else is known.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Night,
    Day,
}

impl Theme {
    /// Reads the `data-theme` attribute: only `day` selects the day theme.
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some("day") => Self::Day,
            _ => Self::Night,
        }
    }

    /// Value for the `data-theme` attribute; night removes the attribute.
    pub fn attribute(self) -> Option<&'static str> {
        match self {
            Self::Day => Some("day"),
            Self::Night => None,
        }
    }

    pub fn from_preference(value: Option<&str>) -> Self {
        Self::from_attribute(value)
    }

    pub fn preference_value(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Night => "night",
        }
    }

    /// Text shown on the toggle button.
    pub fn label(self) -> &'static str {
        match self {
            Self::Day => "Day Couture",
            Self::Night => "Night Couture",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Day => Self::Night,
            Self::Night => Self::Day,
        }
    }
}

/// Shared handle to the active theme.
///
/// The toggle writes it and the background loop polls it once per frame.
#[derive(Debug, Clone, Default)]
pub struct ThemeState {
    current: Arc<RwLock<Theme>>,
}

impl ThemeState {
    pub fn new(theme: Theme) -> Self {
        Self {
            current: Arc::new(RwLock::new(theme)),
        }
    }

    pub fn get(&self) -> Theme {
        *self.current.read()
    }

    pub fn set(&self, theme: Theme) {
        *self.current.write() = theme;
    }
}

/// Day/night switch that keeps the shared state and the stored preference in step.
pub struct ThemeToggle<S> {
    state: ThemeState,
    store: S,
}

impl<S: PreferenceStore> ThemeToggle<S> {
    pub fn new(state: ThemeState, store: S) -> Self {
        Self { state, store }
    }

    /// Applies the saved preference, if any, and returns the resulting theme.
    pub fn restore(&self) -> Theme {
        if let Some(saved) = self.store.get(THEME_KEY) {
            if Theme::from_preference(Some(&saved)) == Theme::Day {
                self.state.set(Theme::Day);
            }
        }
        self.state.get()
    }

    /// Flips the theme and persists the new choice.
    pub fn toggle(&self) -> Theme {
        let next = self.state.get().toggled();
        self.state.set(next);
        if let Err(err) = self.store.set(THEME_KEY, next.preference_value()) {
            warn!("failed to persist theme preference: {err}");
        }
        info!("theme switched to {}", next.preference_value());
        next
    }

    pub fn state(&self) -> &ThemeState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::MemoryPreferences;

    #[test]
    fn unknown_attribute_values_mean_night() {
        assert_eq!(Theme::from_attribute(Some("day")), Theme::Day);
        assert_eq!(Theme::from_attribute(Some("night")), Theme::Night);
        assert_eq!(Theme::from_attribute(Some("Day")), Theme::Night);
        assert_eq!(Theme::from_attribute(Some("sepia")), Theme::Night);
        assert_eq!(Theme::from_attribute(None), Theme::Night);
    }

    #[test]
    fn attribute_is_removed_for_night() {
        assert_eq!(Theme::Day.attribute(), Some("day"));
        assert_eq!(Theme::Night.attribute(), None);
    }

    #[test]
    fn state_clones_share_the_value() {
        let state = ThemeState::default();
        let reader = state.clone();
        assert_eq!(reader.get(), Theme::Night);
        state.set(Theme::Day);
        assert_eq!(reader.get(), Theme::Day);
    }

    #[test]
    fn toggle_persists_and_restore_reads_back() {
        let store = MemoryPreferences::new();
        let toggle = ThemeToggle::new(ThemeState::default(), &store);
        assert_eq!(toggle.restore(), Theme::Night);

        assert_eq!(toggle.toggle(), Theme::Day);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("day"));
        assert_eq!(toggle.state().get().label(), "Day Couture");

        let reloaded = ThemeToggle::new(ThemeState::default(), &store);
        assert_eq!(reloaded.restore(), Theme::Day);

        assert_eq!(toggle.toggle(), Theme::Night);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("night"));
        let reloaded = ThemeToggle::new(ThemeState::default(), &store);
        assert_eq!(reloaded.restore(), Theme::Night);
    }
}
