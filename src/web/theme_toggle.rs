use gloo_events::EventListener;
use log::warn;
use web_sys::{Document, Element, HtmlElement};

use crate::theme::{Theme, ThemeState, ThemeToggle};

use super::storage::LocalStoragePreferences;

const BUTTON_ID: &str = "theme-toggle";
const THEME_ATTRIBUTE: &str = "data-theme";

/// Theme stated in the markup before any preference is applied.
pub fn initial_theme(document: &Document) -> Theme {
    let attribute = document
        .body()
        .and_then(|body| body.get_attribute(THEME_ATTRIBUTE));
    Theme::from_attribute(attribute.as_deref())
}

/// Restores the saved theme and wires the toggle button.
///
/// The body's `data-theme` attribute is kept in sync for the page styles; the
/// background reads `state` directly.
pub fn install(
    document: &Document,
    state: ThemeState,
    store: LocalStoragePreferences,
) -> Option<EventListener> {
    let body = document.body();
    let button = document.get_element_by_id(BUTTON_ID);
    let toggle = ThemeToggle::new(state, store);

    let theme = toggle.restore();
    apply(body.as_ref(), button.as_ref(), theme);

    let button = button?;
    let target = button.clone();
    Some(EventListener::new(&target, "click", move |_| {
        let theme = toggle.toggle();
        apply(body.as_ref(), Some(&button), theme);
    }))
}

fn apply(body: Option<&HtmlElement>, button: Option<&Element>, theme: Theme) {
    if let Some(body) = body {
        let result = match theme.attribute() {
            Some(value) => body.set_attribute(THEME_ATTRIBUTE, value),
            None => body.remove_attribute(THEME_ATTRIBUTE),
        };
        if result.is_err() {
            warn!("failed to update the {THEME_ATTRIBUTE} attribute");
        }
    }
    if let Some(button) = button {
        button.set_text_content(Some(theme.label()));
    }
}
