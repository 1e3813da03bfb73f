use gloo_events::EventListener;
use log::warn;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::preferences::ConsentBanner;

use super::storage::LocalStoragePreferences;

const BANNER_ID: &str = "cookie-banner";
const ACCEPT_ID: &str = "cookie-accept";

/// Shows the cookie banner until the visitor accepts it.
pub fn install(document: &Document, store: LocalStoragePreferences) -> Option<EventListener> {
    let banner = document
        .get_element_by_id(BANNER_ID)
        .and_then(|element| element.dyn_into::<HtmlElement>().ok());
    let consent = ConsentBanner::new(store);

    if let Some(banner) = banner.as_ref() {
        if consent.should_show() {
            set_display(banner, "flex");
        }
    }

    let button = document.get_element_by_id(ACCEPT_ID)?;
    Some(EventListener::new(&button, "click", move |_| {
        consent.accept();
        if let Some(banner) = banner.as_ref() {
            set_display(banner, "none");
        }
    }))
}

fn set_display(element: &HtmlElement, value: &str) {
    if element.style().set_property("display", value).is_err() {
        warn!("failed to update cookie banner visibility");
    }
}
