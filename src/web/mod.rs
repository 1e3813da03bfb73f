//! Browser entry point: wires the page collaborators and mounts the
//! animated background.

mod background;
mod consent;
mod intro;
mod storage;
mod theme_toggle;

use std::cell::RefCell;

use gloo_events::EventListener;
use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::window;

use crate::background::LoopHandle;
use crate::config::BackdropConfig;
use crate::theme::ThemeState;

pub use storage::LocalStoragePreferences;

#[derive(Default)]
struct Page {
    listeners: Vec<EventListener>,
    background: Option<LoopHandle>,
}

thread_local! {
    static PAGE: RefCell<Page> = RefCell::new(Page::default());
}

#[wasm_bindgen(start)]
pub fn bootstrap() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    let Some(document) = window().and_then(|window| window.document()) else {
        warn!("document not available; page enhancements disabled");
        return;
    };
    let config = BackdropConfig::default();
    let store = LocalStoragePreferences::open();

    let mut listeners = Vec::new();
    listeners.extend(consent::install(&document, store.clone()));
    intro::play(&document, &config.intro);

    let theme = ThemeState::new(theme_toggle::initial_theme(&document));
    listeners.extend(theme_toggle::install(&document, theme.clone(), store));
    PAGE.with(|page| page.borrow_mut().listeners = listeners);

    spawn_local(async move {
        let handle = background::mount(theme, config).await;
        PAGE.with(|page| page.borrow_mut().background = handle);
    });
}

/// Stops the background loop and releases its event listeners.
#[wasm_bindgen(js_name = stopBackdrop)]
pub fn stop_backdrop() {
    PAGE.with(|page| {
        if let Some(handle) = page.borrow_mut().background.take() {
            handle.stop();
        }
    });
}
