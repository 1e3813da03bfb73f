use log::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, SvgTextContentElement};

use crate::config::IntroConfig;

const INTRO_ID: &str = "intro";
const TEXT_SELECTOR: &str = ".intro-svg text";

/// Restarts the stitch animation with the real text length and hides the
/// intro once it has played.
pub fn play(document: &Document, config: &IntroConfig) {
    if let Some(text) = document
        .query_selector(TEXT_SELECTOR)
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<SvgTextContentElement>().ok())
    {
        restart_stitch(&text, &config.animation);
    }

    let Some(intro) = document.get_element_by_id(INTRO_ID) else {
        return;
    };
    let Some(window) = window() else {
        return;
    };
    let hide = Closure::once_into_js(move || {
        if intro.class_list().add_1("hidden").is_err() {
            warn!("failed to hide the intro");
        }
    });
    if window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            hide.unchecked_ref(),
            config.hide_after_ms,
        )
        .is_err()
    {
        warn!("failed to schedule the intro fade");
    }
}

fn restart_stitch(text: &SvgTextContentElement, animation: &str) {
    let length = text.get_computed_text_length().to_string();
    let style = text.style();
    let applied = style
        .set_property("stroke-dasharray", &length)
        .and_then(|_| style.set_property("stroke-dashoffset", &length))
        .and_then(|_| style.set_property("animation", "none"))
        .and_then(|_| {
            // Reading layout forces a reflow so the animation starts over.
            let _ = text.client_width();
            style.set_property("animation", animation)
        });
    if applied.is_err() {
        warn!("failed to restart the intro animation");
    }
}
