use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_events::{EventListener, EventListenerOptions, EventListenerPhase};
use log::{error, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{window, HtmlCanvasElement, MouseEvent, TouchEvent, Window};

use crate::background::{Background, LoopHandle};
use crate::config::BackdropConfig;
use crate::error::BackdropError;
use crate::render::Renderer;
use crate::surface::RenderSurface;
use crate::theme::ThemeState;

struct LoopState {
    background: Background<Renderer>,
    listeners: Vec<EventListener>,
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Mounts the animated background into the page and starts its frame loop.
///
/// Returns `None` when the page cannot host it; the rest of the page keeps
/// working without the background.
pub async fn mount(theme: ThemeState, config: BackdropConfig) -> Option<LoopHandle> {
    let Some(window) = window() else {
        warn!("window not available. Animated background disabled.");
        return None;
    };
    let surface = RenderSurface::new(
        viewport_width(&window),
        viewport_height(&window),
        window.device_pixel_ratio(),
        config.max_pixel_ratio,
    );
    let renderer = create_renderer(&window, &surface, &config).await;
    let background = Background::start(renderer, surface, theme, config)?;
    let handle = background.handle();

    let state = Rc::new(RefCell::new(LoopState {
        background,
        listeners: Vec::new(),
    }));
    let listeners = attach_listeners(&window, Rc::downgrade(&state));
    state.borrow_mut().listeners = listeners;

    if let Err(err) = run_animation_loop(state) {
        warn!("{err}. Animated background disabled.");
        handle.stop();
        return None;
    }
    Some(handle)
}

async fn create_renderer(
    window: &Window,
    surface: &RenderSurface,
    config: &BackdropConfig,
) -> Result<Renderer, BackdropError> {
    let document = window
        .document()
        .ok_or_else(|| BackdropError::mount_point_missing(&config.container_id))?;
    let container = document
        .get_element_by_id(&config.container_id)
        .ok_or_else(|| BackdropError::mount_point_missing(&config.container_id))?;
    let canvas = document
        .create_element("canvas")
        .map_err(|err| BackdropError::renderer_unavailable(format!("{err:?}")))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| BackdropError::renderer_unavailable("canvas elements are not supported"))?;

    let renderer = Renderer::new(canvas, surface, config.shader).await?;
    container
        .append_child(renderer.canvas())
        .map_err(|err| {
            BackdropError::renderer_unavailable(format!("failed to append canvas: {err:?}"))
        })?;
    Ok(renderer)
}

fn attach_listeners(window: &Window, state: Weak<RefCell<LoopState>>) -> Vec<EventListener> {
    let mut listeners = Vec::new();

    {
        let state = Weak::clone(&state);
        let host = window.clone();
        listeners.push(EventListener::new(window, "resize", move |_| {
            if let Some(state) = state.upgrade() {
                state.borrow_mut().background.resize(
                    viewport_width(&host),
                    viewport_height(&host),
                    host.device_pixel_ratio(),
                );
            }
        }));
    }

    {
        let state = Weak::clone(&state);
        listeners.push(EventListener::new(window, "mousemove", move |event| {
            let (Some(state), Some(event)) = (state.upgrade(), event.dyn_ref::<MouseEvent>())
            else {
                return;
            };
            state
                .borrow_mut()
                .background
                .pointer_moved(event.client_x() as f64, event.client_y() as f64);
        }));
    }

    {
        // Passive so the browser never waits on us before scrolling.
        let options = EventListenerOptions {
            phase: EventListenerPhase::Bubble,
            passive: true,
        };
        listeners.push(EventListener::new_with_options(
            window,
            "touchmove",
            options,
            move |event| {
                let Some(state) = state.upgrade() else {
                    return;
                };
                let first_touch = event
                    .dyn_ref::<TouchEvent>()
                    .and_then(|event| event.touches().get(0))
                    .map(|touch| (touch.client_x() as f64, touch.client_y() as f64));
                state.borrow_mut().background.touch_moved(first_touch);
            },
        ));
    }

    listeners
}

fn run_animation_loop(state: Rc<RefCell<LoopState>>) -> Result<(), BackdropError> {
    let callback: FrameCallback = Rc::new(RefCell::new(None));
    let next = Rc::clone(&callback);

    let closure = Closure::wrap(Box::new(move || {
        let handle = state.borrow().background.handle();
        if handle.is_stopped() {
            state.borrow_mut().listeners.clear();
            // The closure is still executing; release it after this call returns.
            if let Some(closure) = next.borrow_mut().take() {
                spawn_local(async move { drop(closure) });
            }
            return;
        }

        if let Some(closure) = next.borrow().as_ref() {
            if let Err(err) = request_frame(closure) {
                error!("{err}");
                handle.stop();
            }
        }

        if let Err(err) = state.borrow_mut().background.frame() {
            error!("{err}. Stopping animated background.");
            handle.stop();
        }
    }) as Box<dyn FnMut()>);

    request_frame(&closure)?;
    *callback.borrow_mut() = Some(closure);
    Ok(())
}

fn request_frame(closure: &Closure<dyn FnMut()>) -> Result<i32, BackdropError> {
    window()
        .ok_or_else(|| BackdropError::Surface("window not available".into()))?
        .request_animation_frame(closure.as_ref().unchecked_ref())
        .map_err(|err| BackdropError::Surface(format!("requestAnimationFrame failed: {err:?}")))
}

fn viewport_width(window: &Window) -> u32 {
    window
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(1.0) as u32
}

fn viewport_height(window: &Window) -> u32 {
    window
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(1.0) as u32
}
