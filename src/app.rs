use std::fmt;
use std::sync::Arc;

use glam::{Vec2, Vec3};
use log::{info, warn};
use pollster::block_on;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, TouchPhase, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

use crate::background::{Background, FrameOutcome, FrameSink};
use crate::config::BackdropConfig;
use crate::error::BackdropError;
use crate::preferences::PreferenceStore;
use crate::render::{HeadlessRenderer, Renderer};
use crate::surface::RenderSurface;
use crate::theme::{Theme, ThemeState, ThemeToggle};

const WINDOW_TITLE: &str = "Couture Backdrop";

/// State of a background after a run, as printed by the preview binary.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSummary {
    pub frames: u64,
    pub size: (u32, u32),
    pub theme: Theme,
    pub time: f32,
    pub color: Vec3,
    pub pointer: Vec2,
    pub center_sample: Option<Vec3>,
}

impl FrameSummary {
    pub fn capture<S: FrameSink>(background: &Background<S>, center_sample: Option<Vec3>) -> Self {
        let uniforms = background.uniforms();
        Self {
            frames: background.frames(),
            size: background.surface().logical_size(),
            theme: background.theme().get(),
            time: uniforms.time(),
            color: uniforms.color(),
            pointer: uniforms.pointer(),
            center_sample,
        }
    }
}

impl fmt::Display for FrameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Rendered {} frame(s) at {}x{}",
            self.frames, self.size.0, self.size.1
        )?;
        writeln!(
            f,
            " - theme={} time={:.2}",
            self.theme.preference_value(),
            self.time
        )?;
        writeln!(
            f,
            " - color=({:.2}, {:.2}, {:.2})",
            self.color.x, self.color.y, self.color.z
        )?;
        write!(f, " - pointer=({:.2}, {:.2})", self.pointer.x, self.pointer.y)?;
        if let Some(sample) = self.center_sample {
            write!(
                f,
                "\n - center=({:.3}, {:.3}, {:.3})",
                sample.x, sample.y, sample.z
            )?;
        }
        Ok(())
    }
}

/// Runs the frame loop without a window or GPU.
pub fn run_headless(
    config: BackdropConfig,
    theme: ThemeState,
    frames: u64,
    (width, height): (u32, u32),
) -> Result<FrameSummary, BackdropError> {
    let surface = RenderSurface::new(width, height, 1.0, config.max_pixel_ratio);
    let sink = HeadlessRenderer::new(config.shader);
    let mut background = Background::start(Ok(sink), surface, theme, config)
        .ok_or_else(|| BackdropError::renderer_unavailable("headless renderer"))?;
    for _ in 0..frames {
        if background.frame()? == FrameOutcome::Stopped {
            break;
        }
    }
    let sample = background.sink().center_sample();
    Ok(FrameSummary::capture(&background, sample))
}

/// winit application showing the background in a desktop window.
///
/// `T` toggles the theme, `Escape` or closing the window ends the preview.
pub struct PreviewApp<S> {
    config: BackdropConfig,
    toggle: ThemeToggle<S>,
    window_size: (u32, u32),
    background: Option<Background<Renderer>>,
    unavailable: Option<BackdropError>,
    last_error: Option<BackdropError>,
}

impl<S: PreferenceStore> PreviewApp<S> {
    pub fn new(config: BackdropConfig, toggle: ThemeToggle<S>, window_size: (u32, u32)) -> Self {
        Self {
            config,
            toggle,
            window_size,
            background: None,
            unavailable: None,
            last_error: None,
        }
    }

    /// Why the window could not render, if it never started.
    pub fn take_unavailable(&mut self) -> Option<BackdropError> {
        self.unavailable.take()
    }

    /// Error that ended a running preview.
    pub fn take_error(&mut self) -> Option<BackdropError> {
        self.last_error.take()
    }

    /// Summary of the background as it was when the preview ended.
    pub fn summary(&self) -> Option<FrameSummary> {
        self.background
            .as_ref()
            .map(|background| FrameSummary::capture(background, None))
    }

    fn disable(&mut self, event_loop: &ActiveEventLoop, err: BackdropError) {
        warn!("{err}. Animated background disabled.");
        self.unavailable = Some(err);
        event_loop.exit();
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        match event.logical_key.as_ref() {
            Key::Named(NamedKey::Escape) => self.stop(event_loop),
            Key::Character("t") | Key::Character("T") => {
                let theme = self.toggle.toggle();
                if let Some(background) = self.background.as_ref() {
                    background
                        .sink()
                        .window()
                        .set_title(&format!("{WINDOW_TITLE}: {}", theme.label()));
                }
            }
            _ => {}
        }
    }

    fn stop(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(background) = self.background.as_ref() {
            background.handle().stop();
        }
        event_loop.exit();
    }
}

impl<S: PreferenceStore> ApplicationHandler for PreviewApp<S> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.background.is_some() {
            return;
        }
        let theme = self.toggle.state().get();
        let attributes = Window::default_attributes()
            .with_title(format!("{WINDOW_TITLE}: {}", theme.label()))
            .with_inner_size(LogicalSize::new(self.window_size.0, self.window_size.1))
            .with_transparent(true);
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.disable(event_loop, BackdropError::renderer_unavailable(err)),
        };

        // The window's physical pixels serve as viewport pixels; the swap chain
        // has to match the window exactly.
        let size = window.inner_size();
        let surface = RenderSurface::new(size.width, size.height, 1.0, self.config.max_pixel_ratio);
        let renderer = match block_on(Renderer::new(Arc::clone(&window), self.config.shader)) {
            Ok(renderer) => renderer,
            Err(err) => return self.disable(event_loop, err),
        };
        info!("preview window {}x{} ready", size.width, size.height);
        self.background = Background::start(
            Ok(renderer),
            surface,
            self.toggle.state().clone(),
            self.config.clone(),
        );
        window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(background) = self.background.as_mut() else {
            return;
        };
        if window_id != background.sink().window_id() {
            return;
        }
        match event {
            WindowEvent::CloseRequested => self.stop(event_loop),
            WindowEvent::Resized(size) => background.resize(size.width, size.height, 1.0),
            WindowEvent::CursorMoved { position, .. } => {
                background.pointer_moved(position.x, position.y)
            }
            WindowEvent::Touch(touch) if touch.phase == TouchPhase::Moved => {
                background.touch_moved(Some((touch.location.x, touch.location.y)))
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::RedrawRequested => match background.frame() {
                Ok(FrameOutcome::Drawn) => {}
                Ok(FrameOutcome::Stopped) => event_loop.exit(),
                Err(err) => {
                    background.handle().stop();
                    self.last_error = Some(err);
                    event_loop.exit();
                }
            },
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(background) = self.background.as_ref() {
            if !background.handle().is_stopped() {
                background.sink().window().request_redraw();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_run_reports_frames_and_color() {
        let summary = run_headless(
            BackdropConfig::default(),
            ThemeState::new(Theme::Day),
            500,
            (320, 240),
        )
        .unwrap();
        assert_eq!(summary.frames, 500);
        assert_eq!(summary.size, (320, 240));
        assert!((summary.time - 5.0).abs() < 1e-4);
        assert_eq!(summary.color, Vec3::new(0.94, 0.92, 0.84));
        assert!(summary.center_sample.is_some());
    }

    #[test]
    fn summary_formats_like_the_cli_prints_it() {
        let summary = FrameSummary {
            frames: 3,
            size: (640, 480),
            theme: Theme::Night,
            time: 0.03,
            color: Vec3::splat(0.07),
            pointer: Vec2::splat(0.5),
            center_sample: None,
        };
        assert_eq!(
            summary.to_string(),
            "Rendered 3 frame(s) at 640x480\n - theme=night time=0.03\n - color=(0.07, 0.07, 0.07)\n - pointer=(0.50, 0.50)"
        );
    }
}
