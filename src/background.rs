use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, warn};

use crate::config::BackdropConfig;
use crate::error::BackdropError;
use crate::surface::RenderSurface;
use crate::theme::ThemeState;
use crate::uniforms::ShaderUniforms;

/// Destination of the background's draw calls.
pub trait FrameSink {
    /// Adopts a new surface size.
    fn resize(&mut self, surface: &RenderSurface);

    /// Draws one frame with the given uniforms.
    fn draw(&mut self, uniforms: &ShaderUniforms) -> Result<(), BackdropError>;
}

impl<T> FrameSink for Box<T>
where
    T: FrameSink + ?Sized,
{
    fn resize(&mut self, surface: &RenderSurface) {
        (**self).resize(surface)
    }

    fn draw(&mut self, uniforms: &ShaderUniforms) -> Result<(), BackdropError> {
        (**self).draw(uniforms)
    }
}

/// Cloneable stop switch for a running background loop.
#[derive(Debug, Clone, Default)]
pub struct LoopHandle {
    stopped: Arc<AtomicBool>,
}

impl LoopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

/// Result of one [`Background::frame`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The frame was drawn; the host should schedule the next one.
    Drawn,
    /// The loop was stopped; the host must not schedule again.
    Stopped,
}

/// Full-viewport animated background.
///
/// The host calls [`Background::frame`] once per display refresh and forwards
/// resize and pointer events between frames. Everything runs on the host's UI
/// thread; the last event before a frame wins.
pub struct Background<S> {
    sink: S,
    surface: RenderSurface,
    uniforms: ShaderUniforms,
    theme: ThemeState,
    config: BackdropConfig,
    frames: u64,
    handle: LoopHandle,
}

impl<S: FrameSink> Background<S> {
    /// Starts the background on top of a freshly acquired sink.
    ///
    /// When the sink could not be acquired the background stays disabled: a
    /// warning is logged and `None` is returned.
    pub fn start(
        sink: Result<S, BackdropError>,
        surface: RenderSurface,
        theme: ThemeState,
        config: BackdropConfig,
    ) -> Option<Self> {
        let mut sink = match sink {
            Ok(sink) => sink,
            Err(err) => {
                warn!("{err}. Animated background disabled.");
                return None;
            }
        };
        sink.resize(&surface);
        let uniforms = ShaderUniforms::new(&surface, config.palette.night);
        debug!(
            "background started at {}x{} (pixel ratio {})",
            surface.width(),
            surface.height(),
            surface.pixel_ratio()
        );
        Some(Self {
            sink,
            surface,
            uniforms,
            theme,
            config,
            frames: 0,
            handle: LoopHandle::new(),
        })
    }

    /// Advances the animation by one frame and draws it.
    pub fn frame(&mut self) -> Result<FrameOutcome, BackdropError> {
        if self.handle.is_stopped() {
            return Ok(FrameOutcome::Stopped);
        }
        self.frames += 1;
        self.uniforms
            .set_time((self.frames as f64 * self.config.time_step as f64) as f32);

        let target = self.config.palette.target(self.theme.get());
        self.uniforms
            .blend_color_toward(target, self.config.blend_factor);

        self.sink.draw(&self.uniforms)?;
        Ok(FrameOutcome::Drawn)
    }

    /// Applies a viewport resize immediately.
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f64) {
        if !self.surface.resize(width, height, device_pixel_ratio) {
            return;
        }
        self.uniforms.set_resolution(&self.surface);
        self.sink.resize(&self.surface);
    }

    /// Pointer position in client coordinates.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.uniforms.set_pointer_from_client(x, y, &self.surface);
    }

    /// First touch point in client coordinates, if the event carried any.
    pub fn touch_moved(&mut self, first_touch: Option<(f64, f64)>) {
        if let Some((x, y)) = first_touch {
            self.pointer_moved(x, y);
        }
    }

    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    pub fn uniforms(&self) -> &ShaderUniforms {
        &self.uniforms
    }

    pub fn surface(&self) -> &RenderSurface {
        &self.surface
    }

    pub fn theme(&self) -> &ThemeState {
        &self.theme
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};

    use super::*;
    use crate::theme::Theme;

    #[derive(Default)]
    struct RecordingSink {
        draws: Vec<ShaderUniforms>,
        sizes: Vec<(u32, u32)>,
    }

    impl FrameSink for RecordingSink {
        fn resize(&mut self, surface: &RenderSurface) {
            self.sizes.push(surface.physical_size());
        }

        fn draw(&mut self, uniforms: &ShaderUniforms) -> Result<(), BackdropError> {
            self.draws.push(uniforms.clone());
            Ok(())
        }
    }

    fn start(theme: &ThemeState) -> Background<RecordingSink> {
        Background::start(
            Ok(RecordingSink::default()),
            RenderSurface::new(800, 600, 1.0, 2.0),
            theme.clone(),
            BackdropConfig::default(),
        )
        .expect("background starts")
    }

    #[test]
    fn elapsed_time_is_frame_count_times_step() {
        let mut background = start(&ThemeState::default());
        assert_eq!(background.uniforms().time(), 0.0);
        for n in 1..=1000u32 {
            background.frame().unwrap();
            let expected = 0.01 * n as f32;
            assert!((background.uniforms().time() - expected).abs() < 1e-4);
        }
        assert_eq!(background.frames(), 1000);
        assert_eq!(background.sink().draws.len(), 1000);
    }

    #[test]
    fn color_follows_theme_switch() {
        let theme = ThemeState::default();
        let mut background = start(&theme);
        background.frame().unwrap();
        assert_eq!(background.uniforms().color(), Vec3::splat(0.07));

        theme.set(Theme::Day);
        background.frame().unwrap();
        let expected = Vec3::new(0.1135, 0.1125, 0.1085);
        assert!((background.uniforms().color() - expected).abs().max_element() < 1e-6);

        for _ in 0..2000 {
            background.frame().unwrap();
        }
        assert_eq!(background.uniforms().color(), Vec3::new(0.94, 0.92, 0.84));
    }

    #[test]
    fn draws_see_the_updated_uniforms() {
        let theme = ThemeState::new(Theme::Day);
        let mut background = start(&theme);
        background.frame().unwrap();
        let drawn = &background.sink().draws[0];
        assert!((drawn.time() - 0.01).abs() < 1e-7);
        assert!(drawn.color().x > 0.07);
    }

    #[test]
    fn resize_updates_resolution_and_sink() {
        let mut background = start(&ThemeState::default());
        background.resize(1920, 1080, 3.0);
        assert_eq!(background.uniforms().resolution(), Vec2::new(1920.0, 1080.0));
        assert_eq!(background.surface().physical_size(), (3840, 2160));
        assert_eq!(background.sink().sizes.last(), Some(&(3840, 2160)));

        background.resize(0, 0, 1.0);
        assert_eq!(background.uniforms().resolution(), Vec2::new(1920.0, 1080.0));
        assert_eq!(background.sink().sizes.len(), 2);
    }

    #[test]
    fn pointer_and_touch_map_to_normalized_coordinates() {
        let mut background = start(&ThemeState::default());
        background.pointer_moved(400.0, 300.0);
        assert_eq!(background.uniforms().pointer(), Vec2::new(0.5, 0.5));

        background.touch_moved(Some((200.0, 150.0)));
        assert_eq!(background.uniforms().pointer(), Vec2::new(0.25, 0.75));

        background.touch_moved(None);
        assert_eq!(background.uniforms().pointer(), Vec2::new(0.25, 0.75));
    }

    #[test]
    fn missing_capability_disables_the_background() {
        let started = Background::<RecordingSink>::start(
            Err(BackdropError::renderer_unavailable("no adapter")),
            RenderSurface::new(800, 600, 1.0, 2.0),
            ThemeState::default(),
            BackdropConfig::default(),
        );
        assert!(started.is_none());

        let started = Background::<RecordingSink>::start(
            Err(BackdropError::mount_point_missing("canvas-container")),
            RenderSurface::new(800, 600, 1.0, 2.0),
            ThemeState::default(),
            BackdropConfig::default(),
        );
        assert!(started.is_none());
    }

    #[test]
    fn stopped_loop_neither_advances_nor_draws() {
        let mut background = start(&ThemeState::default());
        background.frame().unwrap();
        let handle = background.handle();
        handle.stop();
        assert_eq!(background.frame().unwrap(), FrameOutcome::Stopped);
        assert_eq!(background.frames(), 1);
        assert_eq!(background.sink().draws.len(), 1);
    }

    #[test]
    fn draw_errors_reach_the_host() {
        struct FailingSink;

        impl FrameSink for FailingSink {
            fn resize(&mut self, _surface: &RenderSurface) {}

            fn draw(&mut self, _uniforms: &ShaderUniforms) -> Result<(), BackdropError> {
                Err(BackdropError::OutOfMemory)
            }
        }

        let mut background = Background::start(
            Ok(FailingSink),
            RenderSurface::new(800, 600, 1.0, 2.0),
            ThemeState::default(),
            BackdropConfig::default(),
        )
        .expect("background starts");
        assert!(matches!(background.frame(), Err(BackdropError::OutOfMemory)));
    }
}
