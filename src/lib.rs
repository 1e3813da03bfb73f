//! Animated fabric backdrop for the Couture landing page.
//!
//! The frame loop in [`background`] is host agnostic: the browser drives it
//! from `requestAnimationFrame` through the [`web`] module, the desktop
//! preview drives it from winit, and tests drive it with a headless sink.

#[cfg(not(target_arch = "wasm32"))]
pub mod app;
pub mod background;
pub mod config;
pub mod error;
pub mod pattern;
pub mod preferences;
pub mod render;
pub mod surface;
pub mod theme;
pub mod uniforms;
#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(not(target_arch = "wasm32"))]
pub use app::{run_headless, FrameSummary, PreviewApp};
pub use background::{Background, FrameOutcome, FrameSink, LoopHandle};
pub use config::{BackdropConfig, IntroConfig, Palette, ShaderConfig};
pub use error::{BackdropError, Capability};
#[cfg(not(target_arch = "wasm32"))]
pub use preferences::FilePreferences;
pub use preferences::{
    ConsentBanner, MemoryPreferences, PreferenceStore, CONSENT_KEY, THEME_KEY,
};
pub use render::{HeadlessRenderer, Renderer};
pub use surface::RenderSurface;
pub use theme::{Theme, ThemeState, ThemeToggle};
pub use uniforms::{GpuUniform, ShaderUniforms};
