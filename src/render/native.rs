use std::sync::Arc;

use winit::window::{Window, WindowId};

use crate::background::FrameSink;
use crate::config::ShaderConfig;
use crate::error::BackdropError;
use crate::surface::RenderSurface;
use crate::uniforms::ShaderUniforms;

use super::gpu::GpuBackdrop;

/// Backdrop renderer drawing into a winit window.
pub struct Renderer {
    window: Arc<Window>,
    gpu: GpuBackdrop,
}

impl Renderer {
    /// Initializes the GPU renderer for the provided window.
    pub async fn new(window: Arc<Window>, shader: ShaderConfig) -> Result<Self, BackdropError> {
        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Err(BackdropError::renderer_unavailable("window has zero area"));
        }

        let instance = GpuBackdrop::instance(wgpu::Backends::PRIMARY);
        let surface = instance
            .create_surface(Arc::clone(&window))
            .map_err(BackdropError::renderer_unavailable)?;
        let gpu = GpuBackdrop::new(&instance, surface, (size.width, size.height), shader).await?;
        Ok(Self { window, gpu })
    }

    /// Returns the identifier of the window owned by the renderer.
    pub fn window_id(&self) -> WindowId {
        self.window.id()
    }

    pub fn window(&self) -> &Window {
        &self.window
    }
}

impl FrameSink for Renderer {
    fn resize(&mut self, surface: &RenderSurface) {
        self.gpu.configure(surface.physical_size());
    }

    fn draw(&mut self, uniforms: &ShaderUniforms) -> Result<(), BackdropError> {
        self.gpu.present(uniforms)
    }
}
