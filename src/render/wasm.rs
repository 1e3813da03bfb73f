use log::warn;
use web_sys::HtmlCanvasElement;

use crate::background::FrameSink;
use crate::config::ShaderConfig;
use crate::error::BackdropError;
use crate::surface::RenderSurface;
use crate::uniforms::ShaderUniforms;

use super::gpu::GpuBackdrop;

/// Backdrop renderer drawing into an HTML canvas through WebGL2.
pub struct Renderer {
    canvas: HtmlCanvasElement,
    gpu: GpuBackdrop,
}

impl Renderer {
    /// Creates a renderer for `canvas`, sized to `surface`.
    pub async fn new(
        canvas: HtmlCanvasElement,
        surface: &RenderSurface,
        shader: ShaderConfig,
    ) -> Result<Self, BackdropError> {
        size_canvas(&canvas, surface);
        let instance = GpuBackdrop::instance(wgpu::Backends::GL);
        let target = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(BackdropError::renderer_unavailable)?;
        let gpu = GpuBackdrop::new(&instance, target, surface.physical_size(), shader).await?;
        Ok(Self { canvas, gpu })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl FrameSink for Renderer {
    fn resize(&mut self, surface: &RenderSurface) {
        size_canvas(&self.canvas, surface);
        self.gpu.configure(surface.physical_size());
    }

    fn draw(&mut self, uniforms: &ShaderUniforms) -> Result<(), BackdropError> {
        self.gpu.present(uniforms)
    }
}

/// Backing store in device pixels, layout box in CSS pixels.
fn size_canvas(canvas: &HtmlCanvasElement, surface: &RenderSurface) {
    let (width, height) = surface.physical_size();
    canvas.set_width(width);
    canvas.set_height(height);
    let style = canvas.style();
    let (css_width, css_height) = surface.logical_size();
    if style
        .set_property("width", &format!("{css_width}px"))
        .and_then(|_| style.set_property("height", &format!("{css_height}px")))
        .is_err()
    {
        warn!("failed to size the background canvas");
    }
}
