use glam::{Vec2, Vec3};

use crate::background::FrameSink;
use crate::config::ShaderConfig;
use crate::error::BackdropError;
use crate::pattern;
use crate::surface::RenderSurface;
use crate::uniforms::ShaderUniforms;

/// Frame sink that needs no GPU.
///
/// Each draw evaluates the shader on the CPU for the pixel at the center of
/// the surface, which is enough to inspect the animation from a terminal.
#[derive(Debug, Clone)]
pub struct HeadlessRenderer {
    shader: ShaderConfig,
    physical_size: (u32, u32),
    draws: u64,
    center_sample: Option<Vec3>,
}

impl HeadlessRenderer {
    pub fn new(shader: ShaderConfig) -> Self {
        Self {
            shader,
            physical_size: (1, 1),
            draws: 0,
            center_sample: None,
        }
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }

    pub fn physical_size(&self) -> (u32, u32) {
        self.physical_size
    }

    /// Color of the center pixel in the most recent draw.
    pub fn center_sample(&self) -> Option<Vec3> {
        self.center_sample
    }
}

impl FrameSink for HeadlessRenderer {
    fn resize(&mut self, surface: &RenderSurface) {
        self.physical_size = surface.physical_size();
    }

    fn draw(&mut self, uniforms: &ShaderUniforms) -> Result<(), BackdropError> {
        let (width, height) = self.physical_size;
        let center = Vec2::new(width as f32 / 2.0, height as f32 / 2.0);
        self.center_sample = Some(pattern::shade(center, uniforms, &self.shader));
        self.draws += 1;
        Ok(())
    }
}
