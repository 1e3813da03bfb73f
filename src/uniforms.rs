use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

use crate::config::ShaderConfig;
use crate::surface::RenderSurface;

/// Values fed to the fabric shader for one draw call.
///
/// The background color is a single vector that is only ever eased toward a
/// target in place; nothing replaces it wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderUniforms {
    time: f32,
    resolution: Vec2,
    pointer: Vec2,
    color: Vec3,
    pixel_ratio: f32,
}

impl ShaderUniforms {
    pub fn new(surface: &RenderSurface, color: Vec3) -> Self {
        let mut uniforms = Self {
            time: 0.0,
            resolution: Vec2::ONE,
            pointer: Vec2::splat(0.5),
            color,
            pixel_ratio: 1.0,
        };
        uniforms.set_resolution(surface);
        uniforms
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn resolution(&self) -> Vec2 {
        self.resolution
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn color(&self) -> Vec3 {
        self.color
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    pub(crate) fn set_time(&mut self, time: f32) {
        self.time = time;
    }

    /// Mirrors the logical viewport size and the capped pixel ratio.
    pub fn set_resolution(&mut self, surface: &RenderSurface) {
        let (width, height) = surface.logical_size();
        self.resolution = Vec2::new(width as f32, height as f32);
        self.pixel_ratio = surface.pixel_ratio() as f32;
    }

    /// Stores a client-space position as a bottom-left based `[0, 1]` pair.
    pub fn set_pointer_from_client(&mut self, x: f64, y: f64, surface: &RenderSurface) {
        let (width, height) = surface.logical_size();
        self.pointer = Vec2::new(
            (x / width as f64) as f32,
            (1.0 - y / height as f64) as f32,
        );
    }

    /// Moves the color a fixed fraction of the way to `target`, in place.
    ///
    /// Each channel stays between its previous value and the target. Once a
    /// step is too small to change the value, the channel lands on the target.
    pub fn blend_color_toward(&mut self, target: Vec3, factor: f32) {
        for channel in 0..3 {
            self.color[channel] = approach(self.color[channel], target[channel], factor);
        }
    }

    /// Packs the uniforms into the layout the WGSL shader declares.
    pub fn to_gpu(&self, view_proj: Mat4, shader: &ShaderConfig) -> GpuUniform {
        GpuUniform {
            view_proj: view_proj.to_cols_array_2d(),
            resolution: self.resolution.into(),
            pointer: self.pointer.into(),
            color: self.color.into(),
            time: self.time,
            pixel_ratio: self.pixel_ratio,
            _padding: [0.0; 3],
            ripple: [
                shader.ripple_frequency,
                shader.ripple_speed,
                shader.ripple_falloff,
                shader.ripple_amplitude,
            ],
            fabric: [shader.fabric_scale, shader.fabric_amplitude, 0.0, 0.0],
        }
    }
}

fn approach(current: f32, target: f32, factor: f32) -> f32 {
    let next = current + (target - current) * factor;
    let next = if target >= current {
        next.clamp(current, target)
    } else {
        next.clamp(target, current)
    };
    if next == current {
        target
    } else {
        next
    }
}

/// Uniform buffer contents, laid out to match `BackdropUniform` in WGSL.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuUniform {
    pub view_proj: [[f32; 4]; 4],
    pub resolution: [f32; 2],
    pub pointer: [f32; 2],
    pub color: [f32; 3],
    pub time: f32,
    pub pixel_ratio: f32,
    _padding: [f32; 3],
    pub ripple: [f32; 4],
    pub fabric: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    const NIGHT: Vec3 = Vec3::new(0.07, 0.07, 0.07);
    const DAY: Vec3 = Vec3::new(0.94, 0.92, 0.84);

    fn surface(width: u32, height: u32) -> RenderSurface {
        RenderSurface::new(width, height, 1.0, 2.0)
    }

    #[test]
    fn one_step_from_night_toward_day() {
        let mut uniforms = ShaderUniforms::new(&surface(800, 600), NIGHT);
        uniforms.blend_color_toward(DAY, 0.05);
        let expected = Vec3::new(0.1135, 0.1125, 0.1085);
        assert!((uniforms.color() - expected).abs().max_element() < 1e-6);
    }

    #[test]
    fn blending_at_the_target_is_a_no_op() {
        let mut uniforms = ShaderUniforms::new(&surface(800, 600), DAY);
        for _ in 0..10 {
            uniforms.blend_color_toward(DAY, 0.05);
            assert_eq!(uniforms.color(), DAY);
        }
    }

    #[test]
    fn blending_converges_without_overshoot() {
        for (start, target) in [(NIGHT, DAY), (DAY, NIGHT), (Vec3::ONE, Vec3::ZERO)] {
            let mut uniforms = ShaderUniforms::new(&surface(800, 600), start);
            let mut distance = (target - start).length();
            let mut frames = 0;
            while uniforms.color() != target {
                uniforms.blend_color_toward(target, 0.05);
                let next = (target - uniforms.color()).length();
                assert!(next < distance, "distance must shrink every frame");
                for channel in 0..3 {
                    let lo = start[channel].min(target[channel]);
                    let hi = start[channel].max(target[channel]);
                    assert!(uniforms.color()[channel] >= lo && uniforms.color()[channel] <= hi);
                }
                distance = next;
                frames += 1;
                assert!(frames < 10_000, "blend never reached the target");
            }
        }
    }

    #[test]
    fn theme_switch_settles_within_a_couple_of_seconds() {
        let mut uniforms = ShaderUniforms::new(&surface(800, 600), NIGHT);
        for _ in 0..120 {
            uniforms.blend_color_toward(DAY, 0.05);
        }
        assert!((uniforms.color() - DAY).abs().max_element() < 0.002);
    }

    #[test]
    fn pointer_is_normalized_and_flipped() {
        let surface = surface(1000, 500);
        let mut uniforms = ShaderUniforms::new(&surface, NIGHT);
        assert_eq!(uniforms.pointer(), Vec2::splat(0.5));

        uniforms.set_pointer_from_client(250.0, 100.0, &surface);
        assert_eq!(uniforms.pointer(), Vec2::new(0.25, 0.8));

        uniforms.set_pointer_from_client(500.0, 250.0, &surface);
        assert_eq!(uniforms.pointer(), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn resolution_tracks_logical_size() {
        let mut hidpi = RenderSurface::new(1280, 720, 3.0, 2.0);
        let mut uniforms = ShaderUniforms::new(&hidpi, NIGHT);
        assert_eq!(uniforms.resolution(), Vec2::new(1280.0, 720.0));
        assert_eq!(uniforms.pixel_ratio(), 2.0);

        hidpi.resize(640, 480, 1.0);
        uniforms.set_resolution(&hidpi);
        assert_eq!(uniforms.resolution(), Vec2::new(640.0, 480.0));
        assert_eq!(uniforms.pixel_ratio(), 1.0);
    }

    #[test]
    fn gpu_layout_matches_wgsl_struct() {
        assert_eq!(std::mem::size_of::<GpuUniform>(), 144);
        let uniforms = ShaderUniforms::new(&surface(800, 600), NIGHT);
        let packed = uniforms.to_gpu(Mat4::IDENTITY, &ShaderConfig::default());
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&packed));
        assert_eq!(&floats[16..18], &[800.0, 600.0]);
        assert_eq!(&floats[18..20], &[0.5, 0.5]);
        assert_eq!(&floats[20..23], &[0.07, 0.07, 0.07]);
        assert_eq!(floats[23], 0.0);
        assert_eq!(floats[24], 1.0);
        assert_eq!(&floats[28..32], &[20.0, 2.0, 0.5, 0.05]);
        assert_eq!(&floats[32..34], &[400.0, 0.03]);
    }
}
