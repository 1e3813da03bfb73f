//! CPU evaluation of the fabric ripple shader.
//!
//! These functions follow `render::shared::BACKDROP_SHADER` line for line and are used
//! by the headless renderer and to pin down the shader's behaviour in tests.

use glam::{Vec2, Vec3};

use crate::config::ShaderConfig;
use crate::uniforms::ShaderUniforms;

/// Hash of a lattice point into `[0, 1)`.
pub fn lattice_hash(st: Vec2) -> f32 {
    fract((st.dot(Vec2::new(12.9898, 78.233))).sin() * 43758.547)
}

/// Bilinear value noise over the lattice hash with a smoothstep curve.
pub fn value_noise(st: Vec2) -> f32 {
    let cell = st.floor();
    let f = st - cell;
    let a = lattice_hash(cell);
    let b = lattice_hash(cell + Vec2::new(1.0, 0.0));
    let c = lattice_hash(cell + Vec2::new(0.0, 1.0));
    let d = lattice_hash(cell + Vec2::new(1.0, 1.0));
    let u = f * f * (Vec2::splat(3.0) - 2.0 * f);
    mix(a, b, u.x) + (c - a) * u.y * (1.0 - u.x) + (d - b) * u.x * u.y
}

/// Traveling radial wave around the pointer, faded out with distance.
pub fn ripple(distance: f32, time: f32, shader: &ShaderConfig) -> f32 {
    let wave = (distance * shader.ripple_frequency - time * shader.ripple_speed).sin();
    smoothstep(0.0, shader.ripple_falloff, 1.0 - distance) * wave * shader.ripple_amplitude
}

/// Fine static weave texture.
pub fn fabric(st: Vec2, shader: &ShaderConfig) -> f32 {
    value_noise(st * shader.fabric_scale) * shader.fabric_amplitude
}

/// Color of the pixel at `frag_coord`, given in device pixels from the
/// bottom-left corner.
pub fn shade(frag_coord: Vec2, uniforms: &ShaderUniforms, shader: &ShaderConfig) -> Vec3 {
    let resolution = uniforms.resolution();
    let st = frag_coord / (resolution * uniforms.pixel_ratio());
    let aspect = Vec2::new(resolution.x / resolution.y, 1.0);
    let distance = (st * aspect).distance(uniforms.pointer() * aspect);
    let offset = ripple(distance, uniforms.time(), shader) + fabric(st, shader);
    uniforms.color() + Vec3::splat(offset)
}

fn fract(value: f32) -> f32 {
    value - value.floor()
}

fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
