use glam::Mat4;

pub const BACKDROP_SHADER: &str = r#"
struct BackdropUniform {
    view_proj: mat4x4<f32>,
    resolution: vec2<f32>,
    pointer: vec2<f32>,
    color: vec3<f32>,
    time: f32,
    pixel_ratio: f32,
    // frequency, speed, falloff, amplitude
    ripple: vec4<f32>,
    // scale, amplitude
    fabric: vec4<f32>,
}

@group(0) @binding(0)
var<uniform> globals: BackdropUniform;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
}

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.position = globals.view_proj * vec4<f32>(position, 1.0);
    return out;
}

fn lattice_hash(st: vec2<f32>) -> f32 {
    return fract(sin(dot(st, vec2<f32>(12.9898, 78.233))) * 43758.5453123);
}

fn value_noise(st: vec2<f32>) -> f32 {
    let cell = floor(st);
    let f = fract(st);
    let a = lattice_hash(cell);
    let b = lattice_hash(cell + vec2<f32>(1.0, 0.0));
    let c = lattice_hash(cell + vec2<f32>(0.0, 1.0));
    let d = lattice_hash(cell + vec2<f32>(1.0, 1.0));
    let u = f * f * (3.0 - 2.0 * f);
    return mix(a, b, u.x) + (c - a) * u.y * (1.0 - u.x) + (d - b) * u.x * u.y;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    // Framebuffer coordinates start at the top-left; the pattern expects bottom-left.
    let physical = globals.resolution * globals.pixel_ratio;
    let frag = vec2<f32>(input.position.x, physical.y - input.position.y);
    let st = frag / physical;
    let aspect = vec2<f32>(globals.resolution.x / globals.resolution.y, 1.0);
    let dist = distance(st * aspect, globals.pointer * aspect);
    let wave = sin(dist * globals.ripple.x - globals.time * globals.ripple.y);
    let ripple = smoothstep(0.0, globals.ripple.z, 1.0 - dist) * wave * globals.ripple.w;
    let fabric = value_noise(st * globals.fabric.x) * globals.fabric.y;
    return vec4<f32>(globals.color + vec3<f32>(ripple + fabric), 1.0);
}
"#;

/// Two-by-two quad in the `z = 0` plane, covering the whole viewport.
pub const QUAD_VERTICES: &[f32] = &[
    -1.0, -1.0, 0.0, //
    1.0, -1.0, 0.0, //
    1.0, 1.0, 0.0, //
    -1.0, 1.0, 0.0, //
];

pub const QUAD_INDICES: &[u16] = &[0, 1, 2, 0, 2, 3];

/// Orthographic camera framing the quad edge to edge.
pub fn orthographic_camera() -> Mat4 {
    Mat4::orthographic_rh(-1.0, 1.0, -1.0, 1.0, 0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn camera_maps_quad_corners_to_clip_corners() {
        let camera = orthographic_camera();
        for corner in QUAD_VERTICES.chunks(3) {
            let world = Vec3::new(corner[0], corner[1], corner[2]);
            let clip = camera.project_point3(world);
            assert!((clip.x - world.x).abs() < 1e-6);
            assert!((clip.y - world.y).abs() < 1e-6);
            assert!((0.0..=1.0).contains(&clip.z));
        }
    }

    #[test]
    fn quad_is_two_triangles_over_four_vertices() {
        assert_eq!(QUAD_VERTICES.len(), 12);
        assert_eq!(QUAD_INDICES.len(), 6);
        assert!(QUAD_INDICES.iter().all(|&index| index < 4));
    }

    #[test]
    fn shader_declares_expected_entry_points() {
        assert!(BACKDROP_SHADER.contains("fn vs_main"));
        assert!(BACKDROP_SHADER.contains("fn fs_main"));
        assert!(BACKDROP_SHADER.contains("var<uniform> globals: BackdropUniform"));
    }
}
