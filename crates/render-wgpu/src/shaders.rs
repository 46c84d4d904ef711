/// WGSL shader for the color cube: per-vertex color, one PVM matrix per draw.
///
/// A replacement program must keep the same interface: `vs_main` taking
/// `@location(0)` position and `@location(1)` color (both `vec4<f32>`),
/// `fs_main`, and the matrix at `@group(0) @binding(0)`.
pub const ROBOT_SHADER: &str = r#"
struct Uniforms {
    pvm: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec4<f32>,
    @location(1) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = uniforms.pvm * vertex.position;
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

pub const VS_ENTRY: &str = "vs_main";
pub const FS_ENTRY: &str = "fs_main";
