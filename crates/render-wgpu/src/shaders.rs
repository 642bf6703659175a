/// WGSL shader for every museum mesh.
///
/// `instance.style.x` selects the surface: 0 lit, 1 hologram, 2 emissive.
/// `instance.style.y` selects the faces kept: 0 both, 1 front only, 2 back
/// only. Front faces wind counter-clockwise with outward normals.
/// The hologram pattern is computed in the mesh's local XY plane and
/// animated by `uniforms.params.x`.
pub const MUSEUM_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    light_0: vec4<f32>,
    light_1: vec4<f32>,
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
    @location(7) style: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) color: vec4<f32>,
    @location(2) local_pos: vec3<f32>,
    @location(3) @interpolate(flat) style: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_normal = normalize(world_normal);
    out.color = instance.color;
    out.local_pos = vertex.position;
    out.style = instance.style;
    return out;
}

fn hologram(local: vec3<f32>, time: f32) -> vec3<f32> {
    let distortion = 0.05 * sin(time * 1.5);
    let len = length(local.xy);
    let dir = select(vec2<f32>(0.0), local.xy / len, len > 0.0);
    let p = local.xy + distortion * dir;
    let cells = floor(p.x * 10.0) + floor(p.y * 10.0);
    let checker = smoothstep(0.48, 0.52, cells - 2.0 * floor(cells / 2.0));
    return mix(vec3<f32>(0.0), vec3<f32>(0.588, 0.475, 0.275), checker);
}

@fragment
fn fs_main(in: VertexOutput, @builtin(front_facing) front: bool) -> @location(0) vec4<f32> {
    let side = in.style.y;
    if ((side > 1.5 && front) || (side > 0.5 && side < 1.5 && !front)) {
        discard;
    }

    let kind = in.style.x;
    if (kind > 1.5) {
        return in.color;
    }
    if (kind > 0.5) {
        return vec4<f32>(hologram(in.local_pos, uniforms.params.x), 1.0);
    }

    let n = select(-1.0, 1.0, front) * normalize(in.world_normal);
    let ambient = 0.3;
    let d0 = max(dot(n, normalize(uniforms.light_0.xyz)), 0.0) * uniforms.light_0.w;
    let d1 = max(dot(n, normalize(uniforms.light_1.xyz)), 0.0) * uniforms.light_1.w;
    let lighting = ambient + (d0 + d1) * 0.6;
    return vec4<f32>(in.color.rgb * lighting, in.color.a);
}
"#;
