/// WGSL shader for the textured, lit quads.
///
/// Fragment lighting matches `chairview_render::lighting::shade`: ambient 0.4,
/// Lambertian diffuse, reflected specular with strength 1.5 and exponent 128.
pub const SCENE_SHADER: &str = r#"
struct Uniforms {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    light_position: vec4<f32>,
    light_color: vec4<f32>,
    object_color: vec4<f32>,
    view_position: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(1) @binding(0)
var diffuse_texture: texture_2d<f32>;
@group(1) @binding(1)
var diffuse_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
    @location(2) uv: vec2<f32>,
    @location(3) normal: vec3<f32>,
};

struct InstanceInput {
    @location(4) model_0: vec4<f32>,
    @location(5) model_1: vec4<f32>,
    @location(6) model_2: vec4<f32>,
    @location(7) model_3: vec4<f32>,
    @location(8) normal_0: vec4<f32>,
    @location(9) normal_1: vec4<f32>,
    @location(10) normal_2: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) frag_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
    @location(3) color: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let normal_matrix = mat3x3<f32>(
        instance.normal_0.xyz,
        instance.normal_1.xyz,
        instance.normal_2.xyz,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = uniforms.projection * uniforms.view * world_pos;
    out.frag_pos = world_pos.xyz;
    out.normal = normal_matrix * vertex.normal;
    out.uv = vertex.uv;
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let light_color = uniforms.light_color.xyz;

    let ambient = 0.4 * light_color;

    let norm = normalize(in.normal);
    let light_dir = normalize(uniforms.light_position.xyz - in.frag_pos);
    let diff = max(dot(norm, light_dir), 0.0);
    let diffuse = diff * light_color;

    let view_dir = normalize(uniforms.view_position.xyz - in.frag_pos);
    let reflect_dir = reflect(-light_dir, norm);
    let spec = pow(max(dot(view_dir, reflect_dir), 0.0), 128.0);
    let specular = 1.5 * spec * light_color;

    let result = (ambient + diffuse + specular) * uniforms.object_color.xyz;
    return textureSample(diffuse_texture, diffuse_sampler, in.uv) * vec4<f32>(result, 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chairview_render::lighting::{AMBIENT_STRENGTH, SHININESS, SPECULAR_STRENGTH};

    #[test]
    fn shader_lighting_constants_match_cpu_model() {
        let ambient = format!("let ambient = {AMBIENT_STRENGTH:?} * light_color;");
        let shininess = format!("0.0), {SHININESS:?});");
        let specular = format!("let specular = {SPECULAR_STRENGTH:?} * spec * light_color;");
        for line in [ambient, shininess, specular] {
            assert!(SCENE_SHADER.contains(&line), "missing `{line}`");
        }
    }
}
