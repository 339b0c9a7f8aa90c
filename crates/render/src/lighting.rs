//! Per-fragment lighting: ambient + diffuse + specular, tinted by the object
//! colour and modulated by the texture sample.
//!
//! The WGSL fragment shader in the GPU backend implements the same formula;
//! this CPU version exists so the model can be checked without a device.

use chairview_common::ShadingParams;
use glam::{Vec3, Vec4};

pub const AMBIENT_STRENGTH: f32 = 0.4;
pub const SPECULAR_STRENGTH: f32 = 1.5;
pub const SHININESS: f32 = 128.0;

/// Mirror `incident` about `normal` (GLSL/WGSL `reflect`).
fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * normal.dot(incident) * normal
}

/// Light colour reaching the eye before the object colour is applied.
pub fn light_terms(params: &ShadingParams, frag_pos: Vec3, normal: Vec3) -> Vec3 {
    let ambient = AMBIENT_STRENGTH * params.light_color;

    let norm = normal.normalize();
    let light_dir = (params.light_position - frag_pos).normalize();
    let diff = norm.dot(light_dir).max(0.0);
    let diffuse = diff * params.light_color;

    let view_dir = (params.view_position - frag_pos).normalize();
    let reflect_dir = reflect(-light_dir, norm);
    let spec = view_dir.dot(reflect_dir).max(0.0).powf(SHININESS);
    let specular = SPECULAR_STRENGTH * spec * params.light_color;

    ambient + diffuse + specular
}

/// Final fragment colour for a texel sampled at `frag_pos`.
pub fn shade(params: &ShadingParams, frag_pos: Vec3, normal: Vec3, texel: Vec4) -> Vec4 {
    let result = light_terms(params, frag_pos, normal) * params.object_color;
    texel * result.extend(1.0)
}
