use std::collections::BTreeMap;

use bytemuck::{Pod, Zeroable};
use chairview_common::{Frame, MeshHandle, TextureSlot};
use chairview_scene::{MeshData, MeshVertex};
use glam::{Mat3, Mat4};
use wgpu::util::DeviceExt;

use crate::error::RenderError;
use crate::shaders;
use crate::texture::TextureImage;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    light_position: [f32; 4],
    light_color: [f32; 4],
    object_color: [f32; 4],
    view_position: [f32; 4],
}

impl Uniforms {
    fn from_frame(frame: &Frame) -> Self {
        let s = &frame.shading;
        Self {
            view: frame.matrices.view.to_cols_array_2d(),
            projection: frame.matrices.projection.to_cols_array_2d(),
            light_position: s.light_position.extend(1.0).to_array(),
            light_color: s.light_color.extend(1.0).to_array(),
            object_color: s.object_color.extend(1.0).to_array(),
            view_position: s.view_position.extend(1.0).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    color: [f32; 3],
    uv: [f32; 2],
    normal: [f32; 3],
}

impl From<&MeshVertex> for Vertex {
    fn from(v: &MeshVertex) -> Self {
        Self {
            position: v.position,
            color: v.color,
            uv: v.uv,
            normal: v.normal,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    normal_0: [f32; 4],
    normal_1: [f32; 4],
    normal_2: [f32; 4],
}

impl InstanceData {
    /// Model matrix plus its inverse-transpose for transforming normals.
    fn from_model(model: Mat4) -> Self {
        let cols = model.to_cols_array_2d();
        let normal = Mat3::from_mat4(model).inverse().transpose();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            normal_0: normal.x_axis.extend(0.0).to_array(),
            normal_1: normal.y_axis.extend(0.0).to_array(),
            normal_2: normal.z_axis.extend(0.0).to_array(),
        }
    }
}

/// Texel storage format. Texels are sampled as stored, with no sRGB decode.
const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Pick the surface format to configure and the format to render through.
///
/// The shaded colour is written as is, so the render format is never sRGB.
/// A non-sRGB surface is preferred; an sRGB-only surface is rendered through
/// its non-sRGB view format.
fn pick_surface_formats(
    formats: &[wgpu::TextureFormat],
) -> Option<(wgpu::TextureFormat, wgpu::TextureFormat)> {
    let surface = formats
        .iter()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first())
        .copied()?;
    Some((surface, surface.remove_srgb_suffix()))
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Surface, device and queue for one window.
pub struct GpuContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    render_format: wgpu::TextureFormat,
}

impl GpuContext {
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(target)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("chairview_device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let (surface_format, render_format) =
            pick_surface_formats(&surface_caps.formats).ok_or(RenderError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            // Frame pacing is left uncapped.
            present_mode: wgpu::PresentMode::AutoNoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: if render_format == surface_format {
                vec![]
            } else {
                vec![render_format]
            },
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        tracing::info!(
            "GPU initialized with {} backend ({})",
            adapter.get_info().backend.to_str(),
            adapter.get_info().name
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            render_format,
        })
    }

    /// Colour format every pipeline targets; never sRGB.
    pub fn render_format(&self) -> wgpu::TextureFormat {
        self.render_format
    }

    /// View of a swapchain texture in the render format.
    pub fn frame_view(&self, frame: &wgpu::SurfaceTexture) -> wgpu::TextureView {
        frame.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.render_format),
            ..Default::default()
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
    }

    /// Next swapchain texture, or `None` if this frame should be skipped.
    pub fn acquire(&self) -> Option<wgpu::SurfaceTexture> {
        match self.surface.get_current_texture() {
            Ok(t) => Some(t),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                None
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                None
            }
        }
    }
}

/// wgpu-based scene renderer.
pub struct WgpuRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    meshes: Vec<GpuMesh>,
    textures: BTreeMap<TextureSlot, wgpu::BindGroup>,
    fallback_texture: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    max_instances: u32,
    depth_texture: wgpu::TextureView,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target_format: wgpu::TextureFormat,
        (width, height): (u32, u32),
        meshes: &[MeshData],
        textures: &[(TextureSlot, TextureImage)],
    ) -> Self {
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniform_buffer"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("texture_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let textures: BTreeMap<TextureSlot, wgpu::BindGroup> = textures
            .iter()
            .map(|(slot, image)| {
                let bind_group = Self::upload_texture(
                    device,
                    queue,
                    &texture_layout,
                    &sampler,
                    image,
                    slot.file_name(),
                );
                (*slot, bind_group)
            })
            .collect();
        let fallback_texture = Self::upload_texture(
            device,
            queue,
            &texture_layout,
            &sampler,
            &TextureImage::white(),
            "white",
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SCENE_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                            2 => Float32x2,
                            3 => Float32x3,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                            7 => Float32x4,
                            8 => Float32x4,
                            9 => Float32x4,
                            10 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            // Quads are single-sided geometry seen from both sides.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let meshes = meshes
            .iter()
            .map(|mesh| {
                let vertices: Vec<Vertex> = mesh.vertices.iter().map(Vertex::from).collect();
                GpuMesh {
                    vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(mesh.name),
                        contents: bytemuck::cast_slice(&vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    }),
                    index_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(mesh.name),
                        contents: bytemuck::cast_slice(&mesh.indices),
                        usage: wgpu::BufferUsages::INDEX,
                    }),
                    index_count: mesh.index_count(),
                }
            })
            .collect();

        // Instance buffer (pre-allocated)
        let max_instances = 1_024u32;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (max_instances as u64) * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            meshes,
            textures,
            fallback_texture,
            instance_buffer,
            max_instances,
            depth_texture,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    /// Render one composed frame: a 6-index draw of the referenced mesh per
    /// draw call.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        frame: &Frame,
    ) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms::from_frame(frame)),
        );

        if frame.draws.len() > self.max_instances as usize {
            tracing::warn!(
                "frame has {} draws, drawing the first {}",
                frame.draws.len(),
                self.max_instances
            );
        }
        let draws = &frame.draws[..frame.draws.len().min(self.max_instances as usize)];
        let instances: Vec<InstanceData> = draws
            .iter()
            .map(|d| InstanceData::from_model(d.model))
            .collect();
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

            let mut bound_mesh: Option<MeshHandle> = None;
            let mut bound_texture: Option<TextureSlot> = None;
            for (i, draw) in draws.iter().enumerate() {
                let Some(mesh) = self.meshes.get(draw.mesh.0 as usize) else {
                    tracing::warn!("draw {i} references unknown mesh {}", draw.mesh.0);
                    continue;
                };
                if bound_mesh != Some(draw.mesh) {
                    pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                    bound_mesh = Some(draw.mesh);
                }
                if bound_texture != Some(draw.texture) {
                    let bind_group = self
                        .textures
                        .get(&draw.texture)
                        .unwrap_or(&self.fallback_texture);
                    pass.set_bind_group(1, bind_group, &[]);
                    bound_texture = Some(draw.texture);
                }
                let instance = i as u32;
                pass.draw_indexed(0..mesh.index_count, 0, instance..instance + 1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn upload_texture(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        image: &TextureImage,
        label: &str,
    ) -> wgpu::BindGroup {
        let levels = image.mip_chain();
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: image.width,
                height: image.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: levels.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        for (mip_level, level) in levels.iter().enumerate() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: mip_level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &level.pixels,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(level.bytes_per_row()),
                    rows_per_image: Some(level.height),
                },
                wgpu::Extent3d {
                    width: level.width,
                    height: level.height,
                    depth_or_array_layers: 1,
                },
            );
        }
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chairview_common::{FrameMatrices, ShadingParams};
    use glam::Vec3;

    #[test]
    fn non_srgb_surface_format_is_preferred() {
        use wgpu::TextureFormat as F;
        let picked = pick_surface_formats(&[F::Bgra8UnormSrgb, F::Bgra8Unorm, F::Rgba16Float]);
        assert_eq!(picked, Some((F::Bgra8Unorm, F::Bgra8Unorm)));
    }

    #[test]
    fn srgb_only_surface_renders_through_linear_view() {
        use wgpu::TextureFormat as F;
        let picked = pick_surface_formats(&[F::Bgra8UnormSrgb]);
        assert_eq!(picked, Some((F::Bgra8UnormSrgb, F::Bgra8Unorm)));
        assert_eq!(pick_surface_formats(&[]), None);
    }

    #[test]
    fn textures_are_sampled_without_srgb_decode() {
        assert!(!TEXTURE_FORMAT.is_srgb());
    }

    #[test]
    fn gpu_structs_are_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 11 * 4);
        assert_eq!(std::mem::size_of::<InstanceData>(), 7 * 16);
        assert_eq!(std::mem::size_of::<Uniforms>() % 16, 0);
    }

    #[test]
    fn instance_data_carries_model_columns() {
        let model = Mat4::from_translation(Vec3::new(0.125, 0.6, 0.125))
            * Mat4::from_scale(Vec3::new(0.5, 5.5, 0.5));
        let data = InstanceData::from_model(model);
        assert_eq!(data.model_3, [0.125, 0.6, 0.125, 1.0]);
        assert_eq!(data.model_0, [0.5, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let model = Mat4::from_scale(Vec3::new(2.0, 0.5, 1.0));
        let data = InstanceData::from_model(model);
        let normal = Mat3::from_cols(
            Vec3::from_slice(&data.normal_0[..3]),
            Vec3::from_slice(&data.normal_1[..3]),
            Vec3::from_slice(&data.normal_2[..3]),
        );
        // A surface tangent and its normal stay perpendicular after transform.
        let tangent = model.transform_vector3(Vec3::new(1.0, 1.0, 0.0));
        let n = normal * Vec3::new(1.0, -1.0, 0.0);
        assert!(tangent.dot(n).abs() < 1e-6);
    }

    #[test]
    fn uniforms_copy_frame_lighting() {
        let frame = Frame {
            matrices: FrameMatrices::default(),
            shading: ShadingParams::seen_from(Vec3::new(0.0, 1.0, 4.0)),
            draws: Vec::new(),
        };
        let u = Uniforms::from_frame(&frame);
        assert_eq!(u.view, Mat4::IDENTITY.to_cols_array_2d());
        assert_eq!(u.light_position, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(u.object_color, [0.76, 0.60, 0.32, 1.0]);
        assert_eq!(u.view_position, [0.0, 1.0, 4.0, 1.0]);
    }
}
