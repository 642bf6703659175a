use std::collections::HashMap;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use museum_assets::ModelData;
use museum_kernel::{Drawable, Light, Material, MeshHandle, Museum, Shape, Side};
use wgpu::util::DeviceExt;

use crate::mesh::{self, MeshData, Vertex};
use crate::shaders;

const SKY: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.06,
    a: 1.0,
};

const STYLE_LIT: f32 = 0.0;
const STYLE_HOLOGRAM: f32 = 1.0;
const STYLE_EMISSIVE: f32 = 2.0;

const SIDE_BOTH: f32 = 0.0;
const SIDE_OUTSIDE: f32 = 1.0;
const SIDE_INSIDE: f32 = 2.0;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    light_0: [f32; 4],
    light_1: [f32; 4],
    /// x: effect time.
    params: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
    style: [f32; 4],
}

impl InstanceData {
    fn new(drawable: &Drawable) -> Self {
        let cols = drawable.transform.matrix().to_cols_array_2d();
        let (color, style) = material_style(drawable.material);
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color,
            style: [style, side_flag(drawable.side), 0.0, 0.0],
        }
    }
}

/// `style.y`: which faces the fragment shader keeps.
pub(crate) fn side_flag(side: Side) -> f32 {
    match side {
        Side::Both => SIDE_BOTH,
        Side::Outside => SIDE_OUTSIDE,
        Side::Inside => SIDE_INSIDE,
    }
}

/// Flat colour and shader style for a material.
pub(crate) fn material_style(material: Material) -> ([f32; 4], f32) {
    match material {
        Material::Fresco => ([0.80, 0.72, 0.60, 1.0], STYLE_LIT),
        Material::Column => ([0.85, 0.83, 0.78, 1.0], STYLE_LIT),
        Material::Hologram => ([0.588, 0.475, 0.275, 1.0], STYLE_HOLOGRAM),
        Material::Ground => ([0.35, 0.30, 0.25, 1.0], STYLE_LIT),
        Material::Earth => ([0.20, 0.45, 0.85, 1.0], STYLE_LIT),
        Material::Sun => ([1.0, 0.84, 0.0, 1.0], STYLE_EMISSIVE),
        Material::Moon => ([0.70, 0.70, 0.70, 1.0], STYLE_LIT),
        Material::Sculpture => ([0.72, 0.60, 0.42, 1.0], STYLE_LIT),
    }
}

/// Consecutive instances sharing one mesh.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Batch {
    pub shape: Shape,
    pub instances: Range<u32>,
}

/// Group drawables by shape into one contiguous instance list. Drawables
/// whose mesh is not available (a model still loading) are skipped, as is
/// anything past `max_instances`.
pub(crate) fn build_batches(
    drawables: impl IntoIterator<Item = Drawable>,
    has_mesh: impl Fn(&Shape) -> bool,
    max_instances: usize,
) -> (Vec<InstanceData>, Vec<Batch>) {
    let mut groups: Vec<(Shape, Vec<InstanceData>)> = Vec::new();
    let mut total = 0;
    for drawable in drawables {
        if total >= max_instances {
            break;
        }
        if !has_mesh(&drawable.shape) {
            continue;
        }
        let instance = InstanceData::new(&drawable);
        match groups.iter_mut().find(|(shape, _)| *shape == drawable.shape) {
            Some((_, list)) => list.push(instance),
            None => groups.push((drawable.shape, vec![instance])),
        }
        total += 1;
    }

    let mut instances = Vec::with_capacity(total);
    let mut batches = Vec::with_capacity(groups.len());
    for (shape, list) in groups {
        let start = instances.len() as u32;
        instances.extend(list);
        batches.push(Batch {
            shape,
            instances: start..instances.len() as u32,
        });
    }
    (instances, batches)
}

fn light_uniform(light: Option<&Light>) -> [f32; 4] {
    match light {
        Some(l) => [l.direction.x, l.direction.y, l.direction.z, l.intensity],
        None => [0.0, 1.0, 0.0, 0.0],
    }
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, label: &str, mesh: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_vertex_buffer")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_index_buffer")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }
}

/// wgpu-based museum renderer.
pub struct WgpuRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    meshes: HashMap<Shape, GpuMesh>,
    instance_buffer: wgpu::Buffer,
    max_instances: u32,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
                light_0: light_uniform(None),
                light_1: light_uniform(None),
                params: [0.0; 4],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("museum_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::MUSEUM_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("museum_pipeline"),
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
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                            7 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            // One-sided surfaces are discarded per instance in the shader.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
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

        let mut meshes = HashMap::new();
        for (shape, label, data) in [
            (Shape::Cube, "cube", mesh::cube()),
            (Shape::Sphere, "sphere", mesh::sphere(32, 16)),
            (Shape::Cylinder, "cylinder", mesh::cylinder(32)),
            (Shape::Plane, "plane", mesh::plane()),
            (Shape::Dome, "dome", mesh::dome(32, 8)),
        ] {
            meshes.insert(shape, GpuMesh::upload(device, label, &data));
        }

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
            instance_buffer,
            max_instances,
            depth_texture,
            surface_format,
        }
    }

    /// Upload a loaded model so nodes with `Shape::Model(handle)` draw.
    /// Uploading the same handle twice replaces the earlier buffers.
    pub fn upload_model(&mut self, device: &wgpu::Device, handle: MeshHandle, model: &ModelData) {
        let data = MeshData::from_parts(&model.positions, &model.normals, &model.indices);
        let gpu = GpuMesh::upload(device, &model.name, &data);
        tracing::debug!(
            model = %model.name,
            vertices = model.vertex_count(),
            triangles = model.triangle_count(),
            "model uploaded"
        );
        self.meshes.insert(Shape::Model(handle), gpu);
    }

    pub fn has_model(&self, handle: MeshHandle) -> bool {
        self.meshes.contains_key(&Shape::Model(handle))
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Render one frame of the museum from its camera.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        museum: &Museum,
    ) {
        let lights = museum.scene().lights();
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: museum.camera.view_projection().to_cols_array_2d(),
                light_0: light_uniform(lights.first()),
                light_1: light_uniform(lights.get(1)),
                params: [museum.effect_time() as f32, 0.0, 0.0, 0.0],
            }),
        );

        let (instances, batches) = build_batches(
            museum.drawables(),
            |shape| self.meshes.contains_key(shape),
            self.max_instances as usize,
        );

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
                        load: wgpu::LoadOp::Clear(SKY),
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
            for batch in &batches {
                let Some(mesh) = self.meshes.get(&batch.shape) else {
                    continue;
                };
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, batch.instances.clone());
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
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
    use museum_kernel::Museum;

    fn primitives_only(shape: &Shape) -> bool {
        !matches!(shape, Shape::Model(_))
    }

    #[test]
    fn batches_are_contiguous_and_cover_everything() {
        let museum = Museum::default();
        let (instances, batches) = build_batches(museum.drawables(), primitives_only, 1_024);
        // 19 static nodes plus three bodies.
        assert_eq!(instances.len(), 22);
        let mut next = 0;
        for batch in &batches {
            assert_eq!(batch.instances.start, next);
            next = batch.instances.end;
        }
        assert_eq!(next as usize, instances.len());
        let spheres = batches.iter().find(|b| b.shape == Shape::Sphere).unwrap();
        assert_eq!(spheres.instances.len(), 3);
    }

    #[test]
    fn models_without_mesh_are_skipped() {
        let mut museum = Museum::default();
        museum.place_sculpture(0, MeshHandle(7));
        let (instances, batches) = build_batches(museum.drawables(), primitives_only, 1_024);
        assert_eq!(instances.len(), 22);
        assert!(batches.iter().all(|b| b.shape != Shape::Model(MeshHandle(7))));

        let (instances, _) = build_batches(museum.drawables(), |_| true, 1_024);
        assert_eq!(instances.len(), 23);
    }

    #[test]
    fn instance_cap_is_respected() {
        let museum = Museum::default();
        let (instances, _) = build_batches(museum.drawables(), |_| true, 5);
        assert_eq!(instances.len(), 5);
    }

    #[test]
    fn hologram_and_sun_styles() {
        assert_eq!(material_style(Material::Hologram).1, STYLE_HOLOGRAM);
        assert_eq!(material_style(Material::Sun).1, STYLE_EMISSIVE);
        assert_eq!(material_style(Material::Earth).1, STYLE_LIT);
    }

    #[test]
    fn fresco_is_drawn_inside_the_dome() {
        let museum = Museum::default();
        let (instances, batches) = build_batches(museum.drawables(), primitives_only, 1_024);
        let domes = batches.iter().find(|b| b.shape == Shape::Dome).unwrap();
        let shells: Vec<&InstanceData> = instances[domes.instances.start as usize..domes.instances.end as usize]
            .iter()
            .collect();
        assert_eq!(shells.len(), 2);

        let fresco_color = material_style(Material::Fresco).0;
        let fresco = shells.iter().find(|i| i.color == fresco_color).unwrap();
        let outer = shells.iter().find(|i| i.color != fresco_color).unwrap();
        assert_eq!(fresco.style[1], SIDE_INSIDE);
        assert_eq!(outer.style[1], SIDE_OUTSIDE);
        assert_eq!(fresco.model_3, outer.model_3);
    }

    #[test]
    fn ordinary_nodes_keep_both_sides() {
        let museum = Museum::default();
        let (instances, _) = build_batches(museum.drawables(), primitives_only, 1_024);
        let both = instances.iter().filter(|i| i.style[1] == SIDE_BOTH).count();
        assert_eq!(both, instances.len() - 2);
    }

    #[test]
    fn missing_light_contributes_nothing() {
        assert_eq!(light_uniform(None)[3], 0.0);
    }
}
