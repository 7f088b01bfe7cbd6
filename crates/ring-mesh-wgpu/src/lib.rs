//! # ring-mesh-wgpu
//!
//! WGPU rendering backend for ring-mesh.

mod texture;
mod vertex;

pub use texture::*;
pub use vertex::WgpuVertex;

use ring_mesh::{Mesh, RingOutline};
use std::borrow::Borrow;
use std::ops::Range;

const INITIAL_VERTEX_CAPACITY: usize = 1024;
const INITIAL_INDEX_CAPACITY: usize = 2048;

/// One ring mesh to draw, optionally sampling a stroke texture
#[derive(Clone, Copy)]
pub struct RingDraw<'a> {
    pub mesh: &'a Mesh,
    pub texture: Option<&'a RingTexture>,
}

impl<'a> RingDraw<'a> {
    pub fn new(mesh: &'a Mesh) -> Self {
        Self {
            mesh,
            texture: None,
        }
    }

    pub fn with_texture(mut self, texture: &'a RingTexture) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Draw the mesh from the outline's last update with its texture, if any
    pub fn from_outline<T: Borrow<RingTexture>>(outline: &'a RingOutline<T>) -> Self {
        Self {
            mesh: outline.mesh(),
            texture: outline
                .texture()
                .map(|texture| <T as Borrow<RingTexture>>::borrow(texture)),
        }
    }
}

/// Texture identity used to merge consecutive draws into one batch
#[derive(Clone, Copy)]
struct TextureKey<'a>(Option<&'a RingTexture>);

impl PartialEq for TextureKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self.0, other.0) {
            (Some(a), Some(b)) => std::ptr::eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

/// A contiguous index range drawn with a single texture binding
#[derive(Clone, Debug, PartialEq)]
struct DrawBatch<K> {
    texture: K,
    indices: Range<u32>,
}

/// Append every mesh to the shared buffers, rebasing indices, and group
/// consecutive meshes that share a texture.
fn merge_draws<'m, K: PartialEq>(
    draws: impl IntoIterator<Item = (&'m Mesh, K)>,
    vertices: &mut Vec<WgpuVertex>,
    indices: &mut Vec<u32>,
) -> Vec<DrawBatch<K>> {
    let mut batches: Vec<DrawBatch<K>> = Vec::new();

    for (mesh, texture) in draws {
        if mesh.is_empty() {
            continue;
        }

        let base = vertices.len() as u32;
        let start = indices.len() as u32;
        vertices.extend(mesh.vertices.iter().copied().map(WgpuVertex::from));
        indices.extend(mesh.indices.iter().map(|&index| base + index));
        let end = indices.len() as u32;

        match batches.last_mut() {
            Some(batch) if batch.texture == texture && batch.indices.end == start => {
                batch.indices.end = end;
            }
            _ => batches.push(DrawBatch {
                texture,
                indices: start..end,
            }),
        }
    }

    batches
}

/// WGPU renderer for ring meshes
pub struct Renderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    white_texture: RingTexture,
    vertex_capacity: usize,
    index_capacity: usize,
    wgpu_vertices: Vec<WgpuVertex>,
    indices: Vec<u32>,
}

impl Renderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Ring Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/ring.wgsl").into()),
        });

        // Create uniform buffer (screen size)
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Ring Uniform Buffer"),
            size: std::mem::size_of::<[f32; 2]>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let globals_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Ring Globals Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Ring Globals Bind Group"),
            layout: &globals_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let texture_layout = RingTexture::bind_group_layout(device);
        let white_texture = RingTexture::white(device, queue, &texture_layout);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Ring Pipeline Layout"),
            bind_group_layouts: &[&globals_bind_group_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Ring Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[WgpuVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Fan triangles may be degenerate; winding is consistent but not relied upon
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Ring Vertex Buffer"),
            size: (INITIAL_VERTEX_CAPACITY * std::mem::size_of::<WgpuVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Ring Index Buffer"),
            size: (INITIAL_INDEX_CAPACITY * std::mem::size_of::<u32>()) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        log::info!("Ring renderer initialized ({:?})", surface_format);

        Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            uniform_buffer,
            uniform_bind_group,
            texture_layout,
            white_texture,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            index_capacity: INITIAL_INDEX_CAPACITY,
            wgpu_vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Layout that textures passed to [`Renderer::render`] must be created with
    pub fn texture_layout(&self) -> &wgpu::BindGroupLayout {
        &self.texture_layout
    }

    /// Upload a stroke texture compatible with this renderer
    pub fn create_texture(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<RingTexture, TextureError> {
        RingTexture::from_rgba8(device, queue, &self.texture_layout, width, height, pixels)
    }

    /// Draw ring meshes on top of `target`, preserving its contents.
    ///
    /// Mesh positions are in pixels with the origin at the top-left corner.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        screen_width: f32,
        screen_height: f32,
        draws: &[RingDraw<'_>],
    ) {
        self.wgpu_vertices.clear();
        self.indices.clear();

        let batches = merge_draws(
            draws
                .iter()
                .map(|draw| (draw.mesh, TextureKey(draw.texture))),
            &mut self.wgpu_vertices,
            &mut self.indices,
        );

        if batches.is_empty() {
            return;
        }

        // Resize vertex buffer if needed
        if self.wgpu_vertices.len() > self.vertex_capacity {
            self.vertex_capacity = (self.wgpu_vertices.len() * 2).next_power_of_two();
            log::debug!("growing ring vertex buffer to {}", self.vertex_capacity);
            self.vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Ring Vertex Buffer"),
                size: (self.vertex_capacity * std::mem::size_of::<WgpuVertex>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
        }

        // Resize index buffer if needed
        if self.indices.len() > self.index_capacity {
            self.index_capacity = (self.indices.len() * 2).next_power_of_two();
            log::debug!("growing ring index buffer to {}", self.index_capacity);
            self.index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Ring Index Buffer"),
                size: (self.index_capacity * std::mem::size_of::<u32>()) as u64,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
        }

        queue.write_buffer(
            &self.vertex_buffer,
            0,
            bytemuck::cast_slice(&self.wgpu_vertices),
        );
        queue.write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&self.indices));

        let uniforms = [screen_width, screen_height];
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&uniforms));

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Ring Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load, // Preserve existing content
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

        for batch in &batches {
            let texture = batch.texture.0.unwrap_or(&self.white_texture);
            render_pass.set_bind_group(1, texture.bind_group(), &[]);
            render_pass.draw_indexed(batch.indices.clone(), 0, 0..1);
        }
    }
}
