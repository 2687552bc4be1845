//! The [`Gpu`](crate::gpu::Gpu) capability traits implemented on wgpu.
//!
//! wgpu has no notion of a bound vertex array or of uniforms set one by one,
//! so the backend keeps that state itself:
//!
//! - a vertex array is a table from attribute location to vertex buffer
//! - each program owns a CPU copy of its uniform block; pushed values persist
//!   until overwritten
//! - `draw_indexed_triangles` records a draw together with a snapshot of the
//!   active program's uniform block
//! - [`WgpuBackend::render`] uploads all snapshots into one uniform buffer and
//!   replays the recorded draws into a single render pass using dynamic offsets
//!
//! Attributes a program declares but the bound vertex array lacks are fed from
//! a shared all-zero buffer. Draws without a texture sample a 1x1 white one.

use std::{
    collections::{HashMap, HashSet},
    num::NonZeroU64,
};

use cgmath::{Matrix4, Vector3};
use log::{debug, trace, warn};
use wgpu::util::DeviceExt;

use crate::{
    error::{RenderError, Result},
    gpu::{
        AttributeSlot, BufferHandle, BufferManager, DrawCommands, ProgramHandle, ShaderBindings,
        TextureHandle, UniformHandle, VertexArrayHandle,
    },
    pipelines::mk_render_pipeline,
    texture::{self, Texture},
};

/// Bytes per vertex the zero buffer provides, enough for any float attribute.
const ZERO_STRIDE: u64 = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UniformKind {
    Float,
    Vec3,
    Mat4,
}

impl UniformKind {
    fn align(self) -> usize {
        match self {
            Self::Float => 4,
            Self::Vec3 | Self::Mat4 => 16,
        }
    }

    fn size(self) -> usize {
        match self {
            Self::Float => 4,
            Self::Vec3 => 12,
            Self::Mat4 => 64,
        }
    }

    fn components(self) -> usize {
        self.size() / 4
    }
}

#[derive(Clone, Debug)]
pub struct UniformDecl {
    pub name: String,
    pub kind: UniformKind,
}

impl UniformDecl {
    pub fn new(name: impl Into<String>, kind: UniformKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AttributeDecl {
    pub name: String,
    pub location: u32,
    pub components: u32,
}

impl AttributeDecl {
    pub fn new(name: impl Into<String>, location: u32, components: u32) -> Self {
        Self {
            name: name.into(),
            location,
            components,
        }
    }
}

/// Everything needed to link a program: WGSL source with `vs_main` and
/// `fs_main`, plus the names of its inputs.
///
/// Uniforms are listed in the order they appear in the shader's uniform
/// struct at `@group(0) @binding(0)`. Array-of-struct members are listed
/// flattened (`lights[0].position`, `lights[0].intensity`, ...), and each
/// such struct must start with its most aligned member.
#[derive(Clone, Debug)]
pub struct ProgramDescriptor {
    pub label: String,
    pub source: String,
    pub attributes: Vec<AttributeDecl>,
    pub uniforms: Vec<UniformDecl>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UniformEntry {
    pub name: String,
    pub kind: UniformKind,
    pub offset: usize,
}

/// Byte layout of a uniform block following WGSL's uniform address space rules.
#[derive(Clone, Debug)]
pub struct UniformLayout {
    entries: Vec<UniformEntry>,
    size: usize,
}

impl UniformLayout {
    pub fn new(uniforms: &[UniformDecl]) -> Self {
        let mut offset = 0;
        let entries: Vec<UniformEntry> = uniforms
            .iter()
            .map(|decl| {
                let start = align_to(offset, decl.kind.align());
                offset = start + decl.kind.size();
                UniformEntry {
                    name: decl.name.clone(),
                    kind: decl.kind,
                    offset: start,
                }
            })
            .collect();
        Self {
            entries,
            size: align_to(offset, 16).max(16),
        }
    }

    /// Block size in bytes, a multiple of 16.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn entries(&self) -> &[UniformEntry] {
        &self.entries
    }

    pub fn find(&self, name: &str) -> Option<UniformHandle> {
        self.entries
            .iter()
            .position(|entry| entry.name == name)
            .map(|index| UniformHandle(index as u32))
    }

    pub fn entry(&self, handle: UniformHandle) -> Option<&UniformEntry> {
        self.entries.get(handle.0 as usize)
    }

    /// Writes `values` for `handle` into `block`. Returns `false` for an
    /// unknown handle or a value of the wrong kind.
    pub fn write(&self, block: &mut [u8], handle: UniformHandle, kind: UniformKind, values: &[f32]) -> bool {
        let Some(entry) = self.entry(handle) else {
            return false;
        };
        if entry.kind != kind || values.len() != kind.components() {
            return false;
        }
        let bytes: &[u8] = bytemuck::cast_slice(values);
        match block.get_mut(entry.offset..entry.offset + bytes.len()) {
            Some(target) => {
                target.copy_from_slice(bytes);
                true
            }
            None => false,
        }
    }
}

fn align_to<T>(value: T, alignment: T) -> T
where
    T: Copy
        + std::ops::Add<Output = T>
        + std::ops::Sub<Output = T>
        + std::ops::Rem<Output = T>
        + PartialEq
        + Default,
{
    let rest = value % alignment;
    if rest == T::default() {
        value
    } else {
        value + (alignment - rest)
    }
}

fn vertex_format(components: u32) -> Option<wgpu::VertexFormat> {
    match components {
        1 => Some(wgpu::VertexFormat::Float32),
        2 => Some(wgpu::VertexFormat::Float32x2),
        3 => Some(wgpu::VertexFormat::Float32x3),
        4 => Some(wgpu::VertexFormat::Float32x4),
        _ => None,
    }
}

struct Program {
    pipeline: wgpu::RenderPipeline,
    globals_layout: wgpu::BindGroupLayout,
    attributes: Vec<AttributeDecl>,
    layout: UniformLayout,
    uniforms: Vec<u8>,
}

#[derive(Default)]
struct VertexArray {
    // location -> (buffer, components)
    attributes: HashMap<u32, (BufferHandle, u32)>,
    vertex_count: u32,
}

struct GpuBuffer {
    buffer: wgpu::Buffer,
    elements: u32,
}

struct GpuTexture {
    #[allow(unused)]
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

struct DrawCall {
    program: ProgramHandle,
    vao: VertexArrayHandle,
    texture: Option<TextureHandle>,
    indices: BufferHandle,
    count: u32,
    uniforms: Vec<u8>,
}

pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    color_format: wgpu::TextureFormat,
    next_id: u32,

    programs: HashMap<u32, Program>,
    vertex_arrays: HashMap<u32, VertexArray>,
    buffers: HashMap<u32, GpuBuffer>,
    textures: HashMap<u32, GpuTexture>,

    bound_vao: Option<VertexArrayHandle>,
    active_program: Option<ProgramHandle>,
    bound_texture: Option<TextureHandle>,
    draws: Vec<DrawCall>,

    texture_layout: wgpu::BindGroupLayout,
    white: GpuTexture,
    zero_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
}

impl WgpuBackend {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, color_format: wgpu::TextureFormat) -> Self {
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
            label: Some("diffuse texture_bind_group_layout"),
        });

        let white = Texture::white(device, queue);
        let white = GpuTexture {
            bind_group: texture_bind_group(device, &texture_layout, &white, "white texture"),
            texture: white,
        };

        Self {
            zero_buffer: create_zero_buffer(device, ZERO_STRIDE),
            uniform_buffer: create_uniform_buffer(device, 256),
            device: device.clone(),
            queue: queue.clone(),
            color_format,
            next_id: 1,
            programs: HashMap::new(),
            vertex_arrays: HashMap::new(),
            buffers: HashMap::new(),
            textures: HashMap::new(),
            bound_vao: None,
            active_program: None,
            bound_texture: None,
            draws: Vec::new(),
            texture_layout,
            white,
        }
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Compiles `descriptor` into a render pipeline for the surface format.
    pub fn create_program(&mut self, descriptor: &ProgramDescriptor) -> Result<ProgramHandle> {
        let mut seen = HashSet::new();
        for attribute in &descriptor.attributes {
            if vertex_format(attribute.components).is_none() || !seen.insert(attribute.location) {
                return Err(RenderError::shader_invalid(attribute.name.clone()));
            }
        }

        let layout = UniformLayout::new(&descriptor.uniforms);
        let globals_layout = self
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: NonZeroU64::new(layout.size() as u64),
                    },
                    count: None,
                }],
                label: Some(&format!("{} globals_bind_group_layout", descriptor.label)),
            });

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(&format!("{} Pipeline Layout", descriptor.label)),
                bind_group_layouts: &[&globals_layout, &self.texture_layout],
                push_constant_ranges: &[],
            });

        // one buffer per attribute, in declaration order
        let vertex_attributes: Vec<[wgpu::VertexAttribute; 1]> = descriptor
            .attributes
            .iter()
            .filter_map(|attribute| {
                Some([wgpu::VertexAttribute {
                    format: vertex_format(attribute.components)?,
                    offset: 0,
                    shader_location: attribute.location,
                }])
            })
            .collect();
        let vertex_layouts: Vec<wgpu::VertexBufferLayout> = descriptor
            .attributes
            .iter()
            .zip(vertex_attributes.iter())
            .map(|(attribute, attributes)| wgpu::VertexBufferLayout {
                array_stride: attribute.components as u64 * 4,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes,
            })
            .collect();

        let shader = wgpu::ShaderModuleDescriptor {
            label: Some(&descriptor.label),
            source: wgpu::ShaderSource::Wgsl(descriptor.source.as_str().into()),
        };
        let pipeline = mk_render_pipeline(
            &self.device,
            &pipeline_layout,
            self.color_format,
            Some(wgpu::BlendState::ALPHA_BLENDING),
            Some(Texture::DEPTH_FORMAT),
            &vertex_layouts,
            shader,
            &descriptor.label,
        );

        let id = self.next_id();
        debug!(
            "linked program '{}' as {} ({} attributes, {} byte uniform block)",
            descriptor.label,
            id,
            descriptor.attributes.len(),
            layout.size()
        );
        self.programs.insert(
            id,
            Program {
                pipeline,
                globals_layout,
                attributes: descriptor.attributes.clone(),
                uniforms: vec![0; layout.size()],
                layout,
            },
        );
        Ok(ProgramHandle(id))
    }

    /// Number of draws recorded since the last [`render`](Self::render).
    pub fn pending_draws(&self) -> usize {
        self.draws.len()
    }

    /// Replays every recorded draw into one render pass clearing to `clear`.
    pub fn render(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        color: &wgpu::TextureView,
        depth: &wgpu::TextureView,
        clear: wgpu::Color,
    ) {
        let draws: Vec<DrawCall> = std::mem::take(&mut self.draws)
            .into_iter()
            .filter(|draw| {
                let live = self.programs.contains_key(&draw.program.0)
                    && self.buffers.contains_key(&draw.indices.0);
                if !live {
                    trace!("dropping draw whose program or index buffer was released");
                }
                live
            })
            .collect();

        let alignment = (self.device.limits().min_uniform_buffer_offset_alignment as u64).max(1);
        let largest_block = draws
            .iter()
            .map(|draw| draw.uniforms.len() as u64)
            .max()
            .unwrap_or(16);
        let stride = align_to(largest_block, alignment);

        if !draws.is_empty() {
            let mut staging = vec![0u8; (stride * draws.len() as u64) as usize];
            for (index, draw) in draws.iter().enumerate() {
                let start = index * stride as usize;
                staging[start..start + draw.uniforms.len()].copy_from_slice(&draw.uniforms);
            }
            if self.uniform_buffer.size() < staging.len() as u64 {
                self.uniform_buffer = create_uniform_buffer(&self.device, staging.len() as u64);
            }
            self.queue.write_buffer(&self.uniform_buffer, 0, &staging);
        }

        let max_vertices = draws
            .iter()
            .filter_map(|draw| self.vertex_arrays.get(&draw.vao.0))
            .map(|vao| vao.vertex_count as u64)
            .max()
            .unwrap_or(0);
        if self.zero_buffer.size() < max_vertices * ZERO_STRIDE {
            self.zero_buffer = create_zero_buffer(&self.device, max_vertices * ZERO_STRIDE);
        }

        let globals: HashMap<u32, wgpu::BindGroup> = draws
            .iter()
            .map(|draw| draw.program.0)
            .collect::<HashSet<_>>()
            .into_iter()
            .filter_map(|id| {
                let program = self.programs.get(&id)?;
                let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    layout: &program.globals_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                            buffer: &self.uniform_buffer,
                            offset: 0,
                            size: NonZeroU64::new(program.layout.size() as u64),
                        }),
                    }],
                    label: Some("globals_bind_group"),
                });
                Some((id, bind_group))
            })
            .collect();

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        for (index, draw) in draws.iter().enumerate() {
            let (Some(program), Some(bind_group), Some(indices)) = (
                self.programs.get(&draw.program.0),
                globals.get(&draw.program.0),
                self.buffers.get(&draw.indices.0),
            ) else {
                continue;
            };
            render_pass.set_pipeline(&program.pipeline);
            render_pass.set_bind_group(0, bind_group, &[(index as u64 * stride) as u32]);

            let texture = draw
                .texture
                .and_then(|texture| self.textures.get(&texture.0))
                .unwrap_or(&self.white);
            render_pass.set_bind_group(1, &texture.bind_group, &[]);

            let vao = self.vertex_arrays.get(&draw.vao.0);
            for (slot, attribute) in program.attributes.iter().enumerate() {
                let buffer = vao
                    .and_then(|vao| vao.attributes.get(&attribute.location))
                    .filter(|(_, components)| *components == attribute.components)
                    .and_then(|(buffer, _)| self.buffers.get(&buffer.0))
                    .map(|buffer| &buffer.buffer)
                    .unwrap_or(&self.zero_buffer);
                render_pass.set_vertex_buffer(slot as u32, buffer.slice(..));
            }
            render_pass.set_index_buffer(indices.buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..draw.count, 0, 0..1);
        }
    }

    fn write_uniform(&mut self, uniform: UniformHandle, kind: UniformKind, values: &[f32]) {
        let Some(program) = self
            .active_program
            .and_then(|program| self.programs.get_mut(&program.0))
        else {
            warn!("uniform {:?} pushed without an active program", uniform);
            return;
        };
        if !program.layout.write(&mut program.uniforms, uniform, kind, values) {
            warn!("uniform {:?} doesn't take a {:?}", uniform, kind);
        }
    }

    fn create_vertex_buffer(&self, label: &str, contents: &[u8], usage: wgpu::BufferUsages) -> Result<wgpu::Buffer> {
        if contents.is_empty() || contents.len() as u64 > self.device.limits().max_buffer_size {
            return Err(RenderError::no_video_buffer(format!(
                "{} ({} bytes)",
                label,
                contents.len()
            )));
        }
        Ok(self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage,
            }))
    }
}

impl BufferManager for WgpuBackend {
    fn create_vertex_array(&mut self) -> Result<VertexArrayHandle> {
        let id = self.next_id();
        self.vertex_arrays.insert(id, VertexArray::default());
        Ok(VertexArrayHandle(id))
    }

    fn bind_vertex_array(&mut self, vao: VertexArrayHandle) {
        self.bound_vao = Some(vao);
        self.bound_texture = None;
    }

    fn upload_attribute(
        &mut self,
        slot: AttributeSlot,
        components: u32,
        data: &[f32],
    ) -> Result<BufferHandle> {
        let label = format!("attribute {} buffer", slot.0);
        let Some(vao) = self.bound_vao.filter(|vao| self.vertex_arrays.contains_key(&vao.0)) else {
            return Err(RenderError::no_video_buffer(format!("{} without a vertex array", label)));
        };
        if components == 0 || data.len() % components as usize != 0 {
            return Err(RenderError::no_video_buffer(format!(
                "{} with {} floats in {}-component elements",
                label,
                data.len(),
                components
            )));
        }

        let buffer = self.create_vertex_buffer(&label, bytemuck::cast_slice(data), wgpu::BufferUsages::VERTEX)?;
        let elements = (data.len() / components as usize) as u32;
        let id = self.next_id();
        self.buffers.insert(id, GpuBuffer { buffer, elements });
        let handle = BufferHandle(id);

        if let Some(vertex_array) = self.vertex_arrays.get_mut(&vao.0) {
            vertex_array.attributes.insert(slot.0, (handle, components));
            vertex_array.vertex_count = vertex_array.vertex_count.max(elements);
        }
        Ok(handle)
    }

    fn upload_indices(&mut self, indices: &[u32]) -> Result<BufferHandle> {
        if self.bound_vao.is_none() {
            return Err(RenderError::no_video_buffer("index buffer without a vertex array"));
        }
        let buffer = self.create_vertex_buffer("index buffer", bytemuck::cast_slice(indices), wgpu::BufferUsages::INDEX)?;
        let id = self.next_id();
        self.buffers.insert(
            id,
            GpuBuffer {
                buffer,
                elements: indices.len() as u32,
            },
        );
        Ok(BufferHandle(id))
    }

    fn upload_texture_rgb(&mut self, width: u32, height: u32, pixels: &[u8]) -> Result<TextureHandle> {
        let max = self.device.limits().max_texture_dimension_2d;
        if width > max || height > max {
            return Err(RenderError::no_video_buffer(format!(
                "{}x{} texture, limit is {}",
                width, height, max
            )));
        }
        let rgba = texture::rgb_to_rgba(width, height, pixels)?;
        let id = self.next_id();
        let label = format!("texture {}", id);
        let texture = Texture::from_rgba(&self.device, &self.queue, width, height, &rgba, &label);
        let bind_group = texture_bind_group(&self.device, &self.texture_layout, &texture, &label);
        self.textures.insert(id, GpuTexture { texture, bind_group });
        Ok(TextureHandle(id))
    }

    fn release_buffer(&mut self, buffer: BufferHandle) {
        if self.buffers.remove(&buffer.0).is_none() {
            trace!("buffer {:?} already released", buffer);
        }
    }

    fn release_texture(&mut self, texture: TextureHandle) {
        if self.textures.remove(&texture.0).is_none() {
            trace!("texture {:?} already released", texture);
        }
        if self.bound_texture == Some(texture) {
            self.bound_texture = None;
        }
    }

    fn release_vertex_array(&mut self, vao: VertexArrayHandle) {
        self.vertex_arrays.remove(&vao.0);
        if self.bound_vao == Some(vao) {
            self.bound_vao = None;
        }
    }
}

impl ShaderBindings for WgpuBackend {
    fn attribute_slot(&self, program: ProgramHandle, name: &str) -> Option<AttributeSlot> {
        self.programs
            .get(&program.0)?
            .attributes
            .iter()
            .find(|attribute| attribute.name == name)
            .map(|attribute| AttributeSlot(attribute.location))
    }

    fn uniform_handle(&self, program: ProgramHandle, name: &str) -> Option<UniformHandle> {
        self.programs.get(&program.0)?.layout.find(name)
    }
}

impl DrawCommands for WgpuBackend {
    fn use_program(&mut self, program: ProgramHandle) {
        if self.programs.contains_key(&program.0) {
            self.active_program = Some(program);
        } else {
            warn!("unknown program {:?}", program);
        }
    }

    fn bind_texture(&mut self, texture: TextureHandle) {
        self.bound_texture = Some(texture);
    }

    fn set_uniform_mat4(&mut self, uniform: UniformHandle, value: &Matrix4<f32>) {
        let columns: &[f32; 16] = value.as_ref();
        self.write_uniform(uniform, UniformKind::Mat4, columns);
    }

    fn set_uniform_vec3(&mut self, uniform: UniformHandle, value: &Vector3<f32>) {
        let xyz: &[f32; 3] = value.as_ref();
        self.write_uniform(uniform, UniformKind::Vec3, xyz);
    }

    fn set_uniform_f32(&mut self, uniform: UniformHandle, value: f32) {
        self.write_uniform(uniform, UniformKind::Float, &[value]);
    }

    fn draw_indexed_triangles(&mut self, indices: BufferHandle, count: u32) {
        let (Some(program), Some(vao)) = (self.active_program, self.bound_vao) else {
            warn!("draw without an active program and vertex array");
            return;
        };
        let (Some(state), Some(index_buffer)) =
            (self.programs.get(&program.0), self.buffers.get(&indices.0))
        else {
            warn!("draw with released program or index buffer {:?}", indices);
            return;
        };
        let mut count = count.min(index_buffer.elements);
        count -= count % 3;
        if count == 0 {
            return;
        }
        self.draws.push(DrawCall {
            program,
            vao,
            texture: self.bound_texture,
            indices,
            count,
            uniforms: state.uniforms.clone(),
        });
    }
}

fn texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &Texture,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            },
        ],
        label: Some(label),
    })
}

fn create_zero_buffer(device: &wgpu::Device, size: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("zero attribute buffer"),
        size: size.max(ZERO_STRIDE),
        usage: wgpu::BufferUsages::VERTEX,
        mapped_at_creation: false,
    })
}

fn create_uniform_buffer(device: &wgpu::Device, size: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("globals uniform buffer"),
        size: align_to(size.max(256), 256),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
