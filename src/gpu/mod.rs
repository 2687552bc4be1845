//! GPU abstraction used by every scene object.
//!
//! Objects never talk to wgpu directly. They go through three small capability
//! traits so the same mesh, light and camera code runs against the real
//! [`wgpu_backend::WgpuBackend`] and against recording mocks in tests:
//!
//! - [`BufferManager`] allocates, uploads and releases vertex arrays, buffers and textures
//! - [`ShaderBindings`] maps named program inputs to handles
//! - [`DrawCommands`] activates programs, pushes uniforms and issues indexed draws
//!
//! [`Gpu`] is the umbrella trait the scene works with.
//!
//! The call model is GL-like: a vertex array is bound before attribute uploads,
//! a program is activated before uniforms are pushed, and uniform values stay
//! on the program until overwritten.

use cgmath::{Matrix4, Vector3};

use crate::error::Result;

pub mod bindings;
pub mod buffers;
pub mod wgpu_backend;

/// A linked shader program.
///
/// Programs are shared between objects and never owned by them. They are
/// created before the scene and outlive every object, so objects only keep
/// this copyable handle and never release it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VertexArrayHandle(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Location of a uniform inside the currently active program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UniformHandle(pub u32);

/// Vertex attribute location a buffer is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AttributeSlot(pub u32);

pub trait BufferManager {
    fn create_vertex_array(&mut self) -> Result<VertexArrayHandle>;

    /// Makes `vao` the target of subsequent attribute uploads.
    fn bind_vertex_array(&mut self, vao: VertexArrayHandle);

    /// Uploads `data` as `data.len() / components` elements and attaches the
    /// buffer to `slot` of the currently bound vertex array.
    fn upload_attribute(
        &mut self,
        slot: AttributeSlot,
        components: u32,
        data: &[f32],
    ) -> Result<BufferHandle>;

    fn upload_indices(&mut self, indices: &[u32]) -> Result<BufferHandle>;

    /// Uploads tightly packed 8-bit RGB pixels.
    fn upload_texture_rgb(&mut self, width: u32, height: u32, pixels: &[u8])
    -> Result<TextureHandle>;

    fn release_buffer(&mut self, buffer: BufferHandle);

    fn release_texture(&mut self, texture: TextureHandle);

    fn release_vertex_array(&mut self, vao: VertexArrayHandle);
}

pub trait ShaderBindings {
    fn attribute_slot(&self, program: ProgramHandle, name: &str) -> Option<AttributeSlot>;

    fn uniform_handle(&self, program: ProgramHandle, name: &str) -> Option<UniformHandle>;
}

/// Per-frame commands. Failures are not reported per call; the backend surfaces
/// them through its own deferred error channel.
pub trait DrawCommands {
    fn use_program(&mut self, program: ProgramHandle);

    fn bind_texture(&mut self, texture: TextureHandle);

    fn set_uniform_mat4(&mut self, uniform: UniformHandle, value: &Matrix4<f32>);

    fn set_uniform_vec3(&mut self, uniform: UniformHandle, value: &Vector3<f32>);

    fn set_uniform_f32(&mut self, uniform: UniformHandle, value: f32);

    /// Draws `count` indices from `indices` as a triangle list using the bound
    /// vertex array and active program.
    fn draw_indexed_triangles(&mut self, indices: BufferHandle, count: u32);
}

pub trait Gpu: BufferManager + ShaderBindings + DrawCommands {}

impl<T> Gpu for T where T: BufferManager + ShaderBindings + DrawCommands {}
