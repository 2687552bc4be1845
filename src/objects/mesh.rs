//! Triangle meshes: geometry buffers, an optional texture and transform uniforms.

use std::any::Any;

use cgmath::{Matrix4, SquareMatrix};
use log::{debug, error, trace, warn};

use crate::{
    error::{RenderError, Result},
    geometry::GeometryBuffer,
    gpu::{
        BufferHandle, Gpu, ProgramHandle, TextureHandle, UniformHandle, VertexArrayHandle,
        bindings::{
            UniformBinding, resolve_optional_attribute, resolve_optional_uniform,
            resolve_required_attribute, resolve_required_uniform,
        },
        buffers::{self, flatten},
    },
    objects::{Object, ObjectKind},
};

pub const POSITION_ATTRIBUTE: &str = "in_position";
pub const NORMAL_ATTRIBUTE: &str = "in_normal";
pub const TEX_COORDS_ATTRIBUTE: &str = "in_texcoords";

pub const MVP_UNIFORM: &str = "MVP";
pub const MODEL_UNIFORM: &str = "model";
pub const TIME_UNIFORM: &str = "time";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshState {
    Uninitialized,
    Ready,
    Destroyed,
}

/// One drawable triangle mesh.
///
/// The mesh owns its vertex array, every buffer it uploads and the texture it
/// was given. The program is shared and only referenced.
pub struct Mesh {
    name: String,
    program: ProgramHandle,
    state: MeshState,
    // CPU copy, dropped once uploaded
    geometry: Option<GeometryBuffer>,

    vao: Option<VertexArrayHandle>,
    vbo: Option<BufferHandle>,
    nbo: Option<BufferHandle>,
    tbo: Option<BufferHandle>,
    ebo: Option<BufferHandle>,
    texture: Option<TextureHandle>,

    mvp_handle: Option<UniformHandle>,
    model_uniform: Option<UniformBinding>,
    time_uniform: Option<UniformBinding>,
    nbo_presented: bool,
    texture_attached: bool,
    index_count: u32,

    model: Matrix4<f32>,
    mvp: Matrix4<f32>,
}

impl Mesh {
    pub fn new(name: impl Into<String>, program: ProgramHandle, geometry: GeometryBuffer) -> Self {
        Self {
            name: name.into(),
            program,
            state: MeshState::Uninitialized,
            geometry: Some(geometry),
            vao: None,
            vbo: None,
            nbo: None,
            tbo: None,
            ebo: None,
            texture: None,
            mvp_handle: None,
            model_uniform: None,
            time_uniform: None,
            nbo_presented: false,
            texture_attached: false,
            index_count: 0,
            model: Matrix4::identity(),
            mvp: Matrix4::identity(),
        }
    }

    /// Hands a texture over to the mesh. It is attached during `init` when the
    /// geometry carries texture coordinates, and released with the mesh either way.
    pub fn with_texture(mut self, texture: TextureHandle) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Builds and initialises a mesh in one go.
    pub fn create(
        gpu: &mut dyn Gpu,
        name: impl Into<String>,
        program: ProgramHandle,
        geometry: GeometryBuffer,
        texture: Option<TextureHandle>,
    ) -> Result<Self> {
        let mut mesh = Self::new(name, program, geometry);
        mesh.texture = texture;
        mesh.init(gpu)?;
        Ok(mesh)
    }

    pub fn state(&self) -> MeshState {
        self.state
    }

    pub fn program(&self) -> ProgramHandle {
        self.program
    }

    pub fn model(&self) -> &Matrix4<f32> {
        &self.model
    }

    pub fn set_model(&mut self, model: Matrix4<f32>) {
        self.model = model;
    }

    pub fn mvp(&self) -> &Matrix4<f32> {
        &self.mvp
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn nbo_presented(&self) -> bool {
        self.nbo_presented
    }

    pub fn texture_attached(&self) -> bool {
        self.texture_attached
    }

    pub fn model_presented(&self) -> bool {
        self.model_uniform.as_ref().is_some_and(UniformBinding::is_present)
    }

    pub fn time_presented(&self) -> bool {
        self.time_uniform.as_ref().is_some_and(UniformBinding::is_present)
    }

    pub fn has_index_buffer(&self) -> bool {
        self.ebo.is_some()
    }

    /// Uploads texture coordinates and attaches `texture` to a ready mesh.
    ///
    /// The mesh takes ownership of `texture` even if attaching fails.
    pub fn attach_texture(
        &mut self,
        gpu: &mut dyn Gpu,
        texture: TextureHandle,
        tex_coords: &[[f32; 2]],
    ) -> Result<()> {
        if let Some(previous) = self.texture.replace(texture) {
            if previous != texture {
                gpu.release_texture(previous);
            }
        }
        buffers::release_buffer(gpu, &mut self.tbo);
        self.texture_attached = false;

        let vao = self
            .vao
            .ok_or_else(|| RenderError::no_video_buffer(format!("{} vertex array", self.name)))?;
        let Some(slot) = resolve_optional_attribute(&*gpu, self.program, TEX_COORDS_ATTRIBUTE) else {
            return Err(RenderError::shader_invalid(TEX_COORDS_ATTRIBUTE));
        };

        gpu.bind_vertex_array(vao);
        self.tbo = Some(gpu.upload_attribute(slot, 2, flatten(tex_coords))?);
        self.texture_attached = true;
        Ok(())
    }

    /// Releases every owned buffer and the texture. Safe to call repeatedly.
    pub fn destroy(&mut self, gpu: &mut dyn Gpu) {
        buffers::release_buffer(gpu, &mut self.vbo);
        buffers::release_buffer(gpu, &mut self.nbo);
        buffers::release_buffer(gpu, &mut self.ebo);
        buffers::release_buffer(gpu, &mut self.tbo);
        buffers::release_texture(gpu, &mut self.texture);
        buffers::release_vertex_array(gpu, &mut self.vao);

        self.nbo_presented = false;
        self.texture_attached = false;
        self.geometry = None;
        self.state = MeshState::Destroyed;
    }

    fn find_uniforms(&mut self, gpu: &dyn Gpu) -> Result<()> {
        self.mvp_handle = Some(resolve_required_uniform(gpu, self.program, MVP_UNIFORM)?);
        self.model_uniform = Some(resolve_optional_uniform(gpu, self.program, MODEL_UNIFORM));
        self.time_uniform = Some(resolve_optional_uniform(gpu, self.program, TIME_UNIFORM));
        Ok(())
    }

    fn create_geometry_buffers(&mut self, gpu: &mut dyn Gpu, geometry: &GeometryBuffer) -> Result<()> {
        let position_slot = resolve_required_attribute(&*gpu, self.program, POSITION_ATTRIBUTE)?;

        let vao = gpu.create_vertex_array()?;
        self.vao = Some(vao);
        gpu.bind_vertex_array(vao);

        self.vbo = Some(gpu.upload_attribute(position_slot, 3, flatten(&geometry.positions))?);

        match gpu.upload_indices(&geometry.indices) {
            Ok(ebo) => self.ebo = Some(ebo),
            Err(e) => error!("unable to create index buffer for mesh '{}': {}", self.name, e),
        }
        self.index_count = geometry.indices.len() as u32;

        if let Some(normals) = &geometry.normals {
            if let Some(slot) = resolve_optional_attribute(&*gpu, self.program, NORMAL_ATTRIBUTE) {
                match gpu.upload_attribute(slot, 3, flatten(normals)) {
                    Ok(nbo) => self.nbo = Some(nbo),
                    Err(e) => warn!("mesh '{}' continues without normals: {}", self.name, e),
                }
            }
        } else {
            debug!("mesh '{}' has no normals", self.name);
        }
        self.nbo_presented = self.nbo.is_some();

        Ok(())
    }

    fn attach_initial_texture(&mut self, gpu: &mut dyn Gpu, geometry: &GeometryBuffer) {
        let Some(texture) = self.texture else {
            return;
        };
        let Some(tex_coords) = &geometry.tex_coords else {
            warn!("mesh '{}' has a texture but no texture coordinates", self.name);
            return;
        };
        if let Err(e) = self.attach_texture(gpu, texture, tex_coords) {
            warn!("no texture for mesh '{}': {}", self.name, e);
        }
    }
}

impl Object for Mesh {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Mesh
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self, gpu: &mut dyn Gpu) -> Result<()> {
        match self.state {
            MeshState::Ready => return Ok(()),
            MeshState::Destroyed => {
                return Err(RenderError::AlreadyDestroyed(self.name.clone()));
            }
            MeshState::Uninitialized => (),
        }
        let geometry = self
            .geometry
            .take()
            .ok_or_else(|| RenderError::InvalidGeometry(format!("mesh '{}' has no geometry", self.name)))?;
        let created = geometry
            .validate()
            .and_then(|_| self.find_uniforms(gpu))
            .and_then(|_| self.create_geometry_buffers(gpu, &geometry));
        if let Err(e) = created {
            error!("unable to create mesh '{}': {}", self.name, e);
            self.destroy(gpu);
            return Err(e);
        }

        self.attach_initial_texture(gpu, &geometry);
        self.state = MeshState::Ready;
        Ok(())
    }

    fn update_transform(&mut self, vp: &Matrix4<f32>) {
        self.mvp = vp * self.model;
    }

    fn draw(&self, gpu: &mut dyn Gpu, time: f32) {
        let (MeshState::Ready, Some(vao), Some(mvp)) = (self.state, self.vao, self.mvp_handle) else {
            return;
        };
        gpu.bind_vertex_array(vao);
        gpu.use_program(self.program);

        if self.texture_attached {
            if let Some(texture) = self.texture {
                gpu.bind_texture(texture);
            }
        }

        gpu.set_uniform_mat4(mvp, &self.mvp);

        if let Some(model) = self.model_uniform.as_ref().and_then(|u| u.handle) {
            gpu.set_uniform_mat4(model, &self.model);
        }
        if let Some(time_handle) = self.time_uniform.as_ref().and_then(|u| u.handle) {
            gpu.set_uniform_f32(time_handle, time);
        }

        match self.ebo {
            Some(ebo) => gpu.draw_indexed_triangles(ebo, self.index_count),
            None => trace!("mesh '{}' has no index buffer, nothing to draw", self.name),
        }
    }

    fn deinit(&mut self, gpu: &mut dyn Gpu) {
        self.destroy(gpu);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
