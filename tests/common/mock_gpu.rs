use std::collections::{HashMap, HashSet};

use hertz::{
    RenderError, Result,
    cgmath::{Matrix4, Vector3},
    gpu::{
        AttributeSlot, BufferHandle, BufferManager, DrawCommands, ProgramHandle, ShaderBindings,
        TextureHandle, UniformHandle, VertexArrayHandle,
    },
    objects::light::light_uniform_names,
};

pub const PROGRAM: ProgramHandle = ProgramHandle(1);

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    CreateVertexArray(VertexArrayHandle),
    BindVertexArray(VertexArrayHandle),
    UploadAttribute {
        slot: u32,
        components: u32,
        floats: usize,
        buffer: BufferHandle,
    },
    UploadIndices {
        count: usize,
        buffer: BufferHandle,
    },
    UploadTexture {
        width: u32,
        height: u32,
        texture: TextureHandle,
    },
    ReleaseBuffer(BufferHandle),
    ReleaseTexture(TextureHandle),
    ReleaseVertexArray(VertexArrayHandle),
    UseProgram(ProgramHandle),
    BindTexture(TextureHandle),
    SetMat4(UniformHandle, Matrix4<f32>),
    SetVec3(UniformHandle, Vector3<f32>),
    SetF32(UniformHandle, f32),
    DrawIndexed {
        indices: BufferHandle,
        count: u32,
    },
}

impl Call {
    pub fn is_upload(&self) -> bool {
        matches!(
            self,
            Call::CreateVertexArray(_)
                | Call::UploadAttribute { .. }
                | Call::UploadIndices { .. }
                | Call::UploadTexture { .. }
        )
    }

    pub fn is_uniform_push(&self) -> bool {
        matches!(self, Call::SetMat4(..) | Call::SetVec3(..) | Call::SetF32(..))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Resource {
    Buffer(u32),
    Texture(u32),
    VertexArray(u32),
}

/// Records every GPU call and tracks which handles are alive.
///
/// Bindings default to the names the built-in mesh program uses, with eight
/// light slots.
pub struct MockGpu {
    pub calls: Vec<Call>,
    attributes: HashMap<String, u32>,
    uniforms: HashMap<String, u32>,
    next_id: u32,

    failing_slots: HashMap<u32, Option<usize>>,
    slot_uploads: HashMap<u32, usize>,
    fail_indices: bool,
    fail_textures: bool,

    live: HashSet<Resource>,
    allocated: Vec<Resource>,
    released: Vec<Resource>,
    pub invalid_releases: usize,
}

impl MockGpu {
    pub fn new() -> Self {
        let attributes = [("in_position", 0), ("in_normal", 1), ("in_texcoords", 2)]
            .into_iter()
            .map(|(name, slot)| (name.to_string(), slot))
            .collect();

        let mut names: Vec<String> = ["MVP", "model", "time", "view_position"]
            .into_iter()
            .map(str::to_string)
            .collect();
        for index in 0..8 {
            names.extend(light_uniform_names(index));
        }
        let uniforms = names
            .into_iter()
            .enumerate()
            .map(|(handle, name)| (name, handle as u32))
            .collect();

        Self {
            calls: Vec::new(),
            attributes,
            uniforms,
            next_id: 100,
            failing_slots: HashMap::new(),
            slot_uploads: HashMap::new(),
            fail_indices: false,
            fail_textures: false,
            live: HashSet::new(),
            allocated: Vec::new(),
            released: Vec::new(),
            invalid_releases: 0,
        }
    }

    pub fn without_attribute(mut self, name: &str) -> Self {
        self.attributes.remove(name);
        self
    }

    pub fn without_uniform(mut self, name: &str) -> Self {
        self.uniforms.remove(name);
        self
    }

    /// Every upload to `slot` fails.
    pub fn failing_slot(mut self, slot: u32) -> Self {
        self.failing_slots.insert(slot, None);
        self
    }

    /// Only the `nth` (0-based) upload to `slot` fails.
    pub fn failing_nth_upload(mut self, slot: u32, nth: usize) -> Self {
        self.failing_slots.insert(slot, Some(nth));
        self
    }

    pub fn failing_indices(mut self) -> Self {
        self.fail_indices = true;
        self
    }

    pub fn failing_textures(mut self) -> Self {
        self.fail_textures = true;
        self
    }

    pub fn uniform(&self, name: &str) -> UniformHandle {
        UniformHandle(self.uniforms[name])
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn uniform_pushes(&self) -> usize {
        self.calls.iter().filter(|call| call.is_uniform_push()).count()
    }

    pub fn uploads(&self) -> usize {
        self.calls.iter().filter(|call| call.is_upload()).count()
    }

    pub fn draws(&self) -> Vec<(BufferHandle, u32)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::DrawIndexed { indices, count } => Some((*indices, *count)),
                _ => None,
            })
            .collect()
    }

    pub fn uploads_to_slot(&self, slot: u32) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::UploadAttribute { slot: s, .. } if *s == slot))
            .count()
    }

    pub fn textures_uploaded(&self) -> Vec<(u32, u32)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::UploadTexture { width, height, .. } => Some((*width, *height)),
                _ => None,
            })
            .collect()
    }

    pub fn live_handles(&self) -> usize {
        self.live.len()
    }

    pub fn allocations(&self) -> usize {
        self.allocated.len()
    }

    pub fn releases(&self) -> usize {
        self.released.len()
    }

    /// True when every handle ever allocated was released exactly once.
    pub fn all_released_once(&self) -> bool {
        let released: HashSet<_> = self.released.iter().collect();
        self.live.is_empty()
            && self.invalid_releases == 0
            && released.len() == self.released.len()
            && self.allocated.iter().all(|resource| released.contains(resource))
    }

    fn allocate(&mut self, kind: fn(u32) -> Resource) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        let resource = kind(id);
        self.live.insert(resource);
        self.allocated.push(resource);
        id
    }

    fn release(&mut self, resource: Resource) {
        if self.live.remove(&resource) {
            self.released.push(resource);
        } else {
            self.invalid_releases += 1;
        }
    }

    fn slot_fails(&mut self, slot: u32) -> bool {
        let count = self.slot_uploads.entry(slot).or_insert(0);
        let nth = *count;
        *count += 1;
        match self.failing_slots.get(&slot) {
            Some(None) => true,
            Some(Some(failing)) => *failing == nth,
            None => false,
        }
    }
}

impl BufferManager for MockGpu {
    fn create_vertex_array(&mut self) -> Result<VertexArrayHandle> {
        let vao = VertexArrayHandle(self.allocate(Resource::VertexArray));
        self.calls.push(Call::CreateVertexArray(vao));
        Ok(vao)
    }

    fn bind_vertex_array(&mut self, vao: VertexArrayHandle) {
        self.calls.push(Call::BindVertexArray(vao));
    }

    fn upload_attribute(
        &mut self,
        slot: AttributeSlot,
        components: u32,
        data: &[f32],
    ) -> Result<BufferHandle> {
        if self.slot_fails(slot.0) {
            return Err(RenderError::no_video_buffer(format!("attribute {}", slot.0)));
        }
        let buffer = BufferHandle(self.allocate(Resource::Buffer));
        self.calls.push(Call::UploadAttribute {
            slot: slot.0,
            components,
            floats: data.len(),
            buffer,
        });
        Ok(buffer)
    }

    fn upload_indices(&mut self, indices: &[u32]) -> Result<BufferHandle> {
        if self.fail_indices {
            return Err(RenderError::no_video_buffer("indices"));
        }
        let buffer = BufferHandle(self.allocate(Resource::Buffer));
        self.calls.push(Call::UploadIndices {
            count: indices.len(),
            buffer,
        });
        Ok(buffer)
    }

    fn upload_texture_rgb(&mut self, width: u32, height: u32, pixels: &[u8]) -> Result<TextureHandle> {
        if self.fail_textures || pixels.len() != (width * height * 3) as usize {
            return Err(RenderError::no_video_buffer("texture"));
        }
        let texture = TextureHandle(self.allocate(Resource::Texture));
        self.calls.push(Call::UploadTexture {
            width,
            height,
            texture,
        });
        Ok(texture)
    }

    fn release_buffer(&mut self, buffer: BufferHandle) {
        self.calls.push(Call::ReleaseBuffer(buffer));
        self.release(Resource::Buffer(buffer.0));
    }

    fn release_texture(&mut self, texture: TextureHandle) {
        self.calls.push(Call::ReleaseTexture(texture));
        self.release(Resource::Texture(texture.0));
    }

    fn release_vertex_array(&mut self, vao: VertexArrayHandle) {
        self.calls.push(Call::ReleaseVertexArray(vao));
        self.release(Resource::VertexArray(vao.0));
    }
}

impl ShaderBindings for MockGpu {
    fn attribute_slot(&self, _program: ProgramHandle, name: &str) -> Option<AttributeSlot> {
        self.attributes.get(name).copied().map(AttributeSlot)
    }

    fn uniform_handle(&self, _program: ProgramHandle, name: &str) -> Option<UniformHandle> {
        self.uniforms.get(name).copied().map(UniformHandle)
    }
}

impl DrawCommands for MockGpu {
    fn use_program(&mut self, program: ProgramHandle) {
        self.calls.push(Call::UseProgram(program));
    }

    fn bind_texture(&mut self, texture: TextureHandle) {
        self.calls.push(Call::BindTexture(texture));
    }

    fn set_uniform_mat4(&mut self, uniform: UniformHandle, value: &Matrix4<f32>) {
        self.calls.push(Call::SetMat4(uniform, *value));
    }

    fn set_uniform_vec3(&mut self, uniform: UniformHandle, value: &Vector3<f32>) {
        self.calls.push(Call::SetVec3(uniform, *value));
    }

    fn set_uniform_f32(&mut self, uniform: UniformHandle, value: f32) {
        self.calls.push(Call::SetF32(uniform, value));
    }

    fn draw_indexed_triangles(&mut self, indices: BufferHandle, count: u32) {
        self.calls.push(Call::DrawIndexed { indices, count });
    }
}
