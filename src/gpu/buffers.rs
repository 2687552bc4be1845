//! Ownership helpers on top of [`BufferManager`].
//!
//! Objects keep their GPU handles in `Option`s. Releasing goes through these
//! helpers, which take the handle out of the slot, so a second release of the
//! same slot is a no-op and never reaches the backend.

use crate::gpu::{BufferHandle, BufferManager, TextureHandle, VertexArrayHandle};

pub fn release_buffer<G>(gpu: &mut G, slot: &mut Option<BufferHandle>)
where
    G: BufferManager + ?Sized,
{
    if let Some(buffer) = slot.take() {
        gpu.release_buffer(buffer);
    }
}

pub fn release_texture<G>(gpu: &mut G, slot: &mut Option<TextureHandle>)
where
    G: BufferManager + ?Sized,
{
    if let Some(texture) = slot.take() {
        gpu.release_texture(texture);
    }
}

pub fn release_vertex_array<G>(gpu: &mut G, slot: &mut Option<VertexArrayHandle>)
where
    G: BufferManager + ?Sized,
{
    if let Some(vao) = slot.take() {
        gpu.release_vertex_array(vao);
    }
}

/// Flattens `[x, y, z]` style elements for [`BufferManager::upload_attribute`].
pub fn flatten<const N: usize>(elements: &[[f32; N]]) -> &[f32] {
    elements.as_flattened()
}
