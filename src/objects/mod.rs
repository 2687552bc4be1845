//! Scene objects and their shared lifecycle.
//!
//! Every drawable (mesh, light, camera) implements [`Object`]. The scene only
//! ever talks to this trait, so it can keep heterogeneous objects in one
//! ordered collection.
//!
//! Lifecycle:
//! 1. construct the object (CPU state only)
//! 2. `init` resolves shader bindings and uploads GPU resources
//! 3. every frame: `update_transform` with the camera's view-projection, then `draw`
//! 4. `deinit` releases everything the object owns

use std::any::Any;

use cgmath::Matrix4;

use crate::{error::Result, gpu::Gpu};

pub mod camera;
pub mod light;
pub mod mesh;

pub use camera::Camera;
pub use light::{Light, LightSlots};
pub use mesh::{Mesh, MeshState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    Mesh,
    Light,
    Camera,
}

pub trait Object: Any {
    fn kind(&self) -> ObjectKind;

    fn name(&self) -> &str;

    /// Resolves bindings and allocates GPU resources.
    ///
    /// On failure the object owns no GPU resources and must not be drawn.
    fn init(&mut self, gpu: &mut dyn Gpu) -> Result<()>;

    /// Receives the camera's view-projection for this frame. Pure CPU update.
    fn update_transform(&mut self, vp: &Matrix4<f32>);

    /// Pushes the object's state to the GPU and issues its draw calls.
    fn draw(&self, gpu: &mut dyn Gpu, time: f32);

    /// Releases owned GPU resources. Calling it twice is harmless.
    fn deinit(&mut self, gpu: &mut dyn Gpu);

    fn as_any(&self) -> &dyn Any;
}
