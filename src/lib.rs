//! hertz
//!
//! A small real-time 3D engine. Imported meshes, point lights and cameras all
//! share one object lifecycle (init, per-frame transform update, draw,
//! deinit) and talk to the GPU through a narrow, GL-like capability layer
//! that is implemented on wgpu and easy to mock in tests.
//!
//! High-level modules
//! - `gpu`: handle types, the buffer/binding/draw capability traits and the wgpu backend
//! - `geometry`: decoded vertex data handed to meshes
//! - `objects`: the `Object` trait and its mesh, light and camera variants
//! - `scene`: ordered object collection and per-frame driver
//! - `importer`: glTF import into a scene
//! - `texture`: image decoding and GPU texture helpers
//! - `pipelines`: the default mesh program and pipeline creation
//! - `context`: window, surface and device ownership
//! - `app`: the winit frame loop
//!

pub mod app;
pub mod config;
pub mod context;
pub mod error;
pub mod geometry;
pub mod gpu;
pub mod importer;
pub mod input;
pub mod objects;
pub mod pipelines;
pub mod scene;
pub mod texture;

pub use error::{RenderError, Result};

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;
pub use winit::keyboard::KeyCode;
