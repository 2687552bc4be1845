//! Engine configuration.
//!
//! A plain struct with sensible defaults. Construct it with struct update
//! syntax and hand it to [`crate::app::run`]:
//!
//! ```no_run
//! let config = hertz::config::Config {
//!     title: "viewer".into(),
//!     light_capacity: 4,
//!     ..Default::default()
//! };
//! ```

#[derive(Clone, Debug)]
pub struct Config {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub clear_colour: wgpu::Color,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub znear: f32,
    pub zfar: f32,
    /// Size of the shader-side `lights[]` array.
    pub light_capacity: usize,
    /// Camera movement in world units per second.
    pub move_speed: f32,
    /// Radians per pixel of mouse motion.
    pub mouse_sensitivity: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "hertz".to_string(),
            width: 1280,
            height: 720,
            clear_colour: wgpu::Color {
                r: 0.1,
                g: 0.1,
                b: 0.12,
                a: 1.0,
            },
            fov: 45.0,
            znear: 0.1,
            zfar: 100.0,
            light_capacity: 8,
            move_speed: 4.0,
            mouse_sensitivity: 0.004,
        }
    }
}
