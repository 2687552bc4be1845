//! Cameras: a projection plus a pluggable behaviour producing the view matrix.
//!
//! The frame loop calls [`Camera::update`] once per frame before the scene is
//! drawn, then passes [`Camera::vp`] to the scene.

use std::{any::Any, f32::consts::FRAC_PI_2};

use cgmath::{
    EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, Vector3, perspective,
};
use instant::Duration;
use log::debug;
use winit::{event::MouseButton, keyboard::KeyCode};

use crate::{
    config::Config,
    error::Result,
    gpu::{Gpu, ProgramHandle, UniformHandle, bindings::resolve_optional_uniform},
    input::InputState,
    objects::{Object, ObjectKind},
};

pub const VIEW_POSITION_UNIFORM: &str = "view_position";

/// cgmath produces OpenGL clip space (z in -1..1); wgpu wants z in 0..1.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

#[derive(Clone, Copy, Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: 1.0,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut projection = Self::new(cgmath::Deg(config.fov), config.znear, config.zfar);
        projection.resize(config.width, config.height);
        projection
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// How a camera turns input into a view.
pub trait CameraBehavior {
    fn update(&mut self, input: &InputState, dt: Duration);

    fn view_matrix(&self) -> Matrix4<f32>;

    fn eye(&self) -> Point3<f32>;
}

/// WASD to move, Space/Shift for up/down, mouse look while the right button is held.
#[derive(Clone, Debug)]
pub struct FreeFly {
    pub position: Point3<f32>,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
    pub speed: f32,
    pub sensitivity: f32,
}

impl FreeFly {
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
            speed: 4.0,
            sensitivity: 0.004,
        }
    }

    pub fn with_speed(mut self, speed: f32, sensitivity: f32) -> Self {
        self.speed = speed;
        self.sensitivity = sensitivity;
        self
    }

    fn direction(&self) -> Vector3<f32> {
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize()
    }
}

impl CameraBehavior for FreeFly {
    fn update(&mut self, input: &InputState, dt: Duration) {
        let dt = dt.as_secs_f32();

        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let forward = Vector3::new(yaw_cos, 0.0, yaw_sin).normalize();
        let right = Vector3::new(-yaw_sin, 0.0, yaw_cos).normalize();

        let step = self.speed * dt;
        self.position += forward * input.axis(KeyCode::KeyW, KeyCode::KeyS) * step;
        self.position += right * input.axis(KeyCode::KeyD, KeyCode::KeyA) * step;
        self.position.y += input.axis(KeyCode::Space, KeyCode::ShiftLeft) * step;

        if input.is_button_pressed(MouseButton::Right) {
            let (dx, dy) = input.mouse_delta();
            self.yaw += Rad(dx as f32 * self.sensitivity);
            self.pitch += Rad(-dy as f32 * self.sensitivity);
            self.pitch.0 = self.pitch.0.clamp(-SAFE_FRAC_PI_2, SAFE_FRAC_PI_2);
        }
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.direction(), Vector3::unit_y())
    }

    fn eye(&self) -> Point3<f32> {
        self.position
    }
}

/// Circles a target point. Left drag rotates, the scroll wheel zooms.
#[derive(Clone, Debug)]
pub struct Orbit {
    pub target: Point3<f32>,
    pub distance: f32,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
    pub sensitivity: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
}

impl Orbit {
    pub fn new<V: Into<Point3<f32>>>(target: V, distance: f32) -> Self {
        Self {
            target: target.into(),
            distance,
            yaw: Rad(FRAC_PI_2),
            pitch: Rad(0.4),
            sensitivity: 0.004,
            zoom_speed: 0.5,
            min_distance: 0.1,
        }
    }
}

impl CameraBehavior for Orbit {
    fn update(&mut self, input: &InputState, _dt: Duration) {
        if input.is_button_pressed(MouseButton::Left) {
            let (dx, dy) = input.mouse_delta();
            self.yaw += Rad(dx as f32 * self.sensitivity);
            self.pitch += Rad(dy as f32 * self.sensitivity);
            self.pitch.0 = self.pitch.0.clamp(-SAFE_FRAC_PI_2, SAFE_FRAC_PI_2);
        }
        let zoom = input.scroll() * self.zoom_speed;
        self.distance = (self.distance - zoom).max(self.min_distance);
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye(), self.target, Vector3::unit_y())
    }

    fn eye(&self) -> Point3<f32> {
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        let offset = Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw);
        self.target + offset * self.distance
    }
}

/// A camera that never moves.
#[derive(Clone, Debug)]
pub struct Fixed {
    eye: Point3<f32>,
    view: Matrix4<f32>,
}

impl Fixed {
    pub fn looking_at<E: Into<Point3<f32>>, T: Into<Point3<f32>>>(eye: E, target: T) -> Self {
        let eye = eye.into();
        Self {
            eye,
            view: Matrix4::look_at_rh(eye, target.into(), Vector3::unit_y()),
        }
    }
}

impl CameraBehavior for Fixed {
    fn update(&mut self, _input: &InputState, _dt: Duration) {}

    fn view_matrix(&self) -> Matrix4<f32> {
        self.view
    }

    fn eye(&self) -> Point3<f32> {
        self.eye
    }
}

/// Produces the view-projection matrix every drawable receives each frame.
///
/// As an [`Object`] a camera optionally pushes its eye position to a
/// `view_position` uniform of the program given via [`Camera::with_program`].
pub struct Camera {
    projection: Projection,
    behavior: Box<dyn CameraBehavior>,
    view: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,
    vp: Matrix4<f32>,
    program: Option<ProgramHandle>,
    view_position: Option<UniformHandle>,
}

impl Camera {
    pub fn new(behavior: Box<dyn CameraBehavior>, projection: Projection) -> Self {
        let view = behavior.view_matrix();
        let projection_matrix = projection.calc_matrix();
        Self {
            projection,
            behavior,
            view,
            projection_matrix,
            vp: projection_matrix * view,
            program: None,
            view_position: None,
        }
    }

    pub fn with_program(mut self, program: ProgramHandle) -> Self {
        self.program = Some(program);
        self
    }

    /// Recomputes the projection for a new viewport aspect ratio.
    pub fn update_perspective(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.projection.aspect = aspect;
        }
        self.projection_matrix = self.projection.calc_matrix();
        self.vp = self.projection_matrix * self.view;
    }

    /// Lets the behaviour consume input, then recomputes view and `vp`.
    pub fn update(&mut self, input: &InputState, dt: Duration) {
        self.behavior.update(input, dt);
        self.view = self.behavior.view_matrix();
        self.vp = self.projection_matrix * self.view;
    }

    pub fn vp(&self) -> &Matrix4<f32> {
        &self.vp
    }

    pub fn view(&self) -> &Matrix4<f32> {
        &self.view
    }

    pub fn projection(&self) -> &Matrix4<f32> {
        &self.projection_matrix
    }

    pub fn aspect(&self) -> f32 {
        self.projection.aspect()
    }

    pub fn eye(&self) -> Point3<f32> {
        self.behavior.eye()
    }
}

impl Object for Camera {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Camera
    }

    fn name(&self) -> &str {
        "camera"
    }

    fn init(&mut self, gpu: &mut dyn Gpu) -> Result<()> {
        if let Some(program) = self.program {
            self.view_position =
                resolve_optional_uniform(&*gpu, program, VIEW_POSITION_UNIFORM).handle;
        } else {
            debug!("camera has no program, eye position won't be pushed");
        }
        Ok(())
    }

    fn update_transform(&mut self, _vp: &Matrix4<f32>) {}

    fn draw(&self, gpu: &mut dyn Gpu, _time: f32) {
        if let (Some(program), Some(uniform)) = (self.program, self.view_position) {
            gpu.use_program(program);
            gpu.set_uniform_vec3(uniform, &self.eye().to_vec());
        }
    }

    fn deinit(&mut self, _gpu: &mut dyn Gpu) {}

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Box::new(Fixed::looking_at((0.0, 0.0, 5.0), (0.0, 0.0, 0.0))),
            Projection::from_config(&Config::default()),
        )
    }
}
