mod common;

use std::{f32::consts::FRAC_PI_2, time::Duration};

use common::mock_gpu::{Call, MockGpu, PROGRAM};
use hertz::{
    KeyCode,
    cgmath::{Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, Vector3, Vector4},
    config::Config,
    input::InputState,
    objects::{
        Camera, Object, ObjectKind,
        camera::{CameraBehavior, Fixed, FreeFly, Orbit, Projection},
    },
};
use winit::event::MouseButton;

const EPSILON: f32 = 1e-4;

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn fixed_camera() -> Camera {
    Camera::new(
        Box::new(Fixed::looking_at((0.0, 2.0, 5.0), (0.0, 0.0, 0.0))),
        Projection::new(Deg(45.0), 0.1, 100.0),
    )
}

#[test]
fn vp_is_projection_times_view() {
    let camera = fixed_camera();

    assert_eq!(camera.kind(), ObjectKind::Camera);
    assert_eq!(*camera.vp(), camera.projection() * camera.view());
}

#[test]
fn update_perspective_changes_the_projection() {
    let mut camera = fixed_camera();
    let before = *camera.projection();

    camera.update_perspective(2.0);

    assert_eq!(camera.aspect(), 2.0);
    assert_ne!(*camera.projection(), before);
    assert_eq!(*camera.vp(), camera.projection() * camera.view());
}

#[test]
fn degenerate_aspect_ratios_are_ignored() {
    let mut camera = fixed_camera();
    camera.update_perspective(1.5);

    camera.update_perspective(0.0);
    camera.update_perspective(-1.0);
    camera.update_perspective(f32::NAN);

    assert_eq!(camera.aspect(), 1.5);
}

#[test]
fn projection_from_config_uses_the_window_size() {
    let config = Config {
        width: 800,
        height: 400,
        ..Default::default()
    };

    assert_eq!(Projection::from_config(&config).aspect(), 2.0);
}

#[test]
fn depth_maps_into_the_zero_to_one_range() {
    let projection = Projection::new(Deg(90.0), 1.0, 10.0);
    let matrix = projection.calc_matrix();

    let near = matrix * Vector4::new(0.0, 0.0, -1.0, 1.0);
    let far = matrix * Vector4::new(0.0, 0.0, -10.0, 1.0);

    assert!(close(near.z / near.w, 0.0));
    assert!(close(far.z / far.w, 1.0));
}

#[test]
fn free_fly_moves_forward_along_its_yaw() {
    let mut fly = FreeFly::new((0.0, 0.0, 0.0), Rad(0.0), Rad(0.0));
    let mut input = InputState::new();
    input.press(KeyCode::KeyW);

    fly.update(&input, Duration::from_secs(1));

    assert!(close(fly.position.x, 4.0));
    assert!(close(fly.position.y, 0.0));
    assert!(close(fly.position.z, 0.0));
}

#[test]
fn free_fly_strafes_and_climbs() {
    let mut fly = FreeFly::new((0.0, 0.0, 0.0), Rad(0.0), Rad(0.0)).with_speed(2.0, 0.004);
    let mut input = InputState::new();
    input.press(KeyCode::KeyD);
    input.press(KeyCode::Space);

    fly.update(&input, Duration::from_millis(500));

    assert!(close(fly.position.x, 0.0));
    assert!(close(fly.position.y, 1.0));
    assert!(close(fly.position.z, 1.0));
}

#[test]
fn free_fly_only_looks_around_while_the_right_button_is_held() {
    let mut fly = FreeFly::new((0.0, 0.0, 0.0), Rad(0.0), Rad(0.0));
    let mut input = InputState::new();
    input.add_mouse_delta(100.0, 0.0);

    fly.update(&input, Duration::ZERO);
    assert_eq!(fly.yaw, Rad(0.0));

    input.press_button(MouseButton::Right);
    fly.update(&input, Duration::ZERO);
    assert!(close(fly.yaw.0, 0.4));
}

#[test]
fn free_fly_pitch_is_clamped_short_of_vertical() {
    let mut fly = FreeFly::new((0.0, 0.0, 0.0), Rad(0.0), Rad(0.0));
    let mut input = InputState::new();
    input.press_button(MouseButton::Right);
    input.add_mouse_delta(0.0, -1.0e6);

    fly.update(&input, Duration::ZERO);

    assert!(fly.pitch.0 < FRAC_PI_2);
    assert!(fly.pitch.0 > 1.57);
    let view = fly.view_matrix();
    assert!(view.x.x.is_finite() && view.w.w.is_finite());
}

#[test]
fn orbit_eye_stays_at_its_distance() {
    let orbit = Orbit::new((1.0, 2.0, 3.0), 6.0);

    let offset = orbit.eye() - orbit.target;

    assert!(close(offset.magnitude(), 6.0));
}

#[test]
fn orbit_zoom_stops_at_the_minimum_distance() {
    let mut orbit = Orbit::new((0.0, 0.0, 0.0), 1.0);
    let mut input = InputState::new();

    input.add_scroll(1.0);
    orbit.update(&input, Duration::ZERO);
    assert!(close(orbit.distance, 0.5));

    input.add_scroll(10.0);
    orbit.update(&input, Duration::ZERO);
    assert_eq!(orbit.distance, orbit.min_distance);
}

#[test]
fn orbit_rotates_only_while_dragging() {
    let mut orbit = Orbit::new((0.0, 0.0, 0.0), 3.0);
    let yaw = orbit.yaw;
    let mut input = InputState::new();
    input.add_mouse_delta(50.0, 0.0);

    orbit.update(&input, Duration::ZERO);
    assert_eq!(orbit.yaw, yaw);

    input.press_button(MouseButton::Left);
    orbit.update(&input, Duration::ZERO);
    assert!(close(orbit.yaw.0, yaw.0 + 0.2));
}

#[test]
fn camera_update_recomputes_view_from_its_behaviour() {
    let mut camera = Camera::new(
        Box::new(FreeFly::new((0.0, 0.0, 0.0), Rad(0.0), Rad(0.0))),
        Projection::new(Deg(60.0), 0.1, 50.0),
    );
    let before = *camera.view();
    let mut input = InputState::new();
    input.press(KeyCode::KeyW);

    camera.update(&input, Duration::from_secs(1));

    assert_ne!(*camera.view(), before);
    assert!(close(camera.eye().x, 4.0));
    assert_eq!(*camera.vp(), camera.projection() * camera.view());
}

#[test]
fn camera_pushes_its_eye_to_the_view_position_uniform() {
    let mut gpu = MockGpu::new();
    let mut camera = fixed_camera().with_program(PROGRAM);

    camera.init(&mut gpu).unwrap();
    camera.draw(&mut gpu, 0.0);

    assert_eq!(
        gpu.calls,
        vec![
            Call::UseProgram(PROGRAM),
            Call::SetVec3(gpu.uniform("view_position"), Vector3::new(0.0, 2.0, 5.0)),
        ]
    );
}

#[test]
fn camera_without_program_or_uniform_pushes_nothing() {
    let mut gpu = MockGpu::new().without_uniform("view_position");
    let mut bound = fixed_camera().with_program(PROGRAM);
    let mut unbound = fixed_camera();

    bound.init(&mut gpu).unwrap();
    unbound.init(&mut gpu).unwrap();
    bound.draw(&mut gpu, 0.0);
    unbound.draw(&mut gpu, 0.0);
    unbound.update_transform(&Matrix4::from_scale(2.0));

    assert!(gpu.calls.is_empty());
}

#[test]
fn default_camera_looks_at_the_origin_from_the_front() {
    let camera = Camera::default();

    assert_eq!(camera.eye(), Point3::new(0.0, 0.0, 5.0));
    let origin = *camera.view() * Point3::origin().to_homogeneous();
    assert!(close(origin.z, -5.0));
}
