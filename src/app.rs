//! The winit frame loop.
//!
//! [`run`] opens a window, builds the [`Context`], lets the caller set up a
//! scene and a camera, then drives them until the window closes:
//!
//! 1. collect window and device events into the [`InputState`]
//! 2. on redraw: `Camera::update`, push the camera's uniforms, `Scene::per_frame`
//! 3. submit the recorded draws and present
//! 4. on close: `Scene::teardown`

use std::sync::Arc;

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    config::Config,
    context::Context,
    input::InputState,
    objects::{Camera, Object},
    scene::Scene,
};

/// What the setup callback hands back to the frame loop.
pub struct SceneSetup {
    pub scene: Scene,
    pub camera: Camera,
}

type Setup = Box<dyn FnOnce(&mut Context) -> anyhow::Result<SceneSetup>>;

struct AppState {
    ctx: Context,
    scene: Scene,
    camera: Camera,
}

impl AppState {
    fn resize(&mut self, width: u32, height: u32) {
        if self.ctx.resize(width, height) {
            self.camera.update_perspective(self.ctx.aspect());
        }
    }

    fn teardown(&mut self) {
        self.camera.deinit(&mut self.ctx.backend);
        self.scene.teardown(&mut self.ctx.backend);
    }
}

struct App {
    config: Config,
    setup: Option<Setup>,
    state: Option<AppState>,
    input: InputState,
    started: Instant,
    last_time: Instant,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: Config, setup: Setup) -> Self {
        Self {
            config,
            setup: Some(setup),
            state: None,
            input: InputState::new(),
            started: Instant::now(),
            last_time: Instant::now(),
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let Some(setup) = self.setup.take() else {
            return Ok(());
        };
        let window_attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.width,
                self.config.height,
            ));
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let mut ctx = futures::executor::block_on(Context::new(window, &self.config))?;
        let SceneSetup { scene, mut camera } = setup(&mut ctx)?;
        camera.init(&mut ctx.backend)?;

        let mut state = AppState { ctx, scene, camera };
        let size = state.ctx.window.inner_size();
        state.resize(size.width, size.height);
        state.ctx.window.request_redraw();

        log::info!("scene ready with {} objects", state.scene.len());
        self.started = Instant::now();
        self.last_time = Instant::now();
        self.state = Some(state);
        Ok(())
    }

    fn redraw(&mut self) {
        let Some(state) = &mut self.state else {
            return;
        };
        let dt = self.last_time.elapsed();
        self.last_time = Instant::now();
        let elapsed = self.started.elapsed().as_secs_f32();

        state.camera.update(&self.input, dt);
        self.input.end_frame();

        state.camera.draw(&mut state.ctx.backend, elapsed);
        let vp = *state.camera.vp();
        state.scene.per_frame(&mut state.ctx.backend, &vp, elapsed);

        match state.ctx.render_frame() {
            Ok(()) => (),
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = state.ctx.window.inner_size();
                state.resize(size.width, size.height);
            }
            Err(e) => log::error!("Unable to render {}", e),
        }
        state.ctx.window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(e) = self.init(event_loop) {
            log::error!("unable to start: {:#}", e);
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        self.input.handle_device_event(&event);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        self.input.handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                if let Some(state) = &mut self.state {
                    state.teardown();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(state) = &mut self.state {
                    state.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            state.teardown();
        }
    }
}

/// Runs the frame loop until the window is closed.
///
/// `setup` is called once the GPU context exists; it creates programs, loads
/// assets and returns the scene to draw together with its camera.
pub fn run<F>(config: Config, setup: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut Context) -> anyhow::Result<SceneSetup> + 'static,
{
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, Box::new(setup));
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
