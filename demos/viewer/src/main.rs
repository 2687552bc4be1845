//! Opens a glTF file and orbits around it.
//!
//! ```sh
//! cargo run -- path/to/scene.glb [--fly]
//! ```
//!
//! Without a path a unit cube is shown. Drag with the left mouse button to
//! rotate, scroll to zoom. With `--fly` the camera moves freely instead (WASD,
//! Space/Shift, look around while holding the right mouse button).

use hertz::{
    app::{self, SceneSetup},
    cgmath::{Deg, Rad, Vector3},
    config::Config,
    geometry::GeometryBuffer,
    gpu::ProgramHandle,
    importer,
    objects::{
        Camera, Light, Mesh,
        camera::{CameraBehavior, FreeFly, Orbit, Projection},
    },
    pipelines::mesh_program,
    scene::Scene,
};

fn cube() -> GeometryBuffer {
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
    ];
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut tex_coords = Vec::new();
    let mut indices = Vec::new();
    for (normal, u, v) in faces {
        let base = positions.len() as u32;
        for (su, sv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            positions.push([
                normal[0] * 0.5 + u[0] * su + v[0] * sv,
                normal[1] * 0.5 + u[1] * su + v[1] * sv,
                normal[2] * 0.5 + u[2] * su + v[2] * sv,
            ]);
            normals.push(normal);
            tex_coords.push([su + 0.5, sv + 0.5]);
        }
        indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    GeometryBuffer::new(positions, indices)
        .with_normals(normals)
        .with_tex_coords(tex_coords)
}

fn add_light(ctx: &mut hertz::context::Context, scene: &mut Scene, program: ProgramHandle) {
    let slot = scene.light_slots_mut().acquire();
    let mut light = Light::new(program, slot);
    light.move_to(Vector3::new(4.0, 6.0, 4.0));
    light.configure(1.0, 0.045, 0.0075);
    scene.load_object(&mut ctx.backend, Box::new(light));
}

fn behaviour(config: &Config, fly: bool) -> Box<dyn CameraBehavior> {
    if fly {
        let fly = FreeFly::new((0.0, 1.0, 4.0), Deg(-90.0), Rad(0.0))
            .with_speed(config.move_speed, config.mouse_sensitivity);
        return Box::new(fly);
    }
    let mut orbit = Orbit::new((0.0, 0.0, 0.0), 4.0);
    orbit.pitch = Deg(25.0).into();
    orbit.sensitivity = config.mouse_sensitivity;
    Box::new(orbit)
}

fn main() -> anyhow::Result<()> {
    let (flags, paths): (Vec<String>, Vec<String>) =
        std::env::args().skip(1).partition(|arg| arg.starts_with("--"));
    let fly = flags.iter().any(|flag| flag == "--fly");
    let path = paths.into_iter().next();

    let config = Config {
        title: "hertz viewer".into(),
        ..Default::default()
    };
    let light_capacity = config.light_capacity;
    let projection = Projection::from_config(&config);
    let camera_behaviour = behaviour(&config, fly);

    app::run(config, move |ctx| {
        let program = ctx.backend.create_program(&mesh_program(light_capacity))?;
        let mut scene = Scene::new(light_capacity);

        // lights first so their uniforms are set before any mesh draws
        add_light(ctx, &mut scene, program);

        match path {
            Some(path) => {
                let added = importer::import_into(&path, &mut ctx.backend, program, &mut scene)?;
                log::info!("{} meshes from {}", added, path);
            }
            None => {
                let cube = Mesh::new("cube", program, cube());
                scene.load_object(&mut ctx.backend, Box::new(cube));
            }
        }

        let camera = Camera::new(camera_behaviour, projection).with_program(program);
        Ok(SceneSetup { scene, camera })
    })
}
