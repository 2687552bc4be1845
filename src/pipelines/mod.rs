//! Render pipelines and the default mesh program.

use crate::{
    gpu::wgpu_backend::{AttributeDecl, ProgramDescriptor, UniformDecl, UniformKind},
    objects::{
        camera::VIEW_POSITION_UNIFORM,
        light::light_uniform_names,
        mesh::{
            MODEL_UNIFORM, MVP_UNIFORM, NORMAL_ATTRIBUTE, POSITION_ATTRIBUTE, TEX_COORDS_ATTRIBUTE,
            TIME_UNIFORM,
        },
    },
};

const MESH_SHADER: &str = include_str!("mesh.wgsl");

/// The lit, textured mesh program every imported mesh is drawn with.
///
/// The shader's `lights[]` array holds `light_capacity` entries (at least one).
pub fn mesh_program(light_capacity: usize) -> ProgramDescriptor {
    let capacity = light_capacity.max(1);

    let mut uniforms = vec![
        UniformDecl::new(MVP_UNIFORM, UniformKind::Mat4),
        UniformDecl::new(MODEL_UNIFORM, UniformKind::Mat4),
        UniformDecl::new(VIEW_POSITION_UNIFORM, UniformKind::Vec3),
        UniformDecl::new(TIME_UNIFORM, UniformKind::Float),
    ];
    for index in 0..capacity as u32 {
        let [position, intensity, constant, linear, quadratic] = light_uniform_names(index);
        uniforms.extend([
            UniformDecl::new(position, UniformKind::Vec3),
            UniformDecl::new(intensity, UniformKind::Float),
            UniformDecl::new(constant, UniformKind::Float),
            UniformDecl::new(linear, UniformKind::Float),
            UniformDecl::new(quadratic, UniformKind::Float),
        ]);
    }

    ProgramDescriptor {
        label: "Mesh Shader".to_string(),
        source: MESH_SHADER.replace("__MAX_LIGHTS__", &capacity.to_string()),
        attributes: vec![
            AttributeDecl::new(POSITION_ATTRIBUTE, 0, 3),
            AttributeDecl::new(NORMAL_ATTRIBUTE, 1, 3),
            AttributeDecl::new(TEX_COORDS_ATTRIBUTE, 2, 2),
        ],
        uniforms,
    }
}

#[allow(clippy::too_many_arguments)]
pub fn mk_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    depth_format: Option<wgpu::TextureFormat>,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    shader: wgpu::ShaderModuleDescriptor,
    label: &str,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(shader);

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // imported assets don't agree on winding
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}
