//! Offscreen wgpu target for tests that need a real device.

use std::iter;

use hertz::{gpu::wgpu_backend::WgpuBackend, texture::Texture};

pub const SIZE: u32 = 64;

pub struct Headless {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub backend: WgpuBackend,
    target: wgpu::Texture,
    view: wgpu::TextureView,
    depth: Texture,
}

impl Headless {
    pub fn new() -> Self {
        futures::executor::block_on(Self::request())
    }

    async fn request() -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .unwrap();
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .unwrap();

        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("test target"),
            size: wgpu::Extent3d {
                width: SIZE,
                height: SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Texture::COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());
        let depth = Texture::create_depth_texture(&device, [SIZE, SIZE], "test depth");
        let backend = WgpuBackend::new(&device, &queue, Texture::COLOR_FORMAT);

        Self {
            device,
            queue,
            backend,
            target,
            view,
            depth,
        }
    }

    /// Replays the recorded draws and reads the target back as RGBA rows.
    pub fn render(&mut self, clear: wgpu::Color) -> image::RgbaImage {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        self.backend
            .render(&mut encoder, &self.view, &self.depth.view, clear);

        let u32_size = std::mem::size_of::<u32>() as u32;
        let output_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            size: (u32_size * SIZE * SIZE) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            label: None,
            mapped_at_creation: false,
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &self.target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &output_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(u32_size * SIZE),
                    rows_per_image: Some(SIZE),
                },
            },
            wgpu::Extent3d {
                width: SIZE,
                height: SIZE,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(iter::once(encoder.finish()));

        let (tx, rx) = futures::channel::oneshot::channel();
        let slice = output_buffer.slice(..);
        slice.map_async(wgpu::MapMode::Read, move |result| {
            tx.send(result).unwrap();
        });
        self.device
            .poll(wgpu::PollType::Wait)
            .unwrap();
        futures::executor::block_on(rx).unwrap().unwrap();

        let pixels = slice.get_mapped_range().to_vec();
        image::RgbaImage::from_raw(SIZE, SIZE, pixels).unwrap()
    }
}
