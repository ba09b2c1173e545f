//! WebGPU render pipeline setup

use glam::Vec2;
use wgpu::util::DeviceExt;

use super::vertex::{Vertex, colors};

/// Maps world units (y up) to pixels and NDC
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// World position at the center of the canvas
    pub pos: Vec2,
    /// Pixels per world unit
    pub scale: f32,
    /// Canvas size in pixels
    pub size: (u32, u32),
}

impl Camera {
    pub fn new(pos: Vec2, scale: f32, size: (u32, u32)) -> Self {
        Self { pos, scale, size }
    }

    /// World position to normalized device coordinates
    pub fn world_to_ndc(&self, world: Vec2) -> Vec2 {
        let half = Vec2::new(self.size.0 as f32, self.size.1 as f32) * 0.5;
        (world - self.pos) * self.scale / half
    }

    /// Canvas pixel (y down) to world position
    pub fn screen_to_world(&self, x: f32, y: f32) -> Vec2 {
        let (w, h) = (self.size.0 as f32, self.size.1 as f32);
        Vec2::new(
            self.pos.x + (x - w / 2.0) / self.scale,
            self.pos.y - (y - h / 2.0) / self.scale,
        )
    }
}

/// Why the renderer could not be created
#[derive(Debug)]
pub enum RenderInitError {
    Device(wgpu::RequestDeviceError),
    /// Surface reported no formats or alpha modes for this adapter
    UnsupportedSurface,
}

impl std::fmt::Display for RenderInitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderInitError::Device(e) => write!(f, "failed to create device: {e}"),
            RenderInitError::UnsupportedSurface => write!(f, "surface is not supported by the adapter"),
        }
    }
}

impl std::error::Error for RenderInitError {}

impl From<wgpu::RequestDeviceError> for RenderInitError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        RenderInitError::Device(e)
    }
}

/// Pick the surface format and alpha mode, preferring a non-sRGB format
///
/// Colors are authored as sRGB values, so they are written unconverted.
pub fn surface_format(
    caps: &wgpu::SurfaceCapabilities,
) -> Option<(wgpu::TextureFormat, wgpu::CompositeAlphaMode)> {
    let format = caps
        .formats
        .iter()
        .find(|f| !f.is_srgb())
        .or_else(|| caps.formats.first())
        .copied()?;
    let alpha_mode = caps.alpha_modes.first().copied()?;
    Some((format, alpha_mode))
}

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    /// Viewport size in pixels
    pub size: (u32, u32),
    pub camera: Camera,
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        camera: Camera,
    ) -> Result<Self, RenderInitError> {
        let (width, height) = camera.size;
        let (surface_format, alpha_mode) = surface_format(&surface.get_capabilities(adapter))
            .ok_or(RenderInitError::UnsupportedSurface)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("combo-breakout-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vertex_buffer"),
            contents: bytemuck::cast_slice(&[Vertex::new(0.0, 0.0, [1.0; 4])]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_count: 0,
            size: (width, height),
            camera,
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Upload world-space vertices and render
    pub fn render(&mut self, vertices: &[Vertex]) -> Result<(), wgpu::SurfaceError> {
        let ndc_vertices: Vec<Vertex> = vertices
            .iter()
            .map(|v| {
                let ndc = self.camera.world_to_ndc(Vec2::from(v.position));
                Vertex::new(ndc.x, ndc.y, v.color)
            })
            .collect();

        // Grow the buffer only when the scene outgrows it
        let bytes: &[u8] = bytemuck::cast_slice(&ndc_vertices);
        if bytes.len() as u64 > self.vertex_buffer.size() {
            self.vertex_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("vertex_buffer"),
                    contents: bytes,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                });
        } else {
            self.queue.write_buffer(&self.vertex_buffer, 0, bytes);
        }
        self.vertex_count = ndc_vertices.len() as u32;

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let clear = colors::BACKGROUND;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear.r as f64,
                            g: clear.g as f64,
                            b: clear.b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.draw(0..self.vertex_count, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{CAMERA_SCALE, CANVAS_SIZE};

    fn camera() -> Camera {
        Camera::new(crate::level_center(), CAMERA_SCALE, CANVAS_SIZE)
    }

    #[test]
    fn test_center_maps_to_origin() {
        assert_eq!(camera().world_to_ndc(crate::level_center()), Vec2::ZERO);
    }

    #[test]
    fn test_level_fits_on_canvas() {
        let cam = camera();
        let min = cam.world_to_ndc(Vec2::ZERO);
        let max = cam.world_to_ndc(crate::consts::LEVEL_SIZE);
        assert!(min.x > -1.0 && min.y > -1.0);
        assert!(max.x < 1.0 && max.y < 1.0);
        // 19 units * 32 px over 640 px
        assert!((max.x - 0.95).abs() < 1e-5);
    }

    #[test]
    fn test_surface_format_prefers_linear_write() {
        let caps = wgpu::SurfaceCapabilities {
            formats: vec![
                wgpu::TextureFormat::Bgra8UnormSrgb,
                wgpu::TextureFormat::Bgra8Unorm,
            ],
            alpha_modes: vec![wgpu::CompositeAlphaMode::Opaque],
            ..Default::default()
        };
        assert_eq!(
            surface_format(&caps),
            Some((wgpu::TextureFormat::Bgra8Unorm, wgpu::CompositeAlphaMode::Opaque))
        );
    }

    #[test]
    fn test_surface_without_capabilities_is_rejected() {
        assert_eq!(surface_format(&wgpu::SurfaceCapabilities::default()), None);

        let caps = wgpu::SurfaceCapabilities {
            formats: vec![wgpu::TextureFormat::Rgba8Unorm],
            ..Default::default()
        };
        assert_eq!(surface_format(&caps), None);
    }

    #[test]
    fn test_screen_to_world() {
        let cam = camera();
        assert_eq!(cam.screen_to_world(640.0, 360.0), crate::level_center());
        let p = cam.screen_to_world(640.0 + 64.0, 360.0 + 32.0);
        assert_eq!(p, Vec2::new(21.0, 9.0));
    }
}
