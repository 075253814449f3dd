//! wgpu sprite renderer
//!
//! Consumes the frame's `RenderData`: one instanced quad per submitted
//! transform, expanded in the vertex shader, projected by the game camera.
//! The WGSL source lives on disk and is polled by timestamp each frame;
//! editing it while the host runs swaps the pipeline, and a broken edit is
//! a logged soft failure that keeps the previous pipeline alive.

use cinder_abi::{RenderData, MAX_TRANSFORMS};
use cinder_engine::Renderer;
use cinder_math::Mat4;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;
use winit::window::Window;

/// Result type for renderer operations
pub type Result<T> = std::result::Result<T, RenderError>;

/// Fatal renderer failures. Everything recoverable (lost surface, broken
/// shader edit) is absorbed internally.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    SurfaceCreation(String),

    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("failed to request device: {0}")]
    DeviceRequest(String),

    #[error("failed to read shader '{path}': {message}")]
    ShaderMissing { path: PathBuf, message: String },

    #[error("shader '{path}' failed validation: {message}")]
    ShaderInvalid { path: PathBuf, message: String },
}

/// One sprite instance as the vertex shader sees it.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct SpriteInstance {
    pos: [f32; 2],
    size: [f32; 2],
    atlas_offset: [f32; 2],
    sprite_size: [f32; 2],
}

impl SpriteInstance {
    const ATTRIBS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32x2,
        2 => Float32x2,
        3 => Float32x2,
    ];

    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Sprite renderer over a winit window surface.
pub struct SpriteRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    pipeline_layout: wgpu::PipelineLayout,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    instance_count: u32,
    shader_path: PathBuf,
    shader_timestamp: Option<SystemTime>,
    /// Acquired in `submit`, handed back in `present`.
    frame: Option<wgpu::SurfaceTexture>,
}

impl SpriteRenderer {
    pub fn new(window: Arc<Window>, shader_path: &Path) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| RenderError::SurfaceCreation(e.to_string()))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(RenderError::NoAdapter)?;

        log::info!("using adapter: {:?}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("cinder_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
            },
            None,
        ))
        .map_err(|e| RenderError::DeviceRequest(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(caps.formats[0]);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sprite_camera"),
            size: std::mem::size_of::<[f32; 16]>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite_camera_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprite_camera_bind_group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sprite_pipeline_layout"),
            bind_group_layouts: &[&camera_layout],
            push_constant_ranges: &[],
        });

        // A missing shader at startup is a missing required asset: fatal.
        let source = std::fs::read_to_string(shader_path).map_err(|e| {
            RenderError::ShaderMissing {
                path: shader_path.to_path_buf(),
                message: e.to_string(),
            }
        })?;
        let pipeline = build_pipeline(&device, &pipeline_layout, format, shader_path, &source)?;
        let shader_timestamp = cinder_module::fs::modified_time(shader_path);

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sprite_instances"),
            size: (MAX_TRANSFORMS * std::mem::size_of::<SpriteInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            surface,
            device,
            queue,
            surface_config,
            pipeline,
            pipeline_layout,
            camera_buffer,
            camera_bind_group,
            instance_buffer,
            instance_count: 0,
            shader_path: shader_path.to_path_buf(),
            shader_timestamp,
            frame: None,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Poll the shader source's timestamp and rebuild the pipeline on
    /// change. A stat failure is "no change"; a validation failure keeps
    /// the old pipeline and logs the error.
    fn poll_shader(&mut self) {
        let Some(observed) = cinder_module::fs::modified_time(&self.shader_path) else {
            return;
        };
        if self.shader_timestamp.map_or(false, |last| observed <= last) {
            return;
        }
        self.shader_timestamp = Some(observed);

        let source = match std::fs::read_to_string(&self.shader_path) {
            Ok(source) => source,
            Err(e) => {
                log::warn!("shader '{}' unreadable: {}", self.shader_path.display(), e);
                return;
            }
        };
        match build_pipeline(
            &self.device,
            &self.pipeline_layout,
            self.surface_config.format,
            &self.shader_path,
            &source,
        ) {
            Ok(pipeline) => {
                self.pipeline = pipeline;
                log::info!("reloaded shader '{}'", self.shader_path.display());
            }
            Err(e) => log::error!("{}", e),
        }
    }

    fn camera_matrix(render_data: &RenderData) -> [f32; 16] {
        let camera = render_data.game_camera;
        let zoom = if camera.zoom > 0.0 { camera.zoom } else { 1.0 };
        let half = cinder_math::Vec2::new(
            camera.dimensions.x / (2.0 * zoom),
            camera.dimensions.y / (2.0 * zoom),
        );
        // y-down world: top of the screen is the smaller y.
        Mat4::orthographic(
            camera.position.x - half.x,
            camera.position.x + half.x,
            camera.position.y - half.y,
            camera.position.y + half.y,
        )
        .to_cols_array()
    }

    fn acquire_frame(&mut self) -> Option<wgpu::SurfaceTexture> {
        match self.surface.get_current_texture() {
            Ok(frame) => Some(frame),
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
                self.surface.get_current_texture().ok()
            }
            Err(e) => {
                log::warn!("skipping frame: {}", e);
                None
            }
        }
    }
}

impl Renderer for SpriteRenderer {
    fn submit(&mut self, render_data: &mut RenderData) {
        self.poll_shader();

        let instances: Vec<SpriteInstance> = render_data
            .transforms
            .iter()
            .map(|t| SpriteInstance {
                pos: t.pos.to_array(),
                size: t.size.to_array(),
                atlas_offset: [t.atlas_offset.x as f32, t.atlas_offset.y as f32],
                sprite_size: [t.sprite_size.x as f32, t.sprite_size.y as f32],
            })
            .collect();
        self.instance_count = instances.len() as u32;
        render_data.transforms.clear();

        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&Self::camera_matrix(render_data)),
        );
        if !instances.is_empty() {
            self.queue
                .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let Some(frame) = self.acquire_frame() else {
            return;
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sprite_encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sprite_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.05,
                            g: 0.05,
                            b: 0.08,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
            pass.draw(0..4, 0..self.instance_count);
        }
        self.queue.submit(std::iter::once(encoder.finish()));

        self.frame = Some(frame);
    }

    fn present(&mut self) {
        if let Some(frame) = self.frame.take() {
            frame.present();
        }
    }
}

/// Compile a pipeline from WGSL source, catching validation errors through
/// an error scope so a broken hot-edit cannot take down the device.
fn build_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
    path: &Path,
    source: &str,
) -> Result<wgpu::RenderPipeline> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("sprite_shader"),
        source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(source)),
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("sprite_pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: "vs_main",
            buffers: &[SpriteInstance::desc()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        return Err(RenderError::ShaderInvalid {
            path: path.to_path_buf(),
            message: error.to_string(),
        });
    }
    Ok(pipeline)
}
