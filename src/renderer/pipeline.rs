//! WebGPU render pipeline setup

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use wgpu::util::DeviceExt;
use winit::window::Window;

use super::shader::{FadePhase, ShaderKind};
use super::shapes::{FrameEffects, build_frame};
use super::textures::TextureCache;
use super::vertex::Vertex;
use crate::error::RenderError;
use crate::level::Level;
use crate::settings::Settings;
use crate::sim::{GameState, TextureKey};

const BACKGROUND: [f64; 4] = [0.02, 0.02, 0.05, 1.0];

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    pub textures: TextureCache,
    /// One uniform buffer and bind group per shader variant
    effect_buffers: Vec<wgpu::Buffer>,
    effect_bind_groups: Vec<wgpu::BindGroup>,
    /// Viewport size in pixels
    pub size: (u32, u32),
    noisy_lasers: bool,
    fading_mirrors: bool,
    /// Per-frame noise seeds; never touches the simulation RNG
    noise_rng: Pcg32,
    fade: FadePhase,
}

impl RenderState {
    pub async fn new(
        window: Arc<Window>,
        settings: &Settings,
        level: &Level,
    ) -> Result<Self, RenderError> {
        let size = window.inner_size();
        let (width, height) = (size.width.max(1), size.height.max(1));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("lasertrap-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: if settings.vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Level textures load up front so a broken asset fails at startup
        let mut textures = TextureCache::new(&device);
        textures.register(TextureKey::Tilesheet, level.tilesheet_path());
        textures.register(TextureKey::Player, level.player_path());
        textures.ensure(&device, &queue, TextureKey::Tilesheet)?;
        textures.ensure(&device, &queue, TextureKey::Player)?;

        let effect_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("effect_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let mut effect_buffers = Vec::with_capacity(ShaderKind::COUNT);
        let mut effect_bind_groups = Vec::with_capacity(ShaderKind::COUNT);
        for _ in 0..ShaderKind::COUNT {
            let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("effect_buffer"),
                contents: bytemuck::bytes_of(&ShaderKind::Plain.uniform()),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("effect_bind_group"),
                layout: &effect_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            effect_buffers.push(buffer);
            effect_bind_groups.push(bind_group);
        }

        // Create shader module
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sprite_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sprite.wgsl").into()),
        });

        // Create pipeline
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[textures.bind_group_layout(), &effect_layout],
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

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            textures,
            effect_buffers,
            effect_bind_groups,
            size: (width, height),
            noisy_lasers: settings.noisy_lasers,
            fading_mirrors: settings.fading_mirrors,
            noise_rng: Pcg32::seed_from_u64(settings.resolved_seed()),
            fade: FadePhase::default(),
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

    /// Shader variants for this frame; reseeds the noise and advances the
    /// fade phase once per mirror drawn
    fn next_effects(&mut self, state: &GameState) -> FrameEffects {
        FrameEffects {
            lasers: if self.noisy_lasers {
                ShaderKind::Noisy {
                    seed: self.noise_rng.random(),
                }
            } else {
                ShaderKind::Plain
            },
            mirrors: if self.fading_mirrors {
                ShaderKind::Fading {
                    phase: self.fade.advance_draws(state.mirrors.len()),
                }
            } else {
                ShaderKind::Plain
            },
        }
    }

    /// Draw the game state
    pub fn render(&mut self, state: &GameState) -> Result<(), wgpu::SurfaceError> {
        let effects = self.next_effects(state);
        let frame = build_frame(state, &effects);

        for kind in [ShaderKind::Plain, effects.lasers, effects.mirrors] {
            self.queue.write_buffer(
                &self.effect_buffers[kind.slot()],
                0,
                bytemuck::bytes_of(&kind.uniform()),
            );
        }
        for batch in &frame.batches {
            if let Err(e) = self.textures.ensure(&self.device, &self.queue, batch.texture) {
                log::warn!("Texture {:?} unavailable: {}", batch.texture, e);
            }
        }

        let vertex_buffer = (!frame.vertices.is_empty()).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("vertex_buffer"),
                    contents: bytemuck::cast_slice(&frame.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

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
            let [r, g, b, a] = BACKGROUND;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(vertex_buffer) = &vertex_buffer {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
                for batch in &frame.batches {
                    let Some(texture) = self.textures.bind_group(batch.texture) else {
                        continue;
                    };
                    render_pass.set_bind_group(0, texture, &[]);
                    render_pass.set_bind_group(1, &self.effect_bind_groups[batch.shader.slot()], &[]);
                    render_pass.draw(batch.vertices.clone(), 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
