//! SDF-based WebGPU render pipeline
//!
//! Renders the entire scene in fragment shader using signed distance fields.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use wgpu::util::DeviceExt;

use crate::sim::{GamePhase, GameState};

/// Maximum number of obstacles uploaded per frame (must match shader)
const MAX_OBSTACLES: usize = 16;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    resolution: [f32; 2], // offset 0
    playfield: [f32; 2],  // offset 8
    origin: [f32; 2],     // offset 16 - playfield top-left in pixels
    time: f32,            // offset 24
    scale: f32,           // offset 28 - pixels per playfield unit
    phase: u32,           // offset 32 - 0 idle, 1 active, 2 ended
    obstacle_count: u32,  // offset 36
    obstacle_width: f32,  // offset 40
    gap_height: f32,      // offset 44
    scroll: f32,          // offset 48 - ground scroll distance
    _pad: [u32; 3],       // pad to 64 bytes
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CharacterUniform {
    pos: [f32; 2],  // top-left corner
    size: [f32; 2],
    rotation: f32,  // radians
    _pad: [u32; 3],
}

/// x, gap_y, passed (0/1), unused
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ObstacleUniform {
    items: [[f32; 4]; MAX_OBSTACLES],
}

fn phase_code(phase: GamePhase) -> u32 {
    match phase {
        GamePhase::Idle => 0,
        GamePhase::Active => 1,
        GamePhase::Ended => 2,
    }
}

/// Scale that fits the playfield inside the viewport (letterboxed)
pub fn fit_scale(viewport: Vec2, playfield: Vec2) -> f32 {
    (viewport.x / playfield.x).min(viewport.y / playfield.y)
}

// ============================================================================
// SDF RENDER STATE
// ============================================================================

pub struct SdfRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    globals_buffer: wgpu::Buffer,
    character_buffer: wgpu::Buffer,
    obstacles_buffer: wgpu::Buffer,

    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
    start_time: f64,
}

impl SdfRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Self {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sdf-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sdf_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sdf_shader.wgsl").into()),
        });

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let character_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("character"),
            contents: bytemuck::bytes_of(&CharacterUniform::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let obstacles_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("obstacles"),
            contents: bytemuck::bytes_of(&ObstacleUniform::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sdf_bind_group_layout"),
            entries: &[uniform_entry(0), uniform_entry(1), uniform_entry(2)],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sdf_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: character_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: obstacles_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sdf_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sdf_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            character_buffer,
            obstacles_buffer,
            bind_group,
            size: (width, height),
            start_time: 0.0,
        }
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn set_start_time(&mut self, time: f64) {
        self.start_time = time;
    }

    pub fn render(&mut self, state: &GameState, time: f64) -> Result<(), wgpu::SurfaceError> {
        let elapsed = ((time - self.start_time) / 1000.0) as f32;
        let tuning = &state.tuning;

        if state.obstacles.len() > MAX_OBSTACLES {
            log::warn!(
                "{} obstacles on screen, only drawing {}",
                state.obstacles.len(),
                MAX_OBSTACLES
            );
        }
        let obstacle_count = state.obstacles.len().min(MAX_OBSTACLES);

        let viewport = Vec2::new(self.size.0 as f32, self.size.1 as f32);
        let playfield = Vec2::new(tuning.playfield_width, tuning.playfield_height);
        let scale = fit_scale(viewport, playfield);
        let origin = (viewport - playfield * scale) * 0.5;

        let globals = Globals {
            resolution: viewport.to_array(),
            playfield: playfield.to_array(),
            origin: origin.to_array(),
            time: elapsed,
            scale,
            phase: phase_code(state.phase),
            obstacle_count: obstacle_count as u32,
            obstacle_width: tuning.obstacle_width,
            gap_height: tuning.gap_height,
            scroll: state.round_steps as f32 * tuning.obstacle_speed,
            _pad: [0; 3],
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let character = CharacterUniform {
            pos: [tuning.character_x, state.character.y],
            size: [tuning.character_width, tuning.character_height],
            rotation: state.character.rotation.to_radians(),
            _pad: [0; 3],
        };
        self.queue
            .write_buffer(&self.character_buffer, 0, bytemuck::bytes_of(&character));

        let mut obstacles = ObstacleUniform::zeroed();
        for (slot, obstacle) in obstacles
            .items
            .iter_mut()
            .zip(state.obstacles.iter().take(obstacle_count))
        {
            *slot = [
                obstacle.x,
                obstacle.gap_y,
                if obstacle.passed { 1.0 } else { 0.0 },
                0.0,
            ];
        }
        self.queue
            .write_buffer(&self.obstacles_buffer, 0, bytemuck::bytes_of(&obstacles));

        // Render
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sdf_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sdf_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
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
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sizes_match_shader() {
        assert_eq!(std::mem::size_of::<Globals>(), 64);
        assert_eq!(std::mem::size_of::<CharacterUniform>(), 32);
        assert_eq!(std::mem::size_of::<ObstacleUniform>(), 16 * MAX_OBSTACLES);
    }

    #[test]
    fn test_fit_scale_letterboxes() {
        let playfield = Vec2::new(400.0, 600.0);
        // Wide viewport: height limits
        assert_eq!(fit_scale(Vec2::new(1920.0, 1200.0), playfield), 2.0);
        // Tall viewport: width limits
        assert_eq!(fit_scale(Vec2::new(400.0, 1000.0), playfield), 1.0);
    }
}
