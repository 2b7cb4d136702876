//! wgpu backend: one pipeline per mesh kind, per-draw uniforms at dynamic offsets.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;
use winit::window::Window;

use super::{MeshHandle, RenderError, Renderer, Transforms, UniformSet};
use crate::ocean::{OceanGrid, Vertex, WaveField};
use crate::params::{LightingParams, MAX_FLEET_VESSELS, MAX_WAVE_TERMS};
use crate::vessel::hull::HullMesh;

/// Draws that fit in the per-frame uniform buffer: ocean, player, then the fleet
const MAX_DRAWS: usize = MAX_FLEET_VESSELS + 2;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Per-draw uniform block (matches `DrawUniforms` in scene.wgsl)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct DrawUniforms {
    pub model: [[f32; 4]; 4],
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    /// rgb colour, shininess in w
    pub base_color: [f32; 4],
    pub light_dir: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// time, term count, height damping, floating offset
    pub wave_params: [f32; 4],
}

impl DrawUniforms {
    fn new(transforms: &Transforms, uniforms: &UniformSet<'_>) -> Self {
        let light = &uniforms.light;
        let wave_params = match uniforms.waves {
            Some(field) => [
                uniforms.time,
                field.terms().len().min(MAX_WAVE_TERMS) as f32,
                field.height_damping(),
                field.floating_offset(),
            ],
            None => [uniforms.time, 0.0, 1.0, 0.0],
        };

        Self {
            model: transforms.model.to_cols_array_2d(),
            view_proj: (transforms.projection * transforms.view).to_cols_array_2d(),
            camera_pos: uniforms.camera_position.extend(1.0).to_array(),
            base_color: uniforms.base_color.extend(uniforms.shininess).to_array(),
            light_dir: light.direction.extend(0.0).to_array(),
            ambient: light.ambient.extend(0.0).to_array(),
            diffuse: light.diffuse.extend(0.0).to_array(),
            specular: light.specular.extend(0.0).to_array(),
            wave_params,
        }
    }
}

/// One wave term as the shader reads it (matches `WaveTerm` in scene.wgsl)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WaveTermGpu {
    /// direction.xy, amplitude, wavelength
    pub shape: [f32; 4],
    /// speed, amplitude scale, frequency scale, unused
    pub motion: [f32; 4],
}

/// Full-size wave table, unused slots zeroed
fn wave_table(field: &WaveField) -> Vec<WaveTermGpu> {
    let mut table = vec![WaveTermGpu::zeroed(); MAX_WAVE_TERMS];
    for (slot, term) in table.iter_mut().zip(field.terms()) {
        *slot = WaveTermGpu {
            shape: [
                term.direction.x,
                term.direction.y,
                term.amplitude,
                term.wavelength,
            ],
            motion: [term.speed, term.amplitude_scale, term.frequency_scale, 0.0],
        };
    }
    table
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn new(device: &wgpu::Device, label: &str, vertices: &[Vertex], indices: &[u32]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }
}

struct QueuedDraw {
    mesh: MeshHandle,
    uniforms: DrawUniforms,
}

/// Renderer backed by a window surface
pub struct GpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    ocean_pipeline: wgpu::RenderPipeline,
    hull_pipeline: wgpu::RenderPipeline,
    ocean_mesh: GpuMesh,
    hull_mesh: GpuMesh,
    draw_buffer: wgpu::Buffer,
    wave_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    uniform_stride: u64,
    clear_color: wgpu::Color,
    queued: Vec<QueuedDraw>,
    pending_waves: Option<Vec<WaveTermGpu>>,
}

impl GpuRenderer {
    /// Create the surface, device, pipelines and mesh buffers
    pub async fn new(
        window: Arc<Window>,
        ocean_grid: &OceanGrid,
        hull: &HullMesh,
        lighting: &LightingParams,
    ) -> Result<Self, RenderError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Surface takes the Arc so it can be 'static
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/scene.wgsl").into()),
        });

        // Per-draw slots must start on the device's uniform offset alignment
        let uniform_size = std::mem::size_of::<DrawUniforms>() as u64;
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let uniform_stride = uniform_size.div_ceil(alignment) * alignment;

        let draw_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Draw Uniform Buffer"),
            size: uniform_stride * MAX_DRAWS as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let wave_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Wave Table Buffer"),
            contents: bytemuck::cast_slice(&vec![WaveTermGpu::zeroed(); MAX_WAVE_TERMS]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(uniform_size),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &draw_buffer,
                        offset: 0,
                        size: wgpu::BufferSize::new(uniform_size),
                    }),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wave_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let ocean_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            "vs_ocean",
            config.format,
            "Ocean Pipeline",
        );
        let hull_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            "vs_hull",
            config.format,
            "Hull Pipeline",
        );

        let ocean_mesh = GpuMesh::new(&device, "Ocean", &ocean_grid.vertices, &ocean_grid.indices);
        let hull_mesh = GpuMesh::new(&device, "Hull", &hull.vertices, &hull.indices);

        let [r, g, b] = lighting.sky_color;
        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            ocean_pipeline,
            hull_pipeline,
            ocean_mesh,
            hull_mesh,
            draw_buffer,
            wave_buffer,
            bind_group,
            uniform_stride,
            clear_color: wgpu::Color { r, g, b, a: 1.0 },
            queued: Vec::with_capacity(MAX_DRAWS),
            pending_waves: None,
        })
    }

    /// Reconfigure the surface and depth buffer for a new window size
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, &self.config);
    }

    /// Submit every draw queued since the last call and present the frame
    pub fn present(&mut self) -> Result<(), RenderError> {
        let queued = std::mem::take(&mut self.queued);

        if let Some(table) = self.pending_waves.take() {
            self.queue
                .write_buffer(&self.wave_buffer, 0, bytemuck::cast_slice(&table));
        }
        for (slot, draw) in queued.iter().enumerate() {
            self.queue.write_buffer(
                &self.draw_buffer,
                slot as u64 * self.uniform_stride,
                bytemuck::bytes_of(&draw.uniforms),
            );
        }

        let output = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for (slot, draw) in queued.iter().enumerate() {
                let (pipeline, mesh) = match draw.mesh {
                    MeshHandle::Ocean => (&self.ocean_pipeline, &self.ocean_mesh),
                    MeshHandle::Hull => (&self.hull_pipeline, &self.hull_mesh),
                };
                let offset = (slot as u64 * self.uniform_stride) as wgpu::DynamicOffset;

                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, &self.bind_group, &[offset]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl Renderer for GpuRenderer {
    fn aspect_ratio(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    fn draw_mesh(&mut self, mesh: MeshHandle, transforms: &Transforms, uniforms: &UniformSet<'_>) {
        if self.queued.len() >= MAX_DRAWS {
            log::warn!("Draw queue full ({} draws), dropping {:?}", MAX_DRAWS, mesh);
            return;
        }
        if let Some(field) = uniforms.waves {
            self.pending_waves = Some(wave_table(field));
        }
        self.queued.push(QueuedDraw {
            mesh,
            uniforms: DrawUniforms::new(transforms, uniforms),
        });
    }
}

fn create_depth_view(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    vertex_entry: &str,
    format: wgpu::TextureFormat,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vertex_entry),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[
                    wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x3,
                    },
                    wgpu::VertexAttribute {
                        offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                        shader_location: 1,
                        format: wgpu::VertexFormat::Float32x3,
                    },
                ],
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Capsized hulls and the ocean underside are both visible
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocean::{random_directions, WaveField};
    use crate::params::WaveSpectrum;
    use crate::rendering::DirectionalLight;
    use glam::{Mat4, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_uniform_layout_matches_shader() {
        assert_eq!(std::mem::size_of::<DrawUniforms>(), 240);
        assert_eq!(std::mem::size_of::<WaveTermGpu>(), 32);
    }

    #[test]
    fn test_wave_table_is_padded_and_ordered() {
        let spectrum = WaveSpectrum {
            term_count: 5,
            ..WaveSpectrum::default()
        };
        let directions = random_directions(&mut StdRng::seed_from_u64(4), 3);
        let field = WaveField::from_spectrum(&spectrum, &directions);

        let table = wave_table(&field);
        assert_eq!(table.len(), MAX_WAVE_TERMS);
        assert_eq!(table[0].shape[2], 2.0);
        assert_eq!(table[4].shape[3], field.terms()[4].wavelength);
        assert_eq!(table[4].motion[1], field.terms()[4].amplitude_scale);
        assert_eq!(table[5].shape, [0.0; 4]);
    }

    #[test]
    fn test_draw_uniforms_pack_shininess_and_wave_params() {
        let field = WaveField::from_terms(Vec::new(), 0.95, -0.5);
        let uniforms = UniformSet {
            light: DirectionalLight::from(&LightingParams::default()),
            camera_position: Vec3::new(1.0, 2.0, 3.0),
            base_color: Vec3::new(0.1, 0.2, 0.3),
            shininess: 16.0,
            time: 4.5,
            waves: Some(&field),
        };
        let transforms = Transforms {
            model: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        };

        let packed = DrawUniforms::new(&transforms, &uniforms);
        assert_eq!(packed.base_color, [0.1, 0.2, 0.3, 16.0]);
        assert_eq!(packed.camera_pos, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(packed.wave_params, [4.5, 0.0, 0.95, -0.5]);
    }
}
