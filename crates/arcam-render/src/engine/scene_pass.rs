//! Scene rendering: boxes lit by directional lights.

use std::num::NonZeroU64;

use arcam_core::{BoxMesh, DirectionalLight, Scene, SceneRenderer};
use glam::Mat4;
use wgpu::util::DeviceExt;

use super::{RenderEngine, DEPTH_FORMAT};
use crate::error::{RenderError, RenderResult};

/// Maximum number of directional lights the scene shader evaluates.
pub const MAX_LIGHTS: usize = 4;

/// Per-mesh uniforms for the scene shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
#[allow(clippy::pub_underscore_fields)]
pub struct MeshUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub lights: [[f32; 4]; MAX_LIGHTS],
    pub light_count: u32,
    pub _padding: [u32; 3],
}

impl MeshUniforms {
    fn new(view_proj: Mat4, mesh: &BoxMesh, lights: &[DirectionalLight]) -> Self {
        let mut packed = [[0.0; 4]; MAX_LIGHTS];
        for (slot, light) in packed.iter_mut().zip(lights) {
            *slot = light.direction.extend(light.intensity).to_array();
        }
        if lights.len() > MAX_LIGHTS {
            log::warn!(
                "Scene has {} lights, only the first {MAX_LIGHTS} are used",
                lights.len()
            );
        }
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: mesh.model_matrix().to_cols_array_2d(),
            color: mesh.color.to_array(),
            lights: packed,
            light_count: u32::try_from(lights.len().min(MAX_LIGHTS)).unwrap_or(0),
            _padding: [0; 3],
        }
    }
}

/// A vertex of the unit cube: position and face normal.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct CubeVertex {
    position: [f32; 3],
    normal: [f32; 3],
}

/// Builds the 36 vertices of a unit cube centered at the origin.
pub(crate) fn unit_cube_vertices() -> Vec<CubeVertex> {
    // (normal, tangent u, tangent v) per face, with u x v == normal for CCW winding
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];

    let mut vertices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let n = glam::Vec3::from(normal) * 0.5;
        let u = glam::Vec3::from(u) * 0.5;
        let v = glam::Vec3::from(v) * 0.5;
        let corners = [n - u - v, n + u - v, n + u + v, n - u + v];
        for index in [0, 1, 2, 0, 2, 3] {
            vertices.push(CubeVertex {
                position: corners[index].to_array(),
                normal,
            });
        }
    }
    vertices
}

/// Pipeline and shared geometry for the scene pass.
pub(crate) struct ScenePipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    cube_vertex_buffer: wgpu::Buffer,
    cube_vertex_count: u32,
}

/// Uniform buffer and bind group for one mesh.
pub(crate) struct MeshBinding {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl RenderEngine {
    /// Initializes the scene render pipeline.
    fn init_scene_pipeline(&mut self) {
        let shader_source = include_str!("../shaders/scene.wgsl");
        let shader = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("scene shader"),
                source: wgpu::ShaderSource::Wgsl(shader_source.into()),
            });

        let bind_group_layout =
            self.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("scene bind group layout"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: NonZeroU64::new(
                                std::mem::size_of::<MeshUniforms>() as u64,
                            ),
                        },
                        count: None,
                    }],
                });

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("scene pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("scene pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<CubeVertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
                    }],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.surface_config.format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Back),
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
            });

        let vertices = unit_cube_vertices();
        let cube_vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("unit cube vertices"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        self.scene_pipeline = Some(ScenePipeline {
            pipeline,
            bind_group_layout,
            cube_vertex_buffer,
            cube_vertex_count: u32::try_from(vertices.len()).unwrap_or(0),
        });
    }

    /// Grows the per-mesh bindings to cover `count` meshes.
    fn ensure_mesh_bindings(&mut self, count: usize) {
        let Some(scene_pipeline) = &self.scene_pipeline else {
            return;
        };
        while self.mesh_bindings.len() < count {
            let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("mesh uniforms"),
                size: std::mem::size_of::<MeshUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("mesh bind group"),
                layout: &scene_pipeline.bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            self.mesh_bindings.push(MeshBinding { buffer, bind_group });
        }
    }

    /// Renders one frame of `scene` to the surface or offscreen target.
    #[allow(clippy::cast_precision_loss)]
    pub fn render_scene(&mut self, scene: &Scene) -> RenderResult<()> {
        if self.scene_pipeline.is_none() {
            self.init_scene_pipeline();
        }
        self.ensure_mesh_bindings(scene.meshes().len());

        // Without a camera the frame is cleared only.
        let view_proj = scene.camera().map(|camera| {
            let aspect = self.width as f32 / self.height as f32;
            camera.projection_matrix(aspect) * camera.view_matrix()
        });

        if let Some(view_proj) = view_proj {
            for (mesh, binding) in scene.meshes().iter().zip(&self.mesh_bindings) {
                let uniforms = MeshUniforms::new(view_proj, mesh, scene.lights());
                self.queue
                    .write_buffer(&binding.buffer, 0, bytemuck::cast_slice(&[uniforms]));
            }
        }

        let surface_texture = match &self.surface {
            Some(surface) => match surface.get_current_texture() {
                Ok(output) => Some(output),
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    self.resize(self.width, self.height);
                    return Ok(());
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory");
                    return Err(RenderError::OutOfMemory);
                }
                Err(wgpu::SurfaceError::Timeout) => {
                    log::warn!("Surface timeout");
                    return Ok(());
                }
                Err(wgpu::SurfaceError::Other) => {
                    log::warn!("Surface error: other");
                    return Ok(());
                }
            },
            None => None,
        };

        let target_view = match (&surface_texture, &self.offscreen_texture) {
            (Some(output), _) => output
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default()),
            (None, Some(texture)) => texture.create_view(&wgpu::TextureViewDescriptor::default()),
            (None, None) => return Err(RenderError::NoRenderTarget),
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene encoder"),
            });

        {
            let clear = scene.clear_color.as_dvec4();
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear.x,
                            g: clear.y,
                            b: clear.z,
                            a: clear.w,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            if let (Some(scene_pipeline), Some(_)) = (&self.scene_pipeline, view_proj) {
                render_pass.set_pipeline(&scene_pipeline.pipeline);
                render_pass.set_vertex_buffer(0, scene_pipeline.cube_vertex_buffer.slice(..));
                for binding in self.mesh_bindings.iter().take(scene.meshes().len()) {
                    render_pass.set_bind_group(0, &binding.bind_group, &[]);
                    render_pass.draw(0..scene_pipeline.cube_vertex_count, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        if let Some(output) = surface_texture {
            output.present();
        }
        self.frame_count += 1;
        Ok(())
    }
}

impl SceneRenderer for RenderEngine {
    fn render(&mut self, scene: &Scene) -> arcam_core::Result<()> {
        Ok(self.render_scene(scene)?)
    }

    fn resize(&mut self, width: u32, height: u32) {
        RenderEngine::resize(self, width, height);
    }

    fn surface_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
