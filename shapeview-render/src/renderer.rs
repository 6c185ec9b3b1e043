//! Per-view G-buffer rendering

use crate::{gbuffer, GBuffer, GpuContext, GpuMesh, MeshVertex};
use bytemuck::{Pod, Zeroable};
use shapeview_core::{orbit_poses, Camera, OrbitRig, Result, ViewPose};

/// Direction towards the key sun; the fill sun points the opposite way
const KEY_LIGHT_DIR: [f32; 3] = [0.35, 0.25, 0.9];
const KEY_LIGHT_ENERGY: f32 = 1.0;
const FILL_LIGHT_ENERGY: f32 = 0.015;

/// Uniform base color of the rendered object
const DEFAULT_ALBEDO: [f32; 3] = [0.8, 0.8, 0.8];

/// Scene uniform data for G-buffer rendering
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct SceneUniform {
    view: [[f32; 4]; 4],
    view_proj: [[f32; 4]; 4],
    key_light: [f32; 4],
    fill_light: [f32; 4],
    albedo: [f32; 4],
}

/// All passes of one rendered view, read back to the CPU
pub struct RenderedView {
    pub width: u32,
    pub height: u32,
    /// Lit color, RGBA bytes; alpha is object coverage
    pub color: Vec<u8>,
    /// Camera-space normals remapped to `0.5*n + 0.5`, RGBA bytes
    pub normal: Vec<u8>,
    /// Unlit base color, RGBA bytes
    pub albedo: Vec<u8>,
    /// Linear view-space depth, one f32 per pixel; background pixels carry
    /// [`gbuffer::BACKGROUND_DEPTH`]
    pub depth: Vec<f32>,
}

/// Offscreen renderer producing one [`RenderedView`] per camera pose
pub struct ViewRenderer {
    gpu: GpuContext,
    gbuffer: GBuffer,
    pipeline: wgpu::RenderPipeline,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    resolution: u32,
}

impl ViewRenderer {
    /// Build the pipeline and render targets for square images of the
    /// given resolution
    pub fn new(gpu: GpuContext, resolution: u32) -> Result<Self> {
        let gbuffer = GBuffer::new(&gpu, resolution);

        let scene_uniform = SceneUniform {
            view: nalgebra::Matrix4::identity().into(),
            view_proj: nalgebra::Matrix4::identity().into(),
            key_light: light(KEY_LIGHT_DIR, KEY_LIGHT_ENERGY),
            fill_light: light(
                [-KEY_LIGHT_DIR[0], -KEY_LIGHT_DIR[1], -KEY_LIGHT_DIR[2]],
                FILL_LIGHT_ENERGY,
            ),
            albedo: [DEFAULT_ALBEDO[0], DEFAULT_ALBEDO[1], DEFAULT_ALBEDO[2], 1.0],
        };

        let scene_buffer = gpu.create_buffer_init(
            "Scene Uniform Buffer",
            &[scene_uniform],
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );

        let scene_bind_group_layout =
            gpu.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    }],
                    label: Some("scene_bind_group_layout"),
                });

        let scene_bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &scene_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
            label: Some("scene_bind_group"),
        });

        let shader = gpu
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("GBuffer Shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shaders/gbuffer.wgsl").into()),
            });

        let pipeline_layout = gpu
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("GBuffer Pipeline Layout"),
                bind_group_layouts: &[&scene_bind_group_layout],
                push_constant_ranges: &[],
            });

        let color_target = |format| {
            Some(wgpu::ColorTargetState {
                format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })
        };

        let pipeline = gpu
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("GBuffer Render Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: "vs_main",
                    buffers: &[MeshVertex::desc()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: "fs_main",
                    targets: &[
                        color_target(gbuffer::COLOR_FORMAT),
                        color_target(gbuffer::COLOR_FORMAT),
                        color_target(gbuffer::COLOR_FORMAT),
                        color_target(gbuffer::DEPTH_VALUE_FORMAT),
                    ],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    // Meshes of unknown winding render double-sided
                    cull_mode: None,
                    unclipped_depth: false,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: gbuffer::DEPTH_STENCIL_FORMAT,
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
            });

        Ok(Self {
            gpu,
            gbuffer,
            pipeline,
            scene_buffer,
            scene_bind_group,
            resolution,
        })
    }

    pub fn gpu(&self) -> &GpuContext {
        &self.gpu
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Render one view of the mesh and read all passes back
    pub async fn render(&self, mesh: &GpuMesh, camera: &Camera) -> Result<RenderedView> {
        let view = camera.view_matrix();
        let proj = camera.projection_matrix(1.0);
        let uniform = SceneUniform {
            view: view.into(),
            view_proj: (proj * view).into(),
            key_light: light(KEY_LIGHT_DIR, KEY_LIGHT_ENERGY),
            fill_light: light(
                [-KEY_LIGHT_DIR[0], -KEY_LIGHT_DIR[1], -KEY_LIGHT_DIR[2]],
                FILL_LIGHT_ENERGY,
            ),
            albedo: [DEFAULT_ALBEDO[0], DEFAULT_ALBEDO[1], DEFAULT_ALBEDO[2], 1.0],
        };
        self.gpu
            .queue
            .write_buffer(&self.scene_buffer, 0, bytemuck::bytes_of(&uniform));

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("GBuffer Render Encoder"),
            });

        {
            let color_attachments = self.gbuffer.color_attachments();
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("GBuffer Render Pass"),
                color_attachments: &color_attachments,
                depth_stencil_attachment: Some(self.gbuffer.depth_stencil_attachment()),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.scene_bind_group, &[]);
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));

        Ok(RenderedView {
            width: self.resolution,
            height: self.resolution,
            color: self.gbuffer.read_color(&self.gpu).await?,
            normal: self.gbuffer.read_normal(&self.gpu).await?,
            albedo: self.gbuffer.read_albedo(&self.gpu).await?,
            depth: self.gbuffer.read_depth(&self.gpu).await?,
        })
    }

    /// Orbit the camera around the mesh in `360 / views` degree steps,
    /// handing each rendered view to the sink in view-index order
    pub async fn render_orbit<F>(
        &self,
        mesh: &GpuMesh,
        rig: &OrbitRig,
        views: u32,
        mut sink: F,
    ) -> Result<()>
    where
        F: FnMut(u32, &ViewPose, RenderedView) -> Result<()>,
    {
        let poses = orbit_poses(views, rig);
        for (i, pose) in poses.iter().enumerate() {
            log::info!(
                "rendering view {}/{}, azimuth {:.1}",
                i + 1,
                views,
                pose.azimuth_deg
            );
            let rendered = self.render(mesh, &rig.camera_at(pose.azimuth_deg)).await?;
            sink(i as u32, pose, rendered)?;
        }
        Ok(())
    }
}

fn light(dir: [f32; 3], energy: f32) -> [f32; 4] {
    [dir[0], dir[1], dir[2], energy]
}
