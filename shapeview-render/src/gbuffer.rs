//! Offscreen render targets and CPU readback
//!
//! The G-buffer replaces a compositor graph: one pass writes lit color,
//! remapped camera-space normals, unlit albedo and linear view-space depth
//! into four color targets, with a conventional depth-stencil attachment
//! for hidden-surface removal.

use crate::GpuContext;
use shapeview_core::Result;

/// Linear depth stored for background pixels; saturates to white once
/// remapped for integer output
pub const BACKGROUND_DEPTH: f64 = 1e10;

pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
pub const DEPTH_VALUE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R32Float;
pub const DEPTH_STENCIL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

struct Target {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

/// The four color targets plus the depth-stencil attachment
pub struct GBuffer {
    pub resolution: u32,
    color: Target,
    normal: Target,
    albedo: Target,
    depth_value: Target,
    depth_stencil: wgpu::TextureView,
}

fn clear_attachment(
    view: &wgpu::TextureView,
    color: wgpu::Color,
) -> Option<wgpu::RenderPassColorAttachment<'_>> {
    Some(wgpu::RenderPassColorAttachment {
        view,
        resolve_target: None,
        ops: wgpu::Operations {
            load: wgpu::LoadOp::Clear(color),
            store: wgpu::StoreOp::Store,
        },
    })
}

fn create_target(
    gpu: &GpuContext,
    label: &str,
    resolution: u32,
    format: wgpu::TextureFormat,
) -> Target {
    let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: resolution,
            height: resolution,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    Target { texture, view }
}

impl GBuffer {
    pub fn new(gpu: &GpuContext, resolution: u32) -> Self {
        let depth_stencil = gpu
            .device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("GBuffer Depth Stencil"),
                size: wgpu::Extent3d {
                    width: resolution,
                    height: resolution,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: DEPTH_STENCIL_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            resolution,
            color: create_target(gpu, "GBuffer Color", resolution, COLOR_FORMAT),
            normal: create_target(gpu, "GBuffer Normal", resolution, COLOR_FORMAT),
            albedo: create_target(gpu, "GBuffer Albedo", resolution, COLOR_FORMAT),
            depth_value: create_target(gpu, "GBuffer Depth Value", resolution, DEPTH_VALUE_FORMAT),
            depth_stencil,
        }
    }

    /// Color attachments for the render pass, in shader output order
    pub fn color_attachments(&self) -> [Option<wgpu::RenderPassColorAttachment<'_>>; 4] {
        [
            // Transparent film: background alpha is zero
            clear_attachment(&self.color.view, wgpu::Color::TRANSPARENT),
            // Zero normal vector after the 0.5*n+0.5 remap
            clear_attachment(
                &self.normal.view,
                wgpu::Color {
                    r: 0.5,
                    g: 0.5,
                    b: 0.5,
                    a: 0.0,
                },
            ),
            clear_attachment(&self.albedo.view, wgpu::Color::TRANSPARENT),
            clear_attachment(
                &self.depth_value.view,
                wgpu::Color {
                    r: BACKGROUND_DEPTH,
                    g: 0.0,
                    b: 0.0,
                    a: 0.0,
                },
            ),
        ]
    }

    pub fn depth_stencil_attachment(&self) -> wgpu::RenderPassDepthStencilAttachment<'_> {
        wgpu::RenderPassDepthStencilAttachment {
            view: &self.depth_stencil,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }
    }

    /// Read back the color pass as tightly packed RGBA bytes
    pub async fn read_color(&self, gpu: &GpuContext) -> Result<Vec<u8>> {
        self.read_target(gpu, &self.color).await
    }

    /// Read back the normal pass as tightly packed RGBA bytes
    pub async fn read_normal(&self, gpu: &GpuContext) -> Result<Vec<u8>> {
        self.read_target(gpu, &self.normal).await
    }

    /// Read back the albedo pass as tightly packed RGBA bytes
    pub async fn read_albedo(&self, gpu: &GpuContext) -> Result<Vec<u8>> {
        self.read_target(gpu, &self.albedo).await
    }

    /// Read back linear view-space depth, one f32 per pixel
    pub async fn read_depth(&self, gpu: &GpuContext) -> Result<Vec<f32>> {
        let bytes = self.read_target(gpu, &self.depth_value).await?;
        Ok(bytemuck::cast_slice(&bytes).to_vec())
    }

    // All four targets use 4 bytes per pixel, so one readback path covers
    // them. Rows are padded to COPY_BYTES_PER_ROW_ALIGNMENT on the GPU side
    // and unpadded here.
    async fn read_target(&self, gpu: &GpuContext, target: &Target) -> Result<Vec<u8>> {
        const BYTES_PER_PIXEL: u32 = 4;

        let unpadded_bytes_per_row = self.resolution * BYTES_PER_PIXEL;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(align) * align;

        let staging = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("GBuffer Readback Buffer"),
            size: (padded_bytes_per_row * self.resolution) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("GBuffer Readback Encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &staging,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(self.resolution),
                },
            },
            wgpu::Extent3d {
                width: self.resolution,
                height: self.resolution,
                depth_or_array_layers: 1,
            },
        );
        gpu.queue.submit(std::iter::once(encoder.finish()));

        let padded = gpu.read_buffer(&staging).await?;

        let mut data = Vec::with_capacity((unpadded_bytes_per_row * self.resolution) as usize);
        for row in 0..self.resolution {
            let start = (row * padded_bytes_per_row) as usize;
            data.extend_from_slice(&padded[start..start + unpadded_bytes_per_row as usize]);
        }
        Ok(data)
    }
}
