//! Mesh upload for G-buffer rendering

use crate::GpuContext;
use bytemuck::{Pod, Zeroable};
use shapeview_core::TriangleMesh;

/// Vertex data for G-buffer rendering
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    /// Vertex buffer layout descriptor
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Normal
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// A mesh uploaded to GPU buffers
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    /// Upload a triangle mesh. Meshes without stored normals get smooth
    /// per-vertex normals computed on the fly.
    pub fn upload(gpu: &GpuContext, mesh: &TriangleMesh) -> Self {
        let normals = match &mesh.normals {
            Some(normals) => normals.clone(),
            None => mesh.smooth_vertex_normals(),
        };

        let vertices: Vec<MeshVertex> = mesh
            .vertices
            .iter()
            .zip(&normals)
            .map(|(v, n)| MeshVertex {
                position: [v.x, v.y, v.z],
                normal: [n.x, n.y, n.z],
            })
            .collect();

        let indices: Vec<u32> = mesh
            .faces
            .iter()
            .flat_map(|f| [f[0] as u32, f[1] as u32, f[2] as u32])
            .collect();

        let vertex_buffer =
            gpu.create_buffer_init("Mesh Vertex Buffer", &vertices, wgpu::BufferUsages::VERTEX);
        let index_buffer =
            gpu.create_buffer_init("Mesh Index Buffer", &indices, wgpu::BufferUsages::INDEX);

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }
}
