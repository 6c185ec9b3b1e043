//! # shapeview-render
//!
//! Offscreen GPU rendering for multi-view dataset generation using WGPU.
//!
//! One render pass writes four targets per view: lit color, camera-space
//! normals, unlit albedo and linear view-space depth. Targets are read back
//! to the CPU so callers can encode and post-process them without any window
//! or swapchain.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use shapeview_core::{OrbitRig, TriangleMesh};
//! use shapeview_render::{GpuContext, GpuMesh, ViewRenderer};
//!
//! async fn example(mesh: &TriangleMesh) -> shapeview_core::Result<()> {
//!     let gpu = GpuContext::new().await?;
//!     let renderer = ViewRenderer::new(gpu, 256)?;
//!     let gpu_mesh = GpuMesh::upload(renderer.gpu(), mesh);
//!     let rig = OrbitRig::default();
//!     let view = renderer.render(&gpu_mesh, &rig.camera_at(0.0)).await?;
//!     assert_eq!(view.color.len(), 256 * 256 * 4);
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod mesh;
pub mod gbuffer;
pub mod renderer;

pub use device::GpuContext;
pub use gbuffer::GBuffer;
pub use mesh::{GpuMesh, MeshVertex};
pub use renderer::{RenderedView, ViewRenderer};
