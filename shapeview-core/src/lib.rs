//! Core data structures for shapeview
//!
//! This crate provides the fundamental types for multi-view rendering dataset
//! preparation: triangle meshes, the orbiting camera rig, per-view metadata
//! records and the on-disk dataset layout convention.

pub mod mesh;
pub mod cleanup;
pub mod camera;
pub mod views;
pub mod layout;
pub mod depth;
pub mod error;

pub use mesh::*;
pub use cleanup::*;
pub use camera::*;
pub use views::*;
pub use layout::*;
pub use depth::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix4, Point3, Vector3};

/// 3D point with f32 precision
pub type Point3f = Point3<f32>;

/// 3D vector with f32 precision
pub type Vector3f = Vector3<f32>;

/// Common result type for shapeview operations
pub type Result<T> = std::result::Result<T, Error>;
