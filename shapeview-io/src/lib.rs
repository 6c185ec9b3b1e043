//! I/O operations for shapeview
//!
//! This crate covers everything that touches the filesystem: reading source
//! meshes, encoding rendered pass images, writing per-view camera metadata
//! and deriving silhouette masks from rendered views.

pub mod obj;
pub mod images;
pub mod metadata;
pub mod mask;
pub mod output;

pub use images::{ColorDepth, ImageFormat};
pub use mask::{create_masks, extract_mask, find_view_images, mask_path_for};
pub use metadata::MetadataWriter;
pub use obj::ObjReader;
pub use output::ViewWriter;

use shapeview_core::{Error, Result, TriangleMesh};

/// Trait for reading meshes from files
pub trait MeshReader {
    fn read_mesh<P: AsRef<std::path::Path>>(path: P) -> Result<TriangleMesh>;
}

/// Auto-detect format and read mesh
pub fn read_mesh<P: AsRef<std::path::Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some("obj") => obj::ObjReader::read_mesh(path),
        _ => Err(Error::UnsupportedFormat(format!(
            "Unsupported mesh format: {:?}",
            path.extension()
        ))),
    }
}
