//! On-disk dataset layout convention
//!
//! Rendered output is organized the way ShapeNet-style dataset loaders
//! expect it:
//!
//! ```text
//! <root>/<class_id>/<model_id>/rendering/00.png
//!                                       /00_depth.png
//!                                       /00_normal.png
//!                                       /00_albedo.png
//!                                       /rendering_metadata.txt
//! ```
//!
//! where the source mesh lives at
//! `<dataset>/<class_id>/<model_id>/models/<mesh file>`.

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Name of the per-object camera metadata file
pub const METADATA_FILENAME: &str = "rendering_metadata.txt";

/// Name of the per-object subdirectory holding rendered views
pub const RENDERING_DIRNAME: &str = "rendering";

/// The image outputs produced for each view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassKind {
    Color,
    Depth,
    Normal,
    Albedo,
}

impl PassKind {
    /// All passes, in the order they are written per view
    pub const ALL: [PassKind; 4] = [
        PassKind::Color,
        PassKind::Depth,
        PassKind::Normal,
        PassKind::Albedo,
    ];

    /// Filename suffix appended to the view stem
    pub fn suffix(&self) -> &'static str {
        match self {
            PassKind::Color => "",
            PassKind::Depth => "_depth",
            PassKind::Normal => "_normal",
            PassKind::Albedo => "_albedo",
        }
    }
}

/// Two-digit zero-padded stem for the given view index
pub fn view_stem(index: u32) -> String {
    format!("{:02}", index)
}

/// Filename for one pass of one view, e.g. `01_depth.png`
pub fn pass_filename(index: u32, pass: PassKind, extension: &str) -> String {
    format!("{}{}.{}", view_stem(index), pass.suffix(), extension)
}

/// The rendering output directory for one object
#[derive(Debug, Clone)]
pub struct RenderingDir {
    path: PathBuf,
}

impl RenderingDir {
    /// Build `<root>/<class_id>/<model_id>/rendering` from the mesh path,
    /// deriving class and model ids from the ShapeNet directory layout
    /// (`<class_id>/<model_id>/models/<mesh>`).
    pub fn for_mesh(output_root: &Path, mesh_path: &Path) -> Result<Self> {
        let ancestor_name = |depth: usize| -> Result<&str> {
            mesh_path
                .ancestors()
                .nth(depth)
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
                .ok_or_else(|| {
                    Error::InvalidData(format!(
                        "cannot derive class/model id from mesh path {:?}",
                        mesh_path
                    ))
                })
        };

        let model_id = ancestor_name(2)?.to_owned();
        let class_id = ancestor_name(3)?.to_owned();

        Ok(Self {
            path: output_root
                .join(class_id)
                .join(model_id)
                .join(RENDERING_DIRNAME),
        })
    }

    /// Use an explicit directory, bypassing class/model id derivation
    pub fn from_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of one pass image for one view
    pub fn pass_path(&self, index: u32, pass: PassKind, extension: &str) -> PathBuf {
        self.path.join(pass_filename(index, pass, extension))
    }

    /// Path of the camera metadata file
    pub fn metadata_path(&self) -> PathBuf {
        self.path.join(METADATA_FILENAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_stem_zero_padded() {
        assert_eq!(view_stem(0), "00");
        assert_eq!(view_stem(9), "09");
        assert_eq!(view_stem(23), "23");
    }

    #[test]
    fn test_pass_filenames() {
        assert_eq!(pass_filename(0, PassKind::Color, "png"), "00.png");
        assert_eq!(pass_filename(7, PassKind::Depth, "png"), "07_depth.png");
        assert_eq!(pass_filename(7, PassKind::Normal, "png"), "07_normal.png");
        assert_eq!(pass_filename(12, PassKind::Albedo, "exr"), "12_albedo.exr");
    }

    #[test]
    fn test_rendering_dir_from_shapenet_path() {
        let mesh = Path::new("/data/ShapeNetCore.v2/02691156/fff513f407e00e85/models/model_normalized.obj");
        let dir = RenderingDir::for_mesh(Path::new("/out"), mesh).unwrap();
        assert_eq!(
            dir.path(),
            Path::new("/out/02691156/fff513f407e00e85/rendering")
        );
        assert_eq!(
            dir.pass_path(3, PassKind::Albedo, "png"),
            Path::new("/out/02691156/fff513f407e00e85/rendering/03_albedo.png")
        );
        assert_eq!(
            dir.metadata_path(),
            Path::new("/out/02691156/fff513f407e00e85/rendering/rendering_metadata.txt")
        );
    }

    #[test]
    fn test_rendering_dir_shallow_path_errors() {
        let result = RenderingDir::for_mesh(Path::new("/out"), Path::new("model.obj"));
        assert!(result.is_err());
    }
}
