//! Per-view output writing
//!
//! Connects rendered pass buffers to the on-disk dataset layout: four image
//! files per view plus one camera metadata line, written in view order.

use crate::{images, ColorDepth, ImageFormat, MetadataWriter};
use shapeview_core::{DepthRemap, PassKind, RenderingDir, Result, ViewPose};
use std::fs;

/// Writes the full file set for each rendered view
pub struct ViewWriter {
    dir: RenderingDir,
    format: ImageFormat,
    color_depth: ColorDepth,
    remap: DepthRemap,
    metadata: MetadataWriter,
}

impl ViewWriter {
    /// Create the rendering directory and the metadata file
    pub fn create(
        dir: RenderingDir,
        format: ImageFormat,
        color_depth: ColorDepth,
        remap: DepthRemap,
    ) -> Result<Self> {
        fs::create_dir_all(dir.path())?;
        let metadata = MetadataWriter::create(&dir)?;
        Ok(Self {
            dir,
            format,
            color_depth,
            remap,
            metadata,
        })
    }

    /// Write all four pass images and the metadata line for one view.
    ///
    /// Depth is remapped for integer formats; HDR output stores raw linear
    /// depth.
    #[allow(clippy::too_many_arguments)]
    pub fn write_view(
        &mut self,
        index: u32,
        pose: &ViewPose,
        color: &[u8],
        normal: &[u8],
        albedo: &[u8],
        depth: &[f32],
        width: u32,
        height: u32,
    ) -> Result<()> {
        let ext = self.format.extension();

        let path = |pass| self.dir.pass_path(index, pass, ext);
        images::write_color(
            &path(PassKind::Color),
            color,
            width,
            height,
            self.format,
            self.color_depth,
        )?;
        images::write_color(
            &path(PassKind::Normal),
            normal,
            width,
            height,
            self.format,
            self.color_depth,
        )?;
        images::write_color(
            &path(PassKind::Albedo),
            albedo,
            width,
            height,
            self.format,
            self.color_depth,
        )?;

        let depth_values: Vec<f32> = match self.format {
            ImageFormat::Png => depth.iter().map(|&d| self.remap.apply(d)).collect(),
            ImageFormat::OpenExr => depth.to_vec(),
        };
        images::write_gray(
            &path(PassKind::Depth),
            &depth_values,
            width,
            height,
            self.format,
            self.color_depth,
        )?;

        self.metadata.append(pose)
    }
}
