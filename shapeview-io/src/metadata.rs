//! Camera metadata file writing

use shapeview_core::{RenderingDir, Result, ViewPose};
use std::fs::File;
use std::io::{BufWriter, Write};

/// Appends one metadata line per rendered view to
/// `rendering_metadata.txt`, in render order. Line `i` describes view `i`.
pub struct MetadataWriter {
    writer: BufWriter<File>,
}

impl MetadataWriter {
    /// Create (or truncate) the metadata file for the given rendering dir
    pub fn create(dir: &RenderingDir) -> Result<Self> {
        let file = File::create(dir.metadata_path())?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Append one view record, flushed immediately so a crashed run leaves
    /// lines for every view already rendered
    pub fn append(&mut self, pose: &ViewPose) -> Result<()> {
        writeln!(self.writer, "{}", pose.metadata_line())?;
        self.writer.flush()?;
        Ok(())
    }
}
