//! Derive silhouette masks for previously rendered views.
//!
//! Walks a dataset tree for two-digit view images and writes the alpha
//! channel of each as `NN_mask.png` next to the source:
//!
//! ```text
//! create_masks --dir /data/renders
//! ```

use clap::Parser;
use shapeview_io::create_masks;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Create silhouette masks from rendered view images")]
struct Args {
    /// Root directory of the rendered dataset
    #[arg(long)]
    dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let count = create_masks(&args.dir)?;
    log::info!("wrote {} masks under {:?}", count, args.dir);
    Ok(())
}
