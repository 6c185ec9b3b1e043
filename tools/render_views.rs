//! Render views of a single object by orbiting a camera around it.
//!
//! Produces color, depth, normal and albedo images per view plus one line
//! of camera metadata, laid out for ShapeNet-style dataset loaders:
//!
//! ```text
//! render_views /data/ShapeNetCore.v2/02691156/<model>/models/model_normalized.obj \
//!     --views 24 --output-folder /data/renders
//! ```

use anyhow::{bail, Context};
use clap::{ArgAction, Parser, ValueEnum};
use shapeview_core::{
    remove_doubles, scale, split_sharp_edges, DepthRemap, OrbitRig, RenderingDir,
    DEFAULT_SPLIT_ANGLE, DEFAULT_WELD_EPSILON,
};
use shapeview_io::{read_mesh, ColorDepth, ImageFormat, ViewWriter};
use shapeview_render::{GpuContext, GpuMesh, ViewRenderer};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[value(name = "PNG")]
    Png,
    #[value(name = "OPEN_EXR")]
    OpenExr,
}

#[derive(Parser, Debug)]
#[command(about = "Renders the given mesh by rotating a camera around it")]
struct Args {
    /// Path to the mesh file to be rendered
    mesh: PathBuf,

    /// Number of views to be rendered
    #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(u32).range(1..))]
    views: u32,

    /// The path the output will be dumped to
    #[arg(long, default_value = "/tmp")]
    output_folder: PathBuf,

    /// Scaling factor applied to the model; depends on the size of the mesh
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// Weld duplicate vertices to improve mesh quality
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    remove_doubles: bool,

    /// Split sharp edges so they shade hard
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    edge_split: bool,

    /// Scaling applied to depth before integer encoding; ignored if the
    /// format is OPEN_EXR
    #[arg(long, default_value_t = 1.4)]
    depth_scale: f32,

    /// Number of bits per channel, either 8 or 16
    #[arg(long, default_value_t = 8)]
    color_depth: u8,

    /// Format of the generated files
    #[arg(long, value_enum, default_value_t = OutputFormat::Png)]
    format: OutputFormat,

    /// Rendering resolution of each image
    #[arg(long, default_value_t = 256)]
    resolution: u32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let color_depth = match args.color_depth {
        8 => ColorDepth::Eight,
        16 => ColorDepth::Sixteen,
        other => bail!("--color-depth must be 8 or 16, got {}", other),
    };
    let format = match args.format {
        OutputFormat::Png => ImageFormat::Png,
        OutputFormat::OpenExr => ImageFormat::OpenExr,
    };

    let mut mesh = read_mesh(&args.mesh)
        .with_context(|| format!("failed to read mesh {:?}", args.mesh))?;
    log::info!(
        "loaded {:?}: {} vertices, {} faces",
        args.mesh,
        mesh.vertex_count(),
        mesh.face_count()
    );

    scale(&mut mesh, args.scale);
    if args.remove_doubles {
        remove_doubles(&mut mesh, DEFAULT_WELD_EPSILON);
    }
    if args.edge_split {
        split_sharp_edges(&mut mesh, DEFAULT_SPLIT_ANGLE);
    }

    let dir = RenderingDir::for_mesh(&args.output_folder, &args.mesh)?;
    log::info!("writing views to {:?}", dir.path());
    let mut writer = ViewWriter::create(
        dir,
        format,
        color_depth,
        DepthRemap::with_scale(args.depth_scale),
    )?;

    let gpu = pollster::block_on(GpuContext::new())?;
    let renderer = ViewRenderer::new(gpu, args.resolution)?;
    let gpu_mesh = GpuMesh::upload(renderer.gpu(), &mesh);

    pollster::block_on(renderer.render_orbit(
        &gpu_mesh,
        &OrbitRig::default(),
        args.views,
        |i, pose, rendered| {
            writer.write_view(
                i,
                pose,
                &rendered.color,
                &rendered.normal,
                &rendered.albedo,
                &rendered.depth,
                rendered.width,
                rendered.height,
            )
        },
    ))?;

    log::info!("rendered {} views", args.views);
    Ok(())
}
