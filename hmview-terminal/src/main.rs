/// HMView Terminal - Heightmap Terrain Viewer
///
/// Shows a placeholder box, then the terrain built from IMAGE once it has
/// been decoded.
/// Controls:
///   - Left drag / Arrow Keys: Rotate
///   - Right drag / WASD: Pan
///   - Wheel / +/-: Zoom
///   - h/H: Lower/raise terrain
///   - f: Wireframe, p: Projection, r: Reset
///   - Q/ESC: Quit
use anyhow::Context;
use clap::Parser;
use hmview_core::{Mesh, ProjectionMode};
use hmview_terminal::{logging, TerminalApp, ViewerOptions};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "hmview-terminal",
    version,
    about = "Render a grayscale heightmap as 3D terrain in the terminal"
)]
struct Args {
    /// Heightmap image (PNG, JPEG, GIF or BMP)
    image: Option<PathBuf>,

    /// Start in wireframe mode
    #[arg(long)]
    wireframe: bool,

    /// Start with an orthographic projection
    #[arg(long)]
    orthographic: bool,

    /// Initial height exaggeration (0 to 2)
    #[arg(long, default_value_t = 1.0)]
    height_scale: f32,

    /// Target frames per second
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: u32,

    /// Where log records are written
    #[arg(long, default_value = "hmview.log")]
    log_file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_logging(&args.log_file)?;

    let options = ViewerOptions {
        wireframe: args.wireframe,
        projection: if args.orthographic {
            ProjectionMode::Orthographic
        } else {
            ProjectionMode::Perspective
        },
        height_scale: args.height_scale.clamp(0.0, 2.0),
        fps: args.fps,
    };
    tracing::debug!("viewer options: {:?}", options);

    let mut app = TerminalApp::new(Mesh::unit_box(), &options)
        .context("failed to query the terminal size")?;

    if let Some(path) = args.image {
        app.load_in_background(path)
            .context("failed to start the heightmap loader")?;
    }

    app.run().context("terminal renderer failed")?;

    tracing::info!("viewer closed");
    Ok(())
}
