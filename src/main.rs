//! Surrounded: top-down tile-world client.
//!
//! Usage:
//!   surrounded [OPTIONS_NAME] [--debug] [--map NAME]
//!   surrounded [OPTIONS_NAME] --snapshot out.png [--ticks N]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use surrounded::actor::ActorConfig;
use surrounded::engine::ClientBuilder;
use surrounded::error::read_rgba;
use surrounded::lighting::ShapeLibrary;
use surrounded::options::{DEFAULT_OPTIONS_NAME, Options};
use surrounded::renderer::text::LabelFont;
use surrounded::sim::Simulation;
use surrounded::snapshot;
use surrounded::world::Region;

const FILES_DIR: &str = "files";
const ICON_FILE: &str = "icon.png";

#[derive(Parser)]
#[command(name = "surrounded")]
#[command(about = "Top-down tile-world client with dynamic darkness")]
struct Cli {
    /// Options file name, without `.json`
    #[arg(default_value = DEFAULT_OPTIONS_NAME)]
    options: String,

    /// Enable debug toggles (F3 darkness overlay)
    #[arg(long)]
    debug: bool,

    /// Region directory under files/maps
    #[arg(long, default_value = "start")]
    map: String,

    /// Render one frame headlessly to this PNG and exit
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Fixed updates to run before the snapshot
    #[arg(long, default_value_t = 1)]
    ticks: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    info!("Surrounded v{}", env!("CARGO_PKG_VERSION"));

    let cwd = std::env::current_dir().context("no working directory")?;
    let files = cwd.join(FILES_DIR);

    let options = Options::load(&cwd, &cli.options).context("loading options")?;
    let region = Region::load(&files.join("maps"), &cli.map).with_context(|| format!("loading region '{}'", cli.map))?;
    let sheet_path = files.join("textures").join("player.png");
    let actor_sheet = read_rgba(&sheet_path).context("loading actor sprite sheet")?;
    let shapes = ShapeLibrary::load_dir(&files.join("textures").join("light"));

    let config = ActorConfig::from_sheet(actor_sheet.width(), actor_sheet.height());
    let mut simulation = Simulation::new(region, &config);

    let label_font = LabelFont::load(&files.join("fonts")).context("loading label font")?;

    if let Some(out) = cli.snapshot {
        return run_snapshot(&mut simulation, &actor_sheet, &shapes, label_font.as_ref(), &options, cli.ticks, &out);
    }

    let icon_path = cwd.join(ICON_FILE);
    let icon = if icon_path.is_file() {
        Some(read_rgba(&icon_path).context("loading window icon")?)
    } else {
        None
    };

    ClientBuilder::new(simulation, options, actor_sheet)
        .with_shapes(shapes)
        .with_label_font(label_font)
        .with_icon(icon)
        .with_sounds_dir(files.join("sounds"))
        .with_debug(cli.debug)
        .run()
        .context("client loop")
}

fn run_snapshot(
    sim: &mut Simulation,
    actor_sheet: &image::RgbaImage,
    shapes: &ShapeLibrary,
    label_font: Option<&LabelFont>,
    options: &Options,
    ticks: u64,
    out: &Path,
) -> Result<()> {
    snapshot::advance(sim, ticks, options.fixed_timestep());
    snapshot::write_snapshot(sim, actor_sheet, shapes, label_font, (options.width, options.height), out)
        .with_context(|| format!("writing snapshot to {}", out.display()))
}
