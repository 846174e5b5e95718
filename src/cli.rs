use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "tessera",
    about = "Stream, light and mesh a voxel world around a walking viewer"
)]
pub struct Cli {
    /// World seed
    #[arg(long, default_value_t = 1337, allow_hyphen_values = true)]
    pub seed: i32,
    /// Streaming radius in chunks
    #[arg(long, default_value_t = 6)]
    pub render_distance: i32,
    /// Generation worker threads (defaults to a share of available cores)
    #[arg(long)]
    pub workers: Option<usize>,
    /// Simulation ticks to run before exiting
    #[arg(long, default_value_t = 600)]
    pub ticks: u32,
    /// Simulation rate; 0 runs ticks back to back
    #[arg(long, default_value_t = 20)]
    pub tick_rate: u32,
    /// Viewer walking speed in blocks per second
    #[arg(long, default_value_t = 4.3)]
    pub speed: f32,
    /// Dig or place a block every N ticks; 0 disables edits
    #[arg(long, default_value_t = 40)]
    pub edit_every: u32,
    /// Assets root containing assets/blocks.toml (also read from TESSERA_ASSETS)
    #[arg(long)]
    pub assets: Option<String>,
    /// Worldgen config path (defaults to assets/worldgen.toml)
    #[arg(long)]
    pub world_config: Option<PathBuf>,
    /// Reload the worldgen config when the file changes
    #[arg(long, default_value_t = false)]
    pub watch_worldgen: bool,
}
