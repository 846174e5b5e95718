mod assets;
mod cli;
mod sim;
mod viewer;
mod watchers;

use std::error::Error;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tessera_blocks::BlockRegistry;
use tessera_runtime::ChunkManagerConfig;
use tessera_worldgen::WorldGenConfig;

use cli::Cli;
use sim::Sim;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let root = assets::resolve_assets_root(cli.assets.clone());
    log::info!("assets root: {}", root.display());

    let reg = BlockRegistry::load_from_paths(assets::textures_path(&root), assets::blocks_path(&root))
        .map_err(|e| format!("loading block registry: {e}"))?;
    log::info!("loaded {} block types", reg.blocks.len());
    let reg = Arc::new(reg);

    let world_config_path = cli.world_config.clone().unwrap_or_else(|| assets::worldgen_path(&root));
    let worldgen = if world_config_path.exists() {
        WorldGenConfig::load_from_path(&world_config_path)
            .map_err(|e| format!("loading {}: {e}", world_config_path.display()))?
    } else {
        log::warn!("{} not found; using default terrain", world_config_path.display());
        WorldGenConfig::default()
    };

    let mut sim = Sim::new(
        reg,
        Arc::new(worldgen),
        ChunkManagerConfig {
            seed: cli.seed,
            render_distance: cli.render_distance,
            workers: cli.workers,
        },
        cli.speed,
        cli.edit_every,
        world_config_path.clone(),
    )?;

    // Keep the watcher alive for the whole run.
    let _watcher = if cli.watch_worldgen {
        match watchers::watch_file(&world_config_path) {
            Ok((w, rx)) => {
                sim.set_worldgen_events(rx);
                Some(w)
            }
            Err(e) => {
                log::warn!("cannot watch {}: {}", world_config_path.display(), e);
                None
            }
        }
    } else {
        None
    };

    let dt = if cli.tick_rate == 0 { 0.05 } else { 1.0 / cli.tick_rate as f32 };
    let started = Instant::now();
    for _ in 0..cli.ticks {
        let tick_start = Instant::now();
        let stats = sim.step(dt);
        if stats.arrived > 0 || stats.edits > 0 || sim.tick() % 100 == 0 {
            log::info!(
                "tick {:>5} pos ({:.1},{:.1},{:.1}) chunks {} pending {} (waiting {}) meshes {} faces {} | +{} arrived, {} queued, {} remeshed in {:.2}ms",
                sim.tick(),
                sim.viewer.position.x,
                sim.viewer.position.y,
                sim.viewer.position.z,
                sim.world.chunk_count(),
                sim.manager.pending(),
                sim.manager.queued(),
                sim.meshes.len(),
                sim.total_faces(),
                stats.arrived,
                stats.queued,
                stats.meshed,
                stats.mesh_ms
            );
        }
        sim::pace(tick_start, cli.tick_rate);
    }
    log::info!(
        "ran {} ticks in {:.2}s: {} chunks loaded within radius {}, {} meshed",
        cli.ticks,
        started.elapsed().as_secs_f32(),
        sim.world.chunk_count(),
        sim.manager.render_distance(),
        sim.meshes.len()
    );
    sim.manager.shutdown();
    Ok(())
}
