use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use blockscape::{Camera, GameConfig, LogRenderer, LogSound, MoveInput, Player, WorldFacade, WorldParts};
use blockscape_blocks::BlockCatalog;
use blockscape_chunk::ChunkGrid;
use blockscape_geom::Vec3;
use blockscape_lighting::LightEngine;
use blockscape_runtime::ChunkStreamer;
use blockscape_world::{NoiseTerrain, TerrainGenerator, VoxelMap, WorldSize, WorldType};

/// Fixed simulation step.
const DT: f32 = 1.0 / 60.0;
/// Day clock advance per frame.
const TICKS_PER_FRAME: u32 = 40;
/// Frames in one walk / break / place / jump cycle of the scripted session.
const SCRIPT_CYCLE: u64 = 240;

#[derive(Parser, Debug)]
#[command(name = "blockscape", about = "Run a headless scripted session in a generated voxel world")]
struct Cli {
    /// Game config (toml); every table is optional
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    seed: Option<i32>,
    /// original | flat | island | woods | floating
    #[arg(long)]
    world_type: Option<WorldType>,
    /// small | normal | huge
    #[arg(long)]
    size: Option<WorldSize>,
    /// Frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u64,
    /// Block catalog (toml) replacing the builtin one
    #[arg(long)]
    blocks: Option<PathBuf>,
    /// Write the log to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<(), Box<dyn Error>> {
    match log_file {
        Some(path) => {
            simplelog::WriteLogger::init(LevelFilter::Info, simplelog::Config::default(), File::create(path)?)?;
        }
        None => {
            env_logger::Builder::new()
                .filter_level(LevelFilter::Info)
                .parse_env("RUST_LOG")
                .try_init()?;
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<GameConfig, Box<dyn Error>> {
    let mut cfg = match &cli.config {
        Some(path) => GameConfig::from_path(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = cli.seed {
        cfg.world.seed = seed;
    }
    if let Some(world_type) = cli.world_type {
        cfg.world.world_type = world_type;
    }
    if let Some(size) = cli.size {
        cfg.world.size = size;
    }
    Ok(cfg)
}

/// Stick input and look direction for frame `i` of the script.
fn scripted_input(i: u64) -> (MoveInput, Vec3) {
    let yaw = i as f32 * 0.004;
    let look = Vec3::new(yaw.cos(), -0.6, yaw.sin());
    let phase = i % SCRIPT_CYCLE;
    let input = MoveInput {
        forward: if phase < 90 { 1.0 } else { 0.0 },
        strafe: 0.0,
        jump: phase == 200,
    };
    (input, look)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;
    let cfg = load_config(&cli)?;

    let catalog = match &cli.blocks {
        Some(path) => BlockCatalog::load_from_path(path)?,
        None => BlockCatalog::builtin()?,
    };
    let place_id = catalog
        .id_by_name("planks")
        .or_else(|| catalog.id_by_name("stone"))
        .ok_or("catalog has neither planks nor stone to place")?;

    let (w, l, h) = cfg.world.size.dims();
    let mut map = VoxelMap::new(w, l, h);
    let started = std::time::Instant::now();
    NoiseTerrain::new(cfg.world.terrain.clone(), &catalog).generate(cfg.world.seed, cfg.world.world_type, &mut map);
    log::info!(
        "generated {:?} {:?} world ({w}x{l}x{h}) in {:.2?}",
        cfg.world.size,
        cfg.world.world_type,
        started.elapsed()
    );

    let grid = ChunkGrid::from_map(&map, cfg.streaming.chunk_size);
    let mut world = WorldFacade::new(WorldParts {
        map,
        catalog,
        grid,
        streamer: ChunkStreamer::new(cfg.streaming.clone()),
        light: LightEngine::new(),
        sound: Box::new(LogSound::default()),
        picker: cfg.picker.clone(),
        seed: cfg.world.seed,
    });
    let mut player = Player::new(world.spawn(), cfg.player.clone());

    let mut placed = 0usize;
    for i in 0..cli.frames {
        let (input, look) = scripted_input(i);
        world.step_player(&mut player, DT, input, look);
        let camera = Camera::looking(player.eye_position(), look);
        world.update(&mut player, &camera);

        match i % SCRIPT_CYCLE {
            90..150 => {
                world.break_target_block(DT);
            }
            150 => world.stop_break(),
            160 => {
                if world.put_block(place_id, &player) {
                    placed += 1;
                }
            }
            _ => {}
        }

        world.set_tick(world.tick().wrapping_add(TICKS_PER_FRAME));
        world.drain_events();
    }

    let mut renderer = LogRenderer::default();
    world.render(&mut renderer);
    let stats = world.stats();
    println!("frames:         {}", stats.frames);
    println!("player at:      {:?} (spawn {:?})", player.position(), world.spawn());
    println!("loaded chunks:  {} / {}", stats.loaded_chunks, world.grid().len());
    println!("records:        {}", stats.records);
    println!("chunk builds:   {}", stats.chunk_builds);
    println!("light updates:  {}", stats.light_updates);
    println!("blocks removed: {}", stats.blocks_removed);
    println!("blocks placed:  {} ({} from the script)", stats.blocks_placed, placed);
    println!("draw calls:     {} ({} instances)", renderer.draw_calls, renderer.instances);
    Ok(())
}
