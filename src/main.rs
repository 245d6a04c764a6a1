#![forbid(unsafe_code)]

mod assets;
mod config;
mod sim;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tessel_blocks::BlockRegistry;
use tessel_mesh_cpu::SimpleMesher;
use tessel_runtime::FrameDriver;

use config::AppConfig;
use sim::{HeadlessResources, HeadlessSink, Hills};

/// Headless chunk streaming run: loads, culls and meshes chunks around a
/// scripted viewer path and reports what happened.
#[derive(Parser, Debug)]
#[command(name = "tessel", version, about)]
struct Args {
    /// Run configuration file
    #[arg(long, default_value = "tessel.toml")]
    config: PathBuf,
    /// Assets root containing assets/voxels/blocks.toml
    #[arg(long)]
    assets: Option<PathBuf>,
    /// Block table, overriding [run] blocks
    #[arg(long)]
    blocks: Option<PathBuf>,
    #[arg(long)]
    ticks: Option<u32>,
    #[arg(long)]
    render_distance: Option<f32>,
    #[arg(long)]
    unload_offset: Option<f32>,
    /// Offset-table steps per tick instead of the time budget
    #[arg(long)]
    tick_steps: Option<usize>,
    /// Mesh on background workers (0 = auto thread count)
    #[arg(long)]
    workers: Option<usize>,
    /// Log filter, e.g. "debug" or "info,stream=trace"
    #[arg(long)]
    log: Option<String>,
}

impl Args {
    fn apply(&self, cfg: &mut AppConfig) {
        if let Some(v) = self.ticks {
            cfg.run.ticks = v;
        }
        if let Some(v) = self.render_distance {
            cfg.stream.render_distance = v;
        }
        if let Some(v) = self.unload_offset {
            cfg.stream.unload_offset = v;
        }
        if let Some(v) = self.tick_steps {
            cfg.stream.tick_steps = Some(v);
        }
        if let Some(v) = self.workers {
            cfg.mesh.background = true;
            cfg.mesh.workers = v;
        }
        if let Some(p) = &self.blocks {
            cfg.run.blocks = Some(p.clone());
        }
    }
}

fn init_logging(filter: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(f) = filter {
        builder.parse_filters(f);
    }
    builder.format_timestamp_millis().init();
}

fn load_config(args: &Args) -> Result<AppConfig, Box<dyn Error>> {
    let mut cfg = if args.config.exists() {
        AppConfig::load(&args.config)?
    } else {
        log::info!("{:?} not found; using defaults", args.config);
        AppConfig::default()
    };
    args.apply(&mut cfg);
    cfg.validate()?;
    Ok(cfg)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.log.as_deref());

    let cfg = load_config(&args)?;
    let blocks = match &cfg.run.blocks {
        Some(p) => p.clone(),
        None => assets::blocks_path(&assets::resolve_assets_root(args.assets.as_deref())),
    };
    let registry = Arc::new(BlockRegistry::load_from_path(&blocks)?);
    let mut hills = Hills::from_registry(&registry)?;

    let driver_cfg = cfg.driver_config();
    log::info!(
        "render distance {} (+{} unload), {} mesh worker(s), {} ticks",
        driver_cfg.stream.render_distance,
        driver_cfg.stream.unload_offset,
        driver_cfg.mesh_workers,
        cfg.run.ticks
    );
    let mut driver = FrameDriver::new(driver_cfg, registry, Arc::new(SimpleMesher))?;
    let mut resources = HeadlessResources::default();
    let mut sink = HeadlessSink::default();

    let summary = sim::run(&mut driver, &mut resources, &mut sink, &mut hills, &cfg.run);
    log::info!(
        "{} ticks in {:.2?}: loaded {} unloaded {} (peak {}), meshed {} inline + {} background, {} stale, {} wiped",
        summary.ticks,
        summary.elapsed,
        summary.loaded,
        summary.unloaded,
        summary.peak_loaded,
        summary.meshed,
        summary.uploaded,
        summary.stale,
        summary.cleared
    );
    log::info!(
        "{} meshes resident, {} triangles, {} handles released",
        sink.meshes.len(),
        sink.triangles(),
        resources.released
    );
    Ok(())
}
