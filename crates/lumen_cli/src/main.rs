use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lumen_core::cornell::cornell_box;
use lumen_core::Scene;
use lumen_renderer::{render, IntegratorKind, RenderConfig};

/// Render a scene with path tracing, photon mapping or ray casting and write a PNG.
#[derive(Parser, Debug)]
#[command(name = "lumen", version, about, long_about = None)]
struct Cli {
    /// Scene file (JSON). Renders the built-in Cornell box when omitted.
    scene: Option<PathBuf>,

    /// Output image
    #[arg(short, long, value_name = "FILE", default_value = "render.png")]
    output: PathBuf,

    /// Radiance estimator
    #[arg(short, long, value_enum, default_value_t = Integrator::Path)]
    integrator: Integrator,

    /// Image width override
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Image height override
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Samples per pixel override
    #[arg(long)]
    spp: Option<u32>,

    /// Recursion depth override
    #[arg(long)]
    depth: Option<u32>,

    /// Photons emitted per area light override
    #[arg(long)]
    photons: Option<u32>,

    /// Worker threads (defaults to available parallelism)
    #[arg(short = 't', long, value_name = "NUM")]
    workers: Option<usize>,

    /// Top-level random seed for a reproducible render
    #[arg(long)]
    seed: Option<u64>,

    /// Photons gathered per final-gather estimate
    #[arg(long, value_name = "K", default_value_t = 100)]
    gather: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Integrator {
    /// Recursive path tracing
    Path,
    /// Path tracing with next-event estimation
    Nee,
    /// Next-event estimation with Russian roulette
    Rr,
    /// Photon mapping with final gather
    Photon,
    /// Direct Phong shading from the first point light
    Cast,
}

impl From<Integrator> for IntegratorKind {
    fn from(integrator: Integrator) -> Self {
        match integrator {
            Integrator::Path => IntegratorKind::Path,
            Integrator::Nee => IntegratorKind::NextEvent,
            Integrator::Rr => IntegratorKind::RussianRoulette,
            Integrator::Photon => IntegratorKind::PhotonMap,
            Integrator::Cast => IntegratorKind::RayCast,
        }
    }
}

impl Cli {
    fn load_scene(&self) -> Result<Scene> {
        let mut scene = match &self.scene {
            Some(path) => lumen_core::load_scene(path)
                .with_context(|| format!("Failed to load scene {}", path.display()))?,
            None => {
                log::info!("No scene given, rendering the built-in Cornell box");
                cornell_box()
            }
        };

        let options = &mut scene.render_options;
        if let Some(width) = self.width {
            options.width = width;
        }
        if let Some(height) = self.height {
            options.height = height;
        }
        if let Some(spp) = self.spp {
            options.samples_per_pixel = spp;
        }
        if let Some(depth) = self.depth {
            options.max_depth = depth;
        }
        if let Some(photons) = self.photons {
            options.photon_count = photons;
        }
        Ok(scene)
    }

    fn render_config(&self) -> RenderConfig {
        let mut config = RenderConfig {
            integrator: self.integrator.into(),
            seed: self.seed,
            gather_count: self.gather,
            ..RenderConfig::default()
        };
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        config
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    let mut scene = cli.load_scene()?;
    scene
        .bake_world_transforms()
        .context("Failed to bake world transforms")?;
    log::info!(
        "Scene '{}': {} materials, {} nodes, {} area lights",
        scene.name,
        scene.materials.len(),
        scene.nodes.len(),
        scene.area_lights.len()
    );

    let output = render(&scene, &cli.render_config()).context("Render failed")?;

    output
        .image
        .save_png(&cli.output)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;
    log::info!(
        "Wrote {} (seed {}, {} photons stored)",
        cli.output.display(),
        output.seed,
        output.stats.photons_stored
    );

    Ok(())
}
