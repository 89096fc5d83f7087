//! Lumen - render a built-in scene to an image file.

use std::time::Instant;

use anyhow::{Context, Result};
use lumen_renderer::{render_parallel, RenderConfig, DEFAULT_BUCKET_SIZE};
use rand::rngs::StdRng;
use rand::SeedableRng;

mod args;
mod output;
mod scenes;

use args::{Command, Options, USAGE};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = match Options::parse(std::env::args().skip(1))? {
        Command::Render(options) => options,
        Command::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
    };

    if let Some(threads) = options.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure the render thread pool")?;
    }

    let seed = options.seed.unwrap_or_else(rand::random);
    log::info!("Starting Lumen: scene '{}', seed {}", options.scene, seed);

    let start = Instant::now();
    let mut rng = StdRng::seed_from_u64(seed);
    let scene = scenes::build(
        options.scene,
        options.aspect_ratio(),
        &options.texture,
        &mut rng,
    )?;
    log::info!("Scene built in {:?}", start.elapsed());

    let config = RenderConfig {
        samples_per_pixel: options.samples_per_pixel,
        max_depth: options.max_depth,
        background: scene.background,
    };

    let image = render_parallel(
        &scene.camera,
        &scene.world,
        (options.width, options.height),
        &config,
        seed,
        DEFAULT_BUCKET_SIZE,
    );

    output::save(&image, &options.output)
}
