//! `lumen`: render a driver file to an image.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use lumen_renderer::{Camera, RenderConfig, World, DEFAULT_BUCKET_SIZE};

#[derive(Parser, Debug)]
#[command(name = "lumen")]
#[command(about = "Recursive ray tracer for spheres and OBJ models", version)]
struct Args {
    /// Driver file describing camera, lights and objects
    driver: PathBuf,

    /// Output image (.ppm is written as plain text; other extensions use their usual format)
    output: PathBuf,

    /// Worker threads (defaults to one per core)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Bucket edge length in pixels
    #[arg(short, long, default_value_t = DEFAULT_BUCKET_SIZE)]
    bucket_size: u32,

    /// Override the driver file's recursion level
    #[arg(short, long)]
    depth: Option<u32>,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .parse_default_env()
        .init();

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    let start = Instant::now();
    let desc = lumen_core::load_driver(&args.driver)
        .with_context(|| format!("Failed to parse driver file {}", args.driver.display()))?;
    let camera = Camera::new(&desc.camera).context("Invalid camera setup")?;
    let world = World::from_description(&desc).context("Failed to build scene")?;
    log::info!("Scene ready in {:.2?}", start.elapsed());

    let config = RenderConfig {
        bucket_size: args.bucket_size,
        depth_override: args.depth,
    };

    let image = if args.quiet {
        lumen_renderer::render(&camera, &world, &config)
    } else {
        let pixels = u64::from(camera.width()) * u64::from(camera.height());
        let progress = ProgressBar::new(pixels);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent}% ({eta})")
                .context("Invalid progress bar template")?
                .progress_chars("=> "),
        );
        let image = lumen_renderer::render_with_progress(&camera, &world, &config, |result| {
            progress.inc(result.pixels.len() as u64);
        });
        progress.finish_and_clear();
        image
    };

    image
        .save(&args.output)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;
    log::info!("Total time {:.2?}", start.elapsed());

    Ok(())
}
