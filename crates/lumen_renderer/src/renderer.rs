//! Parallel image rendering.
//!
//! Buckets are rendered on the rayon pool with the world shared read-only,
//! then stitched into an [`ImageBuffer`] of linear, unclamped colors.

use std::time::Instant;

use lumen_math::Color;
use rayon::prelude::*;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::shading::shade;
use crate::{Camera, World};

/// Render configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Bucket edge length in pixels
    pub bucket_size: u32,
    /// Replaces the world's recursion level when set
    pub depth_override: Option<u32>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            bucket_size: DEFAULT_BUCKET_SIZE,
            depth_override: None,
        }
    }
}

impl RenderConfig {
    /// Recursion depth to render `world` with.
    pub fn depth(&self, world: &World) -> u32 {
        self.depth_override.unwrap_or(world.recursion_level())
    }
}

/// Row-major image of linear colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl ImageBuffer {
    /// A black image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn get(&self, col: u32, row: u32) -> Color {
        self.pixels[self.offset(col, row)]
    }

    pub fn set(&mut self, col: u32, row: u32, color: Color) {
        let offset = self.offset(col, row);
        self.pixels[offset] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (row, line) in result.pixels.chunks(bucket.width as usize).enumerate() {
            let start = self.offset(bucket.x, bucket.y + row as u32);
            self.pixels[start..start + line.len()].copy_from_slice(line);
        }
    }

    fn offset(&self, col: u32, row: u32) -> usize {
        row as usize * self.width as usize + col as usize
    }
}

/// Color of a single pixel.
pub fn render_pixel(camera: &Camera, world: &World, col: u32, row: u32, depth: u32) -> Color {
    shade(&camera.primary_ray(col, row), world, depth)
}

/// Render the full image.
pub fn render(camera: &Camera, world: &World, config: &RenderConfig) -> ImageBuffer {
    render_with_progress(camera, world, config, |_| {})
}

/// Render the full image, calling `on_bucket` from the worker thread as each
/// bucket finishes.
pub fn render_with_progress<F>(
    camera: &Camera,
    world: &World,
    config: &RenderConfig,
    on_bucket: F,
) -> ImageBuffer
where
    F: Fn(&BucketResult) + Sync,
{
    let (width, height) = (camera.width(), camera.height());
    let buckets = generate_buckets(width, height, config.bucket_size);
    let depth = config.depth(world);

    log::info!(
        "Rendering {}x{} in {} buckets, recursion depth {}",
        width,
        height,
        buckets.len(),
        depth
    );
    let start = Instant::now();

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let result = render_bucket(bucket, camera, world, depth);
            on_bucket(&result);
            result
        })
        .collect();

    let mut image = ImageBuffer::new(width, height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}
