//! Square tiles of the image, rendered independently.
//!
//! Tiles are handed to rayon closest-to-center first so the middle of the
//! image finishes early.

use lumen_math::Color;

use crate::renderer::render_pixel;
use crate::{Camera, World};

/// Default bucket edge length in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// A rectangular region of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// Column of the top-left pixel
    pub x: u32,
    /// Row of the top-left pixel
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position in render order
    pub index: usize,
}

impl Bucket {
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Squared distance from this bucket's center to the image center, in
    /// half-pixel units so it stays integral.
    fn center_distance(&self, image_width: u32, image_height: u32) -> u64 {
        let dx = i64::from(2 * self.x + self.width) - i64::from(image_width);
        let dy = i64::from(2 * self.y + self.height) - i64::from(image_height);
        (dx * dx + dy * dy) as u64
    }
}

/// Split a `width` x `height` image into buckets of at most `size` pixels
/// square, ordered center-out. Edge buckets are clipped to the image.
pub fn generate_buckets(width: u32, height: u32, size: u32) -> Vec<Bucket> {
    let size = size.max(1);
    let mut buckets: Vec<Bucket> = (0..height)
        .step_by(size as usize)
        .flat_map(|y| {
            (0..width).step_by(size as usize).map(move |x| Bucket {
                x,
                y,
                width: size.min(width - x),
                height: size.min(height - y),
                index: 0,
            })
        })
        .collect();

    // Stable sort keeps row-major order among equally distant buckets
    buckets.sort_by_key(|bucket| bucket.center_distance(width, height));
    for (index, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = index;
    }

    buckets
}

/// Pixels of one rendered bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    /// Colors in row-major order within the bucket
    pub pixels: Vec<Color>,
}

/// Render every pixel of `bucket` with `depth` levels of recursion.
pub fn render_bucket(bucket: &Bucket, camera: &Camera, world: &World, depth: u32) -> BucketResult {
    let mut pixels = Vec::with_capacity(bucket.pixel_count());
    for row in bucket.y..bucket.y + bucket.height {
        for col in bucket.x..bucket.x + bucket.width {
            pixels.push(render_pixel(camera, world, col, row, depth));
        }
    }

    BucketResult {
        bucket: *bucket,
        pixels,
    }
}
