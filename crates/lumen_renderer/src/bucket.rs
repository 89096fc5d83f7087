//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel using rayon. Each bucket owns its own
//! generator, seeded from the render seed and the bucket's position, so a
//! render is reproducible regardless of thread scheduling.

use std::time::Instant;

use crate::renderer::render_pixel;
use crate::{Camera, Color, Hittable, ImageBuffer, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Seed for this bucket's generator. Depends on position only, not on
    /// render order.
    pub fn seed(&self, render_seed: u64) -> u64 {
        let position = ((self.y as u64) << 32) | self.x as u64;
        render_seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ position
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 32;

/// Generate buckets for an image, sorted in spiral order from center.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    // Update indices after sorting
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center, so the middle of the image
/// finishes first.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let dist = |b: &Bucket| {
        let bx = b.x as f32 + b.width as f32 / 2.0;
        let by = b.y as f32 + b.height as f32 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    buckets.sort_by(|a, b| dist(a).total_cmp(&dist(b)));
}

/// Render a single bucket to a vector of colors.
///
/// Returns pixels in row-major order within the bucket.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    world: &dyn Hittable,
    image_size: (u32, u32),
    config: &RenderConfig,
    render_seed: u64,
) -> Vec<Color> {
    let (width, height) = image_size;
    let mut rng = StdRng::seed_from_u64(bucket.seed(render_seed));
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let color = render_pixel(
                camera,
                world,
                bucket.x + local_x,
                bucket.y + local_y,
                width,
                height,
                config,
                &mut rng,
            );
            pixels.push(color);
        }
    }

    pixels
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }

    /// Copy the bucket's pixels into their place in `image`.
    pub fn write_to(&self, image: &mut ImageBuffer) {
        let rows = self.pixels.chunks(self.bucket.width.max(1) as usize);
        for (local_y, row) in rows.enumerate() {
            for (local_x, color) in row.iter().enumerate() {
                image.set(
                    self.bucket.x + local_x as u32,
                    self.bucket.y + local_y as u32,
                    *color,
                );
            }
        }
    }
}

/// Render the whole image across the rayon thread pool.
pub fn render_parallel(
    camera: &Camera,
    world: &dyn Hittable,
    image_size: (u32, u32),
    config: &RenderConfig,
    render_seed: u64,
    bucket_size: u32,
) -> ImageBuffer {
    let (width, height) = image_size;
    let start = Instant::now();
    let buckets = generate_buckets(width, height, bucket_size);

    log::info!(
        "Rendering {}x{} @ {} spp in {} buckets on {} threads",
        width,
        height,
        config.samples_per_pixel,
        buckets.len(),
        rayon::current_num_threads()
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let pixels = render_bucket(bucket, camera, world, image_size, config, render_seed);
            BucketResult::new(*bucket, pixels)
        })
        .collect();

    let mut image = ImageBuffer::new(width, height);
    for result in &results {
        result.write_to(&mut image);
    }

    log::info!("Rendered in {:?}", start.elapsed());
    image
}
