//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Gamma correction
//! - Anti-aliasing via multi-sampling

use std::time::Instant;

use crate::random::gen_f32;
use crate::{Camera, Color, Hittable};
use lumen_math::{Interval, Ray};
use rand::RngCore;

/// Closest distance a hit may be from the ray origin. Keeps a scattered
/// ray from re-hitting the surface it just left.
pub const SHADOW_EPSILON: f32 = 0.001;

/// Radiance for rays that leave the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    /// The same color in every direction.
    Solid(Color),
    /// White at the horizon blending to light blue overhead.
    SkyGradient,
}

impl Background {
    pub fn radiance(&self, ray: &Ray) -> Color {
        match self {
            Background::Solid(color) => *color,
            Background::SkyGradient => sky_gradient(ray),
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Color::ZERO)
    }
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// What a ray sees when it hits nothing
    pub background: Background,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            background: Background::default(),
        }
    }
}

/// Compute the radiance carried back along `ray`.
///
/// A single-sample estimate: emission at the nearest hit plus the
/// attenuated radiance of one scattered ray. `depth` counts bounces so
/// far (start at 0); once it reaches `config.max_depth` only emission is
/// returned, so a call never queries the scene more than
/// `max_depth + 1` times.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let Some(rec) = world.hit(ray, Interval::new(SHADOW_EPSILON, f32::INFINITY)) else {
        return config.background.radiance(ray);
    };

    let emitted = rec.material.emitted(rec.u, rec.v, rec.p);
    if depth >= config.max_depth {
        return emitted;
    }

    match rec.material.scatter(ray, &rec, rng) {
        Some(scatter) => {
            let incoming = ray_color(&scatter.scattered, world, depth + 1, config, rng);
            emitted + scatter.attenuation * incoming
        }
        // Absorbed
        None => emitted,
    }
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize_or_zero();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to gamma corrected 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let channel = |c: f32| (255.99 * linear_to_gamma(c).clamp(0.0, 0.999)) as u8;
    [channel(color.x), channel(color.y), channel(color.z), 255]
}

/// Render a single pixel with multi-sampling.
///
/// `(x, y)` are pixel coordinates with row 0 at the top of the image.
#[allow(clippy::too_many_arguments)]
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;
    let row = (height - 1 - y) as f32;

    for _ in 0..config.samples_per_pixel {
        let s = (x as f32 + gen_f32(rng)) / width as f32;
        let t = (row + gen_f32(rng)) / height as f32;
        let ray = camera.get_ray(s, t, rng);
        pixel_color += ray_color(&ray, world, 0, config, rng);
    }

    pixel_color / config.samples_per_pixel.max(1) as f32
}

/// Linear colors for a whole image, row-major, top row first.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|color| color_to_rgba(*color))
            .collect()
    }
}

/// Render the entire scene on the calling thread.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    width: u32,
    height: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> ImageBuffer {
    let start = Instant::now();
    let mut image = ImageBuffer::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let color = render_pixel(camera, world, x, y, width, height, config, rng);
            image.set(x, y, color);
        }
    }

    log::info!(
        "Rendered {}x{} @ {} spp in {:?}",
        width,
        height,
        config.samples_per_pixel,
        start.elapsed()
    );
    image
}
