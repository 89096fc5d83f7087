//! Textures: colors as a function of surface coordinates and position.

use std::path::Path;
use std::sync::Arc;

use crate::random::random_unit_vector;
use crate::Color;
use lumen_math::Vec3;
use rand::seq::SliceRandom;
use rand::RngCore;
use thiserror::Error;

/// Errors that can occur while building a texture.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Image has no pixels: {0}")]
    EmptyImage(String),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Anything that can be sampled for a color on a surface.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// A single constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.albedo
    }
}

/// 3D checker pattern alternating between two textures.
pub struct CheckerTexture {
    odd: Arc<dyn Texture>,
    even: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(odd: Arc<dyn Texture>, even: Arc<dyn Texture>) -> Self {
        Self { odd, even }
    }

    pub fn from_colors(odd: Color, even: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(odd)), Arc::new(SolidColor::new(even)))
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let sines = (10.0 * p.x).sin() * (10.0 * p.y).sin() * (10.0 * p.z).sin();
        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

const POINT_COUNT: usize = 256;

/// Gradient noise over random unit vectors.
pub struct Perlin {
    ranvec: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let ranvec = (0..POINT_COUNT).map(|_| random_unit_vector(rng)).collect();

        Self {
            ranvec,
            perm_x: Self::generate_perm(rng),
            perm_y: Self::generate_perm(rng),
            perm_z: Self::generate_perm(rng),
        }
    }

    fn generate_perm(rng: &mut dyn RngCore) -> Vec<usize> {
        let mut perm: Vec<usize> = (0..POINT_COUNT).collect();
        perm.shuffle(rng);
        perm
    }

    /// Smoothly interpolated noise, roughly in [-1, 1].
    pub fn noise(&self, p: Vec3) -> f32 {
        let u = p.x - p.x.floor();
        let v = p.y - p.y.floor();
        let w = p.z - p.z.floor();

        let i = p.x.floor() as i32;
        let j = p.y.floor() as i32;
        let k = p.z.floor() as i32;

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, corner) in row.iter_mut().enumerate() {
                    let index = self.perm_x[((i + di as i32) & 255) as usize]
                        ^ self.perm_y[((j + dj as i32) & 255) as usize]
                        ^ self.perm_z[((k + dk as i32) & 255) as usize];
                    *corner = self.ranvec[index];
                }
            }
        }

        perlin_interp(&c, u, v, w)
    }

    /// Sum of `depth` octaves of noise, halving the weight each time.
    pub fn turb(&self, p: Vec3, depth: u32) -> f32 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }
}

fn perlin_interp(c: &[[[Vec3; 2]; 2]; 2], u: f32, v: f32, w: f32) -> f32 {
    // Hermite smoothing
    let uu = u * u * (3.0 - 2.0 * u);
    let vv = v * v * (3.0 - 2.0 * v);
    let ww = w * w * (3.0 - 2.0 * w);

    let mut accum = 0.0;
    for (i, plane) in c.iter().enumerate() {
        for (j, row) in plane.iter().enumerate() {
            for (k, corner) in row.iter().enumerate() {
                let (fi, fj, fk) = (i as f32, j as f32, k as f32);
                let weight = Vec3::new(u - fi, v - fj, w - fk);
                accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                    * (fj * vv + (1.0 - fj) * (1.0 - vv))
                    * (fk * ww + (1.0 - fk) * (1.0 - ww))
                    * corner.dot(weight);
            }
        }
    }
    accum
}

/// Marble-like turbulence texture.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
}

impl NoiseTexture {
    pub fn new(scale: f32, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        Color::ONE * 0.5 * (1.0 + (self.scale * p.z + 10.0 * self.noise.turb(p, 7)).sin())
    }
}

/// An 8-bit RGB image mapped over `(u, v)`.
pub struct ImageTexture {
    width: u32,
    height: u32,
    data: Vec<[u8; 3]>,
}

impl ImageTexture {
    /// Load an image file with the `image` crate.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let img = image::open(path)?.to_rgb8();
        let (width, height) = img.dimensions();

        if width == 0 || height == 0 {
            return Err(TextureError::EmptyImage(path.display().to_string()));
        }

        log::info!("Loaded texture {} ({}x{})", path.display(), width, height);
        Ok(Self::from_rgb8(width, height, img.pixels().map(|p| p.0).collect()))
    }

    /// Build from row-major RGB pixels, top row first.
    pub fn from_rgb8(width: u32, height: u32, data: Vec<[u8; 3]>) -> Self {
        if data.len() != (width * height) as usize {
            log::warn!(
                "Image texture has {} pixels, expected {}x{}; sampling will return debug cyan",
                data.len(),
                width,
                height
            );
            return Self {
                width: 0,
                height: 0,
                data: Vec::new(),
            };
        }

        Self {
            width,
            height,
            data,
        }
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        // Debug cyan when there is nothing to sample.
        if self.data.is_empty() {
            return Color::new(0.0, 1.0, 1.0);
        }

        let u = u.clamp(0.0, 1.0);
        let v = 1.0 - v.clamp(0.0, 1.0);

        let i = ((u * self.width as f32) as u32).min(self.width - 1);
        let j = ((v * self.height as f32) as u32).min(self.height - 1);

        let [r, g, b] = self.data[(j * self.width + i) as usize];
        Color::new(r as f32, g as f32, b as f32) / 255.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_solid_color() {
        let tex = SolidColor::new(Color::new(0.1, 0.2, 0.3));
        assert_eq!(tex.value(0.7, 0.1, Vec3::splat(4.0)), Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_checker_alternates() {
        let odd = Color::new(0.2, 0.3, 0.1);
        let even = Color::splat(0.9);
        let checker = CheckerTexture::from_colors(odd, even);

        // sin(1)^3 > 0
        assert_eq!(checker.value(0.0, 0.0, Vec3::splat(0.1)), even);
        // sin(-1) * sin(1) * sin(1) < 0
        assert_eq!(checker.value(0.0, 0.0, Vec3::new(-0.1, 0.1, 0.1)), odd);
    }

    #[test]
    fn test_noise_texture_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let tex = NoiseTexture::new(4.0, &mut rng);

        for i in 0..50 {
            let p = Vec3::new(i as f32 * 0.37, i as f32 * -0.11, i as f32 * 0.05);
            let c = tex.value(0.0, 0.0, p);
            assert!(c.x >= 0.0 && c.x <= 1.0);
            assert_eq!(c.x, c.y);
            assert_eq!(c.y, c.z);
        }
    }

    #[test]
    fn test_perlin_zero_at_lattice_points() {
        let mut rng = StdRng::seed_from_u64(3);
        let perlin = Perlin::new(&mut rng);

        // Gradient noise vanishes on integer coordinates.
        assert!(perlin.noise(Vec3::new(3.0, -2.0, 5.0)).abs() < 1e-6);
    }

    #[test]
    fn test_image_texture_lookup() {
        // 2x1 image: red on the left, blue on the right.
        let tex = ImageTexture::from_rgb8(2, 1, vec![[255, 0, 0], [0, 0, 255]]);

        assert_eq!(tex.value(0.1, 0.5, Vec3::ZERO), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.value(0.9, 0.5, Vec3::ZERO), Color::new(0.0, 0.0, 1.0));
        // Out of range coordinates clamp to the border.
        assert_eq!(tex.value(2.0, -1.0, Vec3::ZERO), Color::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_image_texture_without_data_is_cyan() {
        let tex = ImageTexture::from_rgb8(4, 4, Vec::new());
        assert_eq!(tex.value(0.5, 0.5, Vec3::ZERO), Color::new(0.0, 1.0, 1.0));
    }

    #[test]
    fn test_image_texture_missing_file() {
        assert!(ImageTexture::load("does/not/exist.png").is_err());
    }
}
