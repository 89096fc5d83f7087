//! Sampling helpers.
//!
//! Every function takes the generator explicitly so that each render
//! worker can own an independently seeded stream.

use lumen_math::Vec3;
use rand::{Rng, RngCore};

/// Uniform sample in `[0, 1)`.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform sample in `[min, max)`.
#[inline]
pub fn gen_range(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    min + (max - min) * gen_f32(rng)
}

/// Uniform point inside the unit sphere (rejection sampling).
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_range(rng, -1.0, 1.0),
            gen_range(rng, -1.0, 1.0),
            gen_range(rng, -1.0, 1.0),
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Uniform direction on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_in_unit_sphere(rng);
        let len_sq = p.length_squared();
        if len_sq > 1e-6 {
            return p / len_sq.sqrt();
        }
    }
}

/// Uniform point in the unit disk on the z = 0 plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_range(rng, -1.0, 1.0), gen_range(rng, -1.0, 1.0), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_gen_range_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let x = gen_range(&mut rng, -2.0, 3.0);
            assert!((-2.0..3.0).contains(&x));
        }
    }

    #[test]
    fn test_unit_vector_is_normalized() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_unit_disk_stays_flat() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let p = random_in_unit_disk(&mut rng);
            assert_eq!(p.z, 0.0);
            assert!(p.length_squared() < 1.0);
        }
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        assert_eq!(random_unit_vector(&mut a), random_unit_vector(&mut b));
    }
}
