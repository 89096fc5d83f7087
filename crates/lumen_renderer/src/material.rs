//! Material trait for surface scattering.

use std::sync::Arc;

use crate::random::{gen_f32, random_in_unit_sphere, random_unit_vector};
use crate::texture::{SolidColor, Texture};
use crate::HitRecord;
use lumen_math::{Ray, Vec3};
use rand::RngCore;

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// Outcome of a successful scatter.
#[derive(Debug, Clone, Copy)]
pub struct ScatterRecord {
    /// Fraction of the scattered light that survives the bounce
    pub attenuation: Color,
    /// The outgoing ray
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore)
        -> Option<ScatterRecord>;

    /// Get emitted light from this material.
    ///
    /// Most materials return black (no emission).
    fn emitted(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        Color::ZERO
    }
}

impl<M: Material + ?Sized> Material for Arc<M> {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        (**self).scatter(ray_in, rec, rng)
    }

    fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        (**self).emitted(u, v, p)
    }
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    albedo: Arc<dyn Texture>,
}

impl Lambertian {
    pub fn new(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }

    pub fn from_color(albedo: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(albedo)))
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if scatter_direction.length_squared() < 1e-8 {
            scatter_direction = rec.normal;
        }

        Some(ScatterRecord {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, scatter_direction, ray_in.time()),
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let scattered_dir = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Fuzz can push the ray below the surface; that light is absorbed.
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(ScatterRecord {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, scattered_dir, ray_in.time()),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f32, ior: f32) -> f32 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.ior
        } else {
            self.ior
        };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let cannot_refract = refraction_ratio * sin_theta > 1.0;
        let direction = if cannot_refract
            || Self::reflectance(cos_theta, refraction_ratio) > gen_f32(rng)
        {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        Some(ScatterRecord {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

/// Diffuse light emitter.
#[derive(Clone)]
pub struct DiffuseLight {
    emit: Arc<dyn Texture>,
}

impl DiffuseLight {
    pub fn new(emit: Arc<dyn Texture>) -> Self {
        Self { emit }
    }

    pub fn from_color(emit: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(emit)))
    }
}

impl Material for DiffuseLight {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        None
    }

    fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        self.emit.value(u, v, p)
    }
}

/// Scatters uniformly in every direction, ignoring the surface normal.
#[derive(Clone)]
pub struct Isotropic {
    albedo: Arc<dyn Texture>,
}

impl Isotropic {
    pub fn new(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }

    pub fn from_color(albedo: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(albedo)))
    }
}

impl Material for Isotropic {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        Some(ScatterRecord {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, random_unit_vector(rng), ray_in.time()),
        })
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a vector through a surface.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hit_facing_z<'a>(material: &'a dyn Material) -> (Ray, HitRecord<'a>) {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0), 0.25);
        let rec = HitRecord::new(&ray, 1.0, Vec3::Z, (0.5, 0.5), material);
        (ray, rec)
    }

    #[test]
    fn test_lambertian_scatters_into_hemisphere() {
        let material = Lambertian::from_color(Color::new(0.8, 0.3, 0.3));
        let (ray, rec) = hit_facing_z(&material);
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..100 {
            let s = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(s.attenuation, Color::new(0.8, 0.3, 0.3));
            assert!(s.scattered.direction().dot(rec.normal) >= 0.0);
            assert_eq!(s.scattered.origin(), rec.p);
            assert_eq!(s.scattered.time(), 0.25);
        }
    }

    #[test]
    fn test_mirror_metal_reflects() {
        let material = Metal::new(Color::splat(0.9), 0.0);
        let ray = Ray::new_simple(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let rec = HitRecord::new(&ray, 1.0, Vec3::Y, (0.0, 0.0), &material);
        let mut rng = StdRng::seed_from_u64(1);

        let s = material.scatter(&ray, &rec, &mut rng).unwrap();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((s.scattered.direction() - expected).length() < 1e-5);
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        let metal = Metal::new(Color::ONE, 4.0);
        assert_eq!(metal.fuzz, 1.0);
    }

    #[test]
    fn test_dielectric_never_absorbs() {
        let material = Dielectric::new(1.5);
        let (ray, rec) = hit_facing_z(&material);
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..100 {
            let s = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(s.attenuation, Color::ONE);
        }
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let material = Dielectric::new(1.5);
        // Grazing ray from inside the glass.
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(1.0, 0.1, 0.0));
        let rec = HitRecord::new(&ray, 1.0, Vec3::Y, (0.0, 0.0), &material);
        assert!(!rec.front_face);

        let mut rng = StdRng::seed_from_u64(1);
        let s = material.scatter(&ray, &rec, &mut rng).unwrap();
        assert!(s.scattered.direction().y < 0.0);
    }

    #[test]
    fn test_diffuse_light_emits_and_absorbs() {
        let material = DiffuseLight::from_color(Color::new(4.0, 4.0, 4.0));
        let (ray, rec) = hit_facing_z(&material);
        let mut rng = StdRng::seed_from_u64(1);

        assert!(material.scatter(&ray, &rec, &mut rng).is_none());
        assert_eq!(material.emitted(0.0, 0.0, Vec3::ZERO), Color::splat(4.0));
    }

    #[test]
    fn test_non_emissive_default_is_black() {
        let material = Lambertian::from_color(Color::ONE);
        assert_eq!(material.emitted(0.3, 0.3, Vec3::ONE), Color::ZERO);
    }

    #[test]
    fn test_isotropic_scatters_unit_directions() {
        let material = Isotropic::from_color(Color::splat(0.5));
        let (ray, rec) = hit_facing_z(&material);
        let mut rng = StdRng::seed_from_u64(1);

        let s = material.scatter(&ray, &rec, &mut rng).unwrap();
        assert!((s.scattered.direction().length() - 1.0).abs() < 1e-4);
    }
}
