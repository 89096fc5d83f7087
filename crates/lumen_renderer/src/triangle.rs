//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use lumen_math::{Aabb, Interval, Ray, Vec3};

/// A triangle primitive.
pub struct Triangle<M: Material> {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    /// Material
    material: M,
    /// Bounding box
    bbox: Aabb,
}

impl<M: Material> Triangle<M> {
    /// Create a new triangle from three vertices.
    ///
    /// The face normal follows the right-hand rule over `v0, v1, v2`.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: M) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        let bbox = Aabb::from_points(v0.min(v1).min(v2), v0.max(v1).max(v2));

        Self {
            v0,
            v1,
            v2,
            normal,
            material,
            bbox,
        }
    }
}

impl<M: Material + 'static> Hittable for Triangle<M> {
    /// `(u, v)` in the record are the barycentric weights of `v1` and `v2`.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < 1e-8 {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if !ray_t.surrounds(t) {
            return None;
        }

        Some(HitRecord::new(ray, t, self.normal, (u, v), &self.material))
    }

    fn bounding_box(&self, _time: Interval) -> Option<Aabb> {
        Some(self.bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Color, Lambertian};

    fn triangle() -> Triangle<Lambertian> {
        // Triangle in XY plane at z=-1
        Triangle::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            Lambertian::from_color(Color::splat(0.5)),
        )
    }

    #[test]
    fn test_triangle_hit() {
        let tri = triangle();
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let rec = tri.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.t - 1.0).abs() < 0.001);
        assert!(rec.front_face);
        assert!(rec.u >= 0.0 && rec.v >= 0.0 && rec.u + rec.v <= 1.0);
    }

    #[test]
    fn test_triangle_miss() {
        let tri = triangle();
        let range = Interval::new(0.001, f32::INFINITY);

        // Pointing away
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(tri.hit(&ray, range).is_none());

        // Outside the edges
        let ray = Ray::new_simple(Vec3::new(0.9, 0.9, 0.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(tri.hit(&ray, range).is_none());
    }

    #[test]
    fn test_flat_triangle_box_has_volume() {
        let bbox = triangle().bounding_box(Interval::new(0.0, 1.0)).unwrap();
        assert!(bbox.z.size() > 0.0);
        assert!(bbox.z.contains(-1.0));
    }
}
