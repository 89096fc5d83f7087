//! Sphere primitives, static and moving.

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use lumen_math::{Aabb, Interval, Ray, Vec3};
use std::f32::consts::PI;

/// A sphere primitive.
///
/// A negative radius is allowed: the geometry is the same but the normals
/// point inward, which turns a sphere inside a glass sphere into a hollow
/// bubble.
pub struct Sphere<M: Material> {
    center: Vec3,
    radius: f32,
    material: M,
    bbox: Aabb,
}

impl<M: Material> Sphere<M> {
    pub fn new(center: Vec3, radius: f32, material: M) -> Self {
        let rvec = Vec3::splat(radius.abs());
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }
}

/// UV coordinates for a point on the unit sphere centered at the origin.
///
/// `u` runs around the Y axis starting from -X, `v` from -Y up to +Y.
fn sphere_uv(p: Vec3) -> (f32, f32) {
    let theta = (-p.y).clamp(-1.0, 1.0).acos();
    let phi = (-p.z).atan2(p.x) + PI;

    (phi / (2.0 * PI), theta / PI)
}

/// Shared quadratic solve for static and moving spheres.
fn hit_sphere<'a>(
    center: Vec3,
    radius: f32,
    material: &'a dyn Material,
    ray: &Ray,
    ray_t: Interval,
) -> Option<HitRecord<'a>> {
    let oc = center - ray.origin();
    let a = ray.direction().length_squared();
    let h = ray.direction().dot(oc);
    let c = oc.length_squared() - radius * radius;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 || a == 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();

    // Find the nearest root in the acceptable range
    let mut root = (h - sqrtd) / a;
    if !ray_t.surrounds(root) {
        root = (h + sqrtd) / a;
        if !ray_t.surrounds(root) {
            return None;
        }
    }

    let p = ray.at(root);
    let outward_normal = (p - center) / radius;
    let uv = sphere_uv((p - center) / radius.abs());

    Some(HitRecord::new(ray, root, outward_normal, uv, material))
}

impl<M: Material + 'static> Hittable for Sphere<M> {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        hit_sphere(self.center, self.radius, &self.material, ray, ray_t)
    }

    fn bounding_box(&self, _time: Interval) -> Option<Aabb> {
        Some(self.bbox)
    }
}

/// A sphere whose center moves linearly from `center0` at `time0` to
/// `center1` at `time1`.
pub struct MovingSphere<M: Material> {
    center0: Vec3,
    center1: Vec3,
    time0: f32,
    time1: f32,
    radius: f32,
    material: M,
}

impl<M: Material> MovingSphere<M> {
    pub fn new(
        center0: Vec3,
        center1: Vec3,
        time0: f32,
        time1: f32,
        radius: f32,
        material: M,
    ) -> Self {
        Self {
            center0,
            center1,
            time0,
            time1,
            radius,
            material,
        }
    }

    /// Center at `time`. Times outside `[time0, time1]` extrapolate.
    pub fn center(&self, time: f32) -> Vec3 {
        let span = self.time1 - self.time0;
        if span == 0.0 {
            return self.center0;
        }
        self.center0 + ((time - self.time0) / span) * (self.center1 - self.center0)
    }

    fn box_at(&self, time: f32) -> Aabb {
        let c = self.center(time);
        let rvec = Vec3::splat(self.radius.abs());
        Aabb::from_points(c - rvec, c + rvec)
    }
}

impl<M: Material + 'static> Hittable for MovingSphere<M> {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        hit_sphere(self.center(ray.time()), self.radius, &self.material, ray, ray_t)
    }

    /// Linear motion, so the boxes at the two ends cover every position
    /// in between.
    fn bounding_box(&self, time: Interval) -> Option<Aabb> {
        Some(self.box_at(time.min).union(&self.box_at(time.max)))
    }
}
