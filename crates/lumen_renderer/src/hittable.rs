//! Hittable trait and HitRecord for ray-object intersection.

use crate::Material;
use lumen_math::{Aabb, Interval, Ray, Vec3};

/// Record of a ray-object intersection.
///
/// Borrows the material from the scene, so a record cannot outlive the
/// geometry that produced it.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// Surface parametric coordinates
    pub u: f32,
    pub v: f32,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record, orienting `outward_normal` against the ray.
    pub fn new(
        ray: &Ray,
        t: f32,
        outward_normal: Vec3,
        (u, v): (f32, f32),
        material: &'a dyn Material,
    ) -> Self {
        let front_face = ray.direction().dot(outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };

        Self {
            p: ray.at(t),
            normal,
            material,
            u,
            v,
            t,
            front_face,
        }
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Nearest intersection with `t` strictly inside `ray_t`.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;

    /// Box enclosing the object for every time in `time`.
    ///
    /// `None` means the object has no finite extent and cannot be placed
    /// in a BVH.
    fn bounding_box(&self, time: Interval) -> Option<Aabb>;
}

/// A flat list of hittable objects, searched linearly.
#[derive(Default)]
pub struct HittableList {
    objects: Vec<Box<dyn Hittable>>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Hand the objects over, e.g. to build a [`BvhNode`](crate::BvhNode).
    pub fn into_objects(self) -> Vec<Box<dyn Hittable>> {
        self.objects
    }
}

impl From<Vec<Box<dyn Hittable>>> for HittableList {
    fn from(objects: Vec<Box<dyn Hittable>>) -> Self {
        Self { objects }
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;

        for object in &self.objects {
            let range = closest.map_or(ray_t, |rec| ray_t.with_max(rec.t));
            if let Some(rec) = object.hit(ray, range) {
                closest = Some(rec);
            }
        }

        closest
    }

    fn bounding_box(&self, time: Interval) -> Option<Aabb> {
        if self.objects.is_empty() {
            return None;
        }

        self.objects.iter().try_fold(Aabb::EMPTY, |acc, object| {
            object.bounding_box(time).map(|b| acc.union(&b))
        })
    }
}
