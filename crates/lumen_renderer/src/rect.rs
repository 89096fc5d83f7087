//! Axis-aligned rectangles.

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use lumen_math::{Aabb, Interval, Ray, Vec3};

/// Which coordinate plane a rectangle lies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    Xy,
    Xz,
    Yz,
}

impl Plane {
    /// `(a, b, normal)` axis indices: the two in-plane axes and the fixed one.
    fn axes(self) -> (usize, usize, usize) {
        match self {
            Plane::Xy => (0, 1, 2),
            Plane::Xz => (0, 2, 1),
            Plane::Yz => (1, 2, 0),
        }
    }
}

/// A rectangle spanning `[a0, a1] x [b0, b1]` in its plane, at offset `k`
/// along the remaining axis. The outward normal points along that axis.
pub struct AxisRect<M: Material> {
    plane: Plane,
    a: Interval,
    b: Interval,
    k: f32,
    material: M,
}

impl<M: Material> AxisRect<M> {
    pub fn new(plane: Plane, a: Interval, b: Interval, k: f32, material: M) -> Self {
        Self {
            plane,
            a,
            b,
            k,
            material,
        }
    }

    /// Rectangle in the z = k plane.
    pub fn xy(x0: f32, x1: f32, y0: f32, y1: f32, k: f32, material: M) -> Self {
        Self::new(Plane::Xy, Interval::new(x0, x1), Interval::new(y0, y1), k, material)
    }

    /// Rectangle in the y = k plane.
    pub fn xz(x0: f32, x1: f32, z0: f32, z1: f32, k: f32, material: M) -> Self {
        Self::new(Plane::Xz, Interval::new(x0, x1), Interval::new(z0, z1), k, material)
    }

    /// Rectangle in the x = k plane.
    pub fn yz(y0: f32, y1: f32, z0: f32, z1: f32, k: f32, material: M) -> Self {
        Self::new(Plane::Yz, Interval::new(y0, y1), Interval::new(z0, z1), k, material)
    }
}

impl<M: Material + 'static> Hittable for AxisRect<M> {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let (ia, ib, ik) = self.plane.axes();

        let dir_k = ray.direction()[ik];
        if dir_k == 0.0 {
            return None;
        }

        let t = (self.k - ray.origin()[ik]) / dir_k;
        if !ray_t.surrounds(t) {
            return None;
        }

        let p = ray.at(t);
        if !self.a.contains(p[ia]) || !self.b.contains(p[ib]) {
            return None;
        }

        let u = (p[ia] - self.a.min) / self.a.size();
        let v = (p[ib] - self.b.min) / self.b.size();
        let mut outward_normal = Vec3::ZERO;
        outward_normal[ik] = 1.0;

        Some(HitRecord::new(ray, t, outward_normal, (u, v), &self.material))
    }

    fn bounding_box(&self, _time: Interval) -> Option<Aabb> {
        let (ia, ib, ik) = self.plane.axes();
        let mut lo = Vec3::ZERO;
        let mut hi = Vec3::ZERO;
        lo[ia] = self.a.min;
        hi[ia] = self.a.max;
        lo[ib] = self.b.min;
        hi[ib] = self.b.max;
        lo[ik] = self.k;
        hi[ik] = self.k;

        // Zero thickness along the normal axis gets padded here.
        Some(Aabb::from_points(lo, hi))
    }
}
