use crate::{Interval, Ray, Vec3};

/// Direction components smaller than this are treated as parallel to a slab.
const PARALLEL_EPSILON: f32 = 1e-12;

/// Minimum thickness of a box built from points.
const MIN_THICKNESS: f32 = 0.0001;

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create an AABB from two corner points, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self::new(
            Interval::new(a.x.min(b.x), a.x.max(b.x)),
            Interval::new(a.y.min(b.y), a.y.max(b.y)),
            Interval::new(a.z.min(b.z), a.z.max(b.z)),
        )
    }

    /// Smallest box containing both `self` and `other`.
    ///
    /// Never padded: every face of the result touches a face of one input.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            x: Interval::surrounding(&self.x, &other.x),
            y: Interval::surrounding(&self.y, &other.y),
            z: Interval::surrounding(&self.z, &other.z),
        }
    }

    /// Component-wise minimum corner.
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Component-wise maximum corner.
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// True if `p` lies inside or on the boundary of the box.
    pub fn contains_point(&self, p: Vec3) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y) && self.z.contains(p.z)
    }

    /// True if `other` lies entirely inside this box.
    pub fn contains(&self, other: &Aabb) -> bool {
        self.contains_point(other.min()) && self.contains_point(other.max())
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Slab method: every axis clips `ray_t` to the parameter range where
    /// the ray is between that axis's two planes. When the ray runs parallel
    /// to an axis' planes no division happens; the axis either leaves the
    /// range untouched (origin inside the slab) or misses outright.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let origin = r.origin[axis];
            let dir = r.direction[axis];

            if dir.abs() < PARALLEL_EPSILON {
                if !slab.contains(origin) {
                    return false;
                }
                continue;
            }

            let adinv = 1.0 / dir;
            let mut t0 = (slab.min - origin) * adinv;
            let mut t1 = (slab.max - origin) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }

        true
    }

    /// Pad intervals to avoid zero-width AABBs (degenerate cases).
    fn pad_to_minimums(&mut self) {
        if self.x.size() < MIN_THICKNESS {
            self.x = self.x.expand(MIN_THICKNESS);
        }
        if self.y.size() < MIN_THICKNESS {
            self.y = self.y.expand(MIN_THICKNESS);
        }
        if self.z.size() < MIN_THICKNESS {
            self.z = self.z.expand(MIN_THICKNESS);
        }
    }

    /// Contains nothing; the identity for [`Aabb::union`].
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn test_aabb_from_points_orders_corners() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 10.0), Vec3::new(0.0, 10.0, 0.0));

        assert_eq!(aabb.min(), Vec3::ZERO);
        assert_eq!(aabb.max(), Vec3::splat(10.0));
    }

    #[test]
    fn test_aabb_from_points_pads_flat_axis() {
        let flat = Aabb::from_points(Vec3::new(0.0, 0.0, 2.0), Vec3::new(1.0, 1.0, 2.0));

        assert!(flat.z.size() > 0.0);
        assert!(flat.z.contains(2.0));
        assert_eq!(flat.x, Interval::new(0.0, 1.0));
    }

    #[test]
    fn test_aabb_union_contains_both() {
        let a = Aabb::from_points(Vec3::ZERO, Vec3::new(5.0, 1.0, 5.0));
        let b = Aabb::from_points(Vec3::new(3.0, -2.0, 3.0), Vec3::new(10.0, 0.5, 4.0));
        let u = a.union(&b);

        assert!(u.contains(&a));
        assert!(u.contains(&b));
        for corner in [a.min(), a.max(), b.min(), b.max()] {
            assert!(u.contains_point(corner));
        }
    }

    #[test]
    fn test_aabb_union_is_smallest() {
        let a = Aabb::from_points(Vec3::ZERO, Vec3::new(5.0, 1.0, 5.0));
        let b = Aabb::from_points(Vec3::new(3.0, -2.0, 3.0), Vec3::new(10.0, 0.5, 4.0));
        let u = a.union(&b);

        // Every face touches one of the inputs.
        assert_eq!(u.min(), Vec3::new(0.0, -2.0, 0.0));
        assert_eq!(u.max(), Vec3::new(10.0, 1.0, 5.0));
    }

    #[test]
    fn test_aabb_union_with_empty_is_identity() {
        let a = unit_box();
        assert_eq!(Aabb::EMPTY.union(&a), a);
        assert_eq!(a.union(&Aabb::EMPTY), a);
    }

    #[test]
    fn test_aabb_hit_through_center() {
        let aabb = unit_box();
        let ray = Ray::new(Vec3::new(-3.0, -4.0, -5.0), Vec3::new(3.0, 4.0, 5.0), 0.0);
        assert!(aabb.hit(&ray, Interval::new(0.0, f32::INFINITY)));
    }

    #[test]
    fn test_aabb_hit_negative_direction() {
        let aabb = unit_box();
        let ray = Ray::new(Vec3::new(0.2, 0.3, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_aabb_miss_pointing_away() {
        let aabb = unit_box();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_aabb_miss_when_range_ends_before_box() {
        let aabb = unit_box();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 3.0)));
        assert!(aabb.hit(&ray, Interval::new(0.0, 4.5)));
    }

    #[test]
    fn test_aabb_parallel_outside_slab_misses() {
        let aabb = unit_box();
        // Travels along x, but sits above the y slab.
        let ray = Ray::new(Vec3::new(-5.0, 2.0, 0.0), Vec3::X, 0.0);
        assert!(!aabb.hit(&ray, Interval::UNIVERSE));

        // Zero direction, origin outside all three slabs.
        let ray = Ray::new(Vec3::splat(3.0), Vec3::new(0.0, 0.0, 0.0), 0.0);
        assert!(!aabb.hit(&ray, Interval::UNIVERSE));
    }

    #[test]
    fn test_aabb_parallel_inside_slab_hits() {
        let aabb = unit_box();
        let ray = Ray::new(Vec3::new(-5.0, 0.5, -0.5), Vec3::X, 0.0);
        assert!(aabb.hit(&ray, Interval::new(0.0, f32::INFINITY)));

        // On the slab boundary counts as inside.
        let ray = Ray::new(Vec3::new(-5.0, 1.0, 0.0), Vec3::X, 0.0);
        assert!(aabb.hit(&ray, Interval::new(0.0, f32::INFINITY)));
    }

    #[test]
    fn test_aabb_axis_interval() {
        let aabb = Aabb::from_points(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(aabb.axis_interval(0), Interval::new(1.0, 4.0));
        assert_eq!(aabb.axis_interval(1), Interval::new(2.0, 5.0));
        assert_eq!(aabb.axis_interval(2), Interval::new(3.0, 6.0));
    }
}
