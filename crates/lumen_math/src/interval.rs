/// A closed range of `f32` values.
///
/// Used both for ray parameter ranges (`t_min..t_max`) and for the
/// per-axis extents of an [`Aabb`](crate::Aabb).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// True when the interval holds no values (min > max).
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }

    /// Expands the interval by delta/2 on each side.
    pub fn expand(&self, delta: f32) -> Interval {
        let padding = delta / 2.0;
        Interval::new(self.min - padding, self.max + padding)
    }

    /// Same interval with `max` replaced, used to narrow a search range
    /// once a closer hit is known.
    pub fn with_max(&self, max: f32) -> Interval {
        Interval::new(self.min, max)
    }

    /// Smallest interval containing both `a` and `b`.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }

    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    /// A universe interval (contains everything).
    pub const UNIVERSE: Interval = Interval {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_size() {
        assert_eq!(Interval::new(2.0, 7.0).size(), 5.0);
        assert_eq!(Interval::new(-5.0, 5.0).size(), 10.0);
    }

    #[test]
    fn test_interval_contains_is_inclusive() {
        let interval = Interval::new(0.0, 10.0);

        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(interval.contains(5.0));
        assert!(!interval.contains(-0.1));
        assert!(!interval.contains(10.1));
    }

    #[test]
    fn test_interval_surrounds_is_exclusive() {
        let interval = Interval::new(0.0, 10.0);

        assert!(!interval.surrounds(0.0));
        assert!(!interval.surrounds(10.0));
        assert!(interval.surrounds(0.1));
        assert!(interval.surrounds(9.9));
    }

    #[test]
    fn test_interval_expand() {
        let expanded = Interval::new(0.0, 10.0).expand(4.0);

        // 2.0 on each side
        assert_eq!(expanded.min, -2.0);
        assert_eq!(expanded.max, 12.0);
    }

    #[test]
    fn test_interval_with_max_keeps_min() {
        let narrowed = Interval::new(0.001, f32::INFINITY).with_max(3.0);
        assert_eq!(narrowed, Interval::new(0.001, 3.0));
    }

    #[test]
    fn test_interval_surrounding() {
        let a = Interval::new(-1.0, 2.0);
        let b = Interval::new(0.5, 4.0);
        assert_eq!(Interval::surrounding(&a, &b), Interval::new(-1.0, 4.0));
        assert_eq!(Interval::surrounding(&Interval::EMPTY, &b), b);
    }

    #[test]
    fn test_interval_empty_and_universe() {
        assert!(Interval::EMPTY.is_empty());
        assert!(!Interval::EMPTY.contains(0.0));
        assert!(!Interval::UNIVERSE.is_empty());
        assert!(Interval::UNIVERSE.contains(1e10));
        assert!(Interval::UNIVERSE.contains(-1e10));
    }
}
