//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over the scene's primitives. Every node stores the box
//! enclosing everything below it for the whole build time interval, so a
//! ray that misses a node's box skips the entire subtree.

use std::time::Instant;

use crate::{HitRecord, Hittable};
use lumen_math::{Aabb, Interval, Ray};
use rand::{Rng, RngCore};
use thiserror::Error;

/// Errors that can occur while building a BVH.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BvhError {
    #[error("Cannot build a BVH from an empty list of primitives")]
    EmptyInput,

    #[error("Primitive {index} has no bounding box for the build time interval")]
    BoundsUnavailable { index: usize },
}

/// BVH node - either a branch with two children or a leaf with a single
/// primitive.
///
/// Children are owned exclusively; the tree is immutable once built.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node holding exactly one primitive.
    Leaf {
        object: Box<dyn Hittable>,
        bbox: Aabb,
    },
}

/// A primitive paired with its box, computed once before sorting.
struct Bounded {
    object: Box<dyn Hittable>,
    bbox: Aabb,
}

impl BvhNode {
    /// Build a BVH over `objects`, valid for rays with times in `time`.
    ///
    /// Split axes are drawn from `rng`, so a fixed seed and input order
    /// reproduce the same tree.
    pub fn new(
        objects: Vec<Box<dyn Hittable>>,
        time: Interval,
        rng: &mut dyn RngCore,
    ) -> Result<Self, BvhError> {
        if objects.is_empty() {
            return Err(BvhError::EmptyInput);
        }

        let start = Instant::now();
        let count = objects.len();

        let bounded = objects
            .into_iter()
            .enumerate()
            .map(|(index, object)| match object.bounding_box(time) {
                Some(bbox) => Ok(Bounded { object, bbox }),
                None => Err(BvhError::BoundsUnavailable { index }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let root = Self::build(bounded, rng);

        log::debug!(
            "Built BVH over {} primitives (depth {}) in {:?}",
            count,
            root.depth(),
            start.elapsed()
        );

        Ok(root)
    }

    /// Recursive median split on a random axis.
    fn build(mut objects: Vec<Bounded>, rng: &mut dyn RngCore) -> Self {
        if objects.len() == 1 {
            let Bounded { object, bbox } = objects.remove(0);
            return BvhNode::Leaf { object, bbox };
        }

        let axis = rng.gen_range(0..3);

        // Stable, so equal keys keep their input order.
        objects.sort_by(|a, b| {
            let a_min = a.bbox.axis_interval(axis).min;
            let b_min = b.bbox.axis_interval(axis).min;
            a_min.total_cmp(&b_min)
        });

        // Left half takes the extra primitive when the count is odd.
        let mid = objects.len().div_ceil(2);
        let right_objects = objects.split_off(mid);

        let left = Self::build(objects, rng);
        let right = Self::build(right_objects, rng);
        let bbox = left.bbox().union(&right.bbox());

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
        }
    }

    /// The box enclosing this subtree.
    pub fn bbox(&self) -> Aabb {
        match self {
            BvhNode::Leaf { bbox, .. } | BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    /// Number of primitives under this node.
    pub fn len(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => left.len() + right.len(),
        }
    }

    /// A built tree always holds at least one primitive.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of levels; a single leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

impl Hittable for BvhNode {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        if !self.bbox().hit(ray, ray_t) {
            return None;
        }

        match self {
            BvhNode::Leaf { object, .. } => object.hit(ray, ray_t),

            BvhNode::Branch { left, right, .. } => {
                let hit_left = left.hit(ray, ray_t);

                // Only check right up to closest hit
                let right_t = hit_left.map_or(ray_t, |rec| ray_t.with_max(rec.t));
                right.hit(ray, right_t).or(hit_left)
            }
        }
    }

    /// The box the tree was built with; it already covers the build interval.
    fn bounding_box(&self, _time: Interval) -> Option<Aabb> {
        Some(self.bbox())
    }
}
