//! Lumen math types.
//!
//! Vectors come from `glam`; this crate adds the ray-tracing specific
//! primitives built on top of them.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
