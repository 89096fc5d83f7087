//! Lumen renderer - CPU path tracing
//!
//! A Monte Carlo path tracer: a BVH answers nearest-hit queries, and a
//! recursive single-sample estimator gathers emitted and scattered light
//! along each camera ray.

mod bucket;
mod bvh;
mod camera;
mod hittable;
mod material;
pub mod random;
mod rect;
mod renderer;
mod sphere;
mod texture;
mod triangle;

pub use bucket::{
    generate_buckets, render_bucket, render_parallel, Bucket, BucketResult, DEFAULT_BUCKET_SIZE,
};
pub use bvh::{BvhError, BvhNode};
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    Color, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterRecord,
};
pub use rect::{AxisRect, Plane};
pub use renderer::{
    color_to_rgba, linear_to_gamma, ray_color, render, render_pixel, Background, ImageBuffer,
    RenderConfig, SHADOW_EPSILON,
};
pub use sphere::{MovingSphere, Sphere};
pub use texture::{
    CheckerTexture, ImageTexture, NoiseTexture, Perlin, SolidColor, Texture, TextureError,
    TextureResult,
};
pub use triangle::Triangle;

/// Re-export the math types the renderer's API is written in
pub use lumen_math::{Aabb, Interval, Ray, Vec3};
