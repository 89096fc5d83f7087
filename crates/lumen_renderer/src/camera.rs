//! Thin-lens camera for ray generation.

use crate::random::{gen_range, random_in_unit_disk};
use lumen_math::{Ray, Vec3};
use rand::RngCore;

/// Camera for generating rays into the scene.
///
/// Configure with the `with_*` builders, then call
/// [`initialize`](Camera::initialize) before asking for rays.
#[derive(Debug, Clone)]
pub struct Camera {
    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32,         // Vertical field of view in degrees
    aspect_ratio: f32, // Width / height
    aperture: f32,     // Lens diameter; 0 gives a pinhole
    focus_dist: f32,   // Distance from camera to plane of perfect focus

    // Shutter
    time0: f32,
    time1: f32,

    // Cached computed values (set by initialize())
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect_ratio: 16.0 / 9.0,
            aperture: 0.0,
            focus_dist: 1.0,
            time0: 0.0,
            time1: 0.0,
            // Cached values (initialized to defaults)
            lower_left_corner: Vec3::ZERO,
            horizontal: Vec3::ZERO,
            vertical: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            lens_radius: 0.0,
        }
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, aperture: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self
    }

    /// Set the image aspect ratio (width / height).
    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Rays get times uniformly spread over `[time0, time1]`.
    pub fn with_shutter(mut self, time0: f32, time1: f32) -> Self {
        self.time0 = time0;
        self.time1 = time1;
        self
    }

    /// Initialize the camera (must be called before generating rays).
    pub fn initialize(&mut self) {
        self.lens_radius = self.aperture / 2.0;

        // Calculate viewport dimensions
        let theta = self.vfov.to_radians();
        let half_height = (theta / 2.0).tan();
        let half_width = self.aspect_ratio * half_height;

        // Calculate camera basis vectors
        let w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(w).normalize();
        self.v = w.cross(self.u);

        self.lower_left_corner = self.look_from
            - half_width * self.focus_dist * self.u
            - half_height * self.focus_dist * self.v
            - self.focus_dist * w;
        self.horizontal = 2.0 * half_width * self.focus_dist * self.u;
        self.vertical = 2.0 * half_height * self.focus_dist * self.v;
    }

    /// Ray through image-plane coordinates `(s, t)`, both in `[0, 1]`,
    /// with `(0, 0)` at the bottom-left corner.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let rd = self.lens_radius * random_in_unit_disk(rng);
        let offset = self.u * rd.x + self.v * rd.y;
        let origin = self.look_from + offset;

        let direction = self.lower_left_corner + s * self.horizontal + t * self.vertical - origin;
        let time = if self.time1 > self.time0 {
            gen_range(rng, self.time0, self.time1)
        } else {
            self.time0
        };

        Ray::new(origin, direction, time)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
