//! Built-in scenes.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use lumen_renderer::random::gen_f32;
use lumen_renderer::{
    AxisRect, Background, BvhNode, Camera, CheckerTexture, Color, Dielectric, DiffuseLight,
    Hittable, ImageTexture, Interval, Lambertian, Metal, MovingSphere, NoiseTexture, Sphere,
    Texture, Triangle, Vec3,
};
use rand::RngCore;

/// Shutter interval shared by every scene's camera and BVH.
const SHUTTER: Interval = Interval::new(0.0, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    /// Five spheres, one of them a hollow glass bubble.
    Quick,
    /// The cover scene: a field of small spheres around three large ones.
    Random,
    TwoSpheres,
    TwoPerlinSpheres,
    /// A globe textured from an image on disk.
    Earth,
    /// An enclosed box lit only by an area light.
    Cornell,
}

impl SceneKind {
    pub const ALL: [SceneKind; 6] = [
        SceneKind::Quick,
        SceneKind::Random,
        SceneKind::TwoSpheres,
        SceneKind::TwoPerlinSpheres,
        SceneKind::Earth,
        SceneKind::Cornell,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SceneKind::Quick => "quick",
            SceneKind::Random => "random",
            SceneKind::TwoSpheres => "two_spheres",
            SceneKind::TwoPerlinSpheres => "two_perlin_spheres",
            SceneKind::Earth => "earth",
            SceneKind::Cornell => "cornell",
        }
    }
}

impl FromStr for SceneKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match SceneKind::ALL.iter().find(|kind| kind.name() == s) {
            Some(kind) => Ok(*kind),
            None => bail!("unknown scene {:?}", s),
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A world ready to render.
pub struct Scene {
    pub world: BvhNode,
    pub camera: Camera,
    pub background: Background,
}

/// Build `kind` for an image with the given aspect ratio. `texture` is only
/// read by the earth scene.
pub fn build(
    kind: SceneKind,
    aspect_ratio: f32,
    texture: &Path,
    rng: &mut dyn RngCore,
) -> Result<Scene> {
    let objects = match kind {
        SceneKind::Quick => quick(),
        SceneKind::Random => random(rng),
        SceneKind::TwoSpheres => two_spheres(),
        SceneKind::TwoPerlinSpheres => two_perlin_spheres(rng),
        SceneKind::Earth => earth(texture)?,
        SceneKind::Cornell => cornell(),
    };
    log::info!("Scene '{}' has {} objects", kind, objects.len());

    let world = BvhNode::new(objects, SHUTTER, rng)
        .with_context(|| format!("failed to build BVH for scene '{}'", kind))?;

    let (camera, background) = match kind {
        SceneKind::Quick => (
            Camera::new()
                .with_position(Vec3::new(-2.0, 2.0, 1.0), Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
                .with_lens(40.0, 0.0, 1.0),
            Background::SkyGradient,
        ),
        SceneKind::Cornell => (
            Camera::new()
                .with_position(
                    Vec3::new(278.0, 278.0, -800.0),
                    Vec3::new(278.0, 278.0, 0.0),
                    Vec3::Y,
                )
                .with_lens(40.0, 0.0, 10.0),
            Background::Solid(Color::ZERO),
        ),
        _ => (
            Camera::new()
                .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
                .with_lens(20.0, 0.0, 10.0),
            Background::SkyGradient,
        ),
    };

    let mut camera = camera
        .with_aspect_ratio(aspect_ratio)
        .with_shutter(SHUTTER.min, SHUTTER.max);
    camera.initialize();

    Ok(Scene {
        world,
        camera,
        background,
    })
}

fn checker() -> Arc<dyn Texture> {
    Arc::new(CheckerTexture::from_colors(
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ))
}

fn quick() -> Vec<Box<dyn Hittable>> {
    vec![
        Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Lambertian::from_color(Color::new(0.1, 0.2, 0.5)),
        )),
        Box::new(Sphere::new(
            Vec3::new(0.0, -100.5, -1.0),
            100.0,
            Lambertian::from_color(Color::new(0.8, 0.8, 0.0)),
        )),
        Box::new(Sphere::new(
            Vec3::new(1.0, 0.0, -1.0),
            0.5,
            Metal::new(Color::new(0.8, 0.6, 0.2), 0.0),
        )),
        // Negative radius flips the normals inward, hollowing the outer sphere.
        Box::new(Sphere::new(Vec3::new(-1.0, 0.0, -1.0), 0.5, Dielectric::new(1.5))),
        Box::new(Sphere::new(Vec3::new(-1.0, 0.0, -1.0), -0.45, Dielectric::new(1.5))),
    ]
}

fn random(rng: &mut dyn RngCore) -> Vec<Box<dyn Hittable>> {
    let mut objects: Vec<Box<dyn Hittable>> = Vec::new();

    objects.push(Box::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Lambertian::new(checker()),
    )));

    for a in -10..10 {
        for b in -10..10 {
            let choose_mat = gen_f32(rng);
            let center = Vec3::new(
                a as f32 + 0.9 * gen_f32(rng),
                0.2,
                b as f32 + 0.9 * gen_f32(rng),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                let albedo = Color::new(
                    gen_f32(rng) * gen_f32(rng),
                    gen_f32(rng) * gen_f32(rng),
                    gen_f32(rng) * gen_f32(rng),
                );
                let rise = Vec3::new(0.0, 0.5 * gen_f32(rng), 0.0);
                objects.push(Box::new(MovingSphere::new(
                    center,
                    center + rise,
                    SHUTTER.min,
                    SHUTTER.max,
                    0.2,
                    Lambertian::from_color(albedo),
                )));
            } else if choose_mat < 0.95 {
                let albedo = Color::new(
                    0.5 * (1.0 + gen_f32(rng)),
                    0.5 * (1.0 + gen_f32(rng)),
                    0.5 * (1.0 + gen_f32(rng)),
                );
                let fuzz = 0.5 * gen_f32(rng);
                objects.push(Box::new(Sphere::new(center, 0.2, Metal::new(albedo, fuzz))));
            } else {
                objects.push(Box::new(Sphere::new(center, 0.2, Dielectric::new(1.5))));
            }
        }
    }

    objects.push(Box::new(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Dielectric::new(1.5),
    )));
    objects.push(Box::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Lambertian::from_color(Color::new(0.4, 0.2, 0.1)),
    )));
    objects.push(Box::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Metal::new(Color::new(0.7, 0.6, 0.5), 0.0),
    )));

    objects
}

fn two_spheres() -> Vec<Box<dyn Hittable>> {
    let checker = checker();
    vec![
        Box::new(Sphere::new(
            Vec3::new(0.0, -10.0, 0.0),
            10.0,
            Lambertian::new(checker.clone()),
        )),
        Box::new(Sphere::new(
            Vec3::new(0.0, 10.0, 0.0),
            10.0,
            Lambertian::new(checker),
        )),
    ]
}

fn two_perlin_spheres(rng: &mut dyn RngCore) -> Vec<Box<dyn Hittable>> {
    let noise: Arc<dyn Texture> = Arc::new(NoiseTexture::new(4.0, rng));
    vec![
        Box::new(Sphere::new(
            Vec3::new(0.0, -1000.0, 0.0),
            1000.0,
            Lambertian::new(noise.clone()),
        )),
        Box::new(Sphere::new(
            Vec3::new(0.0, 2.0, 0.0),
            2.0,
            Lambertian::new(noise),
        )),
    ]
}

fn earth(texture: &Path) -> Result<Vec<Box<dyn Hittable>>> {
    let map = ImageTexture::load(texture)
        .with_context(|| format!("failed to load earth texture {}", texture.display()))?;
    Ok(vec![Box::new(Sphere::new(
        Vec3::ZERO,
        2.0,
        Lambertian::new(Arc::new(map)),
    ))])
}

fn cornell() -> Vec<Box<dyn Hittable>> {
    let red = || Lambertian::from_color(Color::new(0.65, 0.05, 0.05));
    let white = || Lambertian::from_color(Color::splat(0.73));
    let green = || Lambertian::from_color(Color::new(0.12, 0.45, 0.15));

    vec![
        Box::new(AxisRect::yz(0.0, 555.0, 0.0, 555.0, 555.0, green())),
        Box::new(AxisRect::yz(0.0, 555.0, 0.0, 555.0, 0.0, red())),
        Box::new(AxisRect::xz(
            213.0,
            343.0,
            227.0,
            332.0,
            554.0,
            DiffuseLight::from_color(Color::splat(15.0)),
        )),
        Box::new(AxisRect::xz(0.0, 555.0, 0.0, 555.0, 0.0, white())),
        Box::new(AxisRect::xz(0.0, 555.0, 0.0, 555.0, 555.0, white())),
        Box::new(AxisRect::xy(0.0, 555.0, 0.0, 555.0, 555.0, white())),
        Box::new(Sphere::new(
            Vec3::new(190.0, 90.0, 190.0),
            90.0,
            Dielectric::new(1.5),
        )),
        Box::new(Sphere::new(
            Vec3::new(380.0, 120.0, 360.0),
            120.0,
            Metal::new(Color::new(0.8, 0.85, 0.88), 0.05),
        )),
        // A tent on the floor in the back-left corner.
        Box::new(Triangle::new(
            Vec3::new(60.0, 0.0, 420.0),
            Vec3::new(200.0, 0.0, 480.0),
            Vec3::new(120.0, 160.0, 460.0),
            white(),
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_renderer::{Ray, RenderConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn missing_texture() -> &'static Path {
        Path::new("does/not/exist.jpg")
    }

    #[test]
    fn test_names_round_trip() {
        for kind in SceneKind::ALL {
            assert_eq!(kind.name().parse::<SceneKind>().unwrap(), kind);
        }
        assert!("Quick".parse::<SceneKind>().is_err());
    }

    #[test]
    fn test_every_scene_builds() {
        let mut rng = StdRng::seed_from_u64(1);
        for kind in SceneKind::ALL {
            if kind == SceneKind::Earth {
                continue;
            }
            let scene = build(kind, 2.0, missing_texture(), &mut rng).unwrap();
            assert!(scene.world.len() > 0, "{} is empty", kind);
        }
    }

    #[test]
    fn test_earth_reports_missing_texture() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = build(SceneKind::Earth, 2.0, missing_texture(), &mut rng)
            .err()
            .expect("missing texture should fail");
        assert!(format!("{:#}", err).contains("exist.jpg"));
    }

    #[test]
    fn test_random_scene_object_count() {
        let mut rng = StdRng::seed_from_u64(3);
        let objects = random(&mut rng);
        // Ground plus three large spheres plus at most 400 small ones.
        assert!(objects.len() > 4 && objects.len() <= 404);
    }

    #[test]
    fn test_quick_camera_sees_blue_sphere() {
        let mut rng = StdRng::seed_from_u64(1);
        let scene = build(SceneKind::Quick, 2.0, missing_texture(), &mut rng).unwrap();
        let towards = Vec3::new(0.0, 0.0, -1.0) - Vec3::new(-2.0, 2.0, 1.0);
        let ray = Ray::new_simple(Vec3::new(-2.0, 2.0, 1.0), towards);
        let rec = scene
            .world
            .hit(&ray, Interval::new(0.001, f32::INFINITY))
            .expect("look-at ray should hit");
        assert!(((rec.p - Vec3::new(0.0, 0.0, -1.0)).length() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_cornell_light_reaches_camera() {
        let mut rng = StdRng::seed_from_u64(1);
        let scene = build(SceneKind::Cornell, 1.0, missing_texture(), &mut rng).unwrap();
        let config = RenderConfig {
            samples_per_pixel: 1,
            max_depth: 4,
            background: scene.background,
        };

        // Straight up from the floor into the light.
        let ray = Ray::new_simple(Vec3::new(278.0, 1.0, 280.0), Vec3::Y);
        let color = lumen_renderer::ray_color(&ray, &scene.world, 0, &config, &mut rng);
        assert_eq!(color, Color::splat(15.0));
    }
}
