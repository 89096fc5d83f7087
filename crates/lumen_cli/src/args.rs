//! Command-line options.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};

use crate::scenes::SceneKind;

pub const USAGE: &str = "\
Usage: lumen [OPTIONS]

Options:
  --scene <NAME>      quick, random, two_spheres, two_perlin_spheres, earth, cornell [default: random]
  --width <PIXELS>    image width [default: 400]
  --height <PIXELS>   image height [default: 200]
  --spp <N>           samples per pixel [default: 50]
  --depth <N>         maximum bounce depth [default: 50]
  --seed <N>          render seed [default: random]
  --threads <N>       worker threads [default: all cores]
  --texture <PATH>    image used by the earth scene [default: earthmap.jpg]
  --output <PATH>     .ppm or any format `image` can write [default: scene.ppm]
  -h, --help          print this message";

/// Everything one render needs from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub scene: SceneKind,
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    pub seed: Option<u64>,
    pub threads: Option<usize>,
    pub texture: PathBuf,
    pub output: PathBuf,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            scene: SceneKind::Random,
            width: 400,
            height: 200,
            samples_per_pixel: 50,
            max_depth: 50,
            seed: None,
            threads: None,
            texture: PathBuf::from("earthmap.jpg"),
            output: PathBuf::from("scene.ppm"),
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Render(Options),
    Help,
}

impl Options {
    /// Parse arguments, not including the program name.
    pub fn parse<I>(args: I) -> Result<Command>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Options::default();
        let mut args = args.into_iter();

        while let Some(flag) = args.next() {
            if flag == "-h" || flag == "--help" {
                return Ok(Command::Help);
            }

            let value = args
                .next()
                .ok_or_else(|| anyhow!("missing value for {}", flag))?;

            match flag.as_str() {
                "--scene" => options.scene = value.parse()?,
                "--width" => options.width = parse_positive(&flag, &value)?,
                "--height" => options.height = parse_positive(&flag, &value)?,
                "--spp" => options.samples_per_pixel = parse_positive(&flag, &value)?,
                "--depth" => options.max_depth = parse_number(&flag, &value)?,
                "--seed" => options.seed = Some(parse_number(&flag, &value)?),
                "--threads" => options.threads = Some(parse_positive(&flag, &value)?),
                "--texture" => options.texture = PathBuf::from(value),
                "--output" => options.output = PathBuf::from(value),
                _ => bail!("unknown option {}\n\n{}", flag, USAGE),
            }
        }

        Ok(Command::Render(options))
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

fn parse_number<T>(flag: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("invalid value {:?} for {}", value, flag))
}

fn parse_positive<T>(flag: &str, value: &str) -> Result<T>
where
    T: FromStr + Default + PartialEq,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let n: T = parse_number(flag, value)?;
    if n == T::default() {
        bail!("{} must be greater than zero", flag);
    }
    Ok(n)
}
