//! Writing rendered images to disk.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use lumen_renderer::{color_to_rgba, ImageBuffer};

/// Save `image` to `path`. `.ppm` is written as plain-text P3; any other
/// extension goes through the `image` crate.
pub fn save(image: &ImageBuffer, path: &Path) -> Result<()> {
    let is_ppm = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

    if is_ppm {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        write_ppm(image, &mut writer)?;
        writer.flush()?;
    } else {
        to_rgb_image(image)
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    log::info!("Saved {}", path.display());
    Ok(())
}

/// Plain PPM, top row first.
pub fn write_ppm<W: Write>(image: &ImageBuffer, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for y in 0..image.height {
        for x in 0..image.width {
            let [r, g, b, _] = color_to_rgba(image.get(x, y));
            writeln!(writer, "{} {} {}", r, g, b)?;
        }
    }

    Ok(())
}

pub fn to_rgb_image(image: &ImageBuffer) -> image::RgbImage {
    image::RgbImage::from_fn(image.width, image.height, |x, y| {
        let [r, g, b, _] = color_to_rgba(image.get(x, y));
        image::Rgb([r, g, b])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_renderer::Color;

    fn two_by_one() -> ImageBuffer {
        let mut image = ImageBuffer::new(2, 1);
        image.set(0, 0, Color::new(1.0, 0.25, 0.0));
        image.set(1, 0, Color::ZERO);
        image
    }

    #[test]
    fn test_ppm_layout() {
        let mut out = Vec::new();
        write_ppm(&two_by_one(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        // Gamma 2: 0.25 becomes 0.5, and 1.0 clamps to 0.999.
        assert_eq!(text, "P3\n2 1\n255\n255 127 0\n0 0 0\n");
    }

    #[test]
    fn test_rgb_image_matches_ppm() {
        let rgb = to_rgb_image(&two_by_one());
        assert_eq!(rgb.dimensions(), (2, 1));
        assert_eq!(rgb.get_pixel(0, 0).0, [255, 127, 0]);
        assert_eq!(rgb.get_pixel(1, 0).0, [0, 0, 0]);
    }
}
