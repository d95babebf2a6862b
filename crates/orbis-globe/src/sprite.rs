//! Point sprite images.

use std::path::Path;

use orbis_render::SpriteImage;

/// Edge length of the procedural dot.
pub const RADIAL_DOT_SIZE: u32 = 32;

/// Decode a sprite image file into RGBA8.
pub fn load_sprite(path: impl AsRef<Path>) -> Result<SpriteImage, image::ImageError> {
    let rgba = image::open(path)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(SpriteImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

/// A white disc whose alpha falls off smoothly from the centre to the edge.
pub fn radial_dot_sprite(size: u32) -> SpriteImage {
    let size = size.max(2);
    let half = size as f32 / 2.0;
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let dx = (x as f32 + 0.5 - half) / half;
            let dy = (y as f32 + 0.5 - half) / half;
            let d = (dx * dx + dy * dy).sqrt();
            let alpha = (1.0 - d).clamp(0.0, 1.0);
            let alpha = alpha * alpha * (3.0 - 2.0 * alpha);
            rgba.extend_from_slice(&[255, 255, 255, (alpha * 255.0).round() as u8]);
        }
    }
    SpriteImage {
        width: size,
        height: size,
        rgba,
    }
}

/// Load the sprite at `path`, falling back to [`radial_dot_sprite`] when it cannot be read.
pub fn load_sprite_or_default(path: impl AsRef<Path>) -> SpriteImage {
    let path = path.as_ref();
    match load_sprite(path) {
        Ok(sprite) => sprite,
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                %error,
                "point sprite unavailable, using procedural dot"
            );
            radial_dot_sprite(RADIAL_DOT_SIZE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radial_dot_is_bright_in_centre() {
        let dot = radial_dot_sprite(16);
        assert_eq!(dot.rgba.len(), 16 * 16 * 4);
        let alpha = |x: u32, y: u32| dot.rgba[((y * 16 + x) * 4 + 3) as usize];
        assert!(alpha(8, 8) > 200, "centre alpha {}", alpha(8, 8));
        assert_eq!(alpha(0, 0), 0, "corners are transparent");
    }

    #[test]
    fn test_missing_sprite_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let sprite = load_sprite_or_default(dir.path().join("dot.png"));
        assert_eq!(sprite.width, RADIAL_DOT_SIZE);
        assert_eq!(sprite.height, RADIAL_DOT_SIZE);
    }

    #[test]
    fn test_load_png_sprite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.png");
        image::RgbaImage::from_pixel(4, 4, image::Rgba([255, 255, 255, 128]))
            .save(&path)
            .unwrap();
        let sprite = load_sprite(&path).unwrap();
        assert_eq!((sprite.width, sprite.height), (4, 4));
        assert_eq!(sprite.rgba[3], 128);
    }
}
