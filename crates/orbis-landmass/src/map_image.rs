//! Decoded world-map raster: the pixel source for land detection.

use std::path::{Path, PathBuf};

/// Bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Errors produced while loading or constructing a [`MapImage`].
#[derive(Debug, thiserror::Error)]
pub enum MapImageError {
    /// The map file could not be read.
    #[error("failed to read map image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not a decodable image.
    #[error("failed to decode map image: {0}")]
    Decode(#[from] image::ImageError),

    /// Raw RGBA buffer length does not match the dimensions.
    #[error("map buffer is {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferSize {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    /// Width or height is zero.
    #[error("map dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    /// The loader thread exited without delivering a result.
    #[error("map loader worker exited before delivering a result")]
    WorkerGone,
}

/// An RGBA8 raster, row-major, top row first.
///
/// Read-only once constructed. The landmass sampler only ever reads the red
/// channel, but the full quad is kept so the buffer layout matches what a
/// canvas `getImageData` call would hand back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl MapImage {
    /// Wrap an already-decoded RGBA8 buffer.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, MapImageError> {
        if width == 0 || height == 0 {
            return Err(MapImageError::ZeroDimensions { width, height });
        }
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if rgba.len() != expected {
            return Err(MapImageError::BufferSize {
                actual: rgba.len(),
                expected,
                width,
                height,
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Decode an encoded image (PNG or JPEG) held in memory.
    pub fn from_encoded(bytes: &[u8]) -> Result<Self, MapImageError> {
        let decoded = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = decoded.dimensions();
        Self::from_rgba(width, height, decoded.into_raw())
    }

    /// Read and decode an image file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MapImageError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| MapImageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_encoded(&bytes)
    }

    /// Build a map where every pixel is produced by `f(x, y)`.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> [u8; 4],
    ) -> Result<Self, MapImageError> {
        let mut rgba = Vec::with_capacity(width as usize * height as usize * BYTES_PER_PIXEL);
        for y in 0..height {
            for x in 0..width {
                rgba.extend_from_slice(&f(x, y));
            }
        }
        Self::from_rgba(width, height, rgba)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The raw RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.rgba
    }

    /// Byte at `index`, or `None` past the end of the buffer.
    pub fn byte(&self, index: usize) -> Option<u8> {
        self.rgba.get(index).copied()
    }

    /// The RGBA quad at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let quad = self.rgba.get(start..start + BYTES_PER_PIXEL)?;
        Some([quad[0], quad[1], quad[2], quad[3]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba_rejects_wrong_length() {
        let err = MapImage::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            MapImageError::BufferSize {
                actual: 15,
                expected: 16,
                ..
            }
        ));
    }

    #[test]
    fn test_from_rgba_rejects_zero_dimensions() {
        let err = MapImage::from_rgba(0, 4, Vec::new()).unwrap_err();
        assert!(matches!(err, MapImageError::ZeroDimensions { .. }));
    }

    #[test]
    fn test_from_fn_rejects_zero_dimensions() {
        let err = MapImage::from_fn(0, 0, |_, _| [0; 4]).unwrap_err();
        assert!(matches!(
            err,
            MapImageError::ZeroDimensions {
                width: 0,
                height: 0
            }
        ));
        assert!(MapImage::from_fn(5, 0, |_, _| [0; 4]).is_err());
    }

    #[test]
    fn test_pixel_reads_row_major() {
        let map = MapImage::from_fn(3, 2, |x, y| [x as u8, y as u8, 7, 255]).unwrap();
        assert_eq!(map.pixel(2, 1), Some([2, 1, 7, 255]));
        assert_eq!(map.pixel(0, 0), Some([0, 0, 7, 255]));
        assert_eq!(map.pixel(3, 0), None);
        assert_eq!(map.pixel(0, 2), None);
    }

    #[test]
    fn test_from_encoded_png() {
        let img = image::RgbaImage::from_fn(4, 2, |x, _| {
            if x < 2 {
                image::Rgba([0, 0, 0, 255])
            } else {
                image::Rgba([200, 10, 10, 255])
            }
        });
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();

        let map = MapImage::from_encoded(&bytes).unwrap();
        assert_eq!((map.width(), map.height()), (4, 2));
        assert_eq!(map.pixel(0, 0).unwrap()[0], 0);
        assert_eq!(map.pixel(3, 1).unwrap()[0], 200);
    }

    #[test]
    fn test_open_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = MapImage::open(dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, MapImageError::Io { .. }));
    }
}
