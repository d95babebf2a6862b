//! Land classification of a single UV sample against the map raster.

use crate::map_image::{BYTES_PER_PIXEL, MapImage};

/// Pixel column and row addressed by the UV sample `(s1, s2)` on a `w`×`h` grid.
///
/// Both coordinates are truncated toward zero, so any `s < 1.0` stays inside
/// the grid.
pub fn pixel_coords(s1: f64, s2: f64, w: u32, h: u32) -> (u32, u32) {
    let col = (f64::from(w) * s1).trunc().max(0.0) as u32;
    let row = (f64::from(h) * s2).trunc().max(0.0) as u32;
    (col, row)
}

/// Whether the map pixel under `(s1, s2)` is land.
///
/// Land is a pixel whose red byte is exactly zero. A sample that maps outside
/// the raster is never land.
pub fn is_land_by_uv(s1: f64, s2: f64, w: u32, h: u32, image: &MapImage) -> bool {
    let (col, row) = pixel_coords(s1, s2, w, h);
    if col >= image.width() {
        return false;
    }
    let index = BYTES_PER_PIXEL * (row as usize * image.width() as usize + col as usize);
    image.byte(index) == Some(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_map() -> MapImage {
        // Left half land (red 0), right half sea.
        MapImage::from_fn(8, 4, |x, _| {
            if x < 4 { [0, 80, 40, 255] } else { [255, 255, 255, 255] }
        })
        .unwrap()
    }

    #[test]
    fn test_origin_reads_first_pixel() {
        assert_eq!(pixel_coords(0.0, 0.0, 8, 4), (0, 0));
        let map =
            MapImage::from_fn(8, 4, |x, y| if x == 0 && y == 0 { [0; 4] } else { [1; 4] }).unwrap();
        assert!(is_land_by_uv(0.0, 0.0, 8, 4, &map));
        assert!(!is_land_by_uv(0.2, 0.0, 8, 4, &map));
    }

    #[test]
    fn test_upper_edge_stays_in_bounds() {
        let (col, row) = pixel_coords(0.999_999, 0.999_999, 8, 4);
        assert_eq!(col, 7, "column must not reach the image width");
        assert_eq!(row, 3, "row must not reach the image height");
    }

    #[test]
    fn test_only_red_channel_matters() {
        let map = split_map();
        assert!(is_land_by_uv(0.1, 0.5, 8, 4, &map));
        assert!(!is_land_by_uv(0.9, 0.5, 8, 4, &map));
    }

    #[test]
    fn test_out_of_range_is_not_land() {
        let map = MapImage::from_fn(2, 2, |_, _| [0, 0, 0, 255]).unwrap();
        assert!(!is_land_by_uv(1.0, 0.0, 2, 2, &map), "column == width");
        assert!(!is_land_by_uv(0.0, 1.0, 2, 2, &map), "row == height");
        assert!(!is_land_by_uv(0.5, 0.5, 4, 4, &map), "grid larger than raster");
    }
}
