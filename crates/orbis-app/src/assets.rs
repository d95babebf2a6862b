//! Bundled map and sprite assets.
//!
//! Relative asset paths are tried against the working directory first, then
//! against this crate's `assets/` parent. When the world map is still missing
//! the copy compiled into the binary is used.

use std::path::{Path, PathBuf};

use orbis_landmass::{MapImage, MapLoad};

/// Equirectangular land mask compiled into the binary.
pub const BUNDLED_MAP: &[u8] = include_bytes!("../assets/earth.png");

/// Resolve `path` to an existing file when possible.
///
/// Absolute paths and paths that exist as given are returned unchanged.
pub fn resolve_asset_path(path: &Path) -> PathBuf {
    if path.is_absolute() || path.exists() {
        return path.to_path_buf();
    }
    let bundled = Path::new(env!("CARGO_MANIFEST_DIR")).join(path);
    if bundled.exists() {
        bundled
    } else {
        path.to_path_buf()
    }
}

/// Start loading the world map at `path`, falling back to [`BUNDLED_MAP`]
/// when no such file exists.
pub fn start_map_load(path: &Path) -> MapLoad {
    if path.is_file() {
        match MapLoad::spawn(path) {
            Ok(load) => return load,
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "map worker failed to start");
            }
        }
    } else {
        tracing::info!(path = %path.display(), "map not found, using bundled map");
    }
    MapLoad::ready(path, MapImage::from_encoded(BUNDLED_MAP))
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbis_landmass::LoadState;

    #[test]
    fn test_bundled_map_decodes() {
        let map = MapImage::from_encoded(BUNDLED_MAP).unwrap();
        assert_eq!((map.width(), map.height()), (720, 360));
        // Half-degree pixels: central Africa is land, the equatorial Pacific is not.
        assert_eq!(map.pixel(400, 170).unwrap()[0], 0);
        assert_ne!(map.pixel(60, 180).unwrap()[0], 0);
    }

    #[test]
    fn test_relative_asset_resolves_to_crate_dir() {
        let resolved = resolve_asset_path(Path::new("assets/earth.png"));
        assert!(resolved.is_file());
        let resolved = resolve_asset_path(Path::new("assets/dot.png"));
        assert!(resolved.is_file());
    }

    #[test]
    fn test_missing_asset_is_left_alone() {
        let path = Path::new("assets/no-such-map.png");
        assert_eq!(resolve_asset_path(path), path);
    }

    #[test]
    fn test_missing_map_falls_back_to_bundled() {
        let mut load = start_map_load(Path::new("/nonexistent/earth.png"));
        match load.poll() {
            LoadState::Ready(Ok(map)) => assert_eq!(map.width(), 720),
            other => panic!("expected bundled map, got {other:?}"),
        }
    }
}
