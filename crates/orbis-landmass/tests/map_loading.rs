use std::time::{Duration, Instant};

use orbis_landmass::{
    FixedAssigner, LandmassSampler, LoadState, MapImageError, MapLoad, SamplerParams,
};

/// Write a PNG whose top half is land (red 0) and bottom half sea.
fn write_hemisphere_map(dir: &std::path::Path) -> std::path::PathBuf {
    let img = image::RgbaImage::from_fn(90, 45, |_, y| {
        if y < 22 {
            image::Rgba([0, 120, 40, 255])
        } else {
            image::Rgba([255, 255, 255, 255])
        }
    });
    let path = dir.join("hemisphere.png");
    img.save(&path).unwrap();
    path
}

#[test]
fn test_spawned_load_resolves_through_poll() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_hemisphere_map(dir.path());
    let mut load = MapLoad::spawn(&path).unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    let map = loop {
        match load.poll() {
            LoadState::Pending => {
                assert!(Instant::now() < deadline, "map load never resolved");
                std::thread::sleep(Duration::from_millis(5));
            }
            LoadState::Ready(result) => break result.unwrap(),
            LoadState::Consumed => panic!("result consumed before it was observed"),
        }
    };
    assert_eq!((map.width(), map.height()), (90, 45));
    assert!(matches!(load.poll(), LoadState::Consumed));
}

#[test]
fn test_northern_land_stays_in_northern_hemisphere() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_hemisphere_map(dir.path());
    let map = MapLoad::spawn(&path).unwrap().wait().unwrap();

    let sampler = LandmassSampler::new(SamplerParams {
        step: 60,
        ..Default::default()
    });
    let clouds = sampler.sample(&map, &mut FixedAssigner(1));
    assert!(clouds.clouds[0].is_empty());
    assert!(!clouds.clouds[1].is_empty());
    assert!(
        clouds.clouds[1].positions().iter().all(|p| p.y > -1e-3),
        "land sampled from the top rows must project to y >= 0"
    );
    assert!(clouds.land_samples < clouds.visited_samples);
}

#[test]
fn test_corrupt_file_is_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"not an image").unwrap();
    let err = MapLoad::spawn(&path).unwrap().wait().unwrap_err();
    assert!(matches!(err, MapImageError::Decode(_)));
}
