use std::sync::Arc;
use std::time::{Duration, Instant};

use orbis_globe::{Globe, GlobeParams, radial_dot_sprite};
use orbis_landmass::RandomAssigner;
use orbis_render::{Scene, SceneObject};

fn write_map(dir: &std::path::Path) -> std::path::PathBuf {
    // Land is a band around the equator.
    let img = image::RgbaImage::from_fn(120, 60, |_, y| {
        if (20..40).contains(&y) {
            image::Rgba([0, 90, 30, 255])
        } else {
            image::Rgba([40, 60, 200, 255])
        }
    });
    let path = dir.join("earth.png");
    img.save(&path).unwrap();
    path
}

fn poll_until_built(globe: &mut Globe, assigner: &mut RandomAssigner) -> orbis_globe::LandParticles {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        if let Some(particles) = globe.poll_particles(assigner) {
            return particles;
        }
        assert!(globe.is_loading(), "load failed");
        assert!(Instant::now() < deadline, "map load never resolved");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn test_globe_populates_scene() {
    let dir = tempfile::tempdir().unwrap();
    let mut params = GlobeParams::new(write_map(dir.path()), Arc::new(radial_dot_sprite(16)));
    params.sampler.step = 60;
    let mut globe = Globe::new(params);

    let mut scene = Scene::new();
    scene.add(globe.body_object());

    let particles = poll_until_built(&mut globe, &mut RandomAssigner::seeded(3));
    scene.add(particles.to_scene_object());

    assert_eq!(scene.objects().len(), 2);
    assert!(matches!(scene.objects()[1], SceneObject::Group { .. }));
    assert!(particles.total_points() > 0);

    for geometry in particles.geometries() {
        for p in &geometry.positions {
            assert!((p.length() - 100.0).abs() < 1e-2, "point {p} off the shell");
        }
    }
}

#[test]
fn test_same_seed_same_particles() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_map(dir.path());
    let build = || {
        let mut params = GlobeParams::new(&path, Arc::new(radial_dot_sprite(16)));
        params.sampler.step = 40;
        let mut globe = Globe::new(params);
        poll_until_built(&mut globe, &mut RandomAssigner::seeded(11))
    };
    let a = build();
    let b = build();
    assert_eq!(a.geometries()[0], b.geometries()[0]);
    assert_eq!(a.geometries()[1], b.geometries()[1]);
}

#[test]
fn test_missing_map_leaves_bare_body() {
    let dir = tempfile::tempdir().unwrap();
    let params = GlobeParams::new(dir.path().join("nope.jpg"), Arc::new(radial_dot_sprite(16)));
    let mut globe = Globe::new(params);
    let mut assigner = RandomAssigner::seeded(0);

    let deadline = Instant::now() + Duration::from_secs(10);
    while globe.is_loading() {
        assert!(globe.poll_particles(&mut assigner).is_none());
        assert!(Instant::now() < deadline);
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(globe.poll_particles(&mut assigner).is_none());
}
