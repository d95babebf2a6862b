//! Land particle groups built from sampled point clouds.

use std::sync::Arc;

use orbis_landmass::{BoundingSphere, LandmassClouds, MATERIAL_POINT_SIZE, PointCloud};
use orbis_render::{
    Blending, Color, PointGeometry, Points, PointsMaterial, SceneObject, Side, SpriteImage,
};

/// Particle tint, a pale cyan.
pub const PARTICLE_COLOR: u32 = 0xa9effc;
/// Particle opacity before additive blending.
pub const PARTICLE_OPACITY: f32 = 0.7;

/// Appearance shared by both land clouds.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleStyle {
    pub size: f32,
    pub color: Color,
    pub opacity: f32,
    /// Draw each point at its own size instead of `size`.
    pub vertex_sizes: bool,
}

impl Default for ParticleStyle {
    fn default() -> Self {
        Self {
            size: MATERIAL_POINT_SIZE,
            color: Color::from_hex(PARTICLE_COLOR),
            opacity: PARTICLE_OPACITY,
            vertex_sizes: false,
        }
    }
}

impl ParticleStyle {
    /// Additive, depth-neutral sprite material.
    pub fn material(&self, sprite: Arc<SpriteImage>) -> PointsMaterial {
        PointsMaterial {
            size: self.size,
            color: self.color,
            map: Some(sprite),
            depth_write: false,
            transparent: true,
            opacity: self.opacity,
            side: Side::Front,
            blending: Blending::Additive,
            vertex_sizes: self.vertex_sizes,
        }
    }
}

fn point_geometry(cloud: &PointCloud) -> PointGeometry {
    PointGeometry {
        positions: cloud.positions().to_vec(),
        sizes: cloud.sizes().to_vec(),
    }
}

/// The two land point sets, drawn as one group with a single shared material.
#[derive(Clone, Debug)]
pub struct LandParticles {
    geometries: [Arc<PointGeometry>; 2],
    bounds: [BoundingSphere; 2],
    material: Arc<PointsMaterial>,
}

impl LandParticles {
    pub fn new(clouds: &LandmassClouds, style: &ParticleStyle, sprite: Arc<SpriteImage>) -> Self {
        let [first, second] = &clouds.clouds;
        Self {
            geometries: [
                Arc::new(point_geometry(first)),
                Arc::new(point_geometry(second)),
            ],
            bounds: [first.bounding_sphere(), second.bounding_sphere()],
            material: Arc::new(style.material(sprite)),
        }
    }

    pub fn geometries(&self) -> &[Arc<PointGeometry>; 2] {
        &self.geometries
    }

    pub fn bounding_spheres(&self) -> &[BoundingSphere; 2] {
        &self.bounds
    }

    pub fn material(&self) -> &Arc<PointsMaterial> {
        &self.material
    }

    pub fn total_points(&self) -> usize {
        self.geometries.iter().map(|g| g.len()).sum()
    }

    pub fn to_scene_object(&self) -> SceneObject {
        let children = self
            .geometries
            .iter()
            .enumerate()
            .map(|(i, geometry)| {
                SceneObject::Points(Points {
                    name: format!("land-particles-{i}"),
                    geometry: Arc::clone(geometry),
                    material: Arc::clone(&self.material),
                })
            })
            .collect();
        SceneObject::Group {
            name: "land-particles".into(),
            children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbis_landmass::{FixedAssigner, LandmassSampler, MapImage, SamplerParams};

    fn all_land_clouds() -> LandmassClouds {
        let image = MapImage::from_fn(16, 8, |_, _| [0, 0, 0, 255]).unwrap();
        let sampler = LandmassSampler::new(SamplerParams {
            step: 20,
            ..SamplerParams::default()
        });
        sampler.sample(&image, &mut FixedAssigner(0))
    }

    #[test]
    fn test_default_style() {
        let style = ParticleStyle::default();
        assert_eq!(style.size, 2.5);
        assert_eq!(style.color.to_hex(), PARTICLE_COLOR);
        assert_eq!(style.opacity, 0.7);
        assert!(!style.vertex_sizes);
    }

    #[test]
    fn test_material_flags() {
        let material = ParticleStyle::default().material(Arc::new(crate::radial_dot_sprite(8)));
        assert!(material.map.is_some());
        assert!(!material.depth_write);
        assert!(material.transparent);
        assert_eq!(material.side, Side::Front);
        assert_eq!(material.blending, Blending::Additive);
    }

    #[test]
    fn test_group_shares_one_material() {
        let particles = LandParticles::new(
            &all_land_clouds(),
            &ParticleStyle::default(),
            Arc::new(crate::radial_dot_sprite(8)),
        );
        let SceneObject::Group { name, children } = particles.to_scene_object() else {
            panic!("expected a group");
        };
        assert_eq!(name, "land-particles");
        assert_eq!(children.len(), 2);

        let materials: Vec<_> = children
            .iter()
            .map(|child| match child {
                SceneObject::Points(points) => Arc::clone(&points.material),
                other => panic!("unexpected child {}", other.name()),
            })
            .collect();
        assert!(Arc::ptr_eq(&materials[0], &materials[1]));
    }

    #[test]
    fn test_geometry_mirrors_clouds() {
        let clouds = all_land_clouds();
        let particles = LandParticles::new(
            &clouds,
            &ParticleStyle::default(),
            Arc::new(crate::radial_dot_sprite(8)),
        );
        assert_eq!(particles.total_points(), clouds.total_points());
        assert_eq!(particles.geometries()[0].len(), clouds.clouds[0].len());
        assert_eq!(particles.geometries()[0].sizes, clouds.clouds[0].sizes());
        assert!(particles.geometries()[1].is_empty());
    }
}
