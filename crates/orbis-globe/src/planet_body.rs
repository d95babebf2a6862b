//! The planet body: a latitude/longitude sphere in a flat Lambert colour.

use std::sync::Arc;

use glam::Vec3;
use orbis_render::{
    Color, LambertMaterial, Mesh, MeshGeometry, SceneObject, VertexPositionNormalUv,
};

/// Body colour, a saturated ocean blue.
pub const BODY_COLOR: u32 = 0x0689c9;
/// Longitudinal and latitudinal segment count.
pub const BODY_SEGMENTS: u32 = 100;

/// Build a UV sphere with `width_segments` around and `height_segments` pole to pole.
///
/// Vertices form a `(width_segments + 1) x (height_segments + 1)` grid with a
/// duplicated seam column. The first and last rows collapse onto the poles and
/// emit only one triangle per quad. UVs run `u` around from the seam and `v`
/// from 1 at the north pole to 0 at the south pole; pole vertices are shifted
/// half a segment so each pole triangle samples its own column.
pub fn sphere_geometry(radius: f32, width_segments: u32, height_segments: u32) -> MeshGeometry {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let mut vertices = Vec::with_capacity(((width_segments + 1) * (height_segments + 1)) as usize);
    let mut grid = Vec::with_capacity(height_segments as usize + 1);

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let u_offset = if iy == 0 {
            0.5 / width_segments as f32
        } else if iy == height_segments {
            -0.5 / width_segments as f32
        } else {
            0.0
        };

        let mut row = Vec::with_capacity(width_segments as usize + 1);
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let phi = u * std::f32::consts::TAU;
            let theta = v * std::f32::consts::PI;
            let position = Vec3::new(
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            );
            let normal = position.try_normalize().unwrap_or(Vec3::Y);

            row.push(vertices.len() as u32);
            vertices.push(VertexPositionNormalUv {
                position: position.to_array(),
                normal: normal.to_array(),
                uv: [u + u_offset, 1.0 - v],
            });
        }
        grid.push(row);
    }

    let mut indices = Vec::with_capacity((width_segments * (height_segments - 1) * 6) as usize);
    for iy in 0..height_segments as usize {
        for ix in 0..width_segments as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];

            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments as usize - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    MeshGeometry { vertices, indices }
}

/// Sphere mesh plus material. Immutable once built.
#[derive(Clone, Debug)]
pub struct PlanetBody {
    radius: f32,
    width_segments: u32,
    height_segments: u32,
    geometry: Arc<MeshGeometry>,
    material: LambertMaterial,
}

impl PlanetBody {
    pub fn new(radius: f32) -> Self {
        Self::with_color(radius, Color::from_hex(BODY_COLOR))
    }

    pub fn with_color(radius: f32, color: Color) -> Self {
        Self {
            radius,
            width_segments: BODY_SEGMENTS,
            height_segments: BODY_SEGMENTS,
            geometry: Arc::new(sphere_geometry(radius, BODY_SEGMENTS, BODY_SEGMENTS)),
            material: LambertMaterial::new(color),
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// `(width_segments, height_segments)`.
    pub fn tessellation(&self) -> (u32, u32) {
        (self.width_segments, self.height_segments)
    }

    pub fn geometry(&self) -> &MeshGeometry {
        &self.geometry
    }

    pub fn material(&self) -> &LambertMaterial {
        &self.material
    }

    /// Radius of the sphere enclosing every vertex, centred on the origin.
    pub fn bounding_radius(&self) -> f32 {
        self.geometry
            .vertices
            .iter()
            .map(|v| Vec3::from_array(v.position).length())
            .fold(0.0, f32::max)
    }

    pub fn to_scene_object(&self) -> SceneObject {
        SceneObject::Mesh(Mesh {
            name: "planet-body".into(),
            geometry: Arc::clone(&self.geometry),
            material: self.material,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_radius_equals_radius() {
        for radius in [1.0_f32, 50.0, 100.0] {
            let body = PlanetBody::new(radius);
            assert!(
                (body.bounding_radius() - radius).abs() < radius * 1e-5,
                "radius {radius} gave bounding radius {}",
                body.bounding_radius()
            );
        }
    }

    #[test]
    fn test_tessellation_is_100_by_100() {
        let body = PlanetBody::new(80.0);
        assert_eq!(body.tessellation(), (100, 100));
        assert_eq!(body.geometry().vertices.len(), 101 * 101);
        assert_eq!(body.geometry().triangle_count(), 100 * 99 * 2);
    }

    #[test]
    fn test_material_color() {
        let body = PlanetBody::new(80.0);
        assert_eq!(body.material().color.to_hex(), BODY_COLOR);
    }

    #[test]
    fn test_indices_in_range() {
        let geometry = sphere_geometry(1.0, 8, 6);
        let n = geometry.vertices.len() as u32;
        assert!(geometry.indices.iter().all(|&i| i < n));
        assert_eq!(geometry.indices.len() % 3, 0);
    }

    #[test]
    fn test_normals_are_unit_and_outward() {
        let geometry = sphere_geometry(10.0, 12, 8);
        for v in &geometry.vertices {
            let n = Vec3::from_array(v.normal);
            let p = Vec3::from_array(v.position);
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!(n.dot(p) > 0.0);
        }
    }

    #[test]
    fn test_triangles_wind_outward() {
        let geometry = sphere_geometry(1.0, 16, 8);
        let pos = |i: u32| Vec3::from_array(geometry.vertices[i as usize].position);
        for tri in geometry.indices.chunks(3) {
            let (a, b, c) = (pos(tri[0]), pos(tri[1]), pos(tri[2]));
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "triangle {tri:?} faces inward");
        }
    }

    #[test]
    fn test_scene_object_is_mesh() {
        let body = PlanetBody::new(10.0);
        assert!(matches!(body.to_scene_object(), SceneObject::Mesh(_)));
    }
}
