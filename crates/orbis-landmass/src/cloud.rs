//! Point clouds produced by the landmass sampler.

use glam::Vec3;

/// How sizes are recorded relative to positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SizePolicy {
    /// Only every third inner-loop step records a size, so the size list is
    /// shorter than the position list. Renderers fall back to the material
    /// size for points without an entry.
    #[default]
    Sparse,
    /// Every land point records a size; points that would have been skipped
    /// receive the pad size.
    Padded,
}

/// Centre and radius enclosing every point of a cloud.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

/// Ordered positions plus ordered per-point sizes.
///
/// Built once by the sampler and read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointCloud {
    positions: Vec<Vec3>,
    sizes: Vec<f32>,
}

impl PointCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_position(&mut self, position: Vec3) {
        self.positions.push(position);
    }

    pub(crate) fn push_size(&mut self, size: f32) {
        self.sizes.push(size);
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    /// Number of points (positions) in the cloud.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions flattened to `[x0, y0, z0, x1, ...]` for a 3-component
    /// vertex attribute.
    pub fn position_buffer(&self) -> Vec<f32> {
        self.positions
            .iter()
            .flat_map(|p| p.to_array())
            .collect()
    }

    /// Size for the point at `index`, or `fallback` when no size was recorded.
    pub fn size_or(&self, index: usize, fallback: f32) -> f32 {
        self.sizes.get(index).copied().unwrap_or(fallback)
    }

    /// Bounding sphere centred on the axis-aligned box centre.
    ///
    /// An empty cloud yields a zero sphere at the origin.
    pub fn bounding_sphere(&self) -> BoundingSphere {
        let Some(first) = self.positions.first() else {
            return BoundingSphere::default();
        };
        let (min, max) = self
            .positions
            .iter()
            .fold((*first, *first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        let center = (min + max) * 0.5;
        let radius = self
            .positions
            .iter()
            .map(|p| p.distance_squared(center))
            .fold(0.0_f32, f32::max)
            .sqrt();
        BoundingSphere { center, radius }
    }
}

/// The two clouds emitted by one sampling run, plus bookkeeping counters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LandmassClouds {
    pub clouds: [PointCloud; 2],
    /// Every `(i, j)` pair the sampler evaluated.
    pub visited_samples: usize,
    /// Samples that passed the land test.
    pub land_samples: usize,
}

impl LandmassClouds {
    /// Points across both clouds.
    pub fn total_points(&self) -> usize {
        self.clouds.iter().map(PointCloud::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.clouds.iter().all(PointCloud::is_empty)
    }
}
