//! Landmass sampling: walk a latitude/longitude grid over the map, keep the
//! samples that land on dark-red pixels, and project them onto a sphere.

use glam::{DVec3, Vec3};

use crate::assign::CloudAssigner;
use crate::cloud::{LandmassClouds, SizePolicy};
use crate::land::is_land_by_uv;
use crate::map_image::MapImage;

/// Rows (latitude bands) walked by the sampler, and the extent of the inner loop.
pub const DEFAULT_STEP: u32 = 250;
/// Radius of the sphere the particles are projected onto.
pub const PARTICLE_SPHERE_RADIUS: f32 = 100.0;
/// Size recorded for land points on a size-stride step.
pub const LAND_POINT_SIZE: f32 = 6.0;
/// A size is recorded when the inner-loop variable is a multiple of this.
pub const SIZE_STRIDE: f64 = 3.0;
/// Default point size of the particle material; used as the pad value.
pub const MATERIAL_POINT_SIZE: f32 = 2.5;

#[derive(Clone, Debug, PartialEq)]
pub struct SamplerParams {
    pub step: u32,
    pub sphere_radius: f32,
    pub land_point_size: f32,
    pub size_stride: f64,
    pub size_policy: SizePolicy,
    pub pad_size: f32,
}

impl Default for SamplerParams {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            sphere_radius: PARTICLE_SPHERE_RADIUS,
            land_point_size: LAND_POINT_SIZE,
            size_stride: SIZE_STRIDE,
            size_policy: SizePolicy::Sparse,
            pad_size: MATERIAL_POINT_SIZE,
        }
    }
}

/// Inner-loop increment for latitude row `i`.
///
/// Smallest at the equator (`i = step / 2`) and largest at the poles, so
/// longitudinal density rises toward the equator.
pub fn adaptive_step(i: u32, step: u32) -> f64 {
    let step = f64::from(step);
    let i = f64::from(i);
    step * (1.0 - (i / step * std::f64::consts::PI).sin()) / step + 0.5
}

/// Spherical to Cartesian with `y` up: `phi` is the polar angle from +Y and
/// `theta` the azimuth measured from +Z toward +X.
///
/// Evaluated in double precision; only the resulting components are narrowed.
pub fn spherical_to_cartesian(radius: f64, phi: f64, theta: f64) -> Vec3 {
    let sin_phi = phi.sin();
    DVec3::new(
        radius * sin_phi * theta.sin(),
        radius * phi.cos(),
        radius * sin_phi * theta.cos(),
    )
    .as_vec3()
}

/// Turns a loaded [`MapImage`] into two landmass point clouds.
pub struct LandmassSampler {
    params: SamplerParams,
}

impl LandmassSampler {
    pub fn new(params: SamplerParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SamplerParams {
        &self.params
    }

    /// Sample `image`, routing each land point through `assigner`.
    ///
    /// Assigner values other than 0 go to the second cloud.
    pub fn sample(&self, image: &MapImage, assigner: &mut impl CloudAssigner) -> LandmassClouds {
        let params = &self.params;
        let step = f64::from(params.step);
        let (w, h) = (image.width(), image.height());
        let mut out = LandmassClouds::default();

        for i in 0..params.step {
            let radians = adaptive_step(i, params.step);
            let s2 = f64::from(i) / step;
            let mut j = 0.0_f64;
            while j < step {
                let s1 = j / step;
                out.visited_samples += 1;

                if is_land_by_uv(s1, s2, w, h, image) {
                    out.land_samples += 1;
                    let cloud = &mut out.clouds[assigner.assign().min(1)];

                    let theta = s1 * std::f64::consts::TAU - std::f64::consts::FRAC_PI_2;
                    let phi = s2 * std::f64::consts::PI;
                    cloud.push_position(spherical_to_cartesian(
                        f64::from(params.sphere_radius),
                        phi,
                        theta,
                    ));

                    if j % params.size_stride == 0.0 {
                        cloud.push_size(params.land_point_size);
                    } else if params.size_policy == SizePolicy::Padded {
                        cloud.push_size(params.pad_size);
                    }
                }

                j += radians;
            }
        }

        tracing::debug!(
            visited = out.visited_samples,
            land = out.land_samples,
            cloud_a = out.clouds[0].len(),
            cloud_b = out.clouds[1].len(),
            "landmass sampled"
        );
        out
    }
}

impl Default for LandmassSampler {
    fn default() -> Self {
        Self::new(SamplerParams::default())
    }
}
