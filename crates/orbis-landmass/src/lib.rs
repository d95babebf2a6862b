//! Landmass particle sampling: world-map rasters turned into spherical point clouds.
//!
//! - [`MapImage`] holds the decoded RGBA map and [`MapLoad`] decodes one off-thread.
//! - [`is_land_by_uv`] classifies a single UV sample.
//! - [`LandmassSampler`] walks the map and emits [`LandmassClouds`].

pub mod assign;
pub mod cloud;
pub mod land;
pub mod loader;
pub mod map_image;
pub mod sampler;

pub use assign::{CloudAssigner, FixedAssigner, RandomAssigner};
pub use cloud::{BoundingSphere, LandmassClouds, PointCloud, SizePolicy};
pub use land::{is_land_by_uv, pixel_coords};
pub use loader::{LoadState, MapLoad};
pub use map_image::{MapImage, MapImageError};
pub use sampler::{
    DEFAULT_STEP, LAND_POINT_SIZE, LandmassSampler, MATERIAL_POINT_SIZE, PARTICLE_SPHERE_RADIUS,
    SIZE_STRIDE, SamplerParams, adaptive_step, spherical_to_cartesian,
};
