//! The globe model: a Lambert-shaded planet body and the two land particle
//! clouds sampled from a world map.

pub mod globe;
pub mod particles;
pub mod planet_body;
pub mod sprite;

pub use globe::{DEFAULT_BODY_RADIUS, Globe, GlobeParams};
pub use particles::{LandParticles, PARTICLE_COLOR, PARTICLE_OPACITY, ParticleStyle};
pub use planet_body::{BODY_COLOR, BODY_SEGMENTS, PlanetBody, sphere_geometry};
pub use sprite::{RADIAL_DOT_SIZE, load_sprite, load_sprite_or_default, radial_dot_sprite};
