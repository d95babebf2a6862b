//! The globe: planet body plus land particles sampled once the map arrives.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use orbis_landmass::{
    CloudAssigner, LandmassSampler, LoadState, MapImageError, MapLoad, SamplerParams,
};
use orbis_render::{Color, SceneObject, SpriteImage};

use crate::particles::{LandParticles, ParticleStyle};
use crate::planet_body::{BODY_COLOR, PlanetBody};

/// Radius of the planet body; the particle shell sits at the sampler radius.
pub const DEFAULT_BODY_RADIUS: f32 = 80.0;

/// Everything needed to build a [`Globe`].
#[derive(Clone, Debug)]
pub struct GlobeParams {
    pub body_radius: f32,
    pub body_color: Color,
    pub map_path: PathBuf,
    pub sampler: SamplerParams,
    pub style: ParticleStyle,
    pub sprite: Arc<SpriteImage>,
}

impl GlobeParams {
    pub fn new(map_path: impl Into<PathBuf>, sprite: Arc<SpriteImage>) -> Self {
        Self {
            body_radius: DEFAULT_BODY_RADIUS,
            body_color: Color::from_hex(BODY_COLOR),
            map_path: map_path.into(),
            sampler: SamplerParams::default(),
            style: ParticleStyle::default(),
            sprite,
        }
    }
}

/// Owns the planet body and the in-flight map load.
///
/// Particles are produced at most once. A failed load leaves the globe as a
/// bare body.
pub struct Globe {
    body: PlanetBody,
    load: Option<MapLoad>,
    sampler: LandmassSampler,
    style: ParticleStyle,
    sprite: Arc<SpriteImage>,
}

impl Globe {
    /// Build the body and start decoding the map in the background.
    pub fn new(params: GlobeParams) -> Self {
        let load = match MapLoad::spawn(&params.map_path) {
            Ok(load) => Some(load),
            Err(error) => {
                tracing::warn!(
                    path = %params.map_path.display(),
                    %error,
                    "could not start map load, globe will have no land particles"
                );
                None
            }
        };
        Self::with_load(params, load)
    }

    /// Build around an existing load handle.
    pub fn with_load(params: GlobeParams, load: Option<MapLoad>) -> Self {
        Self {
            body: PlanetBody::with_color(params.body_radius, params.body_color),
            load,
            sampler: LandmassSampler::new(params.sampler),
            style: params.style,
            sprite: params.sprite,
        }
    }

    pub fn body(&self) -> &PlanetBody {
        &self.body
    }

    pub fn body_object(&self) -> SceneObject {
        self.body.to_scene_object()
    }

    /// `true` while the map is still being decoded.
    pub fn is_loading(&self) -> bool {
        self.load.is_some()
    }

    /// Check the map load; on the frame it resolves, sample the land particles.
    ///
    /// Returns `Some` exactly once. Load failures are logged and yield `None`
    /// forever after.
    pub fn poll_particles(&mut self, assigner: &mut impl CloudAssigner) -> Option<LandParticles> {
        let load = self.load.as_mut()?;
        let result = match load.poll() {
            LoadState::Pending => return None,
            LoadState::Ready(result) => result,
            LoadState::Consumed => Err(MapImageError::WorkerGone),
        };
        let path = load.path().to_path_buf();
        self.load = None;

        let image = match result {
            Ok(image) => image,
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "world map failed to load");
                return None;
            }
        };

        let start = Instant::now();
        let clouds = self.sampler.sample(&image, assigner);
        let particles = LandParticles::new(&clouds, &self.style, Arc::clone(&self.sprite));
        tracing::debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            points = particles.total_points(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "land particles built"
        );
        Some(particles)
    }
}
