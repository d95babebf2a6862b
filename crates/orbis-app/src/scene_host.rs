//! The scene host: overlay, scene, camera, renderer and light for one window.

use std::sync::Arc;
use std::time::Instant;

use glam::Vec3;
use orbis_config::{Config, SceneConfig};
use orbis_render::{
    Camera, CanvasMetrics, Color, DirectionalLight, RenderContextError, RenderError, Renderer,
    Scene, TextureError, init_render_context_blocking, vertical_fov_degrees,
};
use winit::window::Window;

use crate::stats::{OverlayContainer, OverlayStyle, StatsOverlay};

#[derive(Debug, thiserror::Error)]
pub enum SceneHostError {
    #[error("GPU initialization failed: {0}")]
    Gpu(#[from] RenderContextError),

    #[error("renderer setup failed: {0}")]
    Texture(#[from] TextureError),

    #[error("render failed: {0}")]
    Render(#[from] RenderError),
}

/// Camera framed so that a plane at the camera's depth spans the canvas height.
pub fn framing_camera(client_height: f32, config: &SceneConfig) -> Camera {
    let position = Vec3::from_array(config.camera_position);
    let fov = vertical_fov_degrees(client_height, position.z);
    Camera::perspective(fov, config.camera_aspect, config.camera_near, config.camera_far)
        .with_position(position)
}

/// The white directional light shining on the globe.
pub fn scene_light(config: &SceneConfig) -> DirectionalLight {
    DirectionalLight::new(Color::from_hex(config.light_color), config.light_intensity)
        .with_position(Vec3::from_array(config.light_position))
}

/// Everything the host owns except the GPU renderer.
pub struct SceneRig {
    overlay: StatsOverlay,
    scene: Scene,
    camera: Camera,
    light: Option<DirectionalLight>,
}

impl SceneRig {
    /// Attach the overlay, then create an empty scene and the framing camera.
    pub fn new(
        container: &mut impl OverlayContainer,
        client_height: f32,
        config: &SceneConfig,
    ) -> Self {
        let mut overlay = StatsOverlay::new(OverlayStyle::BOTTOM_PINNED);
        overlay.attach(container);
        let scene = Scene::new();
        let camera = framing_camera(client_height, config);
        Self {
            overlay,
            scene,
            camera,
            light: None,
        }
    }

    /// [`SceneRig::new`] followed by [`SceneRig::add_light`].
    pub fn assemble(
        container: &mut impl OverlayContainer,
        client_height: f32,
        config: &SceneConfig,
    ) -> Self {
        let mut rig = Self::new(container, client_height, config);
        rig.add_light(scene_light(config));
        rig
    }

    /// Add the host light to the active scene.
    pub fn add_light(&mut self, light: DirectionalLight) {
        self.scene.add_light(light.clone());
        self.light = Some(light);
    }

    pub fn overlay(&self) -> &StatsOverlay {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut StatsOverlay {
        &mut self.overlay
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn light(&self) -> Option<&DirectionalLight> {
        self.light.as_ref()
    }

    /// Replace the active scene. The new scene is drawn as given.
    pub fn change_scene(&mut self, scene: Scene) -> Scene {
        std::mem::replace(&mut self.scene, scene)
    }
}

/// Renders one scene into one window.
///
/// The host draws once on construction; after that frames are drawn only when
/// [`SceneHost::render`] is called.
pub struct SceneHost {
    rig: SceneRig,
    renderer: Renderer,
    started: Instant,
}

impl SceneHost {
    pub fn new(
        window: Arc<Window>,
        container: &mut impl OverlayContainer,
        config: &Config,
    ) -> Result<Self, SceneHostError> {
        let metrics = CanvasMetrics::from_window(&window);
        let mut rig = SceneRig::new(container, metrics.logical_height() as f32, &config.scene);

        let context = init_render_context_blocking(window, config.window.vsync)?;
        let mut renderer = Renderer::new(context, config.scene.antialias)?;
        renderer.set_clear_color(Color::from_hex(config.scene.clear_color));

        rig.add_light(scene_light(&config.scene));

        let mut host = Self {
            rig,
            renderer,
            started: Instant::now(),
        };
        host.renderer.render(host.rig.scene(), host.rig.camera())?;
        tracing::info!(
            fov_deg = host.rig.camera().fov_y_degrees(),
            antialias = config.scene.antialias,
            vsync = config.window.vsync,
            "scene host ready"
        );
        Ok(host)
    }

    pub fn rig(&self) -> &SceneRig {
        &self.rig
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        self.rig.scene_mut()
    }

    pub fn change_scene(&mut self, scene: Scene) -> Scene {
        self.rig.change_scene(scene)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.renderer.resize(width, height);
    }

    pub fn frames_rendered(&self) -> u64 {
        self.renderer.frames_rendered()
    }

    fn now_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    /// Draw the active scene, timing the frame for the overlay.
    pub fn render(&mut self, container: &mut impl OverlayContainer) -> Result<(), SceneHostError> {
        self.rig.overlay.begin(self.now_ms());
        self.renderer.render(&self.rig.scene, &self.rig.camera)?;
        let end = self.now_ms();
        self.rig.overlay.end(end, container);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::tests::RecordingContainer;
    use orbis_render::SceneObject;

    #[test]
    fn test_framing_camera_matches_canvas_height() {
        let config = SceneConfig::default();
        for height in [400.0_f32, 800.0, 1200.0] {
            let camera = framing_camera(height, &config);
            let expected = (2.0 * (height / 2.0 / 600.0).atan()).to_degrees();
            assert!((camera.fov_y_degrees() - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn test_camera_fixed_parameters() {
        let camera = framing_camera(600.0, &SceneConfig::default());
        assert_eq!(camera.position, Vec3::new(100.0, 100.0, 600.0));
        assert_eq!(camera.aspect_ratio(), 2.0);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 2000.0);
    }

    #[test]
    fn test_rig_construction_order() {
        let mut container = RecordingContainer::default();
        let rig = SceneRig::new(&mut container, 600.0, &SceneConfig::default());
        assert_eq!(container.styles, vec![OverlayStyle::BOTTOM_PINNED]);
        assert!(rig.overlay().is_attached());
        assert!(rig.scene().objects().is_empty());
        assert!(rig.scene().lights().is_empty());
        assert!(rig.light().is_none());
    }

    #[test]
    fn test_assembled_rig_has_light() {
        let mut container = RecordingContainer::default();
        let rig = SceneRig::assemble(&mut container, 600.0, &SceneConfig::default());
        let light = rig.light().unwrap();
        assert_eq!(light.color.to_hex(), 0xffffff);
        assert_eq!(light.intensity, 1.0);
        assert_eq!(light.position, Vec3::splat(1000.0));
        assert_eq!(rig.scene().lights(), std::slice::from_ref(light));
    }

    #[test]
    fn test_change_scene_swaps() {
        let mut container = RecordingContainer::default();
        let mut rig = SceneRig::assemble(&mut container, 600.0, &SceneConfig::default());

        let mut replacement = Scene::new();
        replacement.add(SceneObject::Group {
            name: "empty".into(),
            children: Vec::new(),
        });
        let replacement_id = replacement.id();

        let previous = rig.change_scene(replacement);
        assert_eq!(rig.scene().id(), replacement_id);
        assert_eq!(previous.lights().len(), 1);
        assert!(rig.scene().lights().is_empty());
    }
}
