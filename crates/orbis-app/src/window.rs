//! Window creation and event handling via winit.
//!
//! [`GlobeApp`] implements winit's [`ApplicationHandler`]: it opens the window,
//! builds the [`SceneHost`], adds the globe to the scene, and redraws
//! continuously while the land particles stream in.

use std::sync::Arc;

use orbis_config::Config;
use orbis_globe::{Globe, GlobeParams, ParticleStyle, load_sprite_or_default};
use orbis_landmass::{RandomAssigner, SamplerParams, SizePolicy};
use orbis_render::{CanvasMetrics, Color, RenderError, SpriteImage, SurfaceError};
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::assets::{resolve_asset_path, start_map_load};
use crate::scene_host::{SceneHost, SceneHostError};
use crate::stats::{OverlayContainer, OverlayStyle};

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

/// Globe construction parameters from the `globe` and `landmass` sections.
///
/// A relative map path is resolved with [`resolve_asset_path`].
pub fn globe_params_from_config(config: &Config, sprite: Arc<SpriteImage>) -> GlobeParams {
    let landmass = &config.landmass;
    GlobeParams {
        body_radius: config.globe.body_radius,
        body_color: Color::from_hex(config.globe.body_color),
        map_path: resolve_asset_path(&landmass.map_path),
        sampler: SamplerParams {
            step: landmass.step,
            sphere_radius: landmass.sphere_radius,
            land_point_size: landmass.land_point_size,
            size_stride: landmass.size_stride,
            size_policy: if landmass.pad_sizes {
                SizePolicy::Padded
            } else {
                SizePolicy::Sparse
            },
            pad_size: landmass.particle_size,
        },
        style: ParticleStyle {
            size: landmass.particle_size,
            color: Color::from_hex(landmass.particle_color),
            opacity: landmass.particle_opacity,
            vertex_sizes: landmass.vertex_sizes,
        },
        sprite,
    }
}

/// Title text with the stats panel appended.
pub fn overlay_title(base: &str, panel: &str) -> String {
    format!("{base} | {panel}")
}

/// Shows the stats panel in the window title bar.
pub struct WindowTitleOverlay {
    window: Arc<Window>,
    base_title: String,
    enabled: bool,
}

impl WindowTitleOverlay {
    pub fn new(window: Arc<Window>, base_title: impl Into<String>, enabled: bool) -> Self {
        Self {
            window,
            base_title: base_title.into(),
            enabled,
        }
    }
}

impl OverlayContainer for WindowTitleOverlay {
    fn attach_overlay(&mut self, style: &OverlayStyle) {
        tracing::debug!(?style, enabled = self.enabled, "stats overlay attached to title bar");
    }

    fn update_overlay(&mut self, text: &str) {
        if self.enabled {
            self.window.set_title(&overlay_title(&self.base_title, text));
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error(transparent)]
    Host(#[from] SceneHostError),
}

/// Running state once the window exists.
struct Active {
    window: Arc<Window>,
    overlay: WindowTitleOverlay,
    host: SceneHost,
    globe: Globe,
    metrics: CanvasMetrics,
}

pub struct GlobeApp {
    config: Config,
    assigner: RandomAssigner,
    active: Option<Active>,
}

impl GlobeApp {
    pub fn new(config: Config) -> Self {
        let assigner = RandomAssigner::from_seed_option(config.landmass.seed);
        Self {
            config,
            assigner,
            active: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn start(&self, event_loop: &ActiveEventLoop) -> Result<Active, StartupError> {
        let attrs = window_attributes_from_config(&self.config);
        let window = Arc::new(event_loop.create_window(attrs)?);
        let metrics = CanvasMetrics::from_window(&window);
        info!(
            "Window created: {}x{} (scale: {:.2})",
            metrics.physical_size().0,
            metrics.physical_size().1,
            metrics.scale_factor()
        );

        let mut overlay = WindowTitleOverlay::new(
            Arc::clone(&window),
            self.config.window.title.clone(),
            self.config.debug.show_stats,
        );
        let mut host = SceneHost::new(Arc::clone(&window), &mut overlay, &self.config)?;

        let sprite_path = resolve_asset_path(&self.config.landmass.sprite_path);
        let sprite = Arc::new(load_sprite_or_default(&sprite_path));
        let params = globe_params_from_config(&self.config, sprite);
        let load = start_map_load(&params.map_path);
        let globe = Globe::with_load(params, Some(load));
        host.scene_mut().add(globe.body_object());

        Ok(Active {
            window,
            overlay,
            host,
            globe,
            metrics,
        })
    }
}

impl ApplicationHandler for GlobeApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.active.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(active) => {
                active.window.request_redraw();
                self.active = Some(active);
            }
            Err(e) => {
                error!("Startup failed: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(active) = &mut self.active else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if active.metrics.handle_resize(new_size.width, new_size.height) {
                    let (w, h) = active.metrics.physical_size();
                    active.host.resize(w, h);
                    info!("Window resized to {w}x{h}");
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                active.metrics.handle_scale_factor_changed(scale_factor);
            }
            WindowEvent::RedrawRequested => {
                if let Some(particles) = active.globe.poll_particles(&mut self.assigner) {
                    info!(points = particles.total_points(), "land particles added to scene");
                    active.host.scene_mut().add(particles.to_scene_object());
                }

                match active.host.render(&mut active.overlay) {
                    Ok(()) => {}
                    Err(SceneHostError::Render(RenderError::Surface(SurfaceError::Lost))) => {
                        let (w, h) = active.metrics.physical_size();
                        active.host.resize(w, h);
                    }
                    Err(SceneHostError::Render(RenderError::Surface(
                        SurfaceError::OutOfMemory,
                    ))) => {
                        error!("GPU out of memory");
                        event_loop.exit();
                        return;
                    }
                    Err(e) => {
                        warn!("Frame failed: {e}");
                    }
                }

                active.window.request_redraw();
            }
            _ => {}
        }
    }
}

/// Creates an event loop and runs the globe viewer until the window closes.
pub fn run(config: Config) -> Result<(), winit::error::EventLoopError> {
    let event_loop = EventLoop::new()?;
    let mut app = GlobeApp::new(config);
    event_loop.run_app(&mut app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbis_landmass::FixedAssigner;

    fn sprite() -> Arc<SpriteImage> {
        Arc::new(orbis_globe::radial_dot_sprite(4))
    }

    #[test]
    fn test_default_globe_params() {
        let params = globe_params_from_config(&Config::default(), sprite());
        assert_eq!(params.body_color.to_hex(), orbis_globe::BODY_COLOR);
        assert!(params.map_path.ends_with("assets/earth.png"));
        assert!(params.map_path.is_file());
        assert_eq!(params.sampler, SamplerParams::default());
        assert_eq!(params.style, ParticleStyle::default());
    }

    #[test]
    fn test_default_config_produces_land_particles() {
        let params = globe_params_from_config(&Config::default(), sprite());
        let load = start_map_load(&params.map_path);
        let mut globe = Globe::with_load(params, Some(load));

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
        let mut particles = None;
        while globe.is_loading() && std::time::Instant::now() < deadline {
            particles = globe.poll_particles(&mut FixedAssigner(0));
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        let particles = particles.expect("default map should yield land particles");
        assert!(particles.total_points() > 1000);
    }

    #[test]
    fn test_pad_sizes_selects_padded_policy() {
        let mut config = Config::default();
        config.landmass.pad_sizes = true;
        config.landmass.particle_size = 3.0;
        let params = globe_params_from_config(&config, sprite());
        assert_eq!(params.sampler.size_policy, SizePolicy::Padded);
        assert_eq!(params.sampler.pad_size, 3.0);
        assert_eq!(params.style.size, 3.0);
    }

    #[test]
    fn test_overlay_title() {
        assert_eq!(overlay_title("Orbis", "60 FPS 16 MS"), "Orbis | 60 FPS 16 MS");
    }

    #[test]
    fn test_app_starts_without_window() {
        let app = GlobeApp::new(Config::default());
        assert!(app.active.is_none());
        assert_eq!(app.config().window.width, 1200);
        assert_eq!(app.config().window.height, 600);
    }
}
