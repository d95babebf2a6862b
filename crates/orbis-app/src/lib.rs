//! Orbis application: window, scene host and frame-timing overlay.

pub mod assets;
pub mod platform;
pub mod scene_host;
pub mod stats;
pub mod window;

pub use assets::{BUNDLED_MAP, resolve_asset_path, start_map_load};
pub use scene_host::{SceneHost, SceneHostError, SceneRig, framing_camera, scene_light};
pub use stats::{FrameStats, OverlayContainer, OverlayPosition, OverlayStyle, StatsOverlay};
pub use window::{GlobeApp, StartupError, run};
