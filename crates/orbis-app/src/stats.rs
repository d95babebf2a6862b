//! Frame-timing overlay.
//!
//! [`FrameStats`] measures frame duration and frames per second from explicit
//! millisecond timestamps. [`StatsOverlay`] formats those numbers into a
//! panel and pushes it to an [`OverlayContainer`].

/// How the overlay panel is positioned inside its container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverlayPosition {
    #[default]
    Static,
    Absolute,
}

/// Placement of the overlay panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayStyle {
    pub position: OverlayPosition,
    /// Distance from the container's bottom edge, in pixels.
    pub bottom_px: f32,
    pub z_index: i32,
}

impl OverlayStyle {
    /// Pinned to the bottom of the container, above the canvas.
    pub const BOTTOM_PINNED: OverlayStyle = OverlayStyle {
        position: OverlayPosition::Absolute,
        bottom_px: 0.0,
        z_index: 100,
    };
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self::BOTTOM_PINNED
    }
}

/// Something that can host the overlay panel.
pub trait OverlayContainer {
    /// Called once when the panel is attached.
    fn attach_overlay(&mut self, style: &OverlayStyle);

    /// Replace the panel's text.
    fn update_overlay(&mut self, text: &str);
}

/// Interval over which frames are counted for the FPS figure.
pub const FPS_WINDOW_MS: f64 = 1000.0;

/// Rolling frame statistics.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameStats {
    begin_ms: Option<f64>,
    window_start_ms: Option<f64>,
    frames_in_window: u32,
    frame_ms: f64,
    fps: f64,
    min_fps: Option<f64>,
    max_fps: Option<f64>,
    total_frames: u64,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of a frame.
    pub fn begin(&mut self, now_ms: f64) {
        self.begin_ms = Some(now_ms);
        if self.window_start_ms.is_none() {
            self.window_start_ms = Some(now_ms);
        }
    }

    /// Mark the end of a frame. Returns `true` when the FPS figure was refreshed.
    pub fn end(&mut self, now_ms: f64) -> bool {
        let begin = self.begin_ms.take().unwrap_or(now_ms);
        self.frame_ms = (now_ms - begin).max(0.0);
        self.frames_in_window += 1;
        self.total_frames += 1;

        let window_start = *self.window_start_ms.get_or_insert(begin);
        let elapsed = now_ms - window_start;
        if elapsed < FPS_WINDOW_MS {
            return false;
        }

        self.fps = f64::from(self.frames_in_window) * 1000.0 / elapsed;
        self.min_fps = Some(self.min_fps.map_or(self.fps, |m| m.min(self.fps)));
        self.max_fps = Some(self.max_fps.map_or(self.fps, |m| m.max(self.fps)));
        self.window_start_ms = Some(now_ms);
        self.frames_in_window = 0;
        true
    }

    /// Duration of the last completed frame.
    pub fn frame_ms(&self) -> f64 {
        self.frame_ms
    }

    /// Frames per second over the last full window; 0 until one has elapsed.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn fps_range(&self) -> Option<(f64, f64)> {
        Some((self.min_fps?, self.max_fps?))
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}

/// FPS/MS panel attached to a container.
#[derive(Clone, Debug, Default)]
pub struct StatsOverlay {
    style: OverlayStyle,
    stats: FrameStats,
    attached: bool,
}

impl StatsOverlay {
    pub fn new(style: OverlayStyle) -> Self {
        Self {
            style,
            stats: FrameStats::new(),
            attached: false,
        }
    }

    /// Attach the panel to `container` with this overlay's style.
    pub fn attach(&mut self, container: &mut impl OverlayContainer) {
        container.attach_overlay(&self.style);
        container.update_overlay(&self.text());
        self.attached = true;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn begin(&mut self, now_ms: f64) {
        self.stats.begin(now_ms);
    }

    /// Finish a frame and refresh the panel once per FPS window.
    pub fn end(&mut self, now_ms: f64, container: &mut impl OverlayContainer) {
        if self.stats.end(now_ms) && self.attached {
            container.update_overlay(&self.text());
        }
    }

    /// Panel text, e.g. `60 FPS (58-61) 16 MS`.
    pub fn text(&self) -> String {
        let fps = self.stats.fps().round();
        let ms = self.stats.frame_ms().round();
        match self.stats.fps_range() {
            Some((min, max)) => format!("{fps} FPS ({}-{}) {ms} MS", min.round(), max.round()),
            None => format!("{fps} FPS {ms} MS"),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Records what the overlay pushes into it.
    #[derive(Default)]
    pub(crate) struct RecordingContainer {
        pub styles: Vec<OverlayStyle>,
        pub texts: Vec<String>,
    }

    impl OverlayContainer for RecordingContainer {
        fn attach_overlay(&mut self, style: &OverlayStyle) {
            self.styles.push(*style);
        }

        fn update_overlay(&mut self, text: &str) {
            self.texts.push(text.to_string());
        }
    }

    #[test]
    fn test_default_style_is_bottom_pinned() {
        let style = OverlayStyle::default();
        assert_eq!(style.position, OverlayPosition::Absolute);
        assert_eq!(style.bottom_px, 0.0);
        assert_eq!(style.z_index, 100);
    }

    #[test]
    fn test_fps_over_one_second() {
        let mut stats = FrameStats::new();
        let mut refreshed = false;
        for frame in 0..=60 {
            let t = f64::from(frame) * (1000.0 / 60.0);
            stats.begin(t);
            refreshed |= stats.end(t + 4.0);
        }
        assert!(refreshed);
        assert!((stats.fps() - 60.0).abs() < 1.5, "fps {}", stats.fps());
        assert!((stats.frame_ms() - 4.0).abs() < 1e-9);
        assert_eq!(stats.total_frames(), 61);
    }

    #[test]
    fn test_fps_zero_before_first_window() {
        let mut stats = FrameStats::new();
        stats.begin(0.0);
        assert!(!stats.end(10.0));
        assert_eq!(stats.fps(), 0.0);
        assert!(stats.fps_range().is_none());
    }

    #[test]
    fn test_end_without_begin() {
        let mut stats = FrameStats::new();
        stats.end(5.0);
        assert_eq!(stats.frame_ms(), 0.0);
    }

    #[test]
    fn test_overlay_attaches_and_updates() {
        let mut container = RecordingContainer::default();
        let mut overlay = StatsOverlay::new(OverlayStyle::BOTTOM_PINNED);
        overlay.attach(&mut container);
        assert!(overlay.is_attached());
        assert_eq!(container.styles, vec![OverlayStyle::BOTTOM_PINNED]);
        assert_eq!(container.texts.len(), 1);

        overlay.begin(0.0);
        overlay.end(16.0, &mut container);
        assert_eq!(container.texts.len(), 1, "no refresh inside the window");

        overlay.begin(1000.0);
        overlay.end(1010.0, &mut container);
        assert_eq!(container.texts.len(), 2);
        assert!(container.texts[1].contains("FPS"));
        assert!(container.texts[1].ends_with("10 MS"));
    }
}
