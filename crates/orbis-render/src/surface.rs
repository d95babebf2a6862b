//! Canvas metrics: physical pixels for the GPU surface, logical pixels for layout.

/// Minimum surface dimension (prevents zero-size panics).
pub const MIN_SURFACE_DIMENSION: u32 = 1;

/// Size of the drawing surface in both pixel spaces.
///
/// Physical dimensions configure the swapchain; the logical height is the
/// canvas "client height" that framing calculations use.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasMetrics {
    physical_width: u32,
    physical_height: u32,
    scale_factor: f64,
}

impl CanvasMetrics {
    pub fn new(physical_width: u32, physical_height: u32, scale_factor: f64) -> Self {
        Self {
            physical_width: physical_width.max(MIN_SURFACE_DIMENSION),
            physical_height: physical_height.max(MIN_SURFACE_DIMENSION),
            scale_factor: if scale_factor > 0.0 { scale_factor } else { 1.0 },
        }
    }

    pub fn from_window(window: &winit::window::Window) -> Self {
        let size = window.inner_size();
        Self::new(size.width, size.height, window.scale_factor())
    }

    /// Apply a resize. Returns `true` when the physical size changed.
    pub fn handle_resize(&mut self, physical_width: u32, physical_height: u32) -> bool {
        let width = physical_width.max(MIN_SURFACE_DIMENSION);
        let height = physical_height.max(MIN_SURFACE_DIMENSION);
        let changed = width != self.physical_width || height != self.physical_height;
        self.physical_width = width;
        self.physical_height = height;
        changed
    }

    pub fn handle_scale_factor_changed(&mut self, scale_factor: f64) {
        if scale_factor > 0.0 {
            self.scale_factor = scale_factor;
        }
    }

    pub fn physical_size(&self) -> (u32, u32) {
        (self.physical_width, self.physical_height)
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn logical_width(&self) -> f64 {
        f64::from(self.physical_width) / self.scale_factor
    }

    /// Logical height: the canvas client height.
    pub fn logical_height(&self) -> f64 {
        f64::from(self.physical_height) / self.scale_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_height_divides_scale() {
        let metrics = CanvasMetrics::new(2400, 1200, 2.0);
        assert_eq!(metrics.physical_size(), (2400, 1200));
        assert_eq!(metrics.logical_height(), 600.0);
        assert_eq!(metrics.logical_width(), 1200.0);
    }

    #[test]
    fn test_zero_size_clamped() {
        let metrics = CanvasMetrics::new(0, 0, 1.0);
        assert_eq!(metrics.physical_size(), (1, 1));
    }

    #[test]
    fn test_resize_reports_change() {
        let mut metrics = CanvasMetrics::new(800, 400, 1.0);
        assert!(!metrics.handle_resize(800, 400));
        assert!(metrics.handle_resize(1000, 500));
        assert_eq!(metrics.logical_height(), 500.0);
    }

    #[test]
    fn test_invalid_scale_ignored() {
        let mut metrics = CanvasMetrics::new(800, 400, 0.0);
        assert_eq!(metrics.scale_factor(), 1.0);
        metrics.handle_scale_factor_changed(-1.0);
        assert_eq!(metrics.scale_factor(), 1.0);
        metrics.handle_scale_factor_changed(1.5);
        assert_eq!(metrics.scale_factor(), 1.5);
    }
}
