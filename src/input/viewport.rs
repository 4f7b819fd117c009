//! Mapping between window coordinates and canvas backing-store coordinates.

use crate::util::{Point, Rect};

/// Where the canvas is displayed inside the window, and how large its bitmap is.
///
/// The displayed size may differ from the backing store (HiDPI, or a canvas
/// shown larger than its pixel size), so client coordinates are scaled by
/// `backing / displayed` on each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasViewport {
    display: Rect,
    backing_width: i32,
    backing_height: i32,
}

impl CanvasViewport {
    pub fn new(display: Rect, backing_width: i32, backing_height: i32) -> Self {
        Self {
            display,
            backing_width: backing_width.max(1),
            backing_height: backing_height.max(1),
        }
    }

    /// The displayed canvas rectangle in window coordinates.
    pub fn display(&self) -> Rect {
        self.display
    }

    pub fn scale_x(&self) -> f64 {
        self.backing_width as f64 / self.display.width as f64
    }

    pub fn scale_y(&self) -> f64 {
        self.backing_height as f64 / self.display.height as f64
    }

    /// True when the window point lies over the displayed canvas.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.display.contains(x, y)
    }

    /// Converts a window point to canvas coordinates. Points outside the canvas
    /// map outside `0..backing` rather than being clamped.
    pub fn to_canvas(&self, x: f64, y: f64) -> Point {
        Point::new(
            (x - self.display.x as f64) * self.scale_x(),
            (y - self.display.y as f64) * self.scale_y(),
        )
    }

    /// Converts a canvas-space rectangle to the window rectangle that covers it.
    pub fn to_window_rect(&self, rect: Rect) -> Option<Rect> {
        let min_x = (rect.x as f64 / self.scale_x()).floor() as i32 + self.display.x;
        let min_y = (rect.y as f64 / self.scale_y()).floor() as i32 + self.display.y;
        let max_x = ((rect.x + rect.width) as f64 / self.scale_x()).ceil() as i32 + self.display.x;
        let max_y = ((rect.y + rect.height) as f64 / self.scale_y()).ceil() as i32 + self.display.y;
        Rect::from_min_max(min_x, min_y, max_x, max_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> CanvasViewport {
        CanvasViewport::new(Rect::new(20, 20, 420, 420).unwrap(), 280, 280)
    }

    #[test]
    fn displayed_corners_map_to_backing_corners() {
        let viewport = viewport();
        assert_eq!(viewport.to_canvas(20.0, 20.0), Point::new(0.0, 0.0));
        assert_eq!(viewport.to_canvas(440.0, 440.0), Point::new(280.0, 280.0));
    }

    #[test]
    fn scales_by_backing_over_displayed() {
        let viewport = viewport();
        let point = viewport.to_canvas(230.0, 83.0);
        assert!((point.x - 140.0).abs() < 1e-9);
        assert!((point.y - 42.0).abs() < 1e-9);
    }

    #[test]
    fn identity_mapping_when_sizes_match() {
        let viewport = CanvasViewport::new(Rect::new(0, 0, 280, 280).unwrap(), 280, 280);
        assert_eq!(viewport.to_canvas(17.5, 99.0), Point::new(17.5, 99.0));
    }

    #[test]
    fn canvas_rect_maps_back_to_covering_window_rect() {
        let viewport = viewport();
        let window = viewport
            .to_window_rect(Rect::new(10, 10, 3, 3).unwrap())
            .unwrap();
        assert_eq!(window, Rect::new(35, 35, 5, 5).unwrap());
    }

    #[test]
    fn contains_uses_displayed_rect() {
        let viewport = viewport();
        assert!(viewport.contains(20.0, 20.0));
        assert!(viewport.contains(439.5, 439.5));
        assert!(!viewport.contains(19.9, 100.0));
        assert!(!viewport.contains(440.0, 100.0));
    }
}
