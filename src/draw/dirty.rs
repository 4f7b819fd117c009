//! Dirty region tracking for incremental rendering.
//!
//! Stroke segments damage small window-space rectangles; panel changes (results,
//! notices, button state) damage the whole surface.

use crate::util::Rect;

/// Past this many pending rectangles they are merged into their bounding box.
const MAX_REGIONS: usize = 32;

/// Tracks dirty rectangles accumulated between renders.
#[derive(Debug, Default)]
pub struct DirtyTracker {
    regions: Vec<Rect>,
    force_full: bool,
}

impl DirtyTracker {
    /// Creates a new, empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the entire surface as dirty. Clears any accumulated rectangles.
    pub fn mark_full(&mut self) {
        self.force_full = true;
        self.regions.clear();
    }

    /// Adds a dirty rectangle if the tracker is not already full.
    pub fn mark_rect(&mut self, rect: Rect) {
        if !rect.is_valid() || self.force_full {
            return;
        }
        if self.regions.len() >= MAX_REGIONS {
            let merged = self
                .regions
                .drain(..)
                .fold(rect, |acc, existing| acc.union(existing));
            self.regions.push(merged);
        } else {
            self.regions.push(rect);
        }
    }

    /// Drains the dirty regions gathered so far.
    ///
    /// When the full surface is marked, returns a single rectangle covering the
    /// entire surface; otherwise returns accumulated rectangles.
    pub fn take_regions(&mut self, width: i32, height: i32) -> Vec<Rect> {
        if self.force_full {
            self.force_full = false;
            self.regions.clear();
            Rect::new(0, 0, width, height).into_iter().collect()
        } else {
            self.regions.drain(..).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_rect_records_rectangles() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_rect(Rect::new(0, 0, 10, 10).unwrap());
        tracker.mark_rect(Rect {
            x: 4,
            y: 4,
            width: 0,
            height: 3,
        });

        let rects = tracker.take_regions(100, 100);
        assert_eq!(rects, vec![Rect::new(0, 0, 10, 10).unwrap()]);
        assert!(tracker.take_regions(100, 100).is_empty());
    }

    #[test]
    fn mark_full_takes_precedence() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_rect(Rect::new(5, 5, 10, 10).unwrap());
        tracker.mark_full();
        tracker.mark_rect(Rect::new(20, 20, 15, 15).unwrap());

        let rects = tracker.take_regions(200, 100);
        assert_eq!(rects, vec![Rect::new(0, 0, 200, 100).unwrap()]);
    }

    #[test]
    fn many_small_regions_are_merged() {
        let mut tracker = DirtyTracker::new();
        for i in 0..(MAX_REGIONS as i32 + 5) {
            tracker.mark_rect(Rect::new(i * 2, 0, 2, 2).unwrap());
        }

        let rects = tracker.take_regions(500, 500);
        assert!(rects.len() <= MAX_REGIONS);
        let covered = rects.iter().copied().reduce(Rect::union).unwrap();
        assert_eq!(covered, Rect::new(0, 0, (MAX_REGIONS as i32 + 5) * 2, 2).unwrap());
    }
}
