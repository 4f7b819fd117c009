//! Fixed window layout: canvas on the left, result panel on the right, buttons below.

use crate::util::Rect;

const MARGIN: i32 = 24;
const BUTTON_GAP: i32 = 12;
const BUTTON_HEIGHT: i32 = 44;
const PANEL_WIDTH: i32 = 240;

/// Clickable buttons under the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelButton {
    Clear,
    Predict,
}

/// Window-space rectangles of every element, derived from the canvas display size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowLayout {
    pub width: i32,
    pub height: i32,
    pub canvas: Rect,
    pub clear_button: Rect,
    pub predict_button: Rect,
    pub result_panel: Rect,
}

impl WindowLayout {
    pub fn new(display_size: u32) -> Self {
        let size = display_size.clamp(1, i32::MAX as u32 / 4) as i32;

        let canvas = Rect {
            x: MARGIN,
            y: MARGIN,
            width: size,
            height: size,
        };

        let buttons_y = canvas.y + canvas.height + BUTTON_GAP;
        let button_width = ((size - BUTTON_GAP) / 2).max(1);
        let clear_button = Rect {
            x: MARGIN,
            y: buttons_y,
            width: button_width,
            height: BUTTON_HEIGHT,
        };
        let predict_button = Rect {
            x: MARGIN + size - button_width,
            y: buttons_y,
            width: button_width,
            height: BUTTON_HEIGHT,
        };

        let result_panel = Rect {
            x: canvas.x + canvas.width + MARGIN,
            y: MARGIN,
            width: PANEL_WIDTH,
            height: size + BUTTON_GAP + BUTTON_HEIGHT,
        };

        Self {
            width: result_panel.x + result_panel.width + MARGIN,
            height: buttons_y + BUTTON_HEIGHT + MARGIN,
            canvas,
            clear_button,
            predict_button,
            result_panel,
        }
    }

    /// Button under a window point, if any.
    pub fn button_at(&self, x: f64, y: f64) -> Option<PanelButton> {
        if self.clear_button.contains(x, y) {
            Some(PanelButton::Clear)
        } else if self.predict_button.contains(x, y) {
            Some(PanelButton::Predict)
        } else {
            None
        }
    }

    pub fn button_rect(&self, button: PanelButton) -> Rect {
        match button {
            PanelButton::Clear => self.clear_button,
            PanelButton::Predict => self.predict_button,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elements_do_not_overlap() {
        let layout = WindowLayout::new(420);
        assert_eq!(layout.canvas, Rect::new(24, 24, 420, 420).unwrap());
        assert!(layout.clear_button.x + layout.clear_button.width < layout.predict_button.x);
        assert!(layout.clear_button.y >= layout.canvas.y + layout.canvas.height);
        assert!(layout.result_panel.x >= layout.canvas.x + layout.canvas.width);
        assert_eq!(layout.width, 24 + 420 + 24 + PANEL_WIDTH + 24);
    }

    #[test]
    fn button_hit_testing() {
        let layout = WindowLayout::new(420);
        let clear = layout.clear_button;
        let predict = layout.predict_button;
        assert_eq!(
            layout.button_at(clear.x as f64 + 1.0, clear.y as f64 + 1.0),
            Some(PanelButton::Clear)
        );
        assert_eq!(
            layout.button_at(predict.x as f64 + 1.0, predict.y as f64 + 1.0),
            Some(PanelButton::Predict)
        );
        assert_eq!(layout.button_at(100.0, 100.0), None);
    }
}
