use log::debug;

use crate::input::events::{Key, MouseButton};

use super::InputState;

/// Brush width change per scroll step, in canvas pixels.
const STROKE_WIDTH_STEP: f64 = 1.0;

impl InputState {
    /// Processes a mouse button press at window coordinates.
    ///
    /// Left press over the canvas starts a stroke; over a button it arms that
    /// button. Other buttons are ignored.
    pub fn on_mouse_press(&mut self, button: MouseButton, x: f64, y: f64) {
        if button != MouseButton::Left {
            return;
        }
        self.press_at(x, y);
    }

    /// Processes pointer motion. Extends the active stroke; leaving the canvas
    /// ends it.
    pub fn on_mouse_motion(&mut self, x: f64, y: f64) {
        self.move_to(x, y);
    }

    /// Processes a mouse button release. Ends the stroke and activates the armed
    /// button if the release lands on it.
    pub fn on_mouse_release(&mut self, button: MouseButton, x: f64, y: f64) {
        if button != MouseButton::Left {
            return;
        }
        self.release_at(x, y);
    }

    /// The pointer left the window: the stroke ends, armed buttons disarm.
    pub fn on_pointer_leave(&mut self) {
        self.end_stroke();
        self.pressed_button = None;
    }

    /// Vertical scroll over the window adjusts the brush width. Negative
    /// values (scroll up) widen it.
    pub fn on_scroll(&mut self, delta: f64) {
        if delta == 0.0 {
            return;
        }
        let step = if delta < 0.0 {
            STROKE_WIDTH_STEP
        } else {
            -STROKE_WIDTH_STEP
        };
        let before = self.sketch.stroke_width();
        let after = self.sketch.set_stroke_width(before + step);
        if after != before {
            debug!("Brush width {} -> {}", before, after);
            self.mark_full_redraw();
        }
    }

    /// Touch down. Only the first touch point drives the gesture.
    pub fn on_touch_down(&mut self, id: i32, x: f64, y: f64) {
        if self.active_touch.is_some() {
            return;
        }
        self.active_touch = Some(id);
        self.touch_position = (x, y);
        self.press_at(x, y);
    }

    pub fn on_touch_motion(&mut self, id: i32, x: f64, y: f64) {
        if self.active_touch != Some(id) {
            return;
        }
        self.touch_position = (x, y);
        self.move_to(x, y);
    }

    pub fn on_touch_up(&mut self, id: i32) {
        if self.active_touch != Some(id) {
            return;
        }
        self.active_touch = None;
        let (x, y) = self.touch_position;
        self.release_at(x, y);
    }

    /// The compositor took the touch sequence away.
    pub fn on_touch_cancel(&mut self) {
        self.active_touch = None;
        self.on_pointer_leave();
    }

    /// Processes a key press. Escape closes the window; nothing else is bound.
    pub fn on_key_press(&mut self, key: Key) {
        if key == Key::Escape {
            self.should_exit = true;
        }
    }

    fn press_at(&mut self, x: f64, y: f64) {
        if self.viewport.contains(x, y) {
            let was_blank = self.sketch.is_blank();
            let point = self.viewport.to_canvas(x, y);
            let damage = self.sketch.begin(point);
            self.mark_canvas_damage(damage);
            if was_blank {
                // First ink hides the "Draw a digit" hint.
                self.mark_full_redraw();
            }
        } else if let Some(button) = self.layout.button_at(x, y) {
            self.pressed_button = Some(button);
            self.mark_full_redraw();
        }
    }

    fn move_to(&mut self, x: f64, y: f64) {
        if !self.sketch.is_drawing() {
            return;
        }
        if !self.viewport.contains(x, y) {
            self.end_stroke();
            return;
        }
        let point = self.viewport.to_canvas(x, y);
        let damage = self.sketch.extend(point);
        self.mark_canvas_damage(damage);
    }

    fn release_at(&mut self, x: f64, y: f64) {
        self.end_stroke();
        if let Some(button) = self.pressed_button.take() {
            self.mark_full_redraw();
            if self.layout.button_at(x, y) == Some(button) {
                self.activate_button(button);
            }
        }
    }

    fn end_stroke(&mut self) {
        if self.sketch.is_drawing() {
            self.sketch.end();
        }
    }
}
