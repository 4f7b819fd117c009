//! Input handling for the sketchpad.
//!
//! Translates backend pointer, touch and keyboard events (in window
//! coordinates) into strokes on the canvas and button activations.

pub mod events;
pub mod layout;
pub mod state;
pub mod viewport;

pub use events::{Key, MouseButton};
pub use layout::{PanelButton, WindowLayout};
pub use state::InputState;
pub use viewport::CanvasViewport;
