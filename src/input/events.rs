//! Backend-neutral input event types.

/// Keys the sketchpad reacts to. Everything else maps to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Escape key (closes the window)
    Escape,
    /// Unmapped or unrecognized key
    Unknown,
}

/// Mouse button identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Left mouse button (draws and activates buttons)
    Left,
    Right,
    Middle,
}
