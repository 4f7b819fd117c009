// Smithay handler implementations for the sketchpad window, one protocol concern per
// submodule, wired to `WaylandState` through the delegate macros below.
use smithay_client_toolkit::{
    delegate_compositor, delegate_keyboard, delegate_layer, delegate_output, delegate_pointer,
    delegate_registry, delegate_seat, delegate_shm, delegate_touch,
};

use super::state::WaylandState;

mod compositor;
mod globals;
mod keyboard;
mod layer;
mod output;
mod pointer;
mod seat;
mod touch;

delegate_registry!(WaylandState);
delegate_compositor!(WaylandState);
delegate_output!(WaylandState);
delegate_shm!(WaylandState);
delegate_layer!(WaylandState);

// Input: keyboard for Escape, pointer and touch for drawing.
delegate_seat!(WaylandState);
delegate_keyboard!(WaylandState);
delegate_pointer!(WaylandState);
delegate_touch!(WaylandState);
