// Manages seat capabilities and requests the matching keyboard, pointer and touch devices.
use log::{debug, info, warn};
use smithay_client_toolkit::seat::{Capability, SeatHandler, SeatState};
use wayland_client::{Connection, QueueHandle, protocol::wl_seat};

use super::super::state::WaylandState;

impl SeatHandler for WaylandState {
    fn seat_state(&mut self) -> &mut SeatState {
        &mut self.seat_state
    }

    fn new_seat(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _seat: wl_seat::WlSeat) {
        debug!("New seat available");
    }

    fn new_capability(
        &mut self,
        _conn: &Connection,
        qh: &QueueHandle<Self>,
        seat: wl_seat::WlSeat,
        capability: Capability,
    ) {
        match capability {
            Capability::Keyboard => {
                info!("Keyboard capability available");
                if let Err(e) = self.seat_state.get_keyboard(qh, &seat, None) {
                    warn!("Failed to get keyboard: {}", e);
                }
            }
            Capability::Pointer => {
                info!("Pointer capability available");
                if let Err(e) = self.seat_state.get_pointer(qh, &seat) {
                    warn!("Failed to get pointer: {}", e);
                }
            }
            Capability::Touch => {
                info!("Touch capability available");
                if let Err(e) = self.seat_state.get_touch(qh, &seat) {
                    warn!("Failed to get touch device: {}", e);
                }
            }
            _ => {}
        }
    }

    fn remove_capability(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _seat: wl_seat::WlSeat,
        capability: Capability,
    ) {
        info!("{:?} capability removed", capability);
        if capability == Capability::Pointer {
            self.input_state.on_pointer_leave();
        }
        if capability == Capability::Touch {
            self.input_state.on_touch_cancel();
        }
    }

    fn remove_seat(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _seat: wl_seat::WlSeat) {
        debug!("Seat removed");
    }
}
