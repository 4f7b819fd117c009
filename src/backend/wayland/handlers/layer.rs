// Responds to layer-shell configure/close events.
use log::{info, warn};
use smithay_client_toolkit::shell::wlr_layer::{
    LayerShellHandler, LayerSurface, LayerSurfaceConfigure,
};
use wayland_client::{Connection, QueueHandle};

use super::super::state::WaylandState;

impl LayerShellHandler for WaylandState {
    fn closed(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _layer: &LayerSurface) {
        info!("Layer surface closed by compositor");
        self.input_state.should_exit = true;
    }

    fn configure(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _layer: &LayerSurface,
        configure: LayerSurfaceConfigure,
        _serial: u32,
    ) {
        let (width, height) = configure.new_size;
        info!("Layer surface configured: {}x{}", width, height);

        // Zero means "pick your own size": keep the layout size we requested.
        if width > 0 && height > 0 {
            let expected = (
                self.input_state.layout.width as u32,
                self.input_state.layout.height as u32,
            );
            if (width, height) != expected {
                warn!(
                    "Compositor granted {}x{} instead of {}x{}; content may be clipped",
                    width, height, expected.0, expected.1
                );
            }
            if self.surface.update_dimensions(width, height) {
                info!("Surface size changed - recreating SlotPool");
            }
        }

        self.surface.set_configured(true);
        self.input_state.mark_full_redraw();
    }
}
