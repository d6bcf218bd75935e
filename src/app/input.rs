use super::state::RoomApp;
use crate::config::{RENDER_SCALE, ZOOM_SENSITIVITY_FACTOR};
use eframe::egui::Context;

impl RoomApp {
    pub fn mouse_wheel_zoom(&mut self, ctx: &Context) {
        // Zoom only while the cursor is over the viewport
        if !self.viewport_has_pointer {
            return;
        }
        let scroll_delta = ctx.input(|i| i.raw_scroll_delta);
        if scroll_delta.y == 0.0 {
            return;
        }
        // Scrolling up moves the camera closer
        let steps = scroll_delta.y as f64 * ZOOM_SENSITIVITY_FACTOR;
        self.scene.orbit.zoom(steps);
        self.scene.sync_camera();
    }

    pub fn mouse_drag_orbit(&mut self, ctx: &Context) {
        if !ctx.input(|i| i.pointer.primary_down()) || !self.viewport_has_pointer {
            return;
        }
        let delta = ctx.input(|i| i.pointer.delta());
        if delta.x == 0.0 && delta.y == 0.0 {
            return;
        }

        let (_, height) = self.scene.surface_size();
        let height = height as f64 / (ctx.pixels_per_point() * RENDER_SCALE) as f64;
        self.scene
            .orbit
            .rotate(delta.x as f64, delta.y as f64, height);
        self.scene.sync_camera();
    }
}
