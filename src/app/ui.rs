use super::state::RoomApp;
use crate::config::RENDER_SCALE;
use eframe::egui::{CentralPanel, Color32, Context, Frame, Ui};

impl RoomApp {
    pub fn render_ui(&mut self, ctx: &Context) {
        CentralPanel::default()
            .frame(Frame::NONE.fill(Color32::BLACK))
            .show(ctx, |ui| {
                self.render_viewport(ui);
                self.render_overlay(ui);
            });

        self.update_frame(ctx);
    }

    fn render_viewport(&mut self, ui: &mut Ui) {
        let available_size = ui.available_size();

        // Physical pixels, optionally scaled down for speed
        let pixels_per_point = ui.ctx().pixels_per_point() * RENDER_SCALE;
        let viewport_width = (available_size.x * pixels_per_point) as u32;
        let viewport_height = (available_size.y * pixels_per_point) as u32;
        self.update_viewport_size(viewport_width, viewport_height);

        if let Some(texture) = &self.texture {
            let resp = ui.image((texture.id(), available_size));
            self.viewport_has_pointer = resp.hovered();
        } else {
            self.viewport_has_pointer = false;
        }
    }

    fn render_overlay(&mut self, ui: &mut Ui) {
        // Painted over the viewport's top-left corner
        let pending = self.pending_textures();
        let text = if pending > 0 {
            format!("FPS: {}  loading {pending}", self.fps as u32)
        } else {
            format!("FPS: {}", self.fps as u32)
        };
        ui.painter().text(
            ui.max_rect().left_top() + egui::vec2(8.0, 8.0),
            egui::Align2::LEFT_TOP,
            text,
            egui::FontId::monospace(14.0),
            Color32::LIGHT_GRAY,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_surface_matches_physical_viewport() {
        let mut app = RoomApp::new();
        let ctx = Context::default();
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(400.0, 300.0),
            )),
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| app.render_ui(ctx));

        assert_eq!(app.scene.surface_size(), (400, 300));
        assert_eq!(app.frame.dimensions(), (400, 300));
        app.loader.wait();
    }
}
