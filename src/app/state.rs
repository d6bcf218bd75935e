use crate::assets::{TextureLoader, asset_path, load_font_or_fallback};
use crate::clock::{ClockFace, ClockTimer, host_locale};
use crate::config::{BACKGROUND_COLOR, CLOCK_FONT_PATH};
use crate::context::SceneContext;
use crate::render::Renderer;
use crate::render::z_buffer::ZBufferPerformer;
use crate::room::{RoomTextures, compose};
use chrono::Local;
use eframe::egui::{Context, TextureHandle};
use eframe::{App, Frame};
use image::RgbImage;
use std::time::{Duration, Instant};

pub struct RoomApp {
    pub texture: Option<TextureHandle>,
    pub frame: RgbImage,
    pub scene: SceneContext,
    pub renderer: Box<dyn Renderer>,

    pub clock: ClockFace,
    pub clock_timer: ClockTimer,
    pub loader: TextureLoader,

    pub fps: f64,
    pub last_frame_time: Instant,

    // Pointer is over the rendered viewport
    pub viewport_has_pointer: bool,
}

impl Default for RoomApp {
    fn default() -> Self {
        let mut scene = SceneContext::new();
        let mut loader = TextureLoader::new();
        let textures = RoomTextures::load(&mut loader);
        let mut clock = ClockFace::new(
            load_font_or_fallback(&asset_path(CLOCK_FONT_PATH)),
            host_locale(),
        );

        compose(&mut scene, &textures, &mut clock, Local::now().time());

        let (width, height) = scene.surface_size();
        Self {
            texture: None,
            frame: RgbImage::from_pixel(width, height, BACKGROUND_COLOR),
            scene,
            renderer: Box::new(ZBufferPerformer::new(width, height)),
            clock,
            clock_timer: ClockTimer::new(Instant::now()),
            loader,
            fps: 0.0,
            last_frame_time: Instant::now(),
            viewport_has_pointer: false,
        }
    }
}

impl RoomApp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Redraws the clock bitmap when its one-second interval has elapsed.
    /// Returns the time left until the next tick.
    pub fn tick_clock(&mut self, now: Instant) -> Duration {
        if self.clock_timer.poll(now) {
            if let Some(node) = self.scene.clock_face {
                self.clock
                    .update(&mut self.scene.scene, node, Local::now().time());
            }
        }
        self.clock_timer.until_next(now)
    }

    pub fn update_frame(&mut self, ctx: &Context) {
        self.renderer
            .create_frame_mut(&mut self.frame, &self.scene.scene, &self.scene.camera);

        let egui_image = egui::ColorImage::from_rgb(
            [self.frame.width() as usize, self.frame.height() as usize],
            self.frame.as_raw(),
        );

        match self.texture.as_mut() {
            Some(texture) => texture.set(egui_image, Default::default()),
            None => {
                self.texture = Some(ctx.load_texture("rendered_image", egui_image, Default::default()))
            }
        }
    }

    pub fn update_fps(&mut self) {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time).as_secs_f64();
        self.last_frame_time = now;
        if frame_time > 0.0 {
            self.fps = 1.0 / frame_time;
        }
    }

    pub fn update_viewport_size(&mut self, width: u32, height: u32) {
        if self.scene.resize(width, height) {
            self.frame = RgbImage::from_pixel(width, height, BACKGROUND_COLOR);
        }
    }

    /// Texture decodes that have not finished yet.
    pub fn pending_textures(&mut self) -> usize {
        self.loader.in_flight()
    }
}

impl App for RoomApp {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        self.update_fps();
        let until_tick = self.tick_clock(Instant::now());
        self.mouse_wheel_zoom(ctx);
        self.mouse_drag_orbit(ctx);

        self.render_ui(ctx);

        // Input events repaint on their own; otherwise wake for the next clock
        // tick, or right away while textures are still arriving
        if self.pending_textures() > 0 {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(until_tick);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_resize_reallocates_output_surface() {
        let mut app = RoomApp::new();
        app.update_viewport_size(320, 180);
        assert_eq!(app.frame.dimensions(), (320, 180));
        assert_eq!(app.scene.camera.aspect_ratio(), 320. / 180.);

        app.update_viewport_size(0, 50);
        assert_eq!(app.frame.dimensions(), (320, 180));
        app.loader.wait();
    }

    #[test]
    fn clock_ticks_only_after_interval() {
        let mut app = RoomApp::new();
        let node = app.scene.clock_face.unwrap();
        let slot = |app: &RoomApp| {
            app.scene.scene.node(node).as_mesh().unwrap().material.map.clone().unwrap().texture
        };

        let start = Instant::now();
        app.clock_timer = ClockTimer::new(start);
        let before = slot(&app);

        let left = app.tick_clock(start + Duration::from_millis(10));
        assert!(slot(&app).ptr_eq(&before));
        assert_eq!(left, Duration::from_millis(990));

        let left = app.tick_clock(start + Duration::from_millis(1000));
        assert!(!slot(&app).ptr_eq(&before));
        assert_eq!(left, Duration::from_millis(1000));
        app.loader.wait();
    }
}
