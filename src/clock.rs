use crate::config::{
    CLOCK_FONT_PX, CLOCK_HEIGHT, CLOCK_INTERVAL_MS, CLOCK_LOCALE_FORMAT, CLOCK_TIME_FORMAT,
    CLOCK_WIDTH,
};
use crate::objects::texture::{SharedTexture, Texture, TextureMap};
use crate::scene::{NodeId, Scene};
use ab_glyph::{Font, FontArc, GlyphId, PxScale, Rect, ScaleFont, point};
use chrono::{Locale, NaiveDate, NaiveTime};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use std::time::{Duration, Instant};

const TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Parses a POSIX or BCP 47 locale name (`en_US.UTF-8`, `en-US`) into a chrono locale.
pub fn parse_locale(name: &str) -> Option<Locale> {
    let name = name.split(['.', '@']).next()?.replace('-', "_");
    Locale::try_from(name.as_str()).ok()
}

/// Locale of the host, if it can be read and chrono knows it.
pub fn host_locale() -> Option<Locale> {
    let name = sys_locale::get_locale()?;
    let locale = parse_locale(&name);
    if locale.is_none() {
        tracing::warn!(locale = %name, "unknown host locale; using 24-hour time");
    }
    locale
}

/// Formats `time` the way `locale` writes a time of day, or as `HH:MM:SS`
/// without a locale.
pub fn format_time(time: NaiveTime, locale: Option<Locale>) -> String {
    match locale {
        Some(locale) => NaiveDate::default()
            .and_time(time)
            .and_utc()
            .format_localized(CLOCK_LOCALE_FORMAT, locale)
            .to_string(),
        None => time.format(CLOCK_TIME_FORMAT).to_string(),
    }
}

/// Offscreen bitmap holding the rendered time of day.
pub struct ClockFace {
    bitmap: Texture,
    font: FontArc,
    scale: PxScale,
    locale: Option<Locale>,
    text: String,
}

impl ClockFace {
    pub fn new(font: FontArc, locale: Option<Locale>) -> Self {
        Self {
            bitmap: RgbaImage::new(CLOCK_WIDTH, CLOCK_HEIGHT),
            font,
            scale: PxScale::from(CLOCK_FONT_PX),
            locale,
            text: String::new(),
        }
    }

    pub fn bitmap(&self) -> &Texture {
        &self.bitmap
    }

    /// Text drawn by the last [`ClockFace::draw`].
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Clears the bitmap and draws `time` with its glyphs centered on it.
    pub fn draw(&mut self, time: NaiveTime) {
        self.text = format_time(time, self.locale);
        self.bitmap.fill(0);

        let Some(ink) = self.ink_bounds() else {
            return;
        };
        let x = (CLOCK_WIDTH as f32 - ink.width()) / 2.0 - ink.min.x;
        let y = (CLOCK_HEIGHT as f32 - ink.height()) / 2.0 - ink.min.y;
        draw_text_mut(
            &mut self.bitmap,
            TEXT_COLOR,
            x.round() as i32,
            y.round() as i32,
            self.scale,
            &self.font,
            &self.text,
        );
    }

    /// Pixel box covered by the glyph outlines when the text is drawn at the
    /// origin. Glyphs are laid out on the `ascent` baseline, the same way
    /// `draw_text_mut` places them.
    fn ink_bounds(&self) -> Option<Rect> {
        let font = self.font.as_scaled(self.scale);
        let mut caret = 0.0;
        let mut last: Option<GlyphId> = None;
        let mut bounds: Option<Rect> = None;

        for c in self.text.chars() {
            let id = font.glyph_id(c);
            let glyph = id.with_scale_and_position(self.scale, point(caret, font.ascent()));
            caret += font.h_advance(id);
            let Some(outline) = font.outline_glyph(glyph) else {
                continue;
            };
            if let Some(last) = last {
                caret += font.kern(id, last);
            }
            last = Some(id);

            let bb = outline.px_bounds();
            bounds = Some(match bounds {
                None => bb,
                Some(b) => Rect {
                    min: point(b.min.x.min(bb.min.x), b.min.y.min(bb.min.y)),
                    max: point(b.max.x.max(bb.max.x), b.max.y.max(bb.max.y)),
                },
            });
        }
        bounds
    }

    /// Redraws the bitmap and binds it to the material of `node`, replacing
    /// whatever texture was bound before.
    pub fn update(&mut self, scene: &mut Scene, node: NodeId, time: NaiveTime) {
        self.draw(time);
        let Some(mesh) = scene.node_mut(node).as_mesh_mut() else {
            tracing::warn!("clock face node is not a mesh");
            return;
        };
        mesh.material.map = Some(TextureMap::new(SharedTexture::new(self.bitmap.clone())));
        tracing::trace!(text = %self.text, "clock face updated");
    }
}

/// Fixed-cadence trigger polled from the frame loop.
pub struct ClockTimer {
    interval: Duration,
    last_fired: Instant,
}

impl ClockTimer {
    pub fn new(now: Instant) -> Self {
        Self {
            interval: Duration::from_millis(CLOCK_INTERVAL_MS),
            last_fired: now,
        }
    }

    /// True at most once per interval. Missed intervals are not replayed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now.duration_since(self.last_fired) < self.interval {
            return false;
        }
        self.last_fired = now;
        true
    }

    pub fn until_next(&self, now: Instant) -> Duration {
        self.interval
            .saturating_sub(now.duration_since(self.last_fired))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::fallback_font;
    use crate::objects::material::Material;
    use crate::objects::model3d::{Mesh, Transform};
    use crate::objects::triangle_mesh::TriangleMesh;
    use crate::scene::Node;

    fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    /// Inclusive bounding box of non-transparent pixels.
    fn ink_bounds(bitmap: &Texture) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for (x, y, px) in bitmap.enumerate_pixels() {
            if px[3] == 0 {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
        bounds
    }

    fn clock_scene() -> (Scene, NodeId) {
        let mut scene = Scene::new();
        let id = scene.add(Node::mesh(
            "clock",
            Transform::default(),
            Mesh::new(TriangleMesh::plane(1., 1.), Material::basic(None)),
        ));
        (scene, id)
    }

    #[test]
    fn formats_twenty_four_hour_time_without_locale() {
        assert_eq!(format_time(hms(13, 7, 45), None), "13:07:45");
        assert_eq!(format_time(hms(0, 0, 9), None), "00:00:09");
    }

    #[test]
    fn twelve_hour_locale_uses_meridiem() {
        let text = format_time(hms(13, 7, 45), Some(Locale::en_US));
        assert!(text.contains("07:45"), "{text}");
        assert!(text.contains("PM"), "{text}");
        assert!(!text.starts_with("13"), "{text}");

        let morning = format_time(hms(9, 0, 0), Some(Locale::en_US));
        assert!(morning.contains("AM"), "{morning}");
    }

    #[test]
    fn twenty_four_hour_locale_keeps_hours() {
        assert_eq!(format_time(hms(13, 7, 45), Some(Locale::de_DE)), "13:07:45");
    }

    #[test]
    fn locale_names_are_normalized() {
        assert_eq!(parse_locale("en-US"), Some(Locale::en_US));
        assert_eq!(parse_locale("en_US.UTF-8"), Some(Locale::en_US));
        assert_eq!(parse_locale("de_DE@euro"), Some(Locale::de_DE));
        assert_eq!(parse_locale("C"), None);
        assert_eq!(parse_locale(""), None);
    }

    #[test]
    fn text_is_centered_in_bitmap() {
        let mut face = ClockFace::new(fallback_font(), None);
        face.draw(hms(13, 7, 45));

        assert_eq!(face.text(), "13:07:45");
        assert_eq!(face.bitmap().dimensions(), (512, 256));

        let (x0, y0, x1, y1) = ink_bounds(face.bitmap()).expect("text was drawn");
        let left = x0 as i32;
        let right = 511 - x1 as i32;
        let top = y0 as i32;
        let bottom = 255 - y1 as i32;
        assert!((left - right).abs() <= 4, "left {left} right {right}");
        assert!((top - bottom).abs() <= 4, "top {top} bottom {bottom}");
        assert!(left > 0 && top > 0);
    }

    #[test]
    fn face_draws_in_its_locale() {
        let mut face = ClockFace::new(fallback_font(), Some(Locale::en_US));
        face.draw(hms(13, 7, 45));
        assert!(face.text().contains("PM"));

        let (x0, _, x1, _) = ink_bounds(face.bitmap()).expect("text was drawn");
        assert!((x0 as i32 - (511 - x1 as i32)).abs() <= 4);
    }

    #[test]
    fn drawing_clears_previous_contents() {
        let mut face = ClockFace::new(fallback_font(), None);
        face.draw(hms(13, 7, 45));
        let first = face.bitmap().clone();
        face.draw(hms(13, 7, 45));
        assert_eq!(face.bitmap(), &first);

        face.draw(hms(1, 11, 11));
        assert_ne!(face.bitmap(), &first);
    }

    #[test]
    fn update_rebinds_a_single_texture() {
        let (mut scene, id) = clock_scene();
        let mut face = ClockFace::new(fallback_font(), None);

        face.update(&mut scene, id, hms(13, 7, 45));
        let first = scene.node(id).as_mesh().unwrap().material.map.clone().unwrap();

        face.update(&mut scene, id, hms(8, 0, 0));
        let bound = scene.node(id).as_mesh().unwrap().material.map.clone().unwrap();

        assert!(!bound.texture.ptr_eq(&first.texture));
        assert_eq!(*bound.texture.get(), *face.bitmap());

        let mut fresh = ClockFace::new(fallback_font(), None);
        fresh.draw(hms(8, 0, 0));
        assert_eq!(*bound.texture.get(), *fresh.bitmap());
    }

    #[test]
    fn update_on_non_mesh_node_is_ignored() {
        let mut scene = Scene::new();
        let id = scene.add(Node::group("g"));
        let mut face = ClockFace::new(fallback_font(), None);
        face.update(&mut scene, id, hms(12, 0, 0));
        assert_eq!(face.text(), "12:00:00");
    }

    #[test]
    fn timer_fires_once_per_interval() {
        let start = Instant::now();
        let mut timer = ClockTimer::new(start);
        assert!(!timer.poll(start + Duration::from_millis(999)));
        assert!(timer.poll(start + Duration::from_millis(1000)));
        assert!(!timer.poll(start + Duration::from_millis(1500)));
        assert_eq!(timer.until_next(start + Duration::from_millis(1500)), Duration::from_millis(500));
        assert!(timer.poll(start + Duration::from_millis(5000)));
        assert!(!timer.poll(start + Duration::from_millis(5001)));
    }
}
