use image::{Rgba, RgbaImage};
use nalgebra::Vector2;
use std::sync::{Arc, RwLock};

pub type Texture = RgbaImage;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wrap {
    Repeat,
    ClampToEdge,
}

/// Texture slot that a background loader may swap while the renderer reads it.
#[derive(Clone, Debug)]
pub struct SharedTexture {
    inner: Arc<RwLock<Arc<Texture>>>,
}

impl SharedTexture {
    pub fn new(texture: Texture) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(texture))),
        }
    }

    /// 1×1 fully transparent white: opaque materials show white, blended ones vanish.
    pub fn placeholder() -> Self {
        Self::new(RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 0])))
    }

    pub fn get(&self) -> Arc<Texture> {
        match self.inner.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn replace(&self, texture: Texture) {
        let texture = Arc::new(texture);
        match self.inner.write() {
            Ok(mut guard) => *guard = texture,
            Err(poisoned) => *poisoned.into_inner() = texture,
        }
    }

    pub fn ptr_eq(&self, other: &SharedTexture) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// A texture bound to a material together with its sampling parameters.
#[derive(Clone, Debug)]
pub struct TextureMap {
    pub texture: SharedTexture,
    pub wrap: Wrap,
    pub repeat: Vector2<f64>,
    pub rotation: f64,
}

impl TextureMap {
    pub fn new(texture: SharedTexture) -> Self {
        Self {
            texture,
            wrap: Wrap::ClampToEdge,
            repeat: Vector2::new(1.0, 1.0),
            rotation: 0.0,
        }
    }

    pub fn repeating(mut self, u: f64, v: f64) -> Self {
        self.wrap = Wrap::Repeat;
        self.repeat = Vector2::new(u, v);
        self
    }

    pub fn rotated(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Applies repeat and rotation around the UV origin.
    pub fn transform_uv(&self, uv: Vector2<f64>) -> Vector2<f64> {
        let (s, c) = self.rotation.sin_cos();
        Vector2::new(
            self.repeat.x * (c * uv.x + s * uv.y),
            self.repeat.y * (-s * uv.x + c * uv.y),
        )
    }

    /// Nearest-texel lookup; `v = 0` addresses the bottom row.
    pub fn sample(&self, texture: &Texture, uv: Vector2<f64>) -> Rgba<u8> {
        let uv = self.transform_uv(uv);
        let (u, v) = match self.wrap {
            Wrap::Repeat => (uv.x - uv.x.floor(), uv.y - uv.y.floor()),
            Wrap::ClampToEdge => (uv.x.clamp(0.0, 1.0), uv.y.clamp(0.0, 1.0)),
        };
        let (width, height) = texture.dimensions();
        let x = ((u * width as f64) as u32).min(width - 1);
        let y = (((1.0 - v) * height as f64) as u32).min(height - 1);
        *texture.get_pixel(x, y)
    }
}
