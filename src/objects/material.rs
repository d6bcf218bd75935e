use crate::objects::texture::TextureMap;
use image::Rgb;
use imageproc::definitions::HasWhite;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shading {
    /// Lit by the scene's point lights.
    Phong,
    /// Unlit: color times texel.
    Basic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Front,
    Double,
}

#[derive(Clone, Debug)]
pub struct Material {
    pub shading: Shading,
    pub color: Rgb<u8>,
    pub specular: Rgb<u8>,
    pub shininess: f64,
    pub map: Option<TextureMap>,
    pub transparent: bool,
    pub depth_write: bool,
    pub side: Side,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            shading: Shading::Phong,
            color: Rgb::white(),
            specular: Rgb([17, 17, 17]),
            shininess: 30.,
            map: None,
            transparent: false,
            depth_write: true,
            side: Side::Front,
        }
    }
}

impl Material {
    pub fn phong(map: Option<TextureMap>) -> Self {
        Self {
            map,
            ..Self::default()
        }
    }

    pub fn basic(map: Option<TextureMap>) -> Self {
        Self {
            shading: Shading::Basic,
            map,
            ..Self::default()
        }
    }
}
