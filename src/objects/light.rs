use image::Rgb;
use imageproc::definitions::HasWhite;

#[derive(Clone, Debug)]
pub struct PointLight {
    pub color: Rgb<u8>,
    pub intensity: f64,
    /// Distance at which the light contribution reaches zero; `0` means unlimited.
    pub range: f64,
    pub decay: f64,
}

impl PointLight {
    pub fn new(intensity: f64, range: f64, decay: f64) -> Self {
        Self {
            color: Rgb::white(),
            intensity,
            range,
            decay,
        }
    }

    pub fn attenuation(&self, distance: f64) -> f64 {
        if self.range <= 0.0 {
            return 1.0;
        }
        (1.0 - distance / self.range).clamp(0.0, 1.0).powf(self.decay)
    }
}
