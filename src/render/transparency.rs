use image::Rgb;
use nalgebra::Vector3;

/// Source-over blending of a shaded sample onto the frame.
pub fn blend(dst: Rgb<u8>, src: Vector3<f64>, alpha: f64) -> Rgb<u8> {
    let alpha = alpha.clamp(0., 1.);
    let mix = |i: usize| {
        let old = dst[i] as f64 / 255.;
        ((src[i] * alpha + old * (1. - alpha)) * 255.).round().clamp(0., 255.) as u8
    };
    Rgb([mix(0), mix(1), mix(2)])
}

pub fn to_rgb(color: Vector3<f64>) -> Rgb<u8> {
    let quantize = |c: f64| (c * 255.).round().clamp(0., 255.) as u8;
    Rgb([quantize(color.x), quantize(color.y), quantize(color.z)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_alpha_mixes_evenly() {
        let out = blend(Rgb([0, 0, 200]), Vector3::new(1., 0., 0.), 0.5);
        assert_eq!(out, Rgb([128, 0, 100]));
    }

    #[test]
    fn extremes_replace_or_keep() {
        let dst = Rgb([10, 20, 30]);
        assert_eq!(blend(dst, Vector3::new(1., 1., 1.), 0.), dst);
        assert_eq!(blend(dst, Vector3::new(1., 1., 1.), 1.), Rgb([255, 255, 255]));
    }
}
