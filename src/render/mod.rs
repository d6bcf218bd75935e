pub mod clip;
pub mod transparency;
pub mod z_buffer;

use crate::objects::camera::Camera;
use crate::objects::light::PointLight;
use crate::objects::material::{Material, Shading};
use crate::scene::{NodeKind, Scene};
use image::RgbImage;
use nalgebra::{Point3, Vector3};

/// A point light resolved to its world position for one frame.
#[derive(Clone, Debug)]
pub struct SceneLight {
    pub pos: Point3<f64>,
    pub light: PointLight,
}

pub fn collect_lights(scene: &Scene) -> Vec<SceneLight> {
    scene
        .traverse()
        .into_iter()
        .filter_map(|(id, world)| match &scene.node(id).kind {
            NodeKind::Light(light) => Some(SceneLight {
                pos: world.transform_point(&Point3::origin()),
                light: light.clone(),
            }),
            _ => None,
        })
        .collect()
}

fn compute_reflection(
    light_direction: &Vector3<f64>,
    surface_normal: &Vector3<f64>,
) -> Vector3<f64> {
    let beta = 2. * light_direction.dot(surface_normal);
    (-1. * light_direction) + (beta * surface_normal)
}

fn channel(value: u8) -> f64 {
    value as f64 / 255.
}

/// Shades one surface sample. `albedo` is the material color already
/// multiplied by the texel, in `0..=1` per channel.
fn calculate_color(
    material: &Material,
    albedo: Vector3<f64>,
    normal: &Vector3<f64>,
    surface_point: &Point3<f64>,
    lights: &[SceneLight],
    eye_pos: &Point3<f64>,
) -> Vector3<f64> {
    if material.shading == Shading::Basic {
        return albedo;
    }

    let view_direction = (eye_pos - surface_point).normalize();
    let specular_color = Vector3::new(
        channel(material.specular[0]),
        channel(material.specular[1]),
        channel(material.specular[2]),
    );

    let mut color = Vector3::zeros();
    for source in lights {
        let mut light_direction = source.pos - surface_point;
        let dist = light_direction.norm();
        light_direction /= dist.max(f64::EPSILON);

        let light_intensity = source.light.intensity * source.light.attenuation(dist);
        if light_intensity <= 0.0 {
            continue;
        }
        let light_color = Vector3::new(
            channel(source.light.color[0]),
            channel(source.light.color[1]),
            channel(source.light.color[2]),
        ) * light_intensity;

        let reflection_direction = compute_reflection(&light_direction, normal);

        let diffuse_intensity = normal.dot(&light_direction).max(0.);
        let specular_intensity = if diffuse_intensity > 0. {
            reflection_direction
                .dot(&view_direction)
                .max(0.)
                .powf(material.shininess)
        } else {
            0.
        };

        color += albedo.component_mul(&light_color) * diffuse_intensity
            + specular_color.component_mul(&light_color) * specular_intensity;
    }

    color.map(|c| c.clamp(0., 1.))
}

pub trait Renderer {
    fn create_frame(&mut self, width: u32, height: u32, scene: &Scene, camera: &Camera) -> RgbImage {
        let mut image = RgbImage::new(width, height);
        self.create_frame_mut(&mut image, scene, camera);
        image
    }
    fn create_frame_mut(&mut self, image: &mut RgbImage, scene: &Scene, camera: &Camera);
}
