use crate::config::BACKGROUND_COLOR;
use crate::objects::camera::Camera;
use crate::objects::material::{Material, Side};
use crate::objects::model3d::Mesh;
use crate::objects::texture::Texture;
use crate::render::clip::{ClipVertex, clip_near};
use crate::render::transparency::{blend, to_rgb};
use crate::render::{Renderer, SceneLight, calculate_color, collect_lights};
use crate::scene::Scene;
use image::RgbImage;
use itertools::Itertools;
use nalgebra::{Matrix3, Matrix4, Point3, Vector2, Vector3};
use std::sync::Arc;

/// Vertex in image space: pixel x/y, NDC depth and `1/w` for
/// perspective-correct interpolation.
#[derive(Clone, Copy)]
struct ScreenVertex {
    x: f64,
    y: f64,
    z: f64,
    inv_w: f64,
}

struct DrawItem<'a> {
    mesh: &'a Mesh,
    world: Matrix4<f64>,
    view_depth: f64,
}

/// Per-draw state shared by every fragment of one mesh.
struct Fragments<'a> {
    material: &'a Material,
    texture: Option<Arc<Texture>>,
    lights: &'a [SceneLight],
    eye: Point3<f64>,
}

#[derive(Default)]
pub struct ZBufferPerformer {
    width: u32,
    height: u32,
    z_buffer: Vec<f64>,
}

impl ZBufferPerformer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            z_buffer: vec![f64::INFINITY; (width * height) as usize],
        }
    }

    fn reset(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.z_buffer
            .resize((width * height) as usize, f64::INFINITY);
        self.z_buffer.fill(f64::INFINITY);
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }

    fn to_screen(&self, v: &ClipVertex) -> ScreenVertex {
        let inv_w = 1. / v.clip.w;
        ScreenVertex {
            x: (v.clip.x * inv_w + 1.) * self.width as f64 / 2.,
            y: (1. - v.clip.y * inv_w) * self.height as f64 / 2.,
            z: v.clip.z * inv_w,
            inv_w,
        }
    }

    fn draw_triangle(
        &mut self,
        image: &mut RgbImage,
        tri: &[ClipVertex; 3],
        fragments: &Fragments,
    ) {
        let [s1, s2, s3] = tri.each_ref().map(|v| self.to_screen(v));

        // Twice the signed area in image space (y down): negative for counter-clockwise faces.
        let denom = (s2.x - s1.x) * (s3.y - s1.y) - (s2.y - s1.y) * (s3.x - s1.x);
        if denom.abs() < f64::EPSILON {
            return;
        }
        let front_facing = denom < 0.;
        if fragments.material.side == Side::Front && !front_facing {
            return;
        }

        // Bounding box clamped to the image.
        let min_x = s1.x.min(s2.x).min(s3.x).floor().max(0.) as u32;
        let max_x = (s1.x.max(s2.x).max(s3.x).ceil().min(self.width as f64) as u32).min(self.width);
        let min_y = s1.y.min(s2.y).min(s3.y).floor().max(0.) as u32;
        let max_y = (s1.y.max(s2.y).max(s3.y).ceil().min(self.height as f64) as u32).min(self.height);

        for y in min_y..max_y {
            let py = y as f64 + 0.5;
            for x in min_x..max_x {
                let px = x as f64 + 0.5;

                // Barycentric weights of s1, s2, s3.
                let u = ((s3.x - s2.x) * (py - s2.y) - (s3.y - s2.y) * (px - s2.x)) / denom;
                let v = ((s1.x - s3.x) * (py - s3.y) - (s1.y - s3.y) * (px - s3.x)) / denom;
                let w = 1. - u - v;
                if u < 0. || v < 0. || w < 0. {
                    continue;
                }

                let z = u * s1.z + v * s2.z + w * s3.z;
                if !(-1.0..=1.0).contains(&z) {
                    continue;
                }
                let idx = self.index(x, y);
                if z >= self.z_buffer[idx] {
                    continue;
                }

                // Perspective-correct weights.
                let (pu, pv, pw) = (u * s1.inv_w, v * s2.inv_w, w * s3.inv_w);
                let sum = pu + pv + pw;
                let (pu, pv, pw) = (pu / sum, pv / sum, pw / sum);

                let world = tri[0].world * pu + tri[1].world * pv + tri[2].world * pw;
                let uv = tri[0].uv * pu + tri[1].uv * pv + tri[2].uv * pw;
                let mut normal = (tri[0].normal * pu + tri[1].normal * pv + tri[2].normal * pw)
                    .try_normalize(f64::EPSILON)
                    .unwrap_or_else(Vector3::z);
                if !front_facing {
                    normal = -normal;
                }

                let (albedo, alpha) = Self::albedo(fragments, uv);
                if fragments.material.transparent && alpha <= 0. {
                    continue;
                }

                let color = calculate_color(
                    fragments.material,
                    albedo,
                    &normal,
                    &Point3::from(world),
                    fragments.lights,
                    &fragments.eye,
                );

                let pixel = if fragments.material.transparent {
                    blend(*image.get_pixel(x, y), color, alpha)
                } else {
                    to_rgb(color)
                };
                image.put_pixel(x, y, pixel);

                if fragments.material.depth_write {
                    self.z_buffer[idx] = z;
                }
            }
        }
    }

    /// Material color times texel, and the texel alpha.
    fn albedo(fragments: &Fragments, uv: Vector2<f64>) -> (Vector3<f64>, f64) {
        let material = fragments.material;
        let base = Vector3::new(
            material.color[0] as f64,
            material.color[1] as f64,
            material.color[2] as f64,
        ) / 255.;

        match (&material.map, &fragments.texture) {
            (Some(map), Some(texture)) => {
                let texel = map.sample(texture, uv);
                let texel_color =
                    Vector3::new(texel[0] as f64, texel[1] as f64, texel[2] as f64) / 255.;
                (base.component_mul(&texel_color), texel[3] as f64 / 255.)
            }
            _ => (base, 1.),
        }
    }

    fn draw_object(
        &mut self,
        image: &mut RgbImage,
        item: &DrawItem,
        camera: &Camera,
        lights: &[SceneLight],
    ) {
        let geometry = &item.mesh.geometry;
        let normal_matrix: Matrix3<f64> = item
            .world
            .fixed_view::<3, 3>(0, 0)
            .into_owned()
            .try_inverse()
            .map(|m| m.transpose())
            .unwrap_or_else(Matrix3::identity);

        let vertices: Vec<ClipVertex> = geometry
            .vertices()
            .iter()
            .zip(geometry.normals())
            .zip(geometry.uvs())
            .map(|((v, n), uv)| {
                let world = item.world * v.to_homogeneous();
                ClipVertex {
                    clip: camera.camera_matrix * world,
                    world: world.xyz(),
                    normal: (normal_matrix * n).normalize(),
                    uv: *uv,
                }
            })
            .collect();

        let fragments = Fragments {
            material: &item.mesh.material,
            texture: item.mesh.material.map.as_ref().map(|m| m.texture.get()),
            lights,
            eye: camera.pos,
        };

        for &(a, b, c) in geometry.triangles() {
            for tri in clip_near([vertices[a], vertices[b], vertices[c]]) {
                self.draw_triangle(image, &tri, &fragments);
            }
        }
    }
}

impl Renderer for ZBufferPerformer {
    fn create_frame_mut(&mut self, image: &mut RgbImage, scene: &Scene, camera: &Camera) {
        let (width, height) = image.dimensions();
        self.reset(width, height);
        image.pixels_mut().for_each(|px| *px = BACKGROUND_COLOR);

        let lights = collect_lights(scene);
        let (transparent, opaque): (Vec<DrawItem>, Vec<DrawItem>) = scene
            .traverse()
            .into_iter()
            .filter_map(|(id, world)| {
                let mesh = scene.node(id).as_mesh()?;
                let center = camera.view_matrix * world * Point3::origin().to_homogeneous();
                Some(DrawItem {
                    mesh,
                    world,
                    view_depth: -center.z,
                })
            })
            .partition(|item| item.mesh.material.transparent);

        for item in &opaque {
            self.draw_object(image, item, camera, &lights);
        }
        for item in transparent
            .iter()
            .sorted_by(|a, b| b.view_depth.total_cmp(&a.view_depth))
        {
            self.draw_object(image, item, camera, &lights);
        }
    }
}
