use crate::objects::Point;
use crate::objects::model3d::Triangle;
use nalgebra::{Vector2, Vector3};
use std::f64::consts::PI;

/// Indexed triangle geometry with per-vertex normals and texture coordinates.
///
/// Counter-clockwise winding marks the front face.
#[derive(Clone, Debug, Default)]
pub struct TriangleMesh {
    vertices: Vec<Point>,
    normals: Vec<Vector3<f64>>,
    uvs: Vec<Vector2<f64>>,
    triangles: Vec<Triangle>,
}

impl TriangleMesh {
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vector3<f64>] {
        &self.normals
    }

    pub fn uvs(&self) -> &[Vector2<f64>] {
        &self.uvs
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Flat rectangle in the XY plane facing +Z, centered on the origin.
    pub fn plane(width: f64, height: f64) -> Self {
        let mut mesh = TriangleMesh::default();
        mesh.push_face([0, 1, 2], (1.0, -1.0), width, height, 0.0);
        mesh
    }

    /// Axis-aligned box centered on the origin.
    pub fn cuboid(width: f64, height: f64, depth: f64) -> Self {
        let mut mesh = TriangleMesh::default();
        mesh.push_face([2, 1, 0], (-1.0, -1.0), depth, height, width); // +x
        mesh.push_face([2, 1, 0], (1.0, -1.0), depth, height, -width); // -x
        mesh.push_face([0, 2, 1], (1.0, 1.0), width, depth, height); // +y
        mesh.push_face([0, 2, 1], (1.0, -1.0), width, depth, -height); // -y
        mesh.push_face([0, 1, 2], (1.0, -1.0), width, height, depth); // +z
        mesh.push_face([0, 1, 2], (-1.0, -1.0), width, height, -depth); // -z
        mesh
    }

    pub fn sphere(radius: f64, width_segments: usize, height_segments: usize) -> Self {
        Self::sphere_segment(radius, width_segments, height_segments, 0.0, 2.0 * PI, 0.0, PI)
    }

    /// Part of a sphere bounded by azimuth `phi` and polar angle `theta` ranges.
    pub fn sphere_segment(
        radius: f64,
        width_segments: usize,
        height_segments: usize,
        phi_start: f64,
        phi_length: f64,
        theta_start: f64,
        theta_length: f64,
    ) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);
        let theta_end = (theta_start + theta_length).min(PI);

        let mut mesh = TriangleMesh::default();
        let mut grid: Vec<Vec<usize>> = Vec::with_capacity(height_segments + 1);

        for iy in 0..=height_segments {
            let v = iy as f64 / height_segments as f64;

            // Pole vertices sit in the middle of their texel column.
            let u_offset = if iy == 0 && theta_start == 0.0 {
                0.5 / width_segments as f64
            } else if iy == height_segments && theta_end == PI {
                -0.5 / width_segments as f64
            } else {
                0.0
            };

            let mut row = Vec::with_capacity(width_segments + 1);
            for ix in 0..=width_segments {
                let u = ix as f64 / width_segments as f64;
                let phi = phi_start + u * phi_length;
                let theta = theta_start + v * theta_length;

                let vertex = Point::new(
                    -radius * phi.cos() * theta.sin(),
                    radius * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                );
                let normal = vertex.coords.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::y);

                row.push(mesh.vertices.len());
                mesh.vertices.push(vertex);
                mesh.normals.push(normal);
                mesh.uvs.push(Vector2::new(u + u_offset, 1.0 - v));
            }
            grid.push(row);
        }

        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = grid[iy][ix + 1];
                let b = grid[iy][ix];
                let c = grid[iy + 1][ix];
                let d = grid[iy + 1][ix + 1];

                if iy != 0 || theta_start > 0.0 {
                    mesh.triangles.push((a, b, d));
                }
                if iy != height_segments - 1 || theta_end < PI {
                    mesh.triangles.push((b, c, d));
                }
            }
        }

        mesh
    }

    /// Appends one 1×1-segment face. `axes` maps the face's (u, v, w) onto world
    /// axes; the face lies at `w = depth / 2` and its normal points along `sign(depth)`.
    fn push_face(&mut self, axes: [usize; 3], dirs: (f64, f64), width: f64, height: f64, depth: f64) {
        let [u_axis, v_axis, w_axis] = axes;
        let normal_sign = if depth >= 0.0 { 1.0 } else { -1.0 };
        let offset = self.vertices.len();

        for iy in 0..=1 {
            let y = iy as f64 * height - height / 2.0;
            for ix in 0..=1 {
                let x = ix as f64 * width - width / 2.0;

                let mut vertex = Vector3::zeros();
                vertex[u_axis] = x * dirs.0;
                vertex[v_axis] = y * dirs.1;
                vertex[w_axis] = depth / 2.0;

                let mut normal = Vector3::zeros();
                normal[w_axis] = normal_sign;

                self.vertices.push(Point::from(vertex));
                self.normals.push(normal);
                self.uvs.push(Vector2::new(ix as f64, 1.0 - iy as f64));
            }
        }

        let a = offset;
        let b = offset + 2;
        let c = offset + 3;
        let d = offset + 1;
        self.triangles.push((a, b, d));
        self.triangles.push((b, c, d));
    }
}
