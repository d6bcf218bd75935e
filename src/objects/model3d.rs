use crate::objects::material::Material;
use crate::objects::triangle_mesh::TriangleMesh;
use nalgebra::{Matrix4, Rotation3, Vector3};

pub type Triangle = (usize, usize, usize);

/// Local transform of a scene node: translation, XYZ Euler rotation, scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vector3<f64>,
    pub rotation: Vector3<f64>,
    pub scale: Vector3<f64>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            ..Self::default()
        }
    }

    pub fn rotated(mut self, x: f64, y: f64, z: f64) -> Self {
        self.rotation = Vector3::new(x, y, z);
        self
    }

    pub fn scaled(mut self, x: f64, y: f64, z: f64) -> Self {
        self.scale = Vector3::new(x, y, z);
        self
    }

    /// Rotation applied as `Rx * Ry * Rz`.
    pub fn rotation_matrix(&self) -> Matrix4<f64> {
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), self.rotation.x);
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), self.rotation.y);
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), self.rotation.z);
        (rx * ry * rz).to_homogeneous()
    }

    pub fn matrix(&self) -> Matrix4<f64> {
        Matrix4::new_translation(&self.position)
            * self.rotation_matrix()
            * Matrix4::new_nonuniform_scaling(&self.scale)
    }
}

#[derive(Clone, Debug)]
pub struct Mesh {
    pub geometry: TriangleMesh,
    pub material: Material,
}

impl Mesh {
    pub fn new(geometry: TriangleMesh, material: Material) -> Self {
        Self { geometry, material }
    }
}
