use nalgebra::Point3;

pub mod camera;
pub mod light;
pub mod material;
pub mod model3d;
pub mod orbit;
pub mod texture;
pub mod triangle_mesh;

pub type Point = Point3<f64>;
