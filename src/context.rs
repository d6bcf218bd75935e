use crate::config::{ASPECT_RATIO, CAMERA_POSITION, FAR_PLANE, FOV_DEGREES, NEAR_PLANE};
use crate::objects::camera::Camera;
use crate::objects::orbit::OrbitController;
use crate::scene::{NodeId, Scene};
use nalgebra::{Point3, Vector3};

/// Everything the composer, the clock updater and the render loop share.
pub struct SceneContext {
    pub scene: Scene,
    pub camera: Camera,
    pub orbit: OrbitController,
    /// Node whose material shows the clock bitmap; set by the composer.
    pub clock_face: Option<NodeId>,
    surface_size: (u32, u32),
}

impl Default for SceneContext {
    fn default() -> Self {
        let [x, y, z] = CAMERA_POSITION;
        let pos = Point3::new(x, y, z);
        let camera = Camera::new(
            pos,
            Point3::origin(),
            Vector3::new(0.0, 1.0, 0.0),
            FOV_DEGREES.to_radians(),
            ASPECT_RATIO,
            NEAR_PLANE,
            FAR_PLANE,
        );

        Self {
            scene: Scene::new(),
            orbit: OrbitController::new(pos, Point3::origin()),
            camera,
            clock_face: None,
            surface_size: (1, 1),
        }
    }
}

impl SceneContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn surface_size(&self) -> (u32, u32) {
        self.surface_size
    }

    /// Syncs camera aspect and output surface with the host viewport.
    /// Returns false when nothing changed or the size is degenerate.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 || (width, height) == self.surface_size {
            return false;
        }
        self.surface_size = (width, height);
        self.camera.set_aspect_ratio(width as f64 / height as f64);
        tracing::debug!(width, height, "viewport resized");
        true
    }

    pub fn sync_camera(&mut self) {
        self.orbit.apply(&mut self.camera);
    }
}
