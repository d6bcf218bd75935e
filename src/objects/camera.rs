use nalgebra::{Matrix4, Point3, Vector3};

pub struct Camera {
    pub pos: Point3<f64>,
    look_at: Point3<f64>,
    up: Vector3<f64>,
    fov_radians: f64,
    aspect_ratio: f64,
    near_plane: f64,
    far_plane: f64,
    pub perspective_matrix: Matrix4<f64>,
    pub view_matrix: Matrix4<f64>,
    pub camera_matrix: Matrix4<f64>,
}

impl Camera {
    pub fn new(
        pos: Point3<f64>,
        look_at: Point3<f64>,
        up: Vector3<f64>,
        fov_radians: f64,
        aspect_ratio: f64,
        near_plane: f64,
        far_plane: f64,
    ) -> Self {
        let mut camera = Camera {
            pos,
            look_at,
            up,
            fov_radians,
            aspect_ratio,
            near_plane,
            far_plane,
            perspective_matrix: Matrix4::identity(),
            view_matrix: Matrix4::identity(),
            camera_matrix: Matrix4::identity(),
        };
        camera.update_projection_matrix();
        camera.update_view_matrix();
        camera
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn fov_radians(&self) -> f64 {
        self.fov_radians
    }

    pub fn near_plane(&self) -> f64 {
        self.near_plane
    }

    pub fn far_plane(&self) -> f64 {
        self.far_plane
    }

    pub fn look_at_point(&self) -> Point3<f64> {
        self.look_at
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f64) {
        self.aspect_ratio = aspect_ratio;
        self.update_projection_matrix();
    }

    /// Moves the eye and retargets it, keeping the projection.
    pub fn set_view(&mut self, pos: Point3<f64>, look_at: Point3<f64>) {
        self.pos = pos;
        self.look_at = look_at;
        self.update_view_matrix();
    }

    fn update_projection_matrix(&mut self) {
        self.perspective_matrix = Matrix4::new_perspective(
            self.aspect_ratio,
            self.fov_radians,
            self.near_plane,
            self.far_plane,
        );
        self.camera_matrix = self.perspective_matrix * self.view_matrix;
    }

    fn update_view_matrix(&mut self) {
        self.view_matrix = Matrix4::look_at_rh(&self.pos, &self.look_at, &self.up);
        self.camera_matrix = self.perspective_matrix * self.view_matrix;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(
            Point3::new(0., 0., 5.),
            Point3::origin(),
            Vector3::y(),
            60f64.to_radians(),
            1.0,
            0.1,
            200.,
        )
    }

    #[test]
    fn aspect_change_rebuilds_projection() {
        let mut cam = camera();
        let before = cam.perspective_matrix;
        cam.set_aspect_ratio(2.0);
        assert_eq!(cam.aspect_ratio(), 2.0);
        assert!((cam.perspective_matrix[(0, 0)] * 2.0 - before[(0, 0)]).abs() < 1e-12);
        assert_eq!(cam.camera_matrix, cam.perspective_matrix * cam.view_matrix);
    }

    #[test]
    fn look_at_target_projects_to_center() {
        let cam = camera();
        let clip = cam.camera_matrix * Point3::origin().to_homogeneous();
        assert!((clip.x / clip.w).abs() < 1e-12);
        assert!((clip.y / clip.w).abs() < 1e-12);
    }
}
