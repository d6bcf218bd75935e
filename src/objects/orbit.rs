use crate::config::{MAX_ORBIT_DISTANCE, MIN_ORBIT_DISTANCE, ZOOM_STEP};
use crate::objects::camera::Camera;
use nalgebra::{Point3, Vector3};
use std::f64::consts::{PI, TAU};

const POLAR_EPSILON: f64 = 1e-6;

/// Keeps the camera on a sphere around a fixed target.
///
/// Angles follow the Y-up convention: `theta` is the azimuth measured from +Z
/// towards +X, `phi` the polar angle measured from +Y.
pub struct OrbitController {
    pub target: Point3<f64>,
    radius: f64,
    theta: f64,
    phi: f64,
}

impl OrbitController {
    pub fn new(eye: Point3<f64>, target: Point3<f64>) -> Self {
        let offset = eye - target;
        let radius = offset.norm().clamp(MIN_ORBIT_DISTANCE, MAX_ORBIT_DISTANCE);
        let theta = offset.x.atan2(offset.z);
        let phi = if offset.norm() > 0.0 {
            (offset.y / offset.norm()).clamp(-1.0, 1.0).acos()
        } else {
            PI / 2.0
        };

        Self {
            target,
            radius,
            theta,
            phi: phi.clamp(POLAR_EPSILON, PI - POLAR_EPSILON),
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn polar_angle(&self) -> f64 {
        self.phi
    }

    pub fn azimuth(&self) -> f64 {
        self.theta
    }

    pub fn eye(&self) -> Point3<f64> {
        let sin_phi = self.phi.sin();
        self.target
            + Vector3::new(
                self.radius * sin_phi * self.theta.sin(),
                self.radius * self.phi.cos(),
                self.radius * sin_phi * self.theta.cos(),
            )
    }

    /// Rotates by a pointer drag of `(dx, dy)` pixels over a viewport of the given height.
    pub fn rotate(&mut self, dx: f64, dy: f64, viewport_height: f64) {
        if viewport_height <= 0.0 {
            return;
        }
        self.theta -= TAU * dx / viewport_height;
        self.phi = (self.phi - TAU * dy / viewport_height).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
    }

    /// Positive steps move the eye towards the target.
    pub fn zoom(&mut self, steps: f64) {
        self.radius = (self.radius * ZOOM_STEP.powf(steps)).clamp(MIN_ORBIT_DISTANCE, MAX_ORBIT_DISTANCE);
    }

    pub fn apply(&self, camera: &mut Camera) {
        camera.set_view(self.eye(), self.target);
    }
}
