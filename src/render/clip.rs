use nalgebra::{Vector2, Vector3, Vector4};

/// Vertex after the projection transform, carrying everything the fragment
/// stage interpolates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipVertex {
    pub clip: Vector4<f64>,
    pub world: Vector3<f64>,
    pub normal: Vector3<f64>,
    pub uv: Vector2<f64>,
}

impl ClipVertex {
    fn lerp(&self, other: &ClipVertex, t: f64) -> ClipVertex {
        ClipVertex {
            clip: self.clip.lerp(&other.clip, t),
            world: self.world.lerp(&other.world, t),
            normal: self.normal.lerp(&other.normal, t),
            uv: self.uv.lerp(&other.uv, t),
        }
    }

    /// Signed distance to the near plane (`z = -w` in clip space); inside when
    /// non-negative. With a positive near distance this also implies `w > 0`.
    fn near_distance(&self) -> f64 {
        self.clip.z + self.clip.w
    }
}

/// Clips a triangle against the near plane (Sutherland–Hodgman) and returns
/// the surviving polygon fanned back into triangles.
pub fn clip_near(tri: [ClipVertex; 3]) -> Vec<[ClipVertex; 3]> {
    let distances = tri.map(|v| v.near_distance());
    if distances.iter().all(|&d| d >= 0.0) {
        return vec![tri];
    }
    if distances.iter().all(|&d| d < 0.0) {
        return Vec::new();
    }

    let mut polygon: Vec<ClipVertex> = Vec::with_capacity(4);
    for i in 0..3 {
        let j = (i + 1) % 3;
        let (a, b) = (&tri[i], &tri[j]);
        let (da, db) = (distances[i], distances[j]);

        if da >= 0.0 {
            polygon.push(*a);
        }
        if (da >= 0.0) != (db >= 0.0) {
            let t = da / (da - db);
            polygon.push(a.lerp(b, t));
        }
    }

    (1..polygon.len().saturating_sub(1))
        .map(|k| [polygon[0], polygon[k], polygon[k + 1]])
        .collect()
}
