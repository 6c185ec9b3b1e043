//! Camera and orbit rig for multi-view rendering

use crate::{Point3f, Vector3f};
use nalgebra::{Matrix4, Perspective3, Rotation3, Vector3};

/// A look-at camera with a perspective projection
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3f,
    pub target: Point3f,
    pub up: Vector3f,
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Get the projection matrix for the given aspect ratio
    pub fn projection_matrix(&self, aspect_ratio: f32) -> Matrix4<f32> {
        let perspective =
            Perspective3::new(aspect_ratio, self.fov_deg.to_radians(), self.near, self.far);
        perspective.into_inner()
    }
}

/// The orbiting camera rig: a fixed camera offset parented to a pivot at the
/// origin. Rotating the pivot about +Z by the azimuth sweeps the camera
/// around the object while it keeps tracking the origin.
///
/// The world is Z-up; the default offset (0, 1, 0.6) looks down at the
/// object from slightly above.
#[derive(Debug, Clone)]
pub struct OrbitRig {
    pub offset: Vector3f,
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitRig {
    fn default() -> Self {
        Self {
            offset: Vector3f::new(0.0, 1.0, 0.6),
            fov_deg: 25.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl OrbitRig {
    /// Camera pose for the given azimuth, in degrees
    pub fn camera_at(&self, azimuth_deg: f32) -> Camera {
        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), azimuth_deg.to_radians());
        let position = Point3f::from(rotation * self.offset);
        Camera {
            position,
            target: Point3f::origin(),
            up: Vector3f::z(),
            fov_deg: self.fov_deg,
            near: self.near,
            far: self.far,
        }
    }

    /// Elevation of the rig above the horizontal plane, in degrees
    pub fn elevation_deg(&self) -> f32 {
        let horizontal = (self.offset.x * self.offset.x + self.offset.y * self.offset.y).sqrt();
        self.offset.z.atan2(horizontal).to_degrees()
    }

    /// Distance from the camera to the orbit center
    pub fn distance(&self) -> f32 {
        self.offset.norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_rig_geometry() {
        let rig = OrbitRig::default();
        assert_relative_eq!(rig.distance(), 1.36f32.sqrt(), epsilon = 1e-6);
        assert_relative_eq!(rig.elevation_deg(), 0.6f32.atan().to_degrees(), epsilon = 1e-5);
    }

    #[test]
    fn test_orbit_keeps_distance_and_elevation() {
        let rig = OrbitRig::default();
        for azimuth in [0.0f32, 45.0, 90.0, 180.0, 270.0] {
            let cam = rig.camera_at(azimuth);
            assert_relative_eq!(cam.position.coords.norm(), rig.distance(), epsilon = 1e-5);
            assert_relative_eq!(cam.position.z, 0.6, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_azimuth_zero_matches_offset() {
        let rig = OrbitRig::default();
        let cam = rig.camera_at(0.0);
        assert_relative_eq!(cam.position.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(cam.position.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_view_matrix_looks_at_origin() {
        let rig = OrbitRig::default();
        let cam = rig.camera_at(120.0);
        let view = cam.view_matrix();
        // The origin maps onto the camera's -Z axis at the orbit distance
        let p = view.transform_point(&Point3f::origin());
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, -rig.distance(), epsilon = 1e-5);
    }
}
