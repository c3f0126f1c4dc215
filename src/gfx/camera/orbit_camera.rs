use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Z-up orbit camera for the primary viewport.
///
/// The camera orbits `target` at `distance`, parameterized by `pitch`
/// (elevation above the XY plane) and `yaw` (rotation around +Z). The
/// compass widget mutates `eye` and `up` directly during view transitions
/// and then calls [`OrbitCamera::resync_orbit`] so the spherical
/// bookkeeping stays consistent with the new pose.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
}

impl Camera for OrbitCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            eye: Vector3::zero(), // Auto-calculated in `update()`.
            target,
            up: Vector3::unit_z(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy: cgmath::Rad(std::f32::consts::PI / 4.0),
            znear: 0.1,
            zfar: 1000.0,
            uniform: CameraUniform::default(),
        };
        camera.update();
        camera
    }

    /// Unit vector from the eye toward the orbit target.
    ///
    /// Returns `None` when the eye coincides with the target.
    pub fn look_direction(&self) -> Option<Vector3<f32>> {
        let direction = self.target - self.eye;
        if direction.magnitude2() <= f32::EPSILON {
            return None;
        }
        Some(direction.normalize())
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
        self.update();
    }

    pub fn add_distance(&mut self, delta: f32) {
        let corrected_zoom = f32::log10(self.distance.max(1.0 + f32::EPSILON)) * delta;
        self.set_distance(self.distance + corrected_zoom);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
        self.update();
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.set_yaw(self.yaw + delta);
    }

    /// Pans the camera relative to the current view direction.
    /// `delta.0` = horizontal pan, `delta.1` = vertical pan.
    pub fn pan(&mut self, delta: (f32, f32)) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        // Scale by distance for a consistent feel at all zoom levels.
        let pan_scale = self.distance * 0.1;
        let movement = right * delta.0 * pan_scale + up * delta.1 * pan_scale;

        self.eye += movement;
        self.target += movement;
    }

    /// Recomputes `eye` (and restores the Z-up vector) after changing
    /// `distance`, `pitch` or `yaw`.
    fn update(&mut self) {
        self.eye = self.target
            + Vector3::new(
                self.distance * self.pitch.cos() * self.yaw.cos(),
                self.distance * self.pitch.cos() * self.yaw.sin(),
                self.distance * self.pitch.sin(),
            );
        self.up = Vector3::unit_z();
    }

    /// Recomputes the spherical bookkeeping (`distance`, `pitch`, `yaw`)
    /// from the current `eye`/`target` without moving the camera.
    ///
    /// Called after an external mutation of `eye` (a view transition frame)
    /// so subsequent orbit input continues from the new pose.
    pub fn resync_orbit(&mut self) {
        let offset = self.eye - self.target;
        let distance = offset.magnitude();
        if distance <= f32::EPSILON {
            return;
        }
        self.distance = distance;
        self.pitch = (offset.z / distance).clamp(-1.0, 1.0).asin();
        self.yaw = offset.y.atan2(offset.x);
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: None,
            max_distance: Some(64.0),
            min_pitch: -std::f32::consts::PI / 2.0 + f32::EPSILON,
            max_pitch: std::f32::consts::PI / 2.0 - f32::EPSILON,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_eye_lies_on_orbit_sphere() {
        let camera = OrbitCamera::new(8.0, 0.4, 0.2, Vector3::new(1.0, 2.0, 3.0), 1.5);
        let distance = (camera.eye - camera.target).magnitude();
        assert!((distance - 8.0).abs() < EPS);
    }

    #[test]
    fn test_resync_orbit_round_trip() {
        let mut camera = OrbitCamera::new(5.0, 0.7, -1.1, Vector3::zero(), 1.0);
        let (distance, pitch, yaw) = (camera.distance, camera.pitch, camera.yaw);

        camera.resync_orbit();

        assert!((camera.distance - distance).abs() < EPS);
        assert!((camera.pitch - pitch).abs() < EPS);
        assert!((camera.yaw - yaw).abs() < EPS);
    }

    #[test]
    fn test_resync_orbit_keeps_externally_set_pose() {
        let mut camera = OrbitCamera::new(5.0, 0.4, 0.2, Vector3::zero(), 1.0);

        // Mutate the pose the way a view transition does.
        camera.eye = Vector3::new(0.0, -10.0, 0.0);
        camera.up = Vector3::unit_z();
        camera.resync_orbit();

        assert_eq!(camera.eye, Vector3::new(0.0, -10.0, 0.0));
        assert!((camera.distance - 10.0).abs() < EPS);
        assert!(camera.pitch.abs() < EPS);
    }

    #[test]
    fn test_look_direction_is_unit_and_points_at_target() {
        let camera = OrbitCamera::new(4.0, 0.3, 1.2, Vector3::new(0.5, -0.5, 1.0), 1.0);
        let direction = camera.look_direction().unwrap();
        assert!((direction.magnitude() - 1.0).abs() < EPS);

        let expected = (camera.target - camera.eye).normalize();
        assert!((direction - expected).magnitude() < EPS);
    }

    #[test]
    fn test_look_direction_degenerate_pose() {
        let mut camera = OrbitCamera::new(4.0, 0.3, 1.2, Vector3::zero(), 1.0);
        camera.eye = camera.target;
        assert!(camera.look_direction().is_none());
    }

    #[test]
    fn test_pan_moves_eye_and_target_together() {
        let mut camera = OrbitCamera::new(6.0, 0.4, 0.2, Vector3::zero(), 1.0);
        let offset_before = camera.eye - camera.target;
        camera.pan((0.5, -0.25));
        let offset_after = camera.eye - camera.target;
        assert!((offset_before - offset_after).magnitude() < EPS);
    }
}
