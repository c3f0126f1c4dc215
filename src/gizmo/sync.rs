//! Per-frame camera mirroring and billboarding.
//!
//! [`sync_orientation`] must run before [`billboard_flats`] within a frame:
//! ring facing depends on the compass camera position updated by the sync.

use cgmath::{InnerSpace, Matrix3, SquareMatrix, Vector3};

use crate::gfx::camera::orbit_camera::OrbitCamera;

use super::scene::{GizmoScene, GIZMO_CAMERA_RADIUS};

/// Mirrors the primary camera's rotation onto the compass camera.
///
/// The compass camera is placed opposite the primary look direction at the
/// fixed compass radius, copies the primary up vector, and keeps aiming at
/// the origin. Position and radius stay independent of the primary camera.
/// No-op when the primary pose is degenerate.
pub fn sync_orientation(scene: &mut GizmoScene, primary: &OrbitCamera) {
    let Some(direction) = primary.look_direction() else {
        return;
    };
    scene.camera.eye = -direction * GIZMO_CAMERA_RADIUS;
    scene.camera.up = primary.up;
}

/// Re-faces every ring outline and label toward the compass camera.
///
/// Recomputed every frame, never cached: the compass camera itself moves
/// every frame.
pub fn billboard_flats(scene: &mut GizmoScene) {
    let eye = scene.camera.eye;
    let up_hint = scene.camera.up;

    for object in scene
        .objects
        .iter_mut()
        .filter(|object| object.kind.is_billboarded())
    {
        object.rotation = billboard_rotation(object.position, eye, up_hint);
    }
}

/// Rotation presenting a flat +Z face at `position` toward `camera_eye`.
pub fn billboard_rotation(
    position: Vector3<f32>,
    camera_eye: Vector3<f32>,
    up_hint: Vector3<f32>,
) -> Matrix3<f32> {
    let to_camera = camera_eye - position;
    if to_camera.magnitude2() <= f32::EPSILON {
        return Matrix3::identity();
    }
    let normal = to_camera.normalize();

    let mut right = up_hint.cross(normal);
    if right.magnitude2() <= 1e-8 {
        // Up hint is parallel to the view; fall back to a world axis.
        right = Vector3::unit_x().cross(normal);
        if right.magnitude2() <= 1e-8 {
            right = Vector3::unit_y().cross(normal);
        }
    }
    let right = right.normalize();
    let up = normal.cross(right);

    Matrix3::from_cols(right, up, normal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::OrbitCamera;
    use crate::gizmo::object::GizmoObjectKind;
    use cgmath::Zero;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_sync_mirrors_rotation_at_fixed_radius() {
        let mut scene = GizmoScene::new();
        scene.build();

        let primary = OrbitCamera::new(12.0, 0.6, -0.9, Vector3::new(3.0, -1.0, 2.0), 1.6);
        sync_orientation(&mut scene, &primary);

        let direction = primary.look_direction().unwrap();
        assert!((scene.camera.eye - (-direction * GIZMO_CAMERA_RADIUS)).magnitude() < EPS);
        assert!((scene.camera.eye.magnitude() - GIZMO_CAMERA_RADIUS).abs() < EPS);
        assert!((scene.camera.up - primary.up).magnitude() < EPS);
    }

    #[test]
    fn test_sync_is_noop_for_degenerate_primary() {
        let mut scene = GizmoScene::new();
        scene.build();
        let before = scene.camera.eye;

        let mut primary = OrbitCamera::new(5.0, 0.4, 0.2, Vector3::zero(), 1.0);
        primary.eye = primary.target;
        sync_orientation(&mut scene, &primary);

        assert_eq!(scene.camera.eye, before);
    }

    #[test]
    fn test_rings_face_the_compass_camera() {
        let mut scene = GizmoScene::new();
        scene.build();

        // Several distinct primary poses; after each sync + billboard pass
        // every billboarded object must face the compass camera exactly.
        let poses = [(0.6, -0.9), (0.0, 0.0), (-1.2, 2.4), (1.4, 3.0)];
        for (pitch, yaw) in poses {
            let primary = OrbitCamera::new(8.0, pitch, yaw, Vector3::zero(), 1.0);
            sync_orientation(&mut scene, &primary);
            billboard_flats(&mut scene);

            for object in scene
                .objects
                .iter()
                .filter(|o| o.kind.is_billboarded())
            {
                let to_camera = (scene.camera.eye - object.position).normalize();
                let dot = object.facing_vector().dot(to_camera);
                assert!(
                    (dot - 1.0).abs() < 1e-3,
                    "object at {:?} not facing camera (dot = {})",
                    object.position,
                    dot
                );
            }
        }
    }

    #[test]
    fn test_markers_are_never_billboarded() {
        let mut scene = GizmoScene::new();
        scene.build();

        let primary = OrbitCamera::new(8.0, 0.5, 1.0, Vector3::zero(), 1.0);
        sync_orientation(&mut scene, &primary);
        billboard_flats(&mut scene);

        for object in &scene.objects {
            if matches!(
                object.kind,
                GizmoObjectKind::Marker(_) | GizmoObjectKind::AxisLine
            ) {
                assert_eq!(object.rotation, Matrix3::identity());
            }
        }
    }

    #[test]
    fn test_billboard_rotation_is_orthonormal() {
        let rotation = billboard_rotation(
            Vector3::new(0.0, -1.22, 0.0),
            Vector3::new(2.0, -3.0, 1.5),
            Vector3::unit_z(),
        );
        let right = rotation * Vector3::unit_x();
        let up = rotation * Vector3::unit_y();
        let normal = rotation * Vector3::unit_z();

        assert!((right.magnitude() - 1.0).abs() < EPS);
        assert!((up.magnitude() - 1.0).abs() < EPS);
        assert!((normal.magnitude() - 1.0).abs() < EPS);
        assert!(right.dot(up).abs() < EPS);
        assert!(right.dot(normal).abs() < EPS);
        assert!(up.dot(normal).abs() < EPS);
    }

    #[test]
    fn test_billboard_handles_parallel_up_hint() {
        // Camera straight above the object with a Z up hint.
        let rotation = billboard_rotation(
            Vector3::zero(),
            Vector3::new(0.0, 0.0, 3.0),
            Vector3::unit_z(),
        );
        let normal = rotation * Vector3::unit_z();
        assert!((normal - Vector3::unit_z()).magnitude() < EPS);
    }
}
