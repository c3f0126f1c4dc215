//! The eased view transition that moves the primary camera onto an axis.
//!
//! At most one job is logically active. Every job carries the generation
//! token current at its start; a tick whose token no longer matches drops
//! itself without touching the camera, so a superseding click or a widget
//! teardown deterministically invalidates stale updates.

use std::time::{Duration, Instant};

use cgmath::{InnerSpace, Vector3};

use crate::gfx::camera::camera_utils::CameraManager;
use crate::gfx::camera::orbit_camera::OrbitCamera;

use super::axis::AxisDirection;

/// Fixed duration of a view transition.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(300);

/// Cubic ease-out: fast initial change, slowing near completion.
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

#[derive(Debug, Clone, Copy)]
struct AnimationJob {
    start_eye: Vector3<f32>,
    start_up: Vector3<f32>,
    end_eye: Vector3<f32>,
    end_up: Vector3<f32>,
    target: Vector3<f32>,
    started_at: Instant,
    duration: Duration,
    generation: u64,
}

/// `Idle -> Animating` on a valid hit, `Animating -> Idle` when the eased
/// parameter reaches 1. A fresh hit while animating starts a brand-new job
/// against the camera's state at that instant.
pub struct ViewTransitionAnimator {
    generation: u64,
    job: Option<AnimationJob>,
}

impl ViewTransitionAnimator {
    pub fn new() -> Self {
        Self {
            generation: 0,
            job: None,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.job.is_some()
    }

    /// Starts a transition toward `axis`, superseding any running job.
    ///
    /// The orbit target and distance are re-read from the camera here, not
    /// taken from any earlier state: an external actor may have moved the
    /// camera since the last frame.
    pub fn start(&mut self, axis: AxisDirection, camera: &OrbitCamera, now: Instant) {
        let target = camera.target;
        let distance = (camera.eye - target).magnitude();
        if distance <= f32::EPSILON {
            return;
        }

        self.generation += 1;
        self.job = Some(AnimationJob {
            start_eye: camera.eye,
            start_up: camera.up,
            end_eye: axis.eye_for(target, distance),
            end_up: axis.up_vector(),
            target,
            started_at: now,
            duration: TRANSITION_DURATION,
            generation: self.generation,
        });
        log::debug!("view transition started toward {:?}", axis);
    }

    /// Invalidates the running job, if any. Pending ticks of that job will
    /// observe the bumped generation and drop themselves.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.job = None;
    }

    /// Applies one animation frame. Returns whether a job consumed the tick.
    pub fn tick(&mut self, manager: &mut CameraManager, now: Instant) -> bool {
        let Some(job) = self.job else {
            return false;
        };
        if job.generation != self.generation {
            // Superseded between scheduling and execution; drop silently.
            self.job = None;
            return false;
        }

        let elapsed = now.saturating_duration_since(job.started_at);
        let t = (elapsed.as_secs_f32() / job.duration.as_secs_f32()).min(1.0);
        let eased = ease_out_cubic(t);

        let camera = &mut manager.camera;
        camera.eye = job.start_eye + (job.end_eye - job.start_eye) * eased;
        let up = job.start_up + (job.end_up - job.start_up) * eased;
        camera.up = if up.magnitude2() > f32::EPSILON {
            up.normalize()
        } else {
            job.end_up
        };
        // Re-aim at the orbit target and let the controller bookkeeping
        // catch up with the externally written pose.
        camera.target = job.target;
        manager.resync();

        if t >= 1.0 {
            self.job = None;
        }
        true
    }
}

impl Default for ViewTransitionAnimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::{CameraController, CameraManager, OrbitCamera};
    use cgmath::Zero;

    const EPS: f32 = 1e-3;

    fn manager_with(distance: f32, target: Vector3<f32>) -> CameraManager {
        let camera = OrbitCamera::new(distance, 0.5, 0.8, target, 1.0);
        CameraManager::new(camera, CameraController::new(0.005, 0.1))
    }

    fn finish(animator: &mut ViewTransitionAnimator, manager: &mut CameraManager, start: Instant) {
        animator.tick(manager, start + TRANSITION_DURATION + Duration::from_millis(10));
    }

    #[test]
    fn test_ease_endpoints_and_monotonicity() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert!((ease_out_cubic(1.0) - 1.0).abs() < 1e-6);

        let mut previous = 0.0;
        for i in 0..=100 {
            let value = ease_out_cubic(i as f32 / 100.0);
            assert!(value >= previous - 1e-6);
            previous = value;
        }
    }

    #[test]
    fn test_each_axis_reaches_its_pose() {
        let target = Vector3::new(1.0, 2.0, 3.0);
        for axis in AxisDirection::ALL {
            let mut manager = manager_with(10.0, target);
            let mut animator = ViewTransitionAnimator::new();
            let start = Instant::now();

            animator.start(axis, &manager.camera, start);
            finish(&mut animator, &mut manager, start);

            let offset = manager.camera.eye - target;
            assert!(
                ((offset.magnitude()) - 10.0).abs() < EPS,
                "{:?}: distance not preserved",
                axis
            );
            let colinearity = offset.normalize().dot(axis.direction());
            assert!((colinearity - 1.0).abs() < EPS, "{:?}: not colinear", axis);
            assert!(
                (manager.camera.up - axis.up_vector()).magnitude() < EPS,
                "{:?}: wrong up",
                axis
            );
            assert!(!animator.is_animating());
        }
    }

    #[test]
    fn test_up_stays_unit_length_throughout() {
        let mut manager = manager_with(10.0, Vector3::zero());
        let mut animator = ViewTransitionAnimator::new();
        let start = Instant::now();
        animator.start(AxisDirection::PosZ, &manager.camera, start);

        for ms in (0..=330).step_by(30) {
            animator.tick(&mut manager, start + Duration::from_millis(ms));
            assert!((manager.camera.up.magnitude() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_neg_y_end_to_end_pose() {
        let mut manager = manager_with(10.0, Vector3::zero());
        let mut animator = ViewTransitionAnimator::new();
        let start = Instant::now();

        animator.start(AxisDirection::NegY, &manager.camera, start);
        finish(&mut animator, &mut manager, start);

        assert!((manager.camera.eye - Vector3::new(0.0, -10.0, 0.0)).magnitude() < EPS);
        assert!((manager.camera.up - Vector3::new(0.0, 0.0, 1.0)).magnitude() < EPS);
        assert!((manager.camera.distance - 10.0).abs() < EPS);
    }

    #[test]
    fn test_second_click_supersedes_first() {
        let mut manager = manager_with(10.0, Vector3::zero());
        let mut animator = ViewTransitionAnimator::new();
        let start = Instant::now();

        animator.start(AxisDirection::PosX, &manager.camera, start);
        animator.tick(&mut manager, start + Duration::from_millis(150));

        // Second click mid-flight: a brand-new job from the camera's state
        // at this instant, including a re-read of the orbit distance.
        let second = start + Duration::from_millis(150);
        let distance_at_second_click =
            (manager.camera.eye - manager.camera.target).magnitude();
        animator.start(AxisDirection::NegY, &manager.camera, second);
        finish(&mut animator, &mut manager, second);

        let offset = manager.camera.eye - manager.camera.target;
        let colinearity = offset.normalize().dot(AxisDirection::NegY.direction());
        assert!(
            (colinearity - 1.0).abs() < EPS,
            "camera ended at a blend instead of the second target"
        );
        assert!((offset.magnitude() - distance_at_second_click).abs() < EPS);
    }

    #[test]
    fn test_cancel_invalidates_pending_updates() {
        let mut manager = manager_with(10.0, Vector3::zero());
        let mut animator = ViewTransitionAnimator::new();
        let start = Instant::now();

        animator.start(AxisDirection::PosX, &manager.camera, start);
        animator.cancel();

        let eye_before = manager.camera.eye;
        let consumed = animator.tick(&mut manager, start + Duration::from_millis(100));
        assert!(!consumed);
        assert_eq!(manager.camera.eye, eye_before);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_start_is_noop_for_degenerate_camera() {
        let mut manager = manager_with(10.0, Vector3::zero());
        manager.camera.eye = manager.camera.target;
        let mut animator = ViewTransitionAnimator::new();

        animator.start(AxisDirection::PosX, &manager.camera, Instant::now());
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_orbit_bookkeeping_resynced_after_transition() {
        let mut manager = manager_with(8.0, Vector3::zero());
        let mut animator = ViewTransitionAnimator::new();
        let start = Instant::now();

        animator.start(AxisDirection::PosX, &manager.camera, start);
        finish(&mut animator, &mut manager, start);

        // Pitch/yaw/distance must describe the final pose.
        assert!((manager.camera.distance - 8.0).abs() < EPS);
        assert!(manager.camera.pitch.abs() < EPS);
        assert!(manager.camera.yaw.abs() < EPS);
    }
}
