//! The owning compass controller.
//!
//! All per-widget state (scene, camera, animator, surface rectangle) lives
//! in [`GizmoWidget`] with an explicit `mount`/`unmount` lifecycle; nothing
//! is module-level. The host calls [`GizmoWidget::update`] from its redraw
//! callback and routes clicks through [`GizmoWidget::handle_click`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use wgpu::Device;

use crate::gfx::camera::camera_utils::CameraManager;
use crate::gfx::camera::orbit_camera::OrbitCamera;
use crate::gfx::rendering::pipeline_manager::PipelineManager;

use super::animation::ViewTransitionAnimator;
use super::axis::AxisDirection;
use super::picking::pick_axis;
use super::scene::GizmoScene;
use super::sync::{billboard_flats, sync_orientation};

/// Side length of the widget surface in device-independent pixels.
pub const WIDGET_SIZE_DIP: f32 = 140.0;
/// Margin between the widget and the window edges, in DIP.
pub const WIDGET_MARGIN_DIP: f32 = 12.0;

/// The widget's bounding rectangle in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidgetRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl WidgetRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The fixed-size widget rect anchored to the window's top-right corner,
    /// scaled by the device pixel ratio.
    pub fn anchored_top_right(surface_width: f32, scale_factor: f32) -> Self {
        let size = WIDGET_SIZE_DIP * scale_factor;
        let margin = WIDGET_MARGIN_DIP * scale_factor;
        Self {
            x: (surface_width - size - margin).max(0.0),
            y: margin,
            width: size,
            height: size,
        }
    }

    pub fn contains(&self, point: (f32, f32)) -> bool {
        point.0 >= self.x
            && point.0 < self.x + self.width
            && point.1 >= self.y
            && point.1 < self.y + self.height
    }

    /// Converts a point in physical pixels to normalized device coordinates
    /// relative to this rectangle (x right, y up, both in [-1, 1]).
    pub fn to_ndc(&self, point: (f32, f32)) -> (f32, f32) {
        let ndc_x = 2.0 * (point.0 - self.x) / self.width - 1.0;
        let ndc_y = 1.0 - 2.0 * (point.1 - self.y) / self.height;
        (ndc_x, ndc_y)
    }

    /// Rect clamped to a surface, or `None` when fully outside it.
    pub fn clamped_to(&self, surface_width: u32, surface_height: u32) -> Option<WidgetRect> {
        let x0 = self.x.max(0.0);
        let y0 = self.y.max(0.0);
        let x1 = (self.x + self.width).min(surface_width as f32);
        let y1 = (self.y + self.height).min(surface_height as f32);
        if x1 - x0 < 1.0 || y1 - y0 < 1.0 {
            return None;
        }
        Some(WidgetRect::new(x0, y0, x1 - x0, y1 - y0))
    }
}

/// Cancellation handle for the widget's frame work, captured at mount.
///
/// Single-threaded by design: the frame loop and the unmount both run inside
/// the host's event loop.
#[derive(Clone, Default)]
pub struct CancellationHandle(Rc<Cell<bool>>);

impl CancellationHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// The orientation compass widget.
pub struct GizmoWidget {
    scene: GizmoScene,
    animator: ViewTransitionAnimator,
    rect: WidgetRect,
    enabled: bool,
    frame_loop: Option<CancellationHandle>,
}

impl GizmoWidget {
    pub fn new() -> Self {
        Self {
            scene: GizmoScene::new(),
            animator: ViewTransitionAnimator::new(),
            rect: WidgetRect::new(0.0, 0.0, WIDGET_SIZE_DIP, WIDGET_SIZE_DIP),
            enabled: true,
            frame_loop: None,
        }
    }

    /// Builds the compass scene and its GPU resources. Idempotent per mount.
    pub fn mount(&mut self, device: &Device) {
        if self.is_mounted() {
            return;
        }
        self.scene.build();
        self.scene.init_gpu_resources(device);
        self.frame_loop = Some(CancellationHandle::new());
        log::info!("compass widget mounted");
    }

    /// Cancels the frame work, invalidates any running transition, and
    /// releases every resource the mount created.
    pub fn unmount(&mut self) {
        if let Some(handle) = self.frame_loop.take() {
            handle.cancel();
        }
        self.animator.cancel();
        self.scene.teardown();
        log::info!("compass widget unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.frame_loop
            .as_ref()
            .is_some_and(|handle| !handle.is_cancelled())
    }

    pub fn set_rect(&mut self, rect: WidgetRect) {
        self.rect = rect;
    }

    pub fn rect(&self) -> WidgetRect {
        self.rect
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    pub fn scene(&self) -> &GizmoScene {
        &self.scene
    }

    /// Per-frame tick: orientation sync, then billboarding, then the
    /// animation step, in that order.
    ///
    /// Degrades to a no-op when unmounted or when no primary camera is
    /// available.
    pub fn update(&mut self, camera_manager: Option<&mut CameraManager>, now: Instant) {
        let Some(handle) = &self.frame_loop else {
            return;
        };
        if handle.is_cancelled() {
            return;
        }
        let Some(manager) = camera_manager else {
            return;
        };

        if self.enabled {
            sync_orientation(&mut self.scene, &manager.camera);
            billboard_flats(&mut self.scene);
        }
        self.animator.tick(manager, now);
    }

    /// Routes a pointer click in window physical pixels.
    ///
    /// Returns whether the click was consumed. A click outside the widget
    /// rect, with no primary camera, or hitting nothing tagged is ignored.
    pub fn handle_click(
        &mut self,
        position: (f32, f32),
        camera: Option<&OrbitCamera>,
        now: Instant,
    ) -> bool {
        if !self.is_mounted() || !self.enabled {
            return false;
        }
        if !self.rect.contains(position) {
            return false;
        }
        let Some(camera) = camera else {
            return false;
        };

        match pick_axis(&self.scene, self.rect.to_ndc(position)) {
            Some(axis) => {
                self.animator.start(axis, camera, now);
                true
            }
            None => false,
        }
    }

    /// Starts a transition directly, bypassing the hit test (UI buttons).
    pub fn snap_to_view(&mut self, axis: AxisDirection, camera: Option<&OrbitCamera>, now: Instant) {
        if !self.is_mounted() {
            return;
        }
        let Some(camera) = camera else {
            return;
        };
        self.animator.start(axis, camera, now);
    }

    /// True when the widget expects its render pass this frame.
    pub fn wants_render(&self) -> bool {
        self.is_mounted() && self.enabled
    }

    /// Writes this frame's camera and object uniforms.
    pub fn upload_frame_state(&mut self, queue: &wgpu::Queue) {
        if self.wants_render() {
            self.scene.upload_frame_state(queue);
        }
    }

    /// Records the compass draw calls into an already configured render
    /// pass (viewport and scissor set to the widget rect).
    ///
    /// Depth-tested objects draw first; labels draw last through the
    /// always-on-top pipeline.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, pipelines: &PipelineManager) {
        let Some(camera_bind_group) = self.scene.camera_bind_group() else {
            return;
        };
        let (Some(mesh_pipeline), Some(line_pipeline), Some(overlay_pipeline)) = (
            pipelines.get("gizmo_mesh"),
            pipelines.get("gizmo_line"),
            pipelines.get("gizmo_overlay"),
        ) else {
            return;
        };

        rpass.set_bind_group(0, camera_bind_group, &[]);

        for on_top_pass in [false, true] {
            for object in &self.scene.objects {
                if object.kind.draws_on_top() != on_top_pass {
                    continue;
                }
                let Some(gpu) = &object.gpu else {
                    continue;
                };

                let pipeline = if on_top_pass {
                    overlay_pipeline
                } else if object.uses_line_topology() {
                    line_pipeline
                } else {
                    mesh_pipeline
                };
                rpass.set_pipeline(pipeline);
                rpass.set_bind_group(1, &gpu.bind_group, &[]);
                rpass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
                rpass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..gpu.index_count, 0, 0..1);
            }
        }
    }
}

impl Default for GizmoWidget {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl GizmoWidget {
    /// Mounts the CPU side only, for tests that never touch a GPU.
    fn mount_offline(&mut self) {
        self.scene.build();
        self.frame_loop = Some(CancellationHandle::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::{CameraController, OrbitCamera};
    use crate::gizmo::animation::TRANSITION_DURATION;
    use crate::gizmo::scene::MARKER_OFFSET;
    use cgmath::{InnerSpace, Vector3, Vector4, Zero};
    use std::time::Duration;

    const EPS: f32 = 1e-3;

    fn manager_looking_from_neg_y(distance: f32) -> CameraManager {
        // Eye in the -Y half-space, slightly above the XY plane.
        let camera = OrbitCamera::new(
            distance,
            0.4,
            -std::f32::consts::FRAC_PI_2,
            Vector3::zero(),
            1.0,
        );
        CameraManager::new(camera, CameraController::new(0.005, 0.1))
    }

    /// Projects a compass-scene world point into widget pixels.
    fn project_to_widget(
        scene: &GizmoScene,
        rect: WidgetRect,
        world: Vector3<f32>,
    ) -> (f32, f32) {
        let clip = scene.camera.picking_view_proj() * Vector4::new(world.x, world.y, world.z, 1.0);
        let ndc = (clip.x / clip.w, clip.y / clip.w);
        (
            rect.x + (ndc.0 + 1.0) / 2.0 * rect.width,
            rect.y + (1.0 - ndc.1) / 2.0 * rect.height,
        )
    }

    #[test]
    fn test_rect_ndc_mapping() {
        let rect = WidgetRect::new(100.0, 50.0, 140.0, 140.0);
        assert_eq!(rect.to_ndc((170.0, 120.0)), (0.0, 0.0)); // center
        assert_eq!(rect.to_ndc((100.0, 50.0)), (-1.0, 1.0)); // top-left
        assert_eq!(rect.to_ndc((240.0, 190.0)), (1.0, -1.0)); // bottom-right
    }

    #[test]
    fn test_rect_contains() {
        let rect = WidgetRect::new(10.0, 10.0, 140.0, 140.0);
        assert!(rect.contains((10.0, 10.0)));
        assert!(rect.contains((80.0, 80.0)));
        assert!(!rect.contains((150.0, 150.0)));
        assert!(!rect.contains((9.0, 80.0)));
    }

    #[test]
    fn test_anchored_rect_scales_with_dpr() {
        let rect = WidgetRect::anchored_top_right(1920.0, 2.0);
        assert_eq!(rect.width, WIDGET_SIZE_DIP * 2.0);
        assert_eq!(rect.height, WIDGET_SIZE_DIP * 2.0);
        assert!(rect.x + rect.width <= 1920.0);
    }

    #[test]
    fn test_update_and_click_are_noops_when_unmounted() {
        let mut widget = GizmoWidget::new();
        let mut manager = manager_looking_from_neg_y(10.0);
        let eye_before = manager.camera.eye;

        widget.update(Some(&mut manager), Instant::now());
        assert_eq!(manager.camera.eye, eye_before);

        let consumed = widget.handle_click((70.0, 70.0), Some(&manager.camera), Instant::now());
        assert!(!consumed);
    }

    #[test]
    fn test_unmount_cancels_frame_loop_and_animation() {
        let mut widget = GizmoWidget::new();
        widget.mount_offline();
        assert!(widget.is_mounted());

        let mut manager = manager_looking_from_neg_y(10.0);
        let now = Instant::now();
        widget.snap_to_view(AxisDirection::PosX, Some(&manager.camera), now);
        assert!(widget.is_animating());

        widget.unmount();
        assert!(!widget.is_mounted());
        assert!(!widget.scene().is_built());

        // Pending frame updates are dropped, not applied.
        let eye_before = manager.camera.eye;
        widget.update(Some(&mut manager), now + Duration::from_millis(100));
        assert_eq!(manager.camera.eye, eye_before);

        // A second unmount is a no-op.
        widget.unmount();
    }

    #[test]
    fn test_update_without_camera_is_noop() {
        let mut widget = GizmoWidget::new();
        widget.mount_offline();
        let facing_before: Vec<_> = widget
            .scene()
            .objects
            .iter()
            .map(|o| o.facing_vector())
            .collect();

        widget.update(None, Instant::now());

        let facing_after: Vec<_> = widget
            .scene()
            .objects
            .iter()
            .map(|o| o.facing_vector())
            .collect();
        assert_eq!(facing_before.len(), facing_after.len());
        for (before, after) in facing_before.iter().zip(&facing_after) {
            assert!((before - after).magnitude() < 1e-6);
        }
    }

    #[test]
    fn test_click_on_neg_y_marker_reaches_pose_after_duration() {
        let mut widget = GizmoWidget::new();
        widget.mount_offline();
        widget.set_rect(WidgetRect::new(0.0, 0.0, 140.0, 140.0));

        let mut manager = manager_looking_from_neg_y(10.0);
        let t0 = Instant::now();
        widget.update(Some(&mut manager), t0);

        let marker = AxisDirection::NegY.direction() * MARKER_OFFSET;
        let click = project_to_widget(widget.scene(), widget.rect(), marker);
        let consumed = widget.handle_click(click, Some(&manager.camera), t0);
        assert!(consumed);
        assert!(widget.is_animating());

        widget.update(
            Some(&mut manager),
            t0 + TRANSITION_DURATION + Duration::from_millis(10),
        );

        assert!((manager.camera.eye - Vector3::new(0.0, -10.0, 0.0)).magnitude() < EPS);
        assert!((manager.camera.up - Vector3::new(0.0, 0.0, 1.0)).magnitude() < EPS);
        assert!(!widget.is_animating());
    }

    #[test]
    fn test_click_hitting_only_untagged_objects_changes_nothing() {
        let mut widget = GizmoWidget::new();
        widget.mount_offline();
        widget.set_rect(WidgetRect::new(0.0, 0.0, 140.0, 140.0));

        let mut manager = manager_looking_from_neg_y(10.0);
        widget.update(Some(&mut manager), Instant::now());

        // The midpoint of the +X axis line: the ray hits the line's pick box
        // and nothing tagged.
        let click = project_to_widget(
            widget.scene(),
            widget.rect(),
            Vector3::new(0.5, 0.0, 0.0),
        );
        let eye_before = manager.camera.eye;
        let consumed = widget.handle_click(click, Some(&manager.camera), Instant::now());

        assert!(!consumed);
        assert!(!widget.is_animating());
        assert_eq!(manager.camera.eye, eye_before);
    }

    #[test]
    fn test_click_outside_rect_is_ignored() {
        let mut widget = GizmoWidget::new();
        widget.mount_offline();
        widget.set_rect(WidgetRect::new(0.0, 0.0, 140.0, 140.0));

        let manager = manager_looking_from_neg_y(10.0);
        let consumed = widget.handle_click((500.0, 500.0), Some(&manager.camera), Instant::now());
        assert!(!consumed);
    }

    #[test]
    fn test_rapid_double_click_lands_on_second_marker() {
        let mut widget = GizmoWidget::new();
        widget.mount_offline();
        widget.set_rect(WidgetRect::new(0.0, 0.0, 140.0, 140.0));

        let mut manager = manager_looking_from_neg_y(10.0);
        let t0 = Instant::now();
        widget.update(Some(&mut manager), t0);

        // First click: -X marker (visible from this pose).
        let first = project_to_widget(
            widget.scene(),
            widget.rect(),
            AxisDirection::NegX.direction() * MARKER_OFFSET,
        );
        assert!(widget.handle_click(first, Some(&manager.camera), t0));

        // Halfway through, click the -Y marker.
        let mid = t0 + Duration::from_millis(150);
        widget.update(Some(&mut manager), mid);
        let second = project_to_widget(
            widget.scene(),
            widget.rect(),
            AxisDirection::NegY.direction() * MARKER_OFFSET,
        );
        let distance_at_second_click =
            (manager.camera.eye - manager.camera.target).magnitude();
        assert!(widget.handle_click(second, Some(&manager.camera), mid));

        widget.update(
            Some(&mut manager),
            mid + TRANSITION_DURATION + Duration::from_millis(10),
        );

        let offset = manager.camera.eye - manager.camera.target;
        let colinearity = offset.normalize().dot(AxisDirection::NegY.direction());
        assert!(
            (colinearity - 1.0).abs() < EPS,
            "camera did not land on the second clicked axis"
        );
        assert!((offset.magnitude() - distance_at_second_click).abs() < EPS);
    }
}
