//! The compass control panel.

use std::time::Instant;

use imgui::Ui;

use crate::gfx::camera::camera_utils::CameraManager;
use crate::gizmo::axis::AxisDirection;
use crate::gizmo::widget::GizmoWidget;

/// Draws the compass panel: an enable toggle, one quick-view button per
/// axis (same transition path as clicking a marker), and camera readouts.
pub fn draw_compass_panel(
    ui: &Ui,
    camera_manager: &mut CameraManager,
    widget: &mut GizmoWidget,
    now: Instant,
) {
    ui.window("Compass")
        .size([240.0, 220.0], imgui::Condition::FirstUseEver)
        .position([16.0, 16.0], imgui::Condition::FirstUseEver)
        .build(|| {
            let mut enabled = widget.is_enabled();
            if ui.checkbox("Show compass", &mut enabled) {
                widget.set_enabled(enabled);
            }

            ui.separator();
            ui.text("Snap to view:");

            let views = [
                ("+X", AxisDirection::PosX),
                ("-X", AxisDirection::NegX),
                ("+Y", AxisDirection::PosY),
                ("-Y", AxisDirection::NegY),
                ("+Z", AxisDirection::PosZ),
                ("-Z", AxisDirection::NegZ),
            ];
            for (i, (label, axis)) in views.iter().enumerate() {
                if ui.button(label) {
                    widget.snap_to_view(*axis, Some(&camera_manager.camera), now);
                }
                // Two buttons per row
                if i % 2 == 0 {
                    ui.same_line();
                }
            }

            ui.separator();
            let camera = &camera_manager.camera;
            ui.text(format!("Orbit distance: {:.2}", camera.distance));
            ui.text(format!(
                "Pitch / yaw: {:.1}° / {:.1}°",
                camera.pitch.to_degrees(),
                camera.yaw.to_degrees()
            ));
            if widget.is_animating() {
                ui.text("Transition in progress...");
            }
        });
}
