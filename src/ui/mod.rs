//! # UI Overlay
//!
//! ImGui integration (imgui + imgui-wgpu + imgui-winit-support) and the
//! compass control panel: quick-view buttons sharing the marker-click code
//! path, a widget toggle, and camera readouts.

pub mod manager;
pub mod panel;

pub use manager::UiManager;
pub use panel::draw_compass_panel;
