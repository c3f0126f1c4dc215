// src/lib.rs
//! compass3d
//!
//! A 3D orientation compass widget for wgpu viewports. The compass mirrors
//! the primary camera's rotation every frame; clicking one of its six axis
//! markers animates the primary camera to that axis-aligned view.

pub mod app;
pub mod gfx;
pub mod gizmo;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::CompassApp;
pub use gizmo::{AxisDirection, GizmoWidget};

/// Creates a default application instance hosting the compass widget.
pub fn default() -> CompassApp {
    pollster::block_on(CompassApp::new())
}
