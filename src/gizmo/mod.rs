//! # Orientation Compass Widget
//!
//! A small 3D compass rendered next to the primary viewport. It mirrors the
//! primary camera's rotation every frame, and clicking one of its six axis
//! markers animates the primary camera to the matching axis-aligned view.
//!
//! ## Architecture
//!
//! - [`axis`] - The six axis-aligned view directions
//! - [`object`] - The compass scene's tagged objects (lines, markers, rings, labels)
//! - [`scene`] - Fixed scene construction and teardown, plus the compass camera
//! - [`sync`] - Per-frame orientation mirroring and billboarding
//! - [`picking`] - Ray-casting clicks against the compass scene
//! - [`animation`] - The eased view transition driving the primary camera
//! - [`widget`] - The owning controller with mount/unmount lifecycle
//!
//! Everything runs inside the host's per-frame redraw callback; there is no
//! internal threading. See [`widget::GizmoWidget`] for the entry point.

pub mod animation;
pub mod axis;
pub mod object;
pub mod picking;
pub mod scene;
pub mod sync;
pub mod widget;

// Re-export main types
pub use axis::AxisDirection;
pub use object::{GizmoObject, GizmoObjectKind};
pub use scene::{GizmoCamera, GizmoScene};
pub use widget::{GizmoWidget, WidgetRect};
