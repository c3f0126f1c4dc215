//! # Graphics Module
//!
//! Everything the host viewport needs to exist: the orbit camera the compass
//! mirrors and mutates, procedural geometry, the primary scene graph, GPU
//! resource management, and the wgpu render engine that draws the scene pass
//! followed by the compass widget's own small surface.

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
