//! # Scene Management Module
//!
//! The primary viewport's scene: objects with procedural meshes, transforms,
//! GPU resources, and the camera manager. The compass widget treats this
//! scene's camera as its externally-owned collaborator.

pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use object::Object;
pub use scene::Scene;
pub use vertex::Vertex3D;
