//! GPU resource management: materials and per-frame global bindings.

pub mod global_bindings;
pub mod material;

pub use global_bindings::{GlobalBindings, GlobalUniform, LightConfig};
pub use material::{Material, MaterialManager};
