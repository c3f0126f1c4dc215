//! # WGPU Utilities
//!
//! Small helpers shared by the rendering code: typed uniform buffers and
//! bind group construction.

pub mod binding_builder;
pub mod binding_types;
pub mod uniform_buffer;

pub use binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc};
pub use uniform_buffer::UniformBuffer;
