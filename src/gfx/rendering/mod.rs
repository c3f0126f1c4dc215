//! wgpu rendering: pipeline management and the frame-level render engine.

pub mod pipeline_manager;
pub mod render_engine;

pub use pipeline_manager::{DepthConfig, PipelineConfig, PipelineManager};
pub use render_engine::{RenderEngine, RenderEngineError};
