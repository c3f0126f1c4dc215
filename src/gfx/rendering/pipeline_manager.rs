//! Render pipeline creation and caching.
//!
//! Pipelines are described by a [`PipelineConfig`], created once, and looked
//! up by name at draw time.

use std::collections::HashMap;
use wgpu::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Depth state for a pipeline.
#[derive(Debug, Clone, Copy)]
pub struct DepthConfig {
    pub format: TextureFormat,
    pub write_enabled: bool,
    pub compare: CompareFunction,
}

impl DepthConfig {
    /// Standard depth-tested, depth-writing configuration.
    pub fn standard(format: TextureFormat) -> Self {
        Self {
            format,
            write_enabled: true,
            compare: CompareFunction::Less,
        }
    }

    /// Always-pass configuration for overlay content drawn on top.
    pub fn always_on_top(format: TextureFormat) -> Self {
        Self {
            format,
            write_enabled: false,
            compare: CompareFunction::Always,
        }
    }
}

/// Configuration for creating a render pipeline.
pub struct PipelineConfig {
    pub label: String,
    pub shader: String,
    pub bind_group_layouts: Vec<BindGroupLayout>,
    pub primitive_topology: PrimitiveTopology,
    pub cull_mode: Option<Face>,
    pub depth: Option<DepthConfig>,
    pub color_format: TextureFormat,
    pub blend: BlendState,
}

impl PipelineConfig {
    pub fn new(shader: &str, color_format: TextureFormat) -> Self {
        Self {
            label: format!("{} Pipeline", shader),
            shader: shader.to_string(),
            bind_group_layouts: Vec::new(),
            primitive_topology: PrimitiveTopology::TriangleList,
            cull_mode: Some(Face::Back),
            depth: None,
            color_format,
            blend: BlendState::REPLACE,
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    pub fn with_bind_group_layouts(mut self, layouts: Vec<BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    pub fn with_primitive_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.primitive_topology = topology;
        self
    }

    pub fn with_cull_mode(mut self, face: Option<Face>) -> Self {
        self.cull_mode = face;
        self
    }

    pub fn with_depth(mut self, depth: DepthConfig) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn with_blend(mut self, blend: BlendState) -> Self {
        self.blend = blend;
        self
    }
}

/// Creates pipelines from configs and caches them by name.
pub struct PipelineManager {
    shaders: HashMap<String, ShaderModule>,
    pipelines: HashMap<String, RenderPipeline>,
}

impl PipelineManager {
    pub fn new() -> Self {
        Self {
            shaders: HashMap::new(),
            pipelines: HashMap::new(),
        }
    }

    /// Compiles and registers a WGSL shader under `name`.
    pub fn load_shader(&mut self, device: &Device, name: &str, source: &str) {
        let module = device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        });
        self.shaders.insert(name.to_string(), module);
    }

    /// Creates and caches a pipeline under `name`.
    ///
    /// # Panics
    /// Panics if the config references an unloaded shader.
    pub fn create_pipeline(&mut self, device: &Device, name: &str, config: PipelineConfig) {
        let shader = self
            .shaders
            .get(&config.shader)
            .unwrap_or_else(|| panic!("shader '{}' not loaded", config.shader));

        let layout_refs: Vec<&BindGroupLayout> = config.bind_group_layouts.iter().collect();
        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some(&format!("{} Layout", config.label)),
            bind_group_layouts: &layout_refs,
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(&config.label),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex3D::desc()],
            },
            fragment: Some(FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(ColorTargetState {
                    format: config.color_format,
                    blend: Some(config.blend),
                    write_mask: ColorWrites::ALL,
                })],
            }),
            primitive: PrimitiveState {
                topology: config.primitive_topology,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: config.cull_mode,
                unclipped_depth: false,
                polygon_mode: PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: config.depth.map(|depth| DepthStencilState {
                format: depth.format,
                depth_write_enabled: depth.write_enabled,
                depth_compare: depth.compare,
                stencil: StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        self.pipelines.insert(name.to_string(), pipeline);
    }

    pub fn get(&self, name: &str) -> Option<&RenderPipeline> {
        self.pipelines.get(name)
    }
}

impl Default for PipelineManager {
    fn default() -> Self {
        Self::new()
    }
}
