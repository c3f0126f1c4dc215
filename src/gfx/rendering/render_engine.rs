//! WGPU-based rendering engine.
//!
//! Owns the surface, device and queue, the depth buffer, and the pipelines
//! for the two passes of every frame: the primary scene over the full
//! surface, then the compass widget restricted to its own viewport and
//! scissor rectangle. An optional UI overlay draws last into the same
//! encoder.

use std::sync::Arc;
use wgpu::{Device, TextureFormat};

use crate::gfx::resources::global_bindings::{GlobalBindings, LightConfig};
use crate::gfx::resources::material::Material;
use crate::gfx::scene::object::Object;
use crate::gfx::scene::scene::Scene;
use crate::gizmo::object::GizmoObject;
use crate::gizmo::scene::GizmoScene;
use crate::gizmo::widget::GizmoWidget;

use super::pipeline_manager::{DepthConfig, PipelineConfig, PipelineManager};

pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

/// Hard failures while bringing up the GPU context.
///
/// Construction is the only fallible phase: once the engine exists, the
/// surface is presumed available for the lifetime of the window.
#[derive(Debug, thiserror::Error)]
pub enum RenderEngineError {
    #[error("failed to create rendering surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter found")]
    AdapterUnavailable,
    #[error("failed to acquire GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}

/// Callback drawing the UI overlay into the frame's encoder.
pub type UiDrawCallback<'a> =
    &'a mut dyn FnMut(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView);

/// Core rendering engine managing GPU resources and draw calls.
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,
    global_bindings: GlobalBindings,
    light_config: LightConfig,
}

impl RenderEngine {
    /// Creates a render engine for the given window.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<RenderEngine, RenderEngineError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(_) => return Err(RenderEngineError::AdapterUnavailable),
        };

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, &config);

        let global_bindings = GlobalBindings::new(&device);
        let light_config = LightConfig {
            position: [14.0, -10.0, 18.0],
            color: [1.0, 1.0, 1.0],
            intensity: 600.0,
        };

        let mut pipeline_manager = PipelineManager::new();
        pipeline_manager.load_shader(&device, "scene", include_str!("scene.wgsl"));
        pipeline_manager.load_shader(&device, "gizmo", include_str!("gizmo.wgsl"));

        pipeline_manager.create_pipeline(
            &device,
            "scene",
            PipelineConfig::new("scene", format)
                .with_label("Scene Pipeline")
                .with_bind_group_layouts(vec![
                    GlobalBindings::bind_group_layout(&device).layout,
                    Object::bind_group_layout(&device).layout,
                    Material::bind_group_layout(&device).layout,
                ])
                .with_depth(DepthConfig::standard(DEPTH_FORMAT)),
        );

        let gizmo_layouts = |device: &Device| {
            vec![
                GizmoScene::camera_bind_group_layout(device).layout,
                GizmoObject::bind_group_layout(device).layout,
            ]
        };
        pipeline_manager.create_pipeline(
            &device,
            "gizmo_mesh",
            PipelineConfig::new("gizmo", format)
                .with_label("Gizmo Mesh Pipeline")
                .with_bind_group_layouts(gizmo_layouts(&device))
                .with_depth(DepthConfig::standard(DEPTH_FORMAT))
                .with_blend(wgpu::BlendState::ALPHA_BLENDING),
        );
        pipeline_manager.create_pipeline(
            &device,
            "gizmo_line",
            PipelineConfig::new("gizmo", format)
                .with_label("Gizmo Line Pipeline")
                .with_bind_group_layouts(gizmo_layouts(&device))
                .with_primitive_topology(wgpu::PrimitiveTopology::LineList)
                .with_cull_mode(None)
                .with_depth(DepthConfig::standard(DEPTH_FORMAT))
                .with_blend(wgpu::BlendState::ALPHA_BLENDING),
        );
        pipeline_manager.create_pipeline(
            &device,
            "gizmo_overlay",
            PipelineConfig::new("gizmo", format)
                .with_label("Gizmo Overlay Pipeline")
                .with_bind_group_layouts(gizmo_layouts(&device))
                .with_primitive_topology(wgpu::PrimitiveTopology::LineList)
                .with_cull_mode(None)
                .with_depth(DepthConfig::always_on_top(DEPTH_FORMAT))
                .with_blend(wgpu::BlendState::ALPHA_BLENDING),
        );

        log::info!(
            "render engine initialized ({}x{}, {:?})",
            config.width,
            config.height,
            format
        );

        Ok(RenderEngine {
            surface,
            device: Arc::new(device),
            queue: Arc::new(queue),
            config,
            depth_view,
            format,
            pipeline_manager,
            global_bindings,
            light_config,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> TextureFormat {
        self.format
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, &self.config);
    }

    /// Reconfigures the surface after a `Lost`/`Outdated` error.
    pub fn reconfigure_surface(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Renders one frame: scene pass, compass pass, optional UI overlay.
    pub fn render_frame(
        &mut self,
        scene: &mut Scene,
        gizmo: &mut GizmoWidget,
        ui_draw: Option<UiDrawCallback>,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.global_bindings.update(
            &self.queue,
            &scene.camera_manager.camera.uniform,
            &self.light_config,
        );
        scene.update_all_transforms(&self.queue);
        gizmo.upload_frame_state(&self.queue);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        self.encode_scene_pass(&mut encoder, &view, scene);
        self.encode_gizmo_pass(&mut encoder, &view, gizmo);

        if let Some(ui_draw) = ui_draw {
            ui_draw(&self.device, &self.queue, &mut encoder, &view);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn encode_scene_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        scene: &Scene,
    ) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.075,
                        g: 0.085,
                        b: 0.105,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        let Some(pipeline) = self.pipeline_manager.get("scene") else {
            return;
        };
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

        for object in &scene.objects {
            if !object.visible {
                continue;
            }
            let Some(gpu) = &object.gpu_resources else {
                continue;
            };
            let Some(material_bind_group) = scene.get_material_for_object(object).get_bind_group()
            else {
                continue;
            };

            rpass.set_bind_group(1, &gpu.bind_group, &[]);
            rpass.set_bind_group(2, material_bind_group, &[]);
            rpass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
            rpass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..gpu.index_count, 0, 0..1);
        }
    }

    fn encode_gizmo_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        gizmo: &GizmoWidget,
    ) {
        if !gizmo.wants_render() {
            return;
        }
        // The widget surface: its viewport and scissor rectangle, with a
        // fresh depth range so compass geometry never fights scene depth.
        let Some(rect) = gizmo
            .rect()
            .clamped_to(self.config.width, self.config.height)
        else {
            return;
        };

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Gizmo Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        rpass.set_viewport(rect.x, rect.y, rect.width, rect.height, 0.0, 1.0);
        rpass.set_scissor_rect(
            rect.x as u32,
            rect.y as u32,
            rect.width as u32,
            rect.height as u32,
        );

        gizmo.draw(&mut rpass, &self.pipeline_manager);
    }
}

fn create_depth_view(device: &Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
