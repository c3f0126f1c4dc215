//! Per-frame global uniforms for the primary scene pass: camera matrices
//! and a single light.

use wgpu::Device;

use crate::gfx::camera::camera_utils::CameraUniform;
use crate::wgpu_utils::{
    binding_types, BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc,
    UniformBuffer,
};

/// Simple point light for the primary scene.
#[derive(Debug, Clone, Copy)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Global uniform block: must match `Global` in `scene.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniform {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
    /// xyz = light position, w unused
    pub light_position: [f32; 4],
    /// rgb = light color, w = intensity
    pub light_color: [f32; 4],
}

impl GlobalUniform {
    pub fn from_camera_and_light(camera: &CameraUniform, light: &LightConfig) -> Self {
        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            light_position: [light.position[0], light.position[1], light.position[2], 0.0],
            light_color: [light.color[0], light.color[1], light.color[2], light.intensity],
        }
    }
}

/// The global uniform buffer together with its bind group.
pub struct GlobalBindings {
    ubo: UniformBuffer<GlobalUniform>,
    layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn bind_group_layout(device: &Device) -> BindGroupLayoutWithDesc {
        BindGroupLayoutBuilder::new()
            .next_binding_all(binding_types::uniform())
            .create(device, "Global Bind Group Layout")
    }

    pub fn new(device: &Device) -> Self {
        let ubo = UniformBuffer::new(device);
        let layout = Self::bind_group_layout(device);
        let bind_group = BindGroupBuilder::new(&layout)
            .resource(ubo.binding_resource())
            .create(device, "Global Bind Group");

        Self {
            ubo,
            layout,
            bind_group,
        }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, camera: &CameraUniform, light: &LightConfig) {
        self.ubo
            .update_content(queue, GlobalUniform::from_camera_and_light(camera, light));
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
