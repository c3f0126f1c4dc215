//! Material registry for the primary scene.
//!
//! Materials are stored centrally and referenced by objects through string
//! ids; each material owns its uniform buffer and bind group.

use std::collections::HashMap;
use wgpu::Device;

use crate::wgpu_utils::{
    binding_types, BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc,
    UniformBuffer,
};

pub type MaterialId = String;

/// GPU uniform data: must match `MaterialData` in `scene.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    /// x = metallic, y = roughness, zw unused
    pub params: [f32; 4],
}

/// A scene material with lazily created GPU resources.
pub struct Material {
    pub name: MaterialId,
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    gpu: Option<MaterialGpuResources>,
}

struct MaterialGpuResources {
    ubo: UniformBuffer<MaterialUniform>,
    bind_group: wgpu::BindGroup,
}

impl Material {
    pub fn new(name: &str, base_color: [f32; 4], metallic: f32, roughness: f32) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            metallic,
            roughness,
            gpu: None,
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.base_color[3] = alpha;
        self
    }

    fn uniform(&self) -> MaterialUniform {
        MaterialUniform {
            base_color: self.base_color,
            params: [self.metallic, self.roughness, 0.0, 0.0],
        }
    }

    /// Bind group layout shared by all materials.
    pub fn bind_group_layout(device: &Device) -> BindGroupLayoutWithDesc {
        BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::uniform())
            .create(device, "Material Bind Group Layout")
    }

    pub fn update_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        let uniform = self.uniform();
        match &mut self.gpu {
            Some(gpu) => gpu.ubo.update_content(queue, uniform),
            None => {
                let ubo = UniformBuffer::new_with_data(device, &uniform);
                let layout = Self::bind_group_layout(device);
                let bind_group = BindGroupBuilder::new(&layout)
                    .resource(ubo.binding_resource())
                    .create(device, &format!("Material Bind Group: {}", self.name));
                self.gpu = Some(MaterialGpuResources { ubo, bind_group });
            }
        }
    }

    pub fn get_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.bind_group)
    }
}

/// Centralized material storage with a built-in default material.
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
    default_id: MaterialId,
}

impl MaterialManager {
    pub fn new() -> Self {
        let default_id = "default".to_string();
        let mut materials = HashMap::new();
        materials.insert(
            default_id.clone(),
            Material::new(&default_id, [0.8, 0.8, 0.8, 1.0], 0.0, 0.6),
        );
        Self {
            materials,
            default_id,
        }
    }

    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    pub fn get_material(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn get_material_mut(&mut self, id: &str) -> Option<&mut Material> {
        self.materials.get_mut(id)
    }

    pub fn get_default_material(&self) -> &Material {
        self.materials
            .get(&self.default_id)
            .expect("default material always present")
    }

    /// Material assigned to an object, falling back to the default when the
    /// id is absent or unknown.
    pub fn get_material_for_object(&self, material_id: Option<&MaterialId>) -> &Material {
        material_id
            .and_then(|id| self.materials.get(id))
            .unwrap_or_else(|| self.get_default_material())
    }

    pub fn update_all_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        for material in self.materials.values_mut() {
            material.update_gpu_resources(device, queue);
        }
    }

    pub fn list_materials(&self) -> Vec<&MaterialId> {
        self.materials.keys().collect()
    }
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_material_falls_back_to_default() {
        let manager = MaterialManager::new();
        let id = "missing".to_string();
        let material = manager.get_material_for_object(Some(&id));
        assert_eq!(material.name, "default");
    }

    #[test]
    fn test_with_alpha_builder() {
        let material = Material::new("glass", [0.2, 0.4, 0.9, 1.0], 0.0, 0.1).with_alpha(0.35);
        assert_eq!(material.base_color[3], 0.35);
    }
}
