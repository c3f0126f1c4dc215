//! Scene objects: procedural meshes with a transform and GPU resources.

use cgmath::{Matrix4, SquareMatrix, Vector3};
use wgpu::util::DeviceExt;
use wgpu::Device;

use crate::gfx::camera::camera_utils::convert_matrix4_to_array;
use crate::gfx::geometry::GeometryData;
use crate::wgpu_utils::{
    binding_types, BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc,
    UniformBuffer,
};

use super::vertex::Vertex3D;

/// Per-object uniform data (model matrix).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
}

/// A triangle mesh ready for upload.
pub struct Mesh {
    pub vertices: Vec<Vertex3D>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn from_geometry(geometry: &GeometryData) -> Self {
        let (vertices, indices) = geometry.to_scene_format();
        Self { vertices, indices }
    }
}

/// GPU-side resources for one object.
pub struct ObjectGpuResources {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub ubo: UniformBuffer<ObjectUniform>,
    pub bind_group: wgpu::BindGroup,
}

/// A single object in the primary scene.
pub struct Object {
    pub name: String,
    pub mesh: Mesh,
    pub translation: Vector3<f32>,
    pub scale: f32,
    pub visible: bool,
    material_id: Option<String>,
    pub gpu_resources: Option<ObjectGpuResources>,
}

impl Object {
    pub fn new(name: &str, mesh: Mesh) -> Self {
        Self {
            name: name.to_string(),
            mesh,
            translation: Vector3::new(0.0, 0.0, 0.0),
            scale: 1.0,
            visible: true,
            material_id: None,
            gpu_resources: None,
        }
    }

    pub fn set_translation(&mut self, translation: Vector3<f32>) {
        self.translation = translation;
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    pub fn set_material(&mut self, material_id: &str) {
        self.material_id = Some(material_id.to_string());
    }

    pub fn get_material_id(&self) -> Option<&String> {
        self.material_id.as_ref()
    }

    pub fn transform_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.translation) * Matrix4::from_scale(self.scale)
    }

    /// Bind group layout shared by every object's transform uniform.
    pub fn bind_group_layout(device: &Device) -> BindGroupLayoutWithDesc {
        BindGroupLayoutBuilder::new()
            .next_binding_vertex(binding_types::uniform())
            .create(device, "Object Bind Group Layout")
    }

    pub fn init_gpu_resources(&mut self, device: &Device) {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", self.name)),
            contents: bytemuck::cast_slice(&self.mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", self.name)),
            contents: bytemuck::cast_slice(&self.mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let ubo = UniformBuffer::new_with_data(
            device,
            &ObjectUniform {
                model: convert_matrix4_to_array(Matrix4::identity()),
            },
        );
        let layout = Self::bind_group_layout(device);
        let bind_group = BindGroupBuilder::new(&layout)
            .resource(ubo.binding_resource())
            .create(device, &format!("{} Bind Group", self.name));

        self.gpu_resources = Some(ObjectGpuResources {
            vertex_buffer,
            index_buffer,
            index_count: self.mesh.indices.len() as u32,
            ubo,
            bind_group,
        });
    }

    /// Syncs the transform to the GPU.
    pub fn update_transform(&mut self, queue: &wgpu::Queue) {
        let model = convert_matrix4_to_array(self.transform_matrix());
        if let Some(gpu_resources) = &mut self.gpu_resources {
            gpu_resources
                .ubo
                .update_content(queue, ObjectUniform { model });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_cube;

    #[test]
    fn test_transform_matrix_applies_scale_then_translation() {
        let mut object = Object::new("cube", Mesh::from_geometry(&generate_cube()));
        object.set_translation(Vector3::new(1.0, 2.0, 3.0));
        object.set_scale(2.0);

        let m = object.transform_matrix();
        let p = m * cgmath::Vector4::new(0.5, 0.0, 0.0, 1.0);
        assert_eq!(p.x, 2.0);
        assert_eq!(p.y, 2.0);
        assert_eq!(p.z, 3.0);
    }
}
