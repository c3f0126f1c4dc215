//! Objects in the compass scene.
//!
//! Every object carries a closed [`GizmoObjectKind`] tag; hit-testing,
//! billboarding and pipeline selection all switch on it. Only `Marker`
//! carries an axis.

use cgmath::{Matrix3, Matrix4, SquareMatrix, Vector3};
use wgpu::util::DeviceExt;
use wgpu::Device;

use crate::gfx::camera::camera_utils::convert_matrix4_to_array;
use crate::gfx::geometry::{GeometryData, GeometryTopology};
use crate::wgpu_utils::{
    binding_types, BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc,
    UniformBuffer,
};

use super::axis::AxisDirection;
use super::picking::PickBounds;

/// What an object in the compass scene is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GizmoObjectKind {
    /// One of the three lines from the origin.
    AxisLine,
    /// A clickable sphere at an axis tip; the only kind carrying an axis.
    Marker(AxisDirection),
    /// Billboarded circle paired with a translucent negative-axis marker.
    RingOutline,
    /// Billboarded letter glyph, drawn on top of everything.
    Label,
}

impl GizmoObjectKind {
    /// The axis tag, present only on markers.
    pub fn axis_tag(&self) -> Option<AxisDirection> {
        match self {
            GizmoObjectKind::Marker(axis) => Some(*axis),
            _ => None,
        }
    }

    /// Re-faced toward the compass camera every frame?
    pub fn is_billboarded(&self) -> bool {
        matches!(self, GizmoObjectKind::RingOutline | GizmoObjectKind::Label)
    }

    /// Drawn without depth testing, after everything else?
    pub fn draws_on_top(&self) -> bool {
        matches!(self, GizmoObjectKind::Label)
    }

    /// Shaded against the compass camera (vs. flat color)?
    pub fn is_shaded(&self) -> bool {
        matches!(self, GizmoObjectKind::Marker(_))
    }
}

/// Per-object uniform: must match `GizmoObjectData` in `gizmo.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GizmoObjectUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// x = shading flag
    pub params: [f32; 4],
}

/// GPU-side resources for one compass object, created once at mount.
pub struct GizmoObjectGpu {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub ubo: UniformBuffer<GizmoObjectUniform>,
    pub bind_group: wgpu::BindGroup,
}

/// A node in the compass scene graph.
pub struct GizmoObject {
    pub kind: GizmoObjectKind,
    pub position: Vector3<f32>,
    pub color: [f32; 4],
    /// Billboard rotation; identity for non-billboarded kinds.
    pub rotation: Matrix3<f32>,
    pub scale: f32,
    pub geometry: GeometryData,
    pub bounds: PickBounds,
    pub gpu: Option<GizmoObjectGpu>,
}

impl GizmoObject {
    pub fn new(
        kind: GizmoObjectKind,
        geometry: GeometryData,
        position: Vector3<f32>,
        color: [f32; 4],
        scale: f32,
        bounds: PickBounds,
    ) -> Self {
        Self {
            kind,
            position,
            color,
            rotation: Matrix3::identity(),
            scale,
            geometry,
            bounds,
            gpu: None,
        }
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.rotation)
            * Matrix4::from_scale(self.scale)
    }

    /// World-space direction the flat face (local +Z) points at.
    pub fn facing_vector(&self) -> Vector3<f32> {
        self.rotation * Vector3::unit_z()
    }

    pub fn uses_line_topology(&self) -> bool {
        self.geometry.topology == GeometryTopology::LineList
    }

    /// Bind group layout shared by every compass object's uniform.
    pub fn bind_group_layout(device: &Device) -> BindGroupLayoutWithDesc {
        BindGroupLayoutBuilder::new()
            .next_binding_all(binding_types::uniform())
            .create(device, "Gizmo Object Bind Group Layout")
    }

    fn uniform(&self) -> GizmoObjectUniform {
        GizmoObjectUniform {
            model: convert_matrix4_to_array(self.model_matrix()),
            color: self.color,
            params: [if self.kind.is_shaded() { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }

    pub fn init_gpu_resources(&mut self, device: &Device) {
        let (vertices, indices) = self.geometry.to_scene_format();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Gizmo Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Gizmo Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let ubo = UniformBuffer::new_with_data(device, &self.uniform());
        let layout = Self::bind_group_layout(device);
        let bind_group = BindGroupBuilder::new(&layout)
            .resource(ubo.binding_resource())
            .create(device, "Gizmo Object Bind Group");

        self.gpu = Some(GizmoObjectGpu {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            ubo,
            bind_group,
        });
    }

    /// Syncs the current model matrix and color to the GPU.
    pub fn upload(&mut self, queue: &wgpu::Queue) {
        let uniform = self.uniform();
        if let Some(gpu) = &mut self.gpu {
            gpu.ubo.update_content(queue, uniform);
        }
    }

    /// Destroys the GPU buffers backing this object.
    pub fn release_gpu(&mut self) {
        if let Some(gpu) = self.gpu.take() {
            gpu.vertex_buffer.destroy();
            gpu.index_buffer.destroy();
            gpu.ubo.destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_ring;
    use cgmath::InnerSpace;

    #[test]
    fn test_only_markers_carry_axis_tags() {
        assert!(GizmoObjectKind::AxisLine.axis_tag().is_none());
        assert!(GizmoObjectKind::RingOutline.axis_tag().is_none());
        assert!(GizmoObjectKind::Label.axis_tag().is_none());
        assert_eq!(
            GizmoObjectKind::Marker(AxisDirection::NegY).axis_tag(),
            Some(AxisDirection::NegY)
        );
    }

    #[test]
    fn test_billboarded_kinds() {
        assert!(GizmoObjectKind::RingOutline.is_billboarded());
        assert!(GizmoObjectKind::Label.is_billboarded());
        assert!(!GizmoObjectKind::AxisLine.is_billboarded());
        assert!(!GizmoObjectKind::Marker(AxisDirection::PosX).is_billboarded());
    }

    #[test]
    fn test_default_facing_is_local_z() {
        let object = GizmoObject::new(
            GizmoObjectKind::RingOutline,
            generate_ring(16),
            Vector3::new(0.0, -1.0, 0.0),
            [1.0, 1.0, 1.0, 1.0],
            0.3,
            PickBounds::Sphere { radius: 0.3 },
        );
        assert!((object.facing_vector() - Vector3::unit_z()).magnitude() < 1e-6);
    }
}
