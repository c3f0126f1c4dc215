//! The compass widget's fixed scene and its camera.
//!
//! The scene is built exactly once per mount: three axis lines, six markers,
//! a ring outline behind each translucent negative marker, and three letter
//! labels at the positive tips. Teardown releases every GPU buffer the mount
//! created; `Drop` guarantees the release on all exit paths.

use cgmath::{EuclideanSpace, Matrix4, Point3, Vector3, Zero};
use wgpu::Device;

use crate::gfx::camera::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};
use crate::gfx::camera::orbit_camera::OPENGL_TO_WGPU_MATRIX;
use crate::gfx::geometry::{
    generate_axis_line, generate_label_glyph, generate_ring, generate_sphere,
};
use crate::wgpu_utils::{
    binding_types, BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc,
    UniformBuffer,
};

use super::axis::AxisDirection;
use super::object::{GizmoObject, GizmoObjectKind};
use super::picking::PickBounds;

/// Length of each axis line from the origin.
pub const AXIS_LENGTH: f32 = 1.0;
/// Radius of the clickable marker spheres.
pub const MARKER_RADIUS: f32 = 0.22;
/// Markers sit at the axis tip plus their own radius.
pub const MARKER_OFFSET: f32 = AXIS_LENGTH + MARKER_RADIUS;
/// Radius of the ring outlines paired with negative markers.
pub const RING_RADIUS: f32 = 0.28;
/// Uniform scale applied to the letter glyphs.
pub const LABEL_SCALE: f32 = 0.34;
/// Fixed orbit radius of the compass camera, independent of the primary
/// camera's distance.
pub const GIZMO_CAMERA_RADIUS: f32 = 3.75;

const RING_SEGMENTS: u32 = 48;
const SPHERE_LONGITUDE_SEGMENTS: u32 = 24;
const SPHERE_LATITUDE_SEGMENTS: u32 = 16;
const AXIS_LINE_PICK_PADDING: f32 = 0.03;
const LABEL_COLOR: [f32; 4] = [0.95, 0.95, 0.95, 1.0];
const RING_ALPHA: f32 = 0.9;

/// Camera for the compass scene.
///
/// Always aims at the origin from a fixed radius; only its rotation changes,
/// mirroring the primary camera every frame.
pub struct GizmoCamera {
    pub eye: Vector3<f32>,
    pub up: Vector3<f32>,
    pub fovy: cgmath::Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
}

impl Camera for GizmoCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * self.picking_view_proj()
    }
}

impl GizmoCamera {
    pub fn new() -> Self {
        Self {
            eye: Vector3::new(0.0, -GIZMO_CAMERA_RADIUS, 0.0),
            up: Vector3::unit_z(),
            fovy: cgmath::Rad(std::f32::consts::PI / 4.0),
            znear: 0.1,
            zfar: 100.0,
            uniform: CameraUniform::default(),
        }
    }

    /// View-projection without the wgpu depth remap, shared by picking and
    /// by the render matrix above. The widget surface is square, so the
    /// aspect ratio is fixed at 1.
    pub fn picking_view_proj(&self) -> Matrix4<f32> {
        let view = Matrix4::look_at_rh(
            Point3::from_vec(self.eye),
            Point3::new(0.0, 0.0, 0.0),
            self.up,
        );
        let proj = cgmath::perspective(self.fovy, 1.0, self.znear, self.zfar);
        proj * view
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }
}

impl Default for GizmoCamera {
    fn default() -> Self {
        Self::new()
    }
}

struct GizmoSceneGpu {
    camera_ubo: UniformBuffer<CameraUniform>,
    camera_bind_group: wgpu::BindGroup,
}

/// The compass scene: fixed objects plus the mirroring camera.
pub struct GizmoScene {
    pub camera: GizmoCamera,
    pub objects: Vec<GizmoObject>,
    gpu: Option<GizmoSceneGpu>,
}

impl GizmoScene {
    pub fn new() -> Self {
        Self {
            camera: GizmoCamera::new(),
            objects: Vec::new(),
            gpu: None,
        }
    }

    pub fn is_built(&self) -> bool {
        !self.objects.is_empty()
    }

    /// Builds the fixed geometry. Idempotent per mount: a second call while
    /// built is a no-op, so objects are created exactly once.
    pub fn build(&mut self) {
        if self.is_built() {
            return;
        }

        for axis in [AxisDirection::PosX, AxisDirection::PosY, AxisDirection::PosZ] {
            let direction = axis.direction();
            let tip = direction * AXIS_LENGTH;
            let pad = Vector3::new(
                AXIS_LINE_PICK_PADDING,
                AXIS_LINE_PICK_PADDING,
                AXIS_LINE_PICK_PADDING,
            );
            let min = Vector3::new(tip.x.min(0.0), tip.y.min(0.0), tip.z.min(0.0)) - pad;
            let max = Vector3::new(tip.x.max(0.0), tip.y.max(0.0), tip.z.max(0.0)) + pad;

            self.objects.push(GizmoObject::new(
                GizmoObjectKind::AxisLine,
                generate_axis_line([direction.x, direction.y, direction.z], AXIS_LENGTH),
                Vector3::zero(),
                axis.color(),
                1.0,
                PickBounds::Aabb { min, max },
            ));
        }

        for axis in AxisDirection::ALL {
            let position = axis.direction() * MARKER_OFFSET;

            self.objects.push(GizmoObject::new(
                GizmoObjectKind::Marker(axis),
                generate_sphere(SPHERE_LONGITUDE_SEGMENTS, SPHERE_LATITUDE_SEGMENTS),
                position,
                axis.color(),
                MARKER_RADIUS,
                PickBounds::Sphere {
                    radius: MARKER_RADIUS,
                },
            ));

            if axis.is_negative() {
                let mut color = axis.color();
                color[3] = RING_ALPHA;
                self.objects.push(GizmoObject::new(
                    GizmoObjectKind::RingOutline,
                    generate_ring(RING_SEGMENTS),
                    position,
                    color,
                    RING_RADIUS,
                    PickBounds::Sphere {
                        radius: RING_RADIUS,
                    },
                ));
            }

            if let Some(label) = axis.label() {
                self.objects.push(GizmoObject::new(
                    GizmoObjectKind::Label,
                    generate_label_glyph(label),
                    position,
                    LABEL_COLOR,
                    LABEL_SCALE,
                    PickBounds::Sphere {
                        radius: 0.6 * LABEL_SCALE,
                    },
                ));
            }
        }
    }

    /// Bind group layout for the compass camera uniform.
    pub fn camera_bind_group_layout(device: &Device) -> BindGroupLayoutWithDesc {
        BindGroupLayoutBuilder::new()
            .next_binding_all(binding_types::uniform())
            .create(device, "Gizmo Camera Bind Group Layout")
    }

    /// Creates the GPU resources for the built scene.
    pub fn init_gpu_resources(&mut self, device: &Device) {
        for object in &mut self.objects {
            if object.gpu.is_none() {
                object.init_gpu_resources(device);
            }
        }

        if self.gpu.is_none() {
            let camera_ubo = UniformBuffer::new(device);
            let layout = Self::camera_bind_group_layout(device);
            let camera_bind_group = BindGroupBuilder::new(&layout)
                .resource(camera_ubo.binding_resource())
                .create(device, "Gizmo Camera Bind Group");
            self.gpu = Some(GizmoSceneGpu {
                camera_ubo,
                camera_bind_group,
            });
        }
    }

    /// Writes the camera uniform and every object uniform for this frame.
    pub fn upload_frame_state(&mut self, queue: &wgpu::Queue) {
        self.camera.update_view_proj();
        if let Some(gpu) = &mut self.gpu {
            gpu.camera_ubo.update_content(queue, self.camera.uniform);
        }
        for object in &mut self.objects {
            object.upload(queue);
        }
    }

    pub fn camera_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.camera_bind_group)
    }

    /// Destroys all objects and GPU resources created by the mount.
    ///
    /// Safe to call repeatedly; after teardown the scene can be built again
    /// for a fresh mount.
    pub fn teardown(&mut self) {
        for object in &mut self.objects {
            object.release_gpu();
        }
        if let Some(gpu) = self.gpu.take() {
            gpu.camera_ubo.destroy();
        }
        self.objects.clear();
    }
}

impl Default for GizmoScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for GizmoScene {
    fn drop(&mut self) {
        self.teardown();
    }
}
