use wgpu::Device;

use crate::gfx::{
    camera::camera_utils::CameraManager,
    geometry::GeometryData,
    resources::material::{Material, MaterialManager},
};

use super::object::{Mesh, Object};

/// Main scene containing objects, materials, and the primary camera.
pub struct Scene {
    pub camera_manager: CameraManager,
    pub objects: Vec<Object>,
    pub material_manager: MaterialManager,
}

impl Scene {
    /// Creates a new scene with the given camera manager.
    pub fn new(camera_manager: CameraManager) -> Self {
        Self {
            camera_manager,
            objects: Vec::new(),
            material_manager: MaterialManager::new(),
        }
    }

    /// Updates the scene (camera matrices, etc.)
    pub fn update(&mut self) {
        self.camera_manager.camera.update_view_proj();
    }

    /// Adds an object built from procedural geometry and returns its index.
    pub fn add_procedural_object(&mut self, geometry: GeometryData, name: &str) -> usize {
        let name = self.ensure_unique_name(name);
        let object = Object::new(&name, Mesh::from_geometry(&geometry));
        self.objects.push(object);
        self.objects.len() - 1
    }

    /// Creates a new material and registers it.
    pub fn add_material(
        &mut self,
        name: &str,
        base_color: [f32; 4],
        metallic: f32,
        roughness: f32,
    ) -> &mut Material {
        let material = Material::new(name, base_color, metallic, roughness);
        self.material_manager.add_material(material);
        self.material_manager
            .get_material_mut(name)
            .expect("material registered above")
    }

    /// Convenience for opaque RGB materials.
    pub fn add_material_rgb(
        &mut self,
        name: &str,
        r: f32,
        g: f32,
        b: f32,
        metallic: f32,
        roughness: f32,
    ) -> &mut Material {
        self.add_material(name, [r, g, b, 1.0], metallic, roughness)
    }

    /// Assigns a material to an object by index.
    pub fn assign_material_to_object(&mut self, object_index: usize, material_id: &str) {
        if let Some(object) = self.objects.get_mut(object_index) {
            object.set_material(material_id);
        }
    }

    /// Initializes GPU resources for all objects and materials.
    ///
    /// Must be called once the GPU context is available, before rendering.
    pub fn init_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        for object in self.objects.iter_mut() {
            if object.gpu_resources.is_none() {
                object.init_gpu_resources(device);
            }
        }
        self.material_manager.update_all_gpu_resources(device, queue);
    }

    /// Syncs all visible object transforms to the GPU.
    pub fn update_all_transforms(&mut self, queue: &wgpu::Queue) {
        for object in &mut self.objects {
            if object.gpu_resources.is_some() {
                object.update_transform(queue);
            }
        }
    }

    /// Material used to render `object` (assigned, or the default).
    pub fn get_material_for_object(&self, object: &Object) -> &Material {
        self.material_manager
            .get_material_for_object(object.get_material_id())
    }

    pub fn get_object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn get_object_mut(&mut self, index: usize) -> Option<&mut Object> {
        self.objects.get_mut(index)
    }

    pub fn get_object(&self, index: usize) -> Option<&Object> {
        self.objects.get(index)
    }

    fn ensure_unique_name(&self, desired_name: &str) -> String {
        let mut counter = 0;
        let mut test_name = desired_name.to_string();

        while self.objects.iter().any(|obj| obj.name == test_name) {
            counter += 1;
            test_name = format!("{} ({})", desired_name, counter);
        }

        test_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::{CameraController, CameraManager, OrbitCamera};
    use crate::gfx::geometry::generate_cube;
    use cgmath::{Vector3, Zero};

    fn test_scene() -> Scene {
        let camera = OrbitCamera::new(5.0, 0.4, 0.2, Vector3::zero(), 1.0);
        let controller = CameraController::new(0.005, 0.1);
        Scene::new(CameraManager::new(camera, controller))
    }

    #[test]
    fn test_object_names_are_unique() {
        let mut scene = test_scene();
        let a = scene.add_procedural_object(generate_cube(), "cube");
        let b = scene.add_procedural_object(generate_cube(), "cube");
        assert_ne!(scene.objects[a].name, scene.objects[b].name);
    }

    #[test]
    fn test_material_assignment_falls_back_to_default() {
        let mut scene = test_scene();
        let index = scene.add_procedural_object(generate_cube(), "cube");

        // No material assigned: the default material applies.
        let default_name = {
            let object = scene.get_object(index).unwrap();
            scene.get_material_for_object(object).name.clone()
        };

        scene.add_material_rgb("red", 1.0, 0.0, 0.0, 0.0, 0.5);
        scene.assign_material_to_object(index, "red");
        let object = scene.get_object(index).unwrap();
        let assigned = scene.get_material_for_object(object);
        assert_eq!(assigned.name, "red");
        assert_ne!(assigned.name, default_name);
    }
}
