//! Demo host: a small scene with a floor, a crate and a ball, with the
//! orientation compass in the top-right corner.
//!
//! Drag to orbit, shift-drag to pan, scroll to zoom. Click a compass marker
//! (or a panel button) to snap the camera to that axis view.

use cgmath::Vector3;
use compass3d::gfx::geometry::{generate_cube, generate_plane, generate_sphere};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut app = compass3d::default();

    let scene = app.scene_mut();
    scene.add_material_rgb("floor", 0.52, 0.53, 0.57, 0.0, 0.9);
    scene.add_material_rgb("crate", 0.78, 0.45, 0.18, 0.1, 0.6);
    scene.add_material_rgb("ball", 0.25, 0.55, 0.85, 0.3, 0.3);

    let floor = scene.add_procedural_object(generate_plane(14.0, 14.0, 1, 1), "floor");
    scene.assign_material_to_object(floor, "floor");

    let crate_index = scene.add_procedural_object(generate_cube(), "crate");
    scene.assign_material_to_object(crate_index, "crate");
    if let Some(object) = scene.get_object_mut(crate_index) {
        object.set_scale(2.0);
        object.set_translation(Vector3::new(0.0, 0.0, 1.0));
    }

    let ball = scene.add_procedural_object(generate_sphere(32, 24), "ball");
    scene.assign_material_to_object(ball, "ball");
    if let Some(object) = scene.get_object_mut(ball) {
        object.set_translation(Vector3::new(3.2, -2.4, 1.0));
    }

    app.run()
}
