//! Ray-casting clicks against the compass scene.
//!
//! A click inside the widget rectangle becomes a ray from the compass camera
//! through the clicked point. All objects are intersected against their pick
//! bounds; hits are walked nearest-first and the first `Marker` wins. Axis
//! lines, rings and labels are transparently skipped even when they are hit
//! first.

use cgmath::{InnerSpace, SquareMatrix, Vector3, Vector4};

use super::axis::AxisDirection;
use super::scene::{GizmoCamera, GizmoScene};

/// A 3D ray for intersection testing.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Point along the ray at distance `t`.
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }
}

/// Intersection proxy for a compass object.
#[derive(Debug, Clone, Copy)]
pub enum PickBounds {
    /// Sphere centered on the object's position (markers, rings, labels).
    Sphere { radius: f32 },
    /// World-space box (axis lines).
    Aabb {
        min: Vector3<f32>,
        max: Vector3<f32>,
    },
}

impl PickBounds {
    /// Distance along the ray to the nearest intersection, if any.
    pub fn intersect(&self, ray: &Ray, position: Vector3<f32>) -> Option<f32> {
        match *self {
            PickBounds::Sphere { radius } => intersect_sphere(ray, position, radius),
            PickBounds::Aabb { min, max } => intersect_aabb(ray, min, max),
        }
    }
}

fn intersect_sphere(ray: &Ray, center: Vector3<f32>, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.magnitude2() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrt_d = discriminant.sqrt();
    let t_near = -b - sqrt_d;
    let t_far = -b + sqrt_d;
    if t_near >= 0.0 {
        Some(t_near)
    } else if t_far >= 0.0 {
        Some(t_far)
    } else {
        None
    }
}

fn intersect_aabb(ray: &Ray, min: Vector3<f32>, max: Vector3<f32>) -> Option<f32> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let direction = ray.direction[axis];
        if direction.abs() < f32::EPSILON {
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / direction;
        let mut t0 = (min[axis] - origin) * inv;
        let mut t1 = (max[axis] - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
    }

    if t_near <= t_far && t_far >= 0.0 {
        Some(if t_near >= 0.0 { t_near } else { t_far })
    } else {
        None
    }
}

/// Casts a ray from the compass camera through a point in normalized device
/// coordinates.
///
/// Unprojects the near- and far-plane points through the inverse
/// view-projection and connects them. Returns `None` when the matrix is not
/// invertible.
pub fn screen_ray(camera: &GizmoCamera, ndc: (f32, f32)) -> Option<Ray> {
    let inv_view_proj = camera.picking_view_proj().invert()?;

    let unproject = |z: f32| -> Option<Vector3<f32>> {
        let point = inv_view_proj * Vector4::new(ndc.0, ndc.1, z, 1.0);
        if point.w.abs() < f32::EPSILON {
            return None;
        }
        Some(Vector3::new(
            point.x / point.w,
            point.y / point.w,
            point.z / point.w,
        ))
    };

    let near = unproject(-1.0)?;
    let far = unproject(1.0)?;
    let direction = far - near;
    if direction.magnitude2() <= f32::EPSILON {
        return None;
    }
    Some(Ray::new(near, direction))
}

/// Resolves a click (already converted to NDC) to the axis of the nearest
/// hit marker.
///
/// Returns `None` when the ray hits nothing, or only untagged objects.
pub fn pick_axis(scene: &GizmoScene, ndc: (f32, f32)) -> Option<AxisDirection> {
    let ray = screen_ray(&scene.camera, ndc)?;

    let mut hits: Vec<(f32, Option<AxisDirection>)> = scene
        .objects
        .iter()
        .filter_map(|object| {
            object
                .bounds
                .intersect(&ray, object.position)
                .map(|t| (t, object.kind.axis_tag()))
        })
        .collect();
    hits.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    hits.into_iter().find_map(|(_, tag)| tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_ray_sphere_hit_and_miss() {
        let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let t = intersect_sphere(&ray, Vector3::new(0.0, 0.0, 0.0), 1.0).unwrap();
        assert!((t - 4.0).abs() < EPS);

        assert!(intersect_sphere(&ray, Vector3::new(3.0, 0.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn test_ray_sphere_from_inside() {
        let ray = Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        let t = intersect_sphere(&ray, Vector3::new(0.0, 0.0, 0.0), 1.0).unwrap();
        assert!((t - 1.0).abs() < EPS);
    }

    #[test]
    fn test_ray_aabb_hit_and_miss() {
        let min = Vector3::new(-1.0, -1.0, -1.0);
        let max = Vector3::new(1.0, 1.0, 1.0);

        let hit = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let t = intersect_aabb(&hit, min, max).unwrap();
        assert!((t - 4.0).abs() < EPS);

        let miss = Ray::new(Vector3::new(5.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(intersect_aabb(&miss, min, max).is_none());
    }

    #[test]
    fn test_ray_aabb_parallel_slab_outside() {
        let min = Vector3::new(-1.0, -1.0, -1.0);
        let max = Vector3::new(1.0, 1.0, 1.0);
        // Parallel to the X slab, outside it.
        let ray = Ray::new(Vector3::new(2.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(intersect_aabb(&ray, min, max).is_none());
    }

    #[test]
    fn test_screen_ray_center_points_at_origin() {
        let camera = GizmoCamera::new();
        let ray = screen_ray(&camera, (0.0, 0.0)).unwrap();
        // The compass camera always aims at the origin, so the centered ray
        // must pass through it.
        let to_origin = -ray.origin;
        let along = ray.direction * to_origin.dot(ray.direction);
        assert!((to_origin - along).magnitude() < 1e-3);
    }
}
