//! The six axis-aligned view directions selectable from the compass.

use cgmath::Vector3;

/// One of the six axis-aligned views in a Z-up world.
///
/// Each direction carries the unit vector from the orbit target toward the
/// camera's destination, and the up vector the camera ends the transition
/// with. Side views keep the world up; top and bottom views use ±Y so the
/// camera is never asked to look along its own up vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisDirection {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl AxisDirection {
    pub const ALL: [AxisDirection; 6] = [
        AxisDirection::PosX,
        AxisDirection::NegX,
        AxisDirection::PosY,
        AxisDirection::NegY,
        AxisDirection::PosZ,
        AxisDirection::NegZ,
    ];

    /// Unit vector from the orbit target toward the view's camera position.
    pub fn direction(&self) -> Vector3<f32> {
        match self {
            AxisDirection::PosX => Vector3::new(1.0, 0.0, 0.0),
            AxisDirection::NegX => Vector3::new(-1.0, 0.0, 0.0),
            AxisDirection::PosY => Vector3::new(0.0, 1.0, 0.0),
            AxisDirection::NegY => Vector3::new(0.0, -1.0, 0.0),
            AxisDirection::PosZ => Vector3::new(0.0, 0.0, 1.0),
            AxisDirection::NegZ => Vector3::new(0.0, 0.0, -1.0),
        }
    }

    /// Up vector the camera ends the transition with.
    pub fn up_vector(&self) -> Vector3<f32> {
        match self {
            AxisDirection::PosX
            | AxisDirection::NegX
            | AxisDirection::PosY
            | AxisDirection::NegY => Vector3::new(0.0, 0.0, 1.0),
            AxisDirection::PosZ => Vector3::new(0.0, 1.0, 0.0),
            AxisDirection::NegZ => Vector3::new(0.0, -1.0, 0.0),
        }
    }

    pub fn is_negative(&self) -> bool {
        matches!(
            self,
            AxisDirection::NegX | AxisDirection::NegY | AxisDirection::NegZ
        )
    }

    /// Marker color; negative directions are rendered translucent.
    pub fn color(&self) -> [f32; 4] {
        let rgb = match self {
            AxisDirection::PosX | AxisDirection::NegX => [0.89, 0.21, 0.21],
            AxisDirection::PosY | AxisDirection::NegY => [0.27, 0.68, 0.21],
            AxisDirection::PosZ | AxisDirection::NegZ => [0.22, 0.42, 0.86],
        };
        let alpha = if self.is_negative() { 0.4 } else { 1.0 };
        [rgb[0], rgb[1], rgb[2], alpha]
    }

    /// Label text; only positive directions are labeled.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            AxisDirection::PosX => Some("X"),
            AxisDirection::PosY => Some("Y"),
            AxisDirection::PosZ => Some("Z"),
            _ => None,
        }
    }

    /// Camera destination for this view at the given orbit distance.
    pub fn eye_for(&self, target: Vector3<f32>, distance: f32) -> Vector3<f32> {
        target + self.direction() * distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    const EPS: f32 = 1e-6;

    #[test]
    fn test_directions_are_unit_vectors() {
        for axis in AxisDirection::ALL {
            assert!((axis.direction().magnitude() - 1.0).abs() < EPS);
            assert!((axis.up_vector().magnitude() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_up_is_perpendicular_to_direction() {
        for axis in AxisDirection::ALL {
            assert!(axis.direction().dot(axis.up_vector()).abs() < EPS);
        }
    }

    #[test]
    fn test_only_positive_axes_are_labeled() {
        for axis in AxisDirection::ALL {
            assert_eq!(axis.label().is_some(), !axis.is_negative());
        }
    }

    #[test]
    fn test_negative_markers_are_translucent() {
        for axis in AxisDirection::ALL {
            if axis.is_negative() {
                assert!(axis.color()[3] < 1.0);
            } else {
                assert_eq!(axis.color()[3], 1.0);
            }
        }
    }

    #[test]
    fn test_eye_for_preserves_distance() {
        let target = Vector3::new(1.0, -2.0, 3.0);
        for axis in AxisDirection::ALL {
            let eye = axis.eye_for(target, 7.5);
            assert!(((eye - target).magnitude() - 7.5).abs() < 1e-4);
        }
    }
}
