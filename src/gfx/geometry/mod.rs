//! # Procedural Geometry Generation
//!
//! Generates the small set of primitive shapes the crate needs: triangle
//! meshes for demo scene content and sphere markers, and line-list shapes
//! (axis lines, ring outlines, letter glyphs) for the compass widget.

pub mod primitives;

pub use primitives::*;

/// How a [`GeometryData`]'s index buffer is to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryTopology {
    /// Indices form triangles (counter-clockwise winding).
    TriangleList,
    /// Indices form independent line segments.
    LineList,
}

/// Generated geometry ready for GPU upload.
#[derive(Debug, Clone)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z); for line-list shapes these are fillers
    pub normals: Vec<[f32; 3]>,
    /// Indices, interpreted per `topology`
    pub indices: Vec<u32>,
    pub topology: GeometryTopology,
}

impl GeometryData {
    /// Create a new empty triangle-list geometry.
    pub fn new() -> Self {
        Self::with_topology(GeometryTopology::TriangleList)
    }

    pub fn with_topology(topology: GeometryTopology) -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
            topology,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        match self.topology {
            GeometryTopology::TriangleList => self.indices.len() / 3,
            GeometryTopology::LineList => 0,
        }
    }

    pub fn segment_count(&self) -> usize {
        match self.topology {
            GeometryTopology::LineList => self.indices.len() / 2,
            GeometryTopology::TriangleList => 0,
        }
    }

    /// Convert to the vertex format used by the renderer.
    pub fn to_scene_format(&self) -> (Vec<crate::gfx::scene::vertex::Vertex3D>, Vec<u32>) {
        use crate::gfx::scene::vertex::Vertex3D;

        let vertices: Vec<Vertex3D> = (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 0.0, 1.0]),
            })
            .collect();

        (vertices, self.indices.clone())
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}
