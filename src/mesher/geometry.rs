//! Surface geometry types.

use glam::{Vec2, Vec3};

/// A vertex as stored in an SPM surface.
///
/// Values are in scene space; the axis convention is applied when the
/// vertex is written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackedVertex {
    /// Position, already multiplied by the object scale.
    pub position: Vec3,
    /// Texture coordinates, zero when the object has no UVs.
    pub uv: Vec2,
    /// Face normal for flat faces, vertex normal for smooth faces.
    pub normal: Vec3,
    /// Index of the mesh vertex this was packed from.
    pub source: u32,
}

impl PackedVertex {
    pub fn new(position: Vec3, uv: Vec2, normal: Vec3, source: u32) -> Self {
        Self {
            position,
            uv,
            normal,
            source,
        }
    }
}

/// A texture-homogeneous partition of a mesh, triangulated.
#[derive(Debug, Clone, Default)]
pub struct Surface {
    /// Position in the object's surface list.
    pub index: u32,
    /// Texture image name, empty when untextured.
    pub texture: String,
    pub vertices: Vec<PackedVertex>,
    /// Triangle indices (3 per triangle), local to this surface.
    pub indices: Vec<u32>,
}

impl Surface {
    pub fn new(index: u32, texture: impl Into<String>) -> Self {
        Self {
            index,
            texture: texture.into(),
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Name written to the file: the texture, or `Surface<index>`.
    pub fn name(&self) -> String {
        if self.has_texture() {
            self.texture.clone()
        } else {
            format!("Surface{}", self.index)
        }
    }

    pub fn has_texture(&self) -> bool {
        !self.texture.is_empty()
    }

    /// Add a vertex and return its index.
    pub fn add_vertex(&mut self, vertex: PackedVertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    /// Add a triangle by vertex indices.
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Add one corner triple as its own three vertices.
    ///
    /// The triangle is wound in reverse corner order (2, 1, 0).
    pub fn add_corner_triangle(&mut self, corners: [PackedVertex; 3]) {
        let [c0, c1, c2] = corners;
        let i0 = self.add_vertex(c0);
        let i1 = self.add_vertex(c1);
        let i2 = self.add_vertex(c2);
        self.add_triangle(i2, i1, i0);
    }

    /// Get the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterate over triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}
