//! CPU-side mesh representation produced by loaders.

use bytemuck::{Pod, Zeroable};

/// Vertex with position/normal/uv gathered from one slot of a [`MeshBuffer`].
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Flattened mesh: one entry per unique face corner in each attribute buffer,
/// plus an index buffer in face-corner order.
///
/// Immutable once built. `texcoords` is empty when the source had no `vt`
/// records, so check [`MeshBuffer::has_texture`] before reading it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffer {
    positions: Vec<f32>,
    texcoords: Vec<f32>,
    normals: Vec<f32>,
    indices: Vec<u32>,
    has_texture: bool,
}

impl MeshBuffer {
    /// Buffers must already satisfy the length invariants; the loader is the
    /// only producer.
    pub(crate) fn new(
        positions: Vec<f32>,
        texcoords: Vec<f32>,
        normals: Vec<f32>,
        indices: Vec<u32>,
        has_texture: bool,
    ) -> Self {
        debug_assert_eq!(positions.len() % 3, 0);
        debug_assert_eq!(normals.len(), positions.len());
        debug_assert!(!has_texture || texcoords.len() / 2 == positions.len() / 3);
        debug_assert!(has_texture || texcoords.is_empty());
        Self {
            positions,
            texcoords,
            normals,
            indices,
            has_texture,
        }
    }

    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    #[inline]
    pub fn texcoords(&self) -> &[f32] {
        &self.texcoords
    }

    #[inline]
    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn has_texture(&self) -> bool {
        self.has_texture
    }

    /// Number of unique vertices (slots).
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if both vertex and index buffers are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.positions.is_empty() && !self.indices.is_empty()
    }

    /// Gather slot `i` into an interleaved vertex. `uv` is zero without texture.
    pub fn vertex(&self, i: usize) -> Option<MeshVertex> {
        if i >= self.vertex_count() {
            return None;
        }
        let p = &self.positions[i * 3..i * 3 + 3];
        let n = &self.normals[i * 3..i * 3 + 3];
        let uv = if self.has_texture {
            [self.texcoords[i * 2], self.texcoords[i * 2 + 1]]
        } else {
            [0.0, 0.0]
        };
        Some(MeshVertex::new([p[0], p[1], p[2]], [n[0], n[1], n[2]], uv))
    }

    /// All slots as interleaved vertices, in slot order.
    pub fn interleaved(&self) -> Vec<MeshVertex> {
        (0..self.vertex_count())
            .filter_map(|i| self.vertex(i))
            .collect()
    }

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn texcoord_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texcoords)
    }

    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
