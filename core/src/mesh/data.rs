//! UI mesh vertex and buffer data.

use bytemuck::{Pod, Zeroable};

/// A single UI mesh vertex.
///
/// The layout matches what the UI renderer uploads verbatim: position in the
/// UI plane (z kept at 0 by the generators), packed RGBA8 color, and three
/// texture coordinate pairs. Slot 0 carries sprite/ribbon UVs; slots 1 and 2
/// carry per-particle dynamic material parameters.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct UiVertex {
    pub position: [f32; 3],
    pub color: [u8; 4],
    pub texcoord: [[f32; 2]; 3],
}

/// Growable vertex/index buffers filled by the particle mesh generators.
///
/// Exclusively owned by the caller and mutated in place during a generation
/// call. Resizing goes through [`BufferGrowth`](super::BufferGrowth) so that
/// per-frame particle-count fluctuations do not reallocate: lengths only ever
/// grow, and index entries past the live range are kept zeroed.
///
/// Invariants upheld by the generators and the growth policy:
/// - `indices.len()` is always a multiple of 3
/// - every live index refers to a live vertex
/// - index entries past the live count are zero (degenerate triangles)
#[derive(Debug, Default, Clone)]
pub struct MeshBuffers {
    pub vertices: Vec<UiVertex>,
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of vertices (live and pooled).
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of indices (live and pooled).
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Get the number of triangles, including zeroed degenerate ones.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get vertex data as bytes for GPU upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Get index data as bytes for GPU upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Clear both buffers, preserving allocated capacity.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}

static_assertions::const_assert_eq!(std::mem::size_of::<UiVertex>(), 40);
static_assertions::assert_impl_all!(UiVertex: Pod);
static_assertions::assert_impl_all!(MeshBuffers: Send, Sync);
