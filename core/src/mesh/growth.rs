//! Fixed-increment buffer sizing.
//!
//! Resizing mesh buffers to the exact particle count every frame would
//! recreate the render resources behind them whenever the count fluctuates.
//! [`BufferGrowth`] instead rounds requested sizes up to a fixed step and
//! never shrinks, so a buffer reallocates only when a frame needs more room
//! than any previous frame did.
//!
//! Shrinking particle counts are handled on the index side: entries past the
//! live range are zero-filled. A zero-index triangle has zero area and
//! rasterizes to nothing, which hides geometry left over from earlier,
//! larger frames without touching vertex data at all.

use bytemuck::Zeroable;

use super::data::{MeshBuffers, UiVertex};

/// Default sizing increment, in particles.
pub const DEFAULT_PARTICLE_INCREMENT: usize = 30;

/// Grow-only buffer sizing policy with fixed steps.
///
/// The step is expressed in particles and converted to vertex/index units
/// per mesh kind: sprites emit 4 vertices and 6 indices per particle,
/// ribbons 2 vertices and 6 indices per strip point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferGrowth {
    vertex_step: usize,
    index_step: usize,
}

impl BufferGrowth {
    /// Policy for sprite meshes.
    pub fn for_sprites(particle_increment: usize) -> Self {
        debug_assert!(particle_increment > 0);
        Self {
            vertex_step: particle_increment * 4,
            index_step: particle_increment * 6,
        }
    }

    /// Policy for ribbon meshes.
    pub fn for_ribbons(particle_increment: usize) -> Self {
        debug_assert!(particle_increment > 0);
        Self {
            vertex_step: particle_increment * 2,
            index_step: particle_increment * 6,
        }
    }

    /// Resize `buffers` for `vertex_req` live vertices and `index_req`
    /// live indices.
    ///
    /// Both lengths are rounded up to the step and never shrink. Grown
    /// slots are zero-initialized, and every index entry past `index_req`
    /// is zeroed, including stale ones from previous frames.
    pub fn apply(&self, buffers: &mut MeshBuffers, vertex_req: usize, index_req: usize) {
        let vertex_len = round_up(vertex_req, self.vertex_step).max(buffers.vertices.len());
        buffers.vertices.resize(vertex_len, UiVertex::zeroed());

        let index_len = round_up(index_req, self.index_step).max(buffers.indices.len());
        buffers.indices.resize(index_len, 0);
        buffers.indices[index_req..].fill(0);
    }
}

fn round_up(value: usize, step: usize) -> usize {
    value.div_ceil(step) * step
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, 0, 0)]
    #[case(1, 120, 180)]
    #[case(30, 120, 180)]
    #[case(31, 240, 360)]
    #[case(60, 240, 360)]
    fn sprite_rounding(
        #[case] particles: usize,
        #[case] expected_vertices: usize,
        #[case] expected_indices: usize,
    ) {
        let mut buffers = MeshBuffers::new();
        let growth = BufferGrowth::for_sprites(DEFAULT_PARTICLE_INCREMENT);
        growth.apply(&mut buffers, particles * 4, particles * 6);

        assert_eq!(buffers.vertex_count(), expected_vertices);
        assert_eq!(buffers.index_count(), expected_indices);
    }

    #[rstest]
    #[case(3, 60, 180)]
    #[case(31, 120, 360)]
    fn ribbon_rounding(
        #[case] points: usize,
        #[case] expected_vertices: usize,
        #[case] expected_indices: usize,
    ) {
        let mut buffers = MeshBuffers::new();
        let growth = BufferGrowth::for_ribbons(DEFAULT_PARTICLE_INCREMENT);
        growth.apply(&mut buffers, points * 2, points * 6);

        assert_eq!(buffers.vertex_count(), expected_vertices);
        assert_eq!(buffers.index_count(), expected_indices);
    }

    #[test]
    fn never_shrinks() {
        let mut buffers = MeshBuffers::new();
        let growth = BufferGrowth::for_sprites(10);

        growth.apply(&mut buffers, 400, 600);
        assert_eq!(buffers.vertex_count(), 400);
        assert_eq!(buffers.index_count(), 600);

        growth.apply(&mut buffers, 4, 6);
        assert_eq!(buffers.vertex_count(), 400);
        assert_eq!(buffers.index_count(), 600);
    }

    #[test]
    fn stale_index_tail_is_zeroed() {
        let mut buffers = MeshBuffers::new();
        let growth = BufferGrowth::for_sprites(10);

        growth.apply(&mut buffers, 40, 60);
        for index in buffers.indices.iter_mut() {
            *index = 7;
        }

        // A smaller frame must clear everything past its live range.
        growth.apply(&mut buffers, 8, 12);
        assert!(buffers.indices[..12].iter().all(|&i| i == 7));
        assert!(buffers.indices[12..].iter().all(|&i| i == 0));
    }

    #[test]
    fn grown_slots_are_zeroed() {
        let mut buffers = MeshBuffers::new();
        let growth = BufferGrowth::for_ribbons(5);
        growth.apply(&mut buffers, 6, 12);

        assert!(buffers.vertices.iter().all(|v| *v == UiVertex::zeroed()));
        assert!(buffers.indices.iter().all(|&i| i == 0));
    }

    #[test]
    fn index_length_is_multiple_of_three() {
        let mut buffers = MeshBuffers::new();
        for particles in [1, 7, 29, 30, 31, 100] {
            BufferGrowth::for_sprites(DEFAULT_PARTICLE_INCREMENT).apply(
                &mut buffers,
                particles * 4,
                particles * 6,
            );
            assert_eq!(buffers.index_count() % 3, 0);
        }
    }
}
