//! Read-only view over one emitter's per-particle attribute buffers.
//!
//! Simulation backends expose a varying set of attribute channels per
//! emitter. [`ParticleFrame`] adapts whatever subset is present for one
//! frame: every channel is either bound to a slice or unbound, and every
//! read degrades to a deterministic default instead of failing, so the
//! generators never have to care which channels exist.

use firelily_core::color::LinearColor;
use firelily_core::math::{Vec2, Vec3, Vec4};

/// Identity of one ribbon within a multi-ribbon emitter.
///
/// Ordering matters: groups are emitted in ascending id order so the draw
/// order stays consistent from frame to frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RibbonId(pub u64);

/// One attribute channel, either bound to per-particle data or absent.
#[derive(Debug, Clone, Copy, Default)]
pub enum AttributeChannel<'a, T> {
    #[default]
    Unbound,
    Bound(&'a [T]),
}

impl<'a, T: Copy> AttributeChannel<'a, T> {
    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Bound(_))
    }

    /// Read one element, falling back to `default` when the channel is
    /// unbound or the index is past the bound slice.
    pub fn get_or(&self, index: usize, default: T) -> T {
        match self {
            Self::Bound(values) => values.get(index).copied().unwrap_or(default),
            Self::Unbound => default,
        }
    }
}

/// Immutable, index-addressable snapshot of one emitter's particles.
///
/// Built per generation call with the channels the simulation actually
/// provides:
///
/// ```
/// use firelily_core::math::Vec3;
/// use firelily_particles::attributes::ParticleFrame;
///
/// let positions = [Vec3::new(1.0, 0.0, 2.0)];
/// let frame = ParticleFrame::new(1).with_positions(&positions);
/// assert_eq!(frame.position_2d(0).y, 2.0);
/// ```
///
/// The working plane is X/Z with Y as depth, which is why the 2D accessors
/// project out the Y component.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParticleFrame<'a> {
    count: usize,
    positions: AttributeChannel<'a, Vec3>,
    colors: AttributeChannel<'a, LinearColor>,
    velocities: AttributeChannel<'a, Vec3>,
    sizes: AttributeChannel<'a, Vec2>,
    rotations: AttributeChannel<'a, f32>,
    sub_images: AttributeChannel<'a, f32>,
    material_params: AttributeChannel<'a, Vec4>,
    ribbon_widths: AttributeChannel<'a, f32>,
    sort_keys: AttributeChannel<'a, f32>,
    ribbon_ids: AttributeChannel<'a, RibbonId>,
}

impl<'a> ParticleFrame<'a> {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }

    pub fn with_positions(mut self, positions: &'a [Vec3]) -> Self {
        self.positions = AttributeChannel::Bound(positions);
        self
    }

    pub fn with_colors(mut self, colors: &'a [LinearColor]) -> Self {
        self.colors = AttributeChannel::Bound(colors);
        self
    }

    pub fn with_velocities(mut self, velocities: &'a [Vec3]) -> Self {
        self.velocities = AttributeChannel::Bound(velocities);
        self
    }

    pub fn with_sizes(mut self, sizes: &'a [Vec2]) -> Self {
        self.sizes = AttributeChannel::Bound(sizes);
        self
    }

    pub fn with_rotations(mut self, rotations: &'a [f32]) -> Self {
        self.rotations = AttributeChannel::Bound(rotations);
        self
    }

    pub fn with_sub_images(mut self, sub_images: &'a [f32]) -> Self {
        self.sub_images = AttributeChannel::Bound(sub_images);
        self
    }

    pub fn with_material_params(mut self, params: &'a [Vec4]) -> Self {
        self.material_params = AttributeChannel::Bound(params);
        self
    }

    pub fn with_ribbon_widths(mut self, widths: &'a [f32]) -> Self {
        self.ribbon_widths = AttributeChannel::Bound(widths);
        self
    }

    pub fn with_sort_keys(mut self, sort_keys: &'a [f32]) -> Self {
        self.sort_keys = AttributeChannel::Bound(sort_keys);
        self
    }

    pub fn with_ribbon_ids(mut self, ribbon_ids: &'a [RibbonId]) -> Self {
        self.ribbon_ids = AttributeChannel::Bound(ribbon_ids);
        self
    }

    /// Number of particles in this frame.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Particle position projected onto the working plane.
    pub fn position_2d(&self, index: usize) -> Vec2 {
        let p = self.positions.get_or(index, Vec3::zeros());
        Vec2::new(p.x, p.z)
    }

    /// Particle velocity projected onto the working plane. The depth axis
    /// flips sign so screen-up matches simulation-up.
    pub fn velocity_2d(&self, index: usize) -> Vec2 {
        let v = self.velocities.get_or(index, Vec3::zeros());
        Vec2::new(v.x, -v.z)
    }

    pub fn color(&self, index: usize) -> LinearColor {
        self.colors.get_or(index, LinearColor::WHITE)
    }

    pub fn size(&self, index: usize) -> Vec2 {
        self.sizes.get_or(index, Vec2::zeros())
    }

    pub fn rotation_degrees(&self, index: usize) -> f32 {
        self.rotations.get_or(index, 0.0)
    }

    pub fn sub_image_index(&self, index: usize) -> f32 {
        self.sub_images.get_or(index, 0.0)
    }

    pub fn material_params(&self, index: usize) -> Vec4 {
        self.material_params.get_or(index, Vec4::zeros())
    }

    pub fn ribbon_width(&self, index: usize) -> f32 {
        self.ribbon_widths.get_or(index, 0.0)
    }

    pub fn sort_key(&self, index: usize) -> f32 {
        self.sort_keys.get_or(index, 0.0)
    }

    pub fn ribbon_id(&self, index: usize) -> RibbonId {
        self.ribbon_ids.get_or(index, RibbonId::default())
    }

    /// Whether the group-id channel is bound. Unbound means the whole frame
    /// forms a single ribbon.
    pub fn has_ribbon_ids(&self) -> bool {
        self.ribbon_ids.is_bound()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbound_channels_yield_defaults() {
        let frame = ParticleFrame::new(3);

        assert_eq!(frame.position_2d(0), Vec2::zeros());
        assert_eq!(frame.velocity_2d(1), Vec2::zeros());
        assert_eq!(frame.color(2), LinearColor::WHITE);
        assert_eq!(frame.size(0), Vec2::zeros());
        assert_eq!(frame.rotation_degrees(0), 0.0);
        assert_eq!(frame.sub_image_index(0), 0.0);
        assert_eq!(frame.material_params(0), Vec4::zeros());
        assert_eq!(frame.ribbon_width(0), 0.0);
        assert_eq!(frame.sort_key(0), 0.0);
        assert_eq!(frame.ribbon_id(0), RibbonId(0));
        assert!(!frame.has_ribbon_ids());
    }

    #[test]
    fn projection_drops_depth_axis() {
        let positions = [Vec3::new(1.0, 9.0, 2.0)];
        let velocities = [Vec3::new(3.0, 9.0, 4.0)];
        let frame = ParticleFrame::new(1)
            .with_positions(&positions)
            .with_velocities(&velocities);

        assert_eq!(frame.position_2d(0), Vec2::new(1.0, 2.0));
        assert_eq!(frame.velocity_2d(0), Vec2::new(3.0, -4.0));
    }

    #[test]
    fn out_of_range_reads_fall_back() {
        let positions = [Vec3::new(1.0, 0.0, 1.0)];
        let frame = ParticleFrame::new(5).with_positions(&positions);

        assert_eq!(frame.position_2d(0), Vec2::new(1.0, 1.0));
        assert_eq!(frame.position_2d(4), Vec2::zeros());
    }

    #[test]
    fn channel_get_or() {
        let values = [7.0_f32, 8.0];
        let bound = AttributeChannel::Bound(&values[..]);
        let unbound: AttributeChannel<'_, f32> = AttributeChannel::Unbound;

        assert!(bound.is_bound());
        assert_eq!(bound.get_or(1, 0.0), 8.0);
        assert_eq!(bound.get_or(2, -1.0), -1.0);
        assert_eq!(unbound.get_or(0, 42.0), 42.0);
    }
}
