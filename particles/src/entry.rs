//! Renderer configuration, render entries and shared generation parameters.

use firelily_core::math::{rotate_degrees, Vec2, Vec3};
use firelily_core::mesh::DEFAULT_PARTICLE_INCREMENT;

/// How sprite quads are oriented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpriteAlignment {
    /// Use the per-particle rotation channel (degrees).
    #[default]
    Rotation,
    /// Face the quad along the particle's projected velocity.
    VelocityAligned,
}

/// How ribbon U coordinates advance along the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UvDistribution {
    /// `U = point_index / point_count`, always spanning roughly [0, 1].
    #[default]
    NormalizedByIndex,
    /// U accumulates traversed length over `tiling_length`, repeating the
    /// texture every tiling-length units.
    TiledByLength,
}

/// Per-channel ribbon UV settings. Both texcoord channels of a ribbon carry
/// their own instance so they can tile independently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvChannelSettings {
    pub mode: UvDistribution,
    /// Strip length mapped to one repeat of the texture, in UI units.
    /// Only read in tiled mode.
    pub tiling_length: f32,
}

impl Default for UvChannelSettings {
    fn default() -> Self {
        Self {
            mode: UvDistribution::default(),
            tiling_length: 100.0,
        }
    }
}

/// How ribbon joints are extruded at interior points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RibbonJointMode {
    /// Extrude along the perpendicular of the averaged segment tangent.
    /// Constant-width only in the straight case, but cheap and stable.
    #[default]
    AveragedTangent,
    /// Miter joints: scale the joint normal so the strip keeps its width
    /// through corners. One vertex pair per point.
    Mitered,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteRendererConfig {
    pub alignment: SpriteAlignment,
    /// Sprite-sheet grid dimensions. (1, 1) means no sub-images.
    pub sub_image_size: Vec2,
    pub particle_increment: usize,
}

impl Default for SpriteRendererConfig {
    fn default() -> Self {
        Self {
            alignment: SpriteAlignment::default(),
            sub_image_size: Vec2::new(1.0, 1.0),
            particle_increment: DEFAULT_PARTICLE_INCREMENT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RibbonRendererConfig {
    pub uv0: UvChannelSettings,
    pub uv1: UvChannelSettings,
    pub joint_mode: RibbonJointMode,
    pub particle_increment: usize,
}

impl Default for RibbonRendererConfig {
    fn default() -> Self {
        Self {
            uv0: UvChannelSettings::default(),
            uv1: UvChannelSettings::default(),
            joint_mode: RibbonJointMode::default(),
            particle_increment: DEFAULT_PARTICLE_INCREMENT,
        }
    }
}

/// Configuration for one renderer attached to an emitter.
#[derive(Debug, Clone, PartialEq)]
pub enum RendererConfig {
    Sprite(SpriteRendererConfig),
    Ribbon(RibbonRendererConfig),
}

/// Opaque handle to a material resolved by the render-state subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub u32);

/// One drawable unit: a renderer bound to its emitter and material.
///
/// Entries are produced once per system description and are immutable
/// afterwards; per-frame work only reads them.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderEntry {
    pub renderer: RendererConfig,
    /// Index of the owning emitter within the particle system.
    pub emitter_index: usize,
    pub material: MaterialHandle,
    /// Draw-order hint, lower draws first.
    pub sort_order: i32,
}

/// Stable-sort entries by their draw-order hint. Entries with equal hints
/// keep their relative order.
pub fn sort_render_entries(entries: &mut [RenderEntry]) {
    entries.sort_by_key(|entry| entry.sort_order);
}

/// Emitter placement relative to the UI canvas.
///
/// The working plane is X/Z, so only the pitch component of the emitter's
/// rotation affects the generated 2D geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitterTransform {
    pub location: Vec3,
    pub scale: Vec3,
    pub pitch_degrees: f32,
}

impl Default for EmitterTransform {
    fn default() -> Self {
        Self {
            location: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            pitch_degrees: 0.0,
        }
    }
}

/// Per-call parameters shared by both generators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    /// Simulation-units to UI-units scale. Must be positive.
    pub scale_factor: f32,
    /// Offset applied after scaling, in UI units.
    pub location_offset: Vec2,
    /// Widget opacity in [0, 1], multiplied into the quantized alpha byte.
    pub alpha: f32,
    /// Whether particle data is expressed in emitter-local space and needs
    /// the emitter transform folded in.
    pub local_space: bool,
    pub transform: EmitterTransform,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            location_offset: Vec2::zeros(),
            alpha: 1.0,
            local_space: false,
            transform: EmitterTransform::default(),
        }
    }
}

impl GenerationParams {
    /// Map a projected particle position into UI space.
    ///
    /// Local-space data picks up the emitter scale, pitch and location;
    /// world-space data only gets scaled and offset.
    pub fn position_to_ui(&self, position_2d: Vec2) -> Vec2 {
        let mut p = position_2d * self.scale_factor;
        if self.local_space {
            p.x *= self.transform.scale.x;
            p.y *= self.transform.scale.z;
            p = rotate_degrees(p, -self.transform.pitch_degrees);
            p += self.location_offset;
            p += Vec2::new(self.transform.location.x, self.transform.location.z)
                * self.scale_factor;
        } else {
            p += self.location_offset;
        }
        p
    }

    /// Map a particle size into UI units. Local-space sizes pick up the
    /// emitter scale; rotation never affects extents.
    pub fn size_to_ui(&self, size: Vec2) -> Vec2 {
        let mut s = size * self.scale_factor;
        if self.local_space {
            s.x *= self.transform.scale.x;
            s.y *= self.transform.scale.z;
        }
        s
    }

    /// Map a ribbon width into UI units.
    pub fn width_to_ui(&self, width: f32) -> f32 {
        width * self.scale_factor
    }

    pub fn pitch_radians(&self) -> f32 {
        self.transform.pitch_degrees.to_radians()
    }
}
