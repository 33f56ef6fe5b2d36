//! Particle-to-UI-mesh generation.
//!
//! Converts per-frame particle attribute buffers into 2D triangle meshes for
//! UI rendering. Two presentation styles are supported: billboard sprites
//! (one quad per particle) and ribbons (width-extruded strips connecting
//! particles of one group). Simulation stepping, material management and GPU
//! submission live outside this crate; the seam is [`ParticleFrame`] going
//! in and [`MeshBuffers`](firelily_core::mesh::MeshBuffers) coming out.
//!
//! A typical frame loop generates once per [`RenderEntry`]:
//!
//! ```
//! use firelily_core::math::Vec3;
//! use firelily_core::mesh::MeshBuffers;
//! use firelily_particles::attributes::ParticleFrame;
//! use firelily_particles::entry::{GenerationParams, SpriteRendererConfig};
//! use firelily_particles::sprite::generate_sprites;
//!
//! let positions = [Vec3::new(0.0, 0.0, 0.0)];
//! let frame = ParticleFrame::new(1).with_positions(&positions);
//! let mut buffers = MeshBuffers::new();
//! let counts = generate_sprites(
//!     &frame,
//!     &SpriteRendererConfig::default(),
//!     &GenerationParams::default(),
//!     &mut buffers,
//! );
//! assert_eq!(counts.vertices, 4);
//! ```

pub mod attributes;
pub mod entry;
pub mod ribbon;
pub mod sprite;

pub use attributes::{AttributeChannel, ParticleFrame, RibbonId};
pub use entry::{GenerationParams, MaterialHandle, RenderEntry, RendererConfig};

use firelily_core::mesh::MeshBuffers;

/// Live vertex/index counts produced by one generation call. Buffer lengths
/// may be larger; everything past these counts is degenerate padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeneratedCounts {
    pub vertices: usize,
    pub indices: usize,
}

/// Generate the mesh for one render entry, dispatching on its renderer kind.
pub fn generate_for_entry(
    frame: &ParticleFrame,
    entry: &RenderEntry,
    params: &GenerationParams,
    out: &mut MeshBuffers,
) -> GeneratedCounts {
    match &entry.renderer {
        RendererConfig::Sprite(config) => sprite::generate_sprites(frame, config, params, out),
        RendererConfig::Ribbon(config) => ribbon::generate_ribbons(frame, config, params, out),
    }
}
