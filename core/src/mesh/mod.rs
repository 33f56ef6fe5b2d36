//! CPU-side UI mesh types and the buffer growth policy.
//!
//! This module provides:
//! - [`UiVertex`] - GPU-ready vertex layout (position, RGBA8 color, 3 UV pairs)
//! - [`MeshBuffers`] - growable vertex/index buffers filled by the generators
//! - [`BufferGrowth`] - grow-only, fixed-increment buffer sizing

mod data;
mod growth;

pub use data::{MeshBuffers, UiVertex};
pub use growth::{BufferGrowth, DEFAULT_PARTICLE_INCREMENT};
