//! # Firelily Core
//!
//! Core crate for Firelily: math aliases and 2D helpers, linear color
//! quantization, and the CPU-side mesh buffer types shared by the particle
//! mesh generators in `firelily-particles`.

pub mod color;
pub mod math;
pub mod mesh;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the library version on startup.
pub fn init() {
    log::info!("Firelily Core v{} initialized", VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
