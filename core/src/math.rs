//! Math type aliases and 2D helpers.
//!
//! Provides f32 types over nalgebra plus the small set of 2D operations the
//! mesh generators rely on. Normalization and trigonometric helpers are
//! total: degenerate inputs yield zero instead of NaN/Inf so no non-finite
//! geometry ever reaches the output buffers.

pub use nalgebra;

/// 2D vector (f32).
pub type Vec2 = nalgebra::Vector2<f32>;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// 4D vector (f32).
pub type Vec4 = nalgebra::Vector4<f32>;

/// Squared-length tolerance below which a vector is treated as zero.
const NORMALIZE_TOLERANCE: f32 = 1e-8;

/// Rotate a 2D vector by a precomputed sine/cosine pair.
#[inline]
pub fn rotate_sin_cos(v: Vec2, sin: f32, cos: f32) -> Vec2 {
    Vec2::new(cos * v.x - sin * v.y, sin * v.x + cos * v.y)
}

/// Rotate a 2D vector counterclockwise by an angle in degrees.
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    rotate_sin_cos(v, sin, cos)
}

/// Perpendicular of a 2D vector (counterclockwise 90° rotation).
#[inline]
pub fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Normalize a 2D vector, returning zero for (near-)zero input.
pub fn safe_normalize(v: Vec2) -> Vec2 {
    let squared = v.norm_squared();
    if squared > NORMALIZE_TOLERANCE {
        v / squared.sqrt()
    } else {
        Vec2::zeros()
    }
}

/// Replace a non-finite value with zero.
#[inline]
pub fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}

/// Sign of a value: -1.0, 0.0, or 1.0 (0.0 for NaN).
#[inline]
pub fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
