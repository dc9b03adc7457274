//! Rotation angles as flattened 2x2 matrices.

use std::f64::consts::PI;

/// `[cos θ, -sin θ, sin θ, cos θ]` for an angle given in degrees, the same
/// layout a CSS `matrix()` transform uses for its first four values.
pub fn rotation_matrix(degrees: f64) -> [f64; 4] {
   // `deg * PI / 180` rounds differently from `to_radians`.
   let (sin, cos) = (degrees * PI / 180.0).sin_cos();
   [cos, -sin, sin, cos]
}
