//! Element-wise linear interpolation between keyframe vectors.

use crate::error::{
   Error,
   Result,
};

/// Interpolates `from` towards `to` by `factor`, element by element.
///
/// Both sides must describe the same property, so their lengths must match.
pub fn interpolate(from: &[f64], to: &[f64], factor: f64) -> Result<Vec<f64>> {
   if from.len() != to.len() {
      return Err(Error::MismatchedArguments {
         from: from.len(),
         to:   to.len(),
      });
   }

   Ok(from
      .iter()
      .zip(to)
      .map(|(&start, &end)| lerp(start, end, factor))
      .collect())
}

/// `from * (1 - factor) + to * factor`, without fusing, as the client
/// script computes it.
#[expect(clippy::suboptimal_flops, reason = "rounding must match the client script")]
pub fn lerp(from: f64, to: f64, factor: f64) -> f64 {
   from * (1.0 - factor) + to * factor
}
