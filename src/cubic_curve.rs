//! Cubic bezier easing, solved for a time value.

use crate::error::{
   Error,
   Result,
};

/// Answer tolerance for the bisection on the curve's x axis.
const X_TOLERANCE: f64 = 0.00001;

/// A CSS-style `cubic-bezier(x1, y1, x2, y2)` timing curve running from
/// `(0, 0)` to `(1, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
   x1: f64,
   y1: f64,
   x2: f64,
   y2: f64,
}

impl CubicBezier {
   pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
      Self { x1, y1, x2, y2 }
   }

   /// Builds a curve from the first four values of `params`, laid out as
   /// `[x1, y1, x2, y2, ..]`. Extra values are ignored.
   pub fn from_params(params: &[f64]) -> Result<Self> {
      match *params {
         [x1, y1, x2, y2, ..] => Ok(Self::new(x1, y1, x2, y2)),
         _ => Err(Error::parse(format!(
            "cubic curve needs 4 control values, got {}",
            params.len()
         ))),
      }
   }

   /// Maps `time` to the curve's output.
   ///
   /// Outside `[0, 1]` the curve is extended linearly along its end tangents.
   /// Inside, `x(m) = time` is bisected, which assumes `x` is monotonic in
   /// `m`. That holds whenever `x1` and `x2` lie in `[0, 1]`.
   #[expect(clippy::float_cmp, reason = "exact control values select the tangent")]
   pub fn value(&self, time: f64) -> f64 {
      if time <= 0.0 {
         let start_gradient = if self.x1 > 0.0 {
            self.y1 / self.x1
         } else if self.y1 == 0.0 && self.x2 > 0.0 {
            self.y2 / self.x2
         } else {
            0.0
         };
         return time * start_gradient;
      }

      if time >= 1.0 {
         let end_gradient = if self.x2 < 1.0 {
            (self.y2 - 1.0) / (self.x2 - 1.0)
         } else if self.x2 == 1.0 && self.x1 < 1.0 {
            (self.y1 - 1.0) / (self.x1 - 1.0)
         } else {
            0.0
         };
         return 1.0 + (time - 1.0) * end_gradient;
      }

      let param = self.solve_param(time);
      calculate(self.y1, self.y2, param)
   }

   /// Finds the curve parameter whose x coordinate is `time`.
   ///
   /// Stops early once the interval stops shrinking, returning the last
   /// midpoint.
   #[expect(clippy::float_cmp, reason = "detecting a stalled interval")]
   fn solve_param(&self, time: f64) -> f64 {
      let mut low = 0.0_f64;
      let mut high = 1.0_f64;

      loop {
         let mid = f64::midpoint(low, high);
         let x_estimate = calculate(self.x1, self.x2, mid);

         if (time - x_estimate).abs() < X_TOLERANCE {
            return mid;
         }

         let (next_low, next_high) = if x_estimate < time {
            (mid, high)
         } else {
            (low, mid)
         };

         if next_low == low && next_high == high {
            return mid;
         }

         low = next_low;
         high = next_high;
      }
   }
}

/// One axis of a bezier from 0 to 1 with inner control ordinates `p1` and
/// `p2`: `3·p1·(1-m)²m + 3·p2·(1-m)m² + m³`.
///
/// Evaluated term by term, left to right, so results round exactly like the
/// browser's.
#[expect(clippy::suboptimal_flops, reason = "rounding must match the client script")]
pub fn calculate(p1: f64, p2: f64, param: f64) -> f64 {
   let complement = 1.0 - param;
   3.0 * p1 * complement * complement * param
      + 3.0 * p2 * complement * param * param
      + param * param * param
}
