//! Number formatting helpers that follow JavaScript's numeric semantics.

/// `-1.0` for odd indices, `0.0` for even ones. Odd curve parameters may go
/// negative, even ones may not.
pub const fn odd_coefficient(index: usize) -> f64 {
   if index % 2 == 1 { -1.0 } else { 0.0 }
}

/// `Math.round()`: halves round towards positive infinity, so `-0.5` becomes
/// `0` where [`f64::round`] would give `-1`.
pub fn js_round(num: f64) -> f64 {
   let floor = num.floor();
   if num - floor >= 0.5 { floor + 1.0 } else { floor }
}

/// Rounds to two decimals, as `parseFloat(num.toFixed(2))` would.
pub fn round2(num: f64) -> f64 {
   (num * 100.0).round() / 100.0
}

/// Scales a byte-range value into `[min, max]`, flooring it when `floor` is
/// set and keeping two decimals otherwise.
pub fn scale_byte(value: f64, min: f64, max: f64, floor: bool) -> f64 {
   let scaled = value * (max - min) / 255.0 + min;
   if floor { scaled.floor() } else { round2(scaled) }
}

/// Uppercase hexadecimal digit for `0..16`.
const fn hex_digit(digit: u8) -> char {
   if digit < 10 {
      (b'0' + digit) as char
   } else {
      (b'A' + digit - 10) as char
   }
}

/// Writes a non-negative float in base 16, including its fractional part.
///
/// The integer part is produced by repeated division and is empty for values
/// below one, so `0.5` yields `".8"` and `0.0` yields `""`. Callers decide how
/// to present those.
#[expect(
   clippy::cast_possible_truncation,
   clippy::cast_sign_loss,
   reason = "digits are always in 0..16"
)]
#[expect(
   clippy::while_float,
   reason = "every step shifts out four exact bits, so the fraction reaches zero"
)]
pub fn float_to_hex(value: f64) -> String {
   let mut integer = value.floor();
   let mut fraction = value - integer;
   let mut digits = Vec::new();

   while integer > 0.0 {
      let quotient = (integer / 16.0).floor();
      digits.push(hex_digit((integer - quotient * 16.0) as u8));
      integer = quotient;
   }

   let mut out = digits.into_iter().rev().collect::<String>();
   if fraction > 0.0 {
      out.push('.');
      while fraction > 0.0 {
         fraction *= 16.0;
         let digit = fraction.floor();
         fraction -= digit;
         out.push(hex_digit(digit as u8));
      }
   }

   out
}
