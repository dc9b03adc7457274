//! Animation key: one sampled keyframe of the loading animation, written out
//! as hex.
//!
//! A frame row describes a color transition, a rotation and the easing curve
//! between them. The key byte indices fix the point in time at which that
//! animation is sampled. The sampled color and rotation matrix are then
//! encoded into a short lowercase hex string.

use std::{
   fmt::Write as _,
   iter,
};

use crate::{
   cubic_curve::CubicBezier,
   error::{
      Error,
      Result,
   },
   frames::FrameGrid,
   interpolate::interpolate,
   numeric::{
      float_to_hex,
      js_round,
      odd_coefficient,
      round2,
      scale_byte,
   },
   patterns::OnDemandIndices,
   rotation::rotation_matrix,
};

/// Animation length in milliseconds; frame times are sampled modulo this.
const TOTAL_ANIMATION_TIME: u32 = 4096;
/// Low nibble of a key byte picks rows and scales time.
const NIBBLE_MODULUS: u8 = 16;
/// Three color channels, three target channels, a rotation and four curve
/// control values.
const MIN_FRAME_VALUES: usize = 11;

/// Computes the session's animation key from the key bytes, the on-demand
/// indices and the selected frame grid.
pub fn animation_key(key_bytes: &[u8], indices: &OnDemandIndices, grid: &FrameGrid) -> Result<String> {
   let row_index = usize::from(key_byte(key_bytes, indices.row)? % NIBBLE_MODULUS);
   let row = grid.get(row_index).ok_or_else(|| {
      Error::parse(format!(
         "row index {row_index} out of bounds for {} frame rows",
         grid.len()
      ))
   })?;

   let frame_time = frame_time(key_bytes, &indices.bytes)?;
   tracing::debug!(row_index, frame_time, "sampling animation frame");

   animate(row, f64::from(frame_time) / f64::from(TOTAL_ANIMATION_TIME))
}

fn key_byte(key_bytes: &[u8], index: usize) -> Result<u8> {
   key_bytes.get(index).copied().ok_or_else(|| {
      Error::parse(format!(
         "key byte index {index} out of range for a {}-byte key",
         key_bytes.len()
      ))
   })
}

/// Product of the indexed bytes' low nibbles, wrapped into the animation
/// length.
fn frame_time(key_bytes: &[u8], indices: &[usize]) -> Result<u32> {
   indices.iter().try_fold(1, |time, &index| {
      let nibble = u32::from(key_byte(key_bytes, index)? % NIBBLE_MODULUS);
      Ok(time * nibble % TOTAL_ANIMATION_TIME)
   })
}

/// Samples one frame row at `target_time` (in `[0, 1)`) and encodes it.
#[expect(
   clippy::missing_asserts_for_indexing,
   reason = "row length is checked up front"
)]
#[expect(clippy::cast_precision_loss, reason = "frame values are small integers")]
pub fn animate(row: &[i64], target_time: f64) -> Result<String> {
   if row.len() < MIN_FRAME_VALUES {
      return Err(Error::parse(format!(
         "frame row has {} values, need at least {MIN_FRAME_VALUES}",
         row.len()
      )));
   }

   let values = row.iter().map(|&val| val as f64).collect::<Vec<f64>>();

   let from_color = values[..3].iter().copied().chain(iter::once(1.0)).collect::<Vec<_>>();
   let to_color = values[3..6].iter().copied().chain(iter::once(1.0)).collect::<Vec<_>>();
   let to_rotation = scale_byte(values[6], 60.0, 360.0, true);

   let curve_params = values[7..]
      .iter()
      .enumerate()
      .map(|(idx, &val)| scale_byte(val, odd_coefficient(idx), 1.0, false))
      .collect::<Vec<_>>();
   let easing = CubicBezier::from_params(&curve_params)?.value(target_time);

   let color = interpolate(&from_color, &to_color, easing)?
      .into_iter()
      .map(|channel| channel.max(0.0))
      .collect::<Vec<_>>();
   let rotation = interpolate(&[0.0], &[to_rotation], easing)?;
   let matrix = rotation_matrix(rotation[0]);

   Ok(encode(&color[..3], &matrix))
}

/// Hex-encodes the color channels and rotation matrix of a sampled frame.
#[expect(clippy::cast_possible_truncation, reason = "channels are small integers")]
fn encode(color: &[f64], matrix: &[f64; 4]) -> String {
   let mut key = String::new();

   for &channel in color {
      let _ = write!(key, "{:x}", js_round(channel) as i64);
   }

   for &value in matrix {
      let hex = float_to_hex(round2(value).abs()).to_lowercase();
      if hex.is_empty() {
         key.push('0');
      } else if hex.starts_with('.') {
         key.push('0');
         key.push_str(&hex);
      } else {
         key.push_str(&hex);
      }
   }

   key.push_str("00");
   key.retain(|chr| chr != '.' && chr != '-');
   key
}

#[cfg(test)]
mod tests {
   use super::*;

   const ROW: [i64; 11] = [255, 0, 0, 0, 0, 255, 128, 51, 102, 153, 204];

   #[test]
   fn start_of_animation_is_the_from_color() {
      // Rotation is zero at t = 0, so the matrix encodes as 1, 0, 0, 1.
      assert_eq!(animate(&ROW, 0.0).unwrap(), "ff00100100");
   }

   #[test]
   fn end_of_animation_reaches_the_to_color() {
      // 128 scales to 210 degrees: cos = -0.87, sin = -0.5.
      assert_eq!(animate(&ROW, 1.0).unwrap(), "00ff0deb851eb851eb808080deb851eb851eb800");
   }

   #[test]
   fn matrix_uses_absolute_values() {
      let key = animate(&ROW, 1.0).unwrap();
      assert!(key.chars().all(|chr| chr.is_ascii_hexdigit()));
      assert!(!key.contains(|chr: char| chr.is_ascii_uppercase()));
   }

   #[test]
   fn colors_are_unpadded_hex() {
      let key = encode(&[255.0, 16.0, 0.4], &[1.0, 0.0, 0.0, 1.0]);
      assert_eq!(key, "ff100100100");
   }

   #[test]
   fn short_rows_are_rejected() {
      let err = animate(&ROW[..10], 0.5).unwrap_err();
      assert!(err.to_string().contains("need at least 11"));
   }

   #[test]
   fn frame_time_wraps_into_animation_length() {
      let key = [0x1f, 0x2e, 0x3d, 0x4c, 0x5b];
      assert_eq!(frame_time(&key, &[0, 1]).unwrap(), 15 * 14);
      assert_eq!(frame_time(&key, &[0, 1, 2, 3]).unwrap(), 15 * 14 * 13 * 12 % 4096);
      assert_eq!(frame_time(&key, &[]).unwrap(), 1);
      frame_time(&key, &[9]).unwrap_err();
   }

   #[test]
   fn key_uses_indexed_row() {
      let mut grid = vec![vec![0; 11]; 16];
      grid[3] = ROW.to_vec();

      let mut key = vec![0_u8; 32];
      key[7] = 0x13;
      let indices = OnDemandIndices {
         row:   7,
         bytes: vec![8],
      };

      // Byte 8 is zero, so the row is sampled at t = 0.
      assert_eq!(animation_key(&key, &indices, &grid).unwrap(), "ff00100100");
   }

   #[test]
   fn row_outside_the_grid_fails() {
      let grid = vec![ROW.to_vec(); 2];
      let key = [0x0f_u8; 8];
      let indices = OnDemandIndices {
         row:   0,
         bytes: vec![1],
      };
      let err = animation_key(&key, &indices, &grid).unwrap_err();
      assert!(err.to_string().contains("row index 15"));
   }
}
