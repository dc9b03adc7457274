//! Animation frame grid hidden in the page's loading SVGs.

use crate::{
   document::Document,
   error::{
      Error,
      Result,
   },
};

/// `id` prefix of the loading animation SVGs.
const FRAME_ID_PREFIX: &str = "loading-x-anim";
/// Number of loading animations the key can choose between.
const FRAME_COUNT: u8 = 4;
/// Key byte whose value picks the animation.
const FRAME_SELECTOR_INDEX: usize = 5;
/// Length of the leading move command of every frame path (`M0 0 0 0`).
const MOVE_COMMAND_LEN: usize = 9;

/// Rows of integers, one per bezier segment of the selected frame's path.
pub type FrameGrid = Vec<Vec<i64>>;

/// Picks the frame selected by `key_bytes` and parses its path into rows.
pub fn frame_grid<D: Document>(page: &D, key_bytes: &[u8]) -> Result<FrameGrid> {
   let selector = key_bytes.get(FRAME_SELECTOR_INDEX).ok_or_else(|| {
      Error::parse(format!(
         "key has {} bytes, frame selection needs {}",
         key_bytes.len(),
         FRAME_SELECTOR_INDEX + 1
      ))
   })?;
   let index = usize::from(selector % FRAME_COUNT);

   let path = frame_path(page, index)?;
   parse_path(path)
}

/// `d` attribute of the second path in the first group of frame `index`.
fn frame_path<D: Document>(page: &D, index: usize) -> Result<&str> {
   let frames = page.elements_by_id_prefix(FRAME_ID_PREFIX);
   let frame = *frames.get(index).ok_or_else(|| {
      Error::extraction(format!(
         "animation frame {index} ({} {FRAME_ID_PREFIX} elements on the page)",
         frames.len()
      ))
   })?;

   let group = *page
      .children(frame)
      .first()
      .ok_or_else(|| Error::extraction(format!("group inside animation frame {index}")))?;

   let path = *page
      .children(group)
      .get(1)
      .ok_or_else(|| Error::extraction(format!("path inside animation frame {index}")))?;

   page
      .attribute(path, "d")
      .ok_or_else(|| Error::extraction(format!("'d' attribute of animation frame {index}")))
}

/// Splits path data on its curve commands and keeps only the digit runs of
/// each segment. A run too long for `i64` fails rather than shifting the
/// columns after it.
pub fn parse_path(path_d: &str) -> Result<FrameGrid> {
   let curves = path_d.get(MOVE_COMMAND_LEN..).unwrap_or_default();

   curves
      .split('C')
      .map(|segment| {
         segment
            .split(|chr: char| !chr.is_ascii_digit())
            .filter(|token| !token.is_empty())
            .map(|token| {
               token
                  .parse::<i64>()
                  .map_err(|err| Error::parse(format!("frame value {token}: {err}")))
            })
            .collect()
      })
      .collect()
}
