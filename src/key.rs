//! The page's verification key and the bytes it decodes to.

use data_encoding::BASE64_NOPAD;

use crate::{
   document::Document,
   error::{
      Error,
      Result,
   },
};

/// `name` of the meta tag carrying the verification key.
const VERIFICATION_META: &str = "twitter-site-verification";

/// Reads the base64 verification key out of the page's meta tags.
pub fn verification_key<D: Document>(page: &D) -> Result<&str> {
   page
      .meta_content(VERIFICATION_META)
      .filter(|content| !content.is_empty())
      .ok_or_else(|| Error::extraction(format!("{VERIFICATION_META} meta tag")))
}

/// Decodes the verification key. Padding is optional.
pub fn decode_key(key: &str) -> Result<Vec<u8>> {
   let trimmed = key.trim().trim_end_matches('=');
   Ok(BASE64_NOPAD.decode(trimmed.as_bytes())?)
}
