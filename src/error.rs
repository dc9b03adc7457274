//! Error types.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
   /// Interpolation vectors have different lengths.
   #[error("interpolation arguments have different lengths ({from} vs {to})")]
   MismatchedArguments { from: usize, to: usize },
   /// A required tag, node, attribute or pattern match is absent.
   #[error("could not extract {0}")]
   Extraction(String),
   /// Extracted data does not have the expected shape.
   #[error("parse error: {0}")]
   Parse(String),
   /// Base64 decoding failed.
   #[error("base64 decode error: {0}")]
   Base64(#[from] data_encoding::DecodeError),
   /// HTTP request failed.
   #[cfg(feature = "fetch")]
   #[error("HTTP error: {0}")]
   Http(#[from] minreq::Error),
   /// HTTP response returned a non-200 status.
   #[cfg(feature = "fetch")]
   #[error("{url} returned HTTP {status}")]
   HttpStatus { status: i32, url: String },
}

impl Error {
   pub(crate) fn extraction(what: impl Into<String>) -> Self {
      Self::Extraction(what.into())
   }

   pub(crate) fn parse(msg: impl Into<String>) -> Self {
      Self::Parse(msg.into())
   }
}
