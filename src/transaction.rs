//! Transaction ID generation for X (Twitter) API requests.

use std::time::{
   SystemTime,
   UNIX_EPOCH,
};

use data_encoding::BASE64_NOPAD;
use hmac_sha256::Hash;

use crate::{
   animation::animation_key,
   config::DEFAULT_ONDEMAND_BASE_URL,
   document::{
      Document,
      HtmlDocument,
   },
   error::{
      Error,
      Result,
   },
   frames::frame_grid,
   key::{
      decode_key,
      verification_key,
   },
   patterns::{
      OnDemandIndices,
      ondemand_hash,
   },
   random::{
      ByteSource,
      ThreadRandom,
   },
};
#[cfg(feature = "fetch")]
use crate::{
   config::Config,
   fetch,
};

/// Keyword the client script mixes into every hash.
const HASH_KEYWORD: &str = "obfiowerehiring";

/// Trailing payload byte, constant across all ids.
const PAYLOAD_VERSION: u8 = 3;

/// Client epoch: 2023-05-01 00:00:00 UTC.
const CLIENT_EPOCH: u64 = 1_682_924_400;

/// Bytes of the SHA-256 digest carried in the payload.
const DIGEST_PREFIX_LEN: usize = 16;

/// Random byte, timestamp, digest prefix and version around the key bytes.
const FIXED_ID_BYTES: usize = 1 + 4 + DIGEST_PREFIX_LEN + 1;

/// Client for generating X (Twitter) transaction IDs.
///
/// Holds the key bytes and animation key derived once from X's home page and
/// on-demand script. Both are read-only afterwards, so one client can be
/// shared across threads and used for any number of requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientTransaction {
   key_bytes:     Vec<u8>,
   animation_key: String,
}

impl ClientTransaction {
   /// Fetches X.com with the default [`Config`] and creates a ready-to-use
   /// client.
   ///
   /// ```ignore
   /// let client = ClientTransaction::fetch()?;
   /// let id = client.generate_transaction_id("GET", "/i/api/1.1/jot/client_event.json");
   /// ```
   #[cfg(feature = "fetch")]
   pub fn fetch() -> Result<Self> {
      Self::fetch_with_config(&Config::default())
   }

   /// Fetches the home page (following migration pages) and the on-demand
   /// script described by `config`, then derives the session keys.
   #[cfg(feature = "fetch")]
   pub fn fetch_with_config(config: &Config) -> Result<Self> {
      let pages = fetch::fetch_pages(config)?;
      Self::new(&pages.home_page, &pages.ondemand_js)
   }

   /// Creates a client from pre-fetched HTML and JavaScript.
   ///
   /// Use this with your own HTTP client. The script URL comes from
   /// [`extract_ondemand_url`](Self::extract_ondemand_url).
   pub fn new(home_page_html: &str, ondemand_js: &str) -> Result<Self> {
      Self::from_document(&HtmlDocument::parse(home_page_html), ondemand_js)
   }

   /// Creates a client from any [`Document`] implementation of the home page.
   pub fn from_document<D: Document>(home_page: &D, ondemand_js: &str) -> Result<Self> {
      let indices = OnDemandIndices::parse(ondemand_js)?;
      tracing::debug!(row = indices.row, bytes = ?indices.bytes, "parsed key byte indices");

      let key_bytes = decode_key(verification_key(home_page)?)?;
      let grid = frame_grid(home_page, &key_bytes)?;
      let animation_key = animation_key(&key_bytes, &indices, &grid)?;

      tracing::info!(
         key_len = key_bytes.len(),
         animation_key_len = animation_key.len(),
         "transaction session initialized"
      );

      Ok(Self {
         key_bytes,
         animation_key,
      })
   }

   /// Rebuilds a client from previously derived session values.
   pub fn from_parts(key_bytes: Vec<u8>, animation_key: impl Into<String>) -> Self {
      Self {
         key_bytes,
         animation_key: animation_key.into(),
      }
   }

   /// Extracts the `ondemand.s.*.js` URL from homepage HTML.
   pub fn extract_ondemand_url(home_page_html: &str) -> Result<String> {
      Self::ondemand_url(home_page_html, DEFAULT_ONDEMAND_BASE_URL)
   }

   /// Like [`extract_ondemand_url`](Self::extract_ondemand_url), against a
   /// different script host.
   pub fn ondemand_url(home_page_html: &str, base_url: &str) -> Result<String> {
      let hash = ondemand_hash(home_page_html)?;
      Ok(format!("{}/ondemand.s.{hash}a.js", base_url.trim_end_matches('/')))
   }

   /// Bytes decoded from the page's verification key.
   pub fn key_bytes(&self) -> &[u8] {
      &self.key_bytes
   }

   /// Hex key sampled from the loading animation.
   pub fn animation_key(&self) -> &str {
      &self.animation_key
   }

   /// Generates a transaction ID for an API request at the current time.
   #[must_use]
   pub fn generate_transaction_id(&self, method: &str, path: &str) -> String {
      self.generate_transaction_id_with(method, path, None, &ThreadRandom)
   }

   /// Generates a transaction ID for a fixed `time`, in seconds since the
   /// client epoch.
   #[must_use]
   pub fn generate_transaction_id_at(&self, method: &str, path: &str, time: u32) -> String {
      self.generate_transaction_id_with(method, path, Some(time), &ThreadRandom)
   }

   /// Generates a transaction ID with an explicit clock reading and mask byte
   /// source. `method` and `path` are hashed exactly as given.
   #[must_use]
   pub fn generate_transaction_id_with(
      &self,
      method: &str,
      path: &str,
      time: Option<u32>,
      random: &impl ByteSource,
   ) -> String {
      let time = time.unwrap_or_else(client_time);
      let digest = Hash::hash(self.hash_input(method, path, time).as_bytes());
      let mask = random.next_byte();

      let mut bytes = Vec::with_capacity(self.key_bytes.len() + FIXED_ID_BYTES);
      bytes.push(mask);
      bytes.extend(
         self
            .key_bytes
            .iter()
            .chain(&time.to_le_bytes())
            .chain(&digest[..DIGEST_PREFIX_LEN])
            .chain(&[PAYLOAD_VERSION])
            .map(|&byte| byte ^ mask),
      );

      tracing::trace!(method, path, time, "generated transaction id");
      BASE64_NOPAD.encode(&bytes)
   }

   /// String whose SHA-256 digest is embedded in the id.
   fn hash_input(&self, method: &str, path: &str, time: u32) -> String {
      format!("{method}!{path}!{time}{HASH_KEYWORD}{}", self.animation_key)
   }
}

/// Seconds since the client epoch, by the wall clock.
#[expect(
   clippy::cast_possible_truncation,
   reason = "timestamp fits in u32 until 2159"
)]
pub fn client_time() -> u32 {
   SystemTime::now()
      .duration_since(UNIX_EPOCH)
      .map(|elapsed| elapsed.as_secs().saturating_sub(CLIENT_EPOCH) as u32)
      .unwrap_or(0)
}

/// Fields recovered from a transaction id by removing its mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTransactionId {
   pub mask:          u8,
   pub key_bytes:     Vec<u8>,
   pub time:          u32,
   pub digest_prefix: [u8; DIGEST_PREFIX_LEN],
   pub version:       u8,
}

/// Unmasks a transaction id and splits it into its fields. The key length is
/// whatever remains after the fixed-size fields.
pub fn decode_transaction_id(id: &str) -> Result<DecodedTransactionId> {
   let bytes = BASE64_NOPAD.decode(id.trim_end_matches('=').as_bytes())?;

   let Some((&mask, masked)) = bytes.split_first() else {
      return Err(Error::parse("empty transaction id"));
   };
   let payload = masked.iter().map(|&byte| byte ^ mask).collect::<Vec<u8>>();

   let key_len = payload
      .len()
      .checked_sub(FIXED_ID_BYTES - 1)
      .ok_or_else(|| Error::parse(format!("transaction id too short ({} bytes)", bytes.len())))?;

   let (key_bytes, rest) = payload.split_at(key_len);
   let (time, rest) = rest.split_at(4);
   let (digest, version) = rest.split_at(DIGEST_PREFIX_LEN);

   let time = u32::from_le_bytes(
      time
         .try_into()
         .map_err(|_| Error::parse("truncated timestamp"))?,
   );
   let digest_prefix = digest
      .try_into()
      .map_err(|_| Error::parse("truncated digest"))?;

   Ok(DecodedTransactionId {
      mask,
      key_bytes: key_bytes.to_vec(),
      time,
      digest_prefix,
      version: version[0],
   })
}
