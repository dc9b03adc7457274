//! Generate X (Twitter) client transaction IDs.
//!
//! ```ignore
//! use xclient_txid::ClientTransaction;
//!
//! let client = ClientTransaction::fetch()?;
//! let id = client.generate_transaction_id("GET", "/i/api/1.1/jot/client_event.json");
//! ```
//!
//! To bring your own HTTP client:
//!
//! ```ignore
//! use xclient_txid::ClientTransaction;
//!
//! let html = your_client.get("https://x.com").text()?;
//! let js_url = ClientTransaction::extract_ondemand_url(&html)?;
//! let js = your_client.get(&js_url).text()?;
//! let client = ClientTransaction::new(&html, &js)?;
//! ```
//!
//! Ids for a fixed time and mask byte are reproducible:
//!
//! ```
//! use xclient_txid::{ClientTransaction, decode_transaction_id};
//!
//! let client = ClientTransaction::from_parts(vec![0; 32], "abc123");
//! let id = client.generate_transaction_id_with("GET", "/i/api/graphql/XYZ", Some(0), &|| 7);
//! assert_eq!(decode_transaction_id(&id)?.mask, 7);
//! # Ok::<(), xclient_txid::Error>(())
//! ```

mod animation;
mod config;
mod cubic_curve;
mod document;
mod error;
#[cfg(feature = "fetch")]
mod fetch;
mod frames;
mod interpolate;
mod key;
mod numeric;
mod patterns;
mod random;
mod rotation;
mod transaction;

pub use config::Config;
pub use cubic_curve::CubicBezier;
pub use document::{
   Document,
   HtmlDocument,
};
pub use error::{
   Error,
   Result,
};
pub use patterns::OnDemandIndices;
pub use random::{
   ByteSource,
   ThreadRandom,
};
pub use transaction::{
   ClientTransaction,
   DecodedTransactionId,
   client_time,
   decode_transaction_id,
};
