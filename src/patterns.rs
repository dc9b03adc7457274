//! Regex lookups over raw page and script text.
//!
//! Every lookup returns owned results, so nothing here carries match state
//! between calls.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{
   Error,
   Result,
};

/// `"ondemand.s": "<hash>"` in the home page's chunk map.
static ONDEMAND_HASH: LazyLock<Regex> = LazyLock::new(|| {
   Regex::new(r#"['"]ondemand\.s['"]:\s*['"](\w+)['"]"#).expect("valid on-demand hash pattern")
});

/// `(e[12], 16)` style lookups in the on-demand script.
static KEY_BYTE_INDEX: LazyLock<Regex> =
   LazyLock::new(|| Regex::new(r"\(\w\[(\d{1,2})\],\s*16\)").expect("valid index pattern"));

/// Migration links served instead of the home page to some clients.
#[cfg(feature = "fetch")]
static MIGRATION_URL: LazyLock<Regex> = LazyLock::new(|| {
   Regex::new(r"(https?://(?:www\.)?(?:twitter|x)\.com(?:/x)?/migrate[/?]tok=[A-Za-z0-9%\-_]+)")
      .expect("valid migration pattern")
});

/// Row selector and byte indices pulled from the on-demand script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnDemandIndices {
   /// Key byte whose low nibble picks the frame row.
   pub row:   usize,
   /// Key bytes whose low nibbles multiply into the frame time.
   pub bytes: Vec<usize>,
}

impl OnDemandIndices {
   /// Collects every index lookup in `ondemand_js`. The first one selects the
   /// row, the rest feed the frame time.
   pub fn parse(ondemand_js: &str) -> Result<Self> {
      let found = KEY_BYTE_INDEX
         .captures_iter(ondemand_js)
         .filter_map(|caps| caps.get(1)?.as_str().parse::<usize>().ok())
         .collect::<Vec<_>>();

      match found.split_first() {
         Some((&row, bytes)) if !bytes.is_empty() => Ok(Self {
            row,
            bytes: bytes.to_vec(),
         }),
         _ => Err(Error::extraction(format!(
            "key byte indices (found {} of at least 2)",
            found.len()
         ))),
      }
   }
}

/// Hash of the versioned on-demand script referenced by the home page.
pub fn ondemand_hash(home_page_html: &str) -> Result<&str> {
   if let Some(hash) = ONDEMAND_HASH
      .captures(home_page_html)
      .and_then(|caps| caps.get(1))
   {
      return Ok(hash.as_str());
   }

   let hint = if home_page_html.contains("login") || home_page_html.contains("LoginForm") {
      " (received a login page, cookies may be required)"
   } else if home_page_html.len() < 10_000 {
      " (response too small, possibly rate limited or blocked)"
   } else {
      " (page structure may have changed)"
   };
   Err(Error::extraction(format!("on-demand file hash{hint}")))
}

/// First migration link in `text`.
#[cfg(feature = "fetch")]
pub fn migration_url(text: &str) -> Option<&str> {
   MIGRATION_URL
      .captures(text)
      .and_then(|caps| caps.get(1))
      .map(|url| url.as_str())
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn hash_with_double_quotes() {
      let html = r#"{"vendor":"abc","ondemand.s": "7a8b9c0d","other":"x"}"#;
      assert_eq!(ondemand_hash(html).unwrap(), "7a8b9c0d");
   }

   #[test]
   fn hash_with_single_quotes_and_no_space() {
      let html = "chunks={'ondemand.s':'f00d_1'}";
      assert_eq!(ondemand_hash(html).unwrap(), "f00d_1");
   }

   #[test]
   fn missing_hash_explains_login_pages() {
      let err = ondemand_hash("<form class=\"LoginForm\"></form>").unwrap_err();
      assert!(err.to_string().contains("login page"));

      let err = ondemand_hash("tiny").unwrap_err();
      assert!(err.to_string().contains("too small"));
   }

   #[test]
   fn indices_in_script_order() {
      let js = "n=(e[31], 16),o=(t[2],16),x=parseInt(r[14], 16);y=(e[123], 16)";
      let indices = OnDemandIndices::parse(js).unwrap();
      assert_eq!(indices, OnDemandIndices {
         row:   31,
         bytes: vec![2, 14],
      });
   }

   #[test]
   fn single_index_is_not_enough() {
      OnDemandIndices::parse("a=(e[5], 16)").unwrap_err();
      OnDemandIndices::parse("no indices here").unwrap_err();
   }

   #[test]
   fn repeated_parses_are_independent() {
      let js = "(e[1], 16)(e[2], 16)(e[3], 16)";
      let first = OnDemandIndices::parse(js).unwrap();
      let second = OnDemandIndices::parse(js).unwrap();
      assert_eq!(first, second);
   }

   #[cfg(feature = "fetch")]
   #[test]
   fn migration_links() {
      let meta = r#"<meta http-equiv="refresh" content="0; url = https://twitter.com/x/migrate?tok=7b2265%22-_"/>"#;
      assert_eq!(
         migration_url(meta),
         Some("https://twitter.com/x/migrate?tok=7b2265%22-_")
      );
      assert_eq!(
         migration_url("go to https://www.x.com/migrate/tok=abc now"),
         Some("https://www.x.com/migrate/tok=abc")
      );
      assert_eq!(migration_url("https://x.com/home"), None);
   }
}
