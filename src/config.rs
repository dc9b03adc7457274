//! Endpoints and request settings for session initialization.

/// Home page that embeds the verification key and loading animations.
pub const DEFAULT_HOME_URL: &str = "https://x.com";

/// Directory serving the versioned `ondemand.s.*.js` scripts.
pub const DEFAULT_ONDEMAND_BASE_URL: &str = "https://abs.twimg.com/responsive-web/client-web";

/// Desktop Chrome, matching the browser the ids are meant to come from.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                                      (KHTML, like Gecko) Chrome/133.0.0.0 Safari/537.36";

/// Where and how the home page and on-demand script are fetched.
///
/// ```
/// use xclient_txid::Config;
///
/// let config = Config::default()
///    .with_home_url("https://twitter.com")
///    .with_follow_migration(false);
/// assert_eq!(config.home_url, "https://twitter.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
   pub home_url:          String,
   pub ondemand_base_url: String,
   pub user_agent:        String,
   /// Follow meta-refresh and form based migration pages served in place of
   /// the home page.
   pub follow_migration:  bool,
}

impl Default for Config {
   fn default() -> Self {
      Self {
         home_url:          DEFAULT_HOME_URL.to_owned(),
         ondemand_base_url: DEFAULT_ONDEMAND_BASE_URL.to_owned(),
         user_agent:        DEFAULT_USER_AGENT.to_owned(),
         follow_migration:  true,
      }
   }
}

impl Config {
   #[must_use]
   pub fn with_home_url(mut self, url: impl Into<String>) -> Self {
      self.home_url = url.into();
      self
   }

   #[must_use]
   pub fn with_ondemand_base_url(mut self, url: impl Into<String>) -> Self {
      self.ondemand_base_url = url.into();
      self
   }

   #[must_use]
   pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
      self.user_agent = user_agent.into();
      self
   }

   #[must_use]
   pub fn with_follow_migration(mut self, follow: bool) -> Self {
      self.follow_migration = follow;
      self
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn defaults_point_at_the_live_client() {
      let config = Config::default();
      assert_eq!(config.home_url, "https://x.com");
      assert!(config.ondemand_base_url.ends_with("/client-web"));
      assert!(config.user_agent.contains("Chrome/133"));
      assert!(config.follow_migration);
   }

   #[test]
   fn builders_override_fields() {
      let config = Config::default()
         .with_ondemand_base_url("http://127.0.0.1:8080/js")
         .with_user_agent("test-agent");
      assert_eq!(config.ondemand_base_url, "http://127.0.0.1:8080/js");
      assert_eq!(config.user_agent, "test-agent");
      assert_eq!(config.home_url, DEFAULT_HOME_URL);
   }
}
