//! Blocking retrieval of the home page and on-demand script.
//!
//! Some clients get a migration page instead of the home page, either as a
//! meta refresh to a `migrate?tok=` link or as an auto-submitting form. Both
//! are followed once before the on-demand script is located. Nothing is
//! retried; the first failed request aborts initialization.

use url::form_urlencoded;

use crate::{
   config::Config,
   document::HtmlDocument,
   error::{
      Error,
      Result,
   },
   patterns::migration_url,
   transaction::ClientTransaction,
};

/// Where the migration form posts when it names no action.
const MIGRATE_ACTION: &str = "https://x.com/x/migrate";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Raw inputs for [`ClientTransaction::new`].
#[derive(Debug, Clone)]
pub struct Pages {
   pub home_page:   String,
   pub ondemand_js: String,
}

/// One request made during session initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
   Get(String),
   /// Form submission with an urlencoded body.
   Post { url: String, body: String },
}

impl Request {
   pub fn url(&self) -> &str {
      match self {
         Self::Get(url) | Self::Post { url, .. } => url,
      }
   }

   pub const fn content_type(&self) -> Option<&'static str> {
      match self {
         Self::Get(_) => None,
         Self::Post { .. } => Some(FORM_CONTENT_TYPE),
      }
   }
}

/// Fetches the (possibly migrated) home page and the on-demand script it
/// references.
pub fn fetch_pages(config: &Config) -> Result<Pages> {
   let mut transport = |request: &Request| send(config, request);

   let home_page = home_page(config, &mut transport)?;
   let ondemand_url = ClientTransaction::ondemand_url(&home_page, &config.ondemand_base_url)?;
   let ondemand_js = transport(&Request::Get(ondemand_url))?;

   Ok(Pages {
      home_page,
      ondemand_js,
   })
}

/// Home page body after any migration steps `config` allows.
fn home_page<F>(config: &Config, transport: &mut F) -> Result<String>
where
   F: FnMut(&Request) -> Result<String>,
{
   let html = transport(&Request::Get(config.home_url.clone()))?;
   if !config.follow_migration {
      return Ok(html);
   }
   follow_migration(html, transport)
}

fn follow_migration<F>(mut html: String, transport: &mut F) -> Result<String>
where
   F: FnMut(&Request) -> Result<String>,
{
   if let Some(url) = redirect_url(&html) {
      tracing::info!(%url, "following migration redirect");
      html = transport(&Request::Get(url))?;
   }

   match form_submission(&html) {
      Some(request) => {
         tracing::info!(url = request.url(), "submitting migration form");
         transport(&request)
      },
      None => Ok(html),
   }
}

/// Migration link from a meta refresh tag, else from anywhere in the page.
fn redirect_url(html: &str) -> Option<String> {
   HtmlDocument::parse(html)
      .meta_refresh()
      .and_then(|tag| migration_url(&tag).map(ToOwned::to_owned))
      .or_else(|| migration_url(html).map(ToOwned::to_owned))
}

/// Resubmission of the migration form, if the page has one.
fn form_submission(html: &str) -> Option<Request> {
   let by_action = format!(r#"form[action="{MIGRATE_ACTION}"]"#);
   let form = HtmlDocument::parse(html).form(&[r#"form[name="f"]"#, by_action.as_str()])?;

   let action = form
      .action
      .as_deref()
      .filter(|action| !action.is_empty())
      .unwrap_or(MIGRATE_ACTION);
   let query = form_urlencoded::Serializer::new(String::new())
      .extend_pairs(&form.fields)
      .finish();

   let is_get = form
      .method
      .as_deref()
      .is_some_and(|method| method.eq_ignore_ascii_case("GET"));

   Some(if is_get {
      Request::Get(format!("{action}?{query}"))
   } else {
      Request::Post {
         url:  action.to_owned(),
         body: query,
      }
   })
}

fn send(config: &Config, request: &Request) -> Result<String> {
   tracing::info!(url = request.url(), "fetching");

   let response = match request {
      Request::Get(url) => minreq::get(url.as_str()),
      Request::Post { url, body } => minreq::post(url.as_str()).with_body(body.as_str()),
   }
   .with_header("User-Agent", config.user_agent.as_str());

   let response = match request.content_type() {
      Some(content_type) => response.with_header("Content-Type", content_type),
      None => response,
   }
   .send()?;

   read_body(response, request.url())
}

fn read_body(response: minreq::Response, url: &str) -> Result<String> {
   if response.status_code != 200 {
      return Err(Error::HttpStatus {
         status: response.status_code,
         url:    url.to_owned(),
      });
   }

   let body = response.as_str()?.to_owned();
   tracing::debug!(url, bytes = body.len(), "fetched");
   Ok(body)
}

#[cfg(test)]
mod tests {
   use super::*;

   const HOME: &str = "<html><body>home</body></html>";

   /// Serves canned bodies by exact URL and records every request.
   fn serve<'a>(
      routes: &'a [(&'a str, &'a str)],
      log: &'a mut Vec<Request>,
   ) -> impl FnMut(&Request) -> Result<String> + 'a {
      move |request| {
         log.push(request.clone());
         routes
            .iter()
            .find(|(url, _)| request.url() == *url)
            .map(|(_, body)| (*body).to_owned())
            .ok_or_else(|| Error::parse(format!("no route for {}", request.url())))
      }
   }

   #[test]
   fn meta_refresh_wins_over_links_in_the_page() {
      let html = r#"<html><head>
         <script>var next = "https://twitter.com/migrate?tok=fromscript";</script>
         <meta http-equiv="refresh" content="0; url=https://x.com/x/migrate?tok=frommeta"/>
         </head><body></body></html>"#;
      assert_eq!(
         redirect_url(html).as_deref(),
         Some("https://x.com/x/migrate?tok=frommeta")
      );
   }

   #[test]
   fn page_links_are_the_fallback() {
      let html = r#"<html><body><a href="https://www.x.com/migrate/tok=abc_1">go</a></body></html>"#;
      assert_eq!(
         redirect_url(html).as_deref(),
         Some("https://www.x.com/migrate/tok=abc_1")
      );
      assert_eq!(redirect_url(HOME), None);
   }

   #[test]
   fn named_form_wins_over_action_match() {
      let html = r#"<html><body>
         <form action="https://x.com/x/migrate"><input name="which" value="action"/></form>
         <form name="f" action="https://x.com/x/other"><input name="which" value="named"/></form>
         </body></html>"#;
      assert_eq!(form_submission(html), Some(Request::Post {
         url:  "https://x.com/x/other".to_owned(),
         body: "which=named".to_owned(),
      }));
   }

   #[test]
   fn form_matched_by_action_alone() {
      let html = r#"<form action="https://x.com/x/migrate" method="post">
         <input name="tok" value="a b"/></form>"#;
      assert_eq!(form_submission(html), Some(Request::Post {
         url:  MIGRATE_ACTION.to_owned(),
         body: "tok=a+b".to_owned(),
      }));
      assert_eq!(form_submission(HOME), None);
   }

   #[test]
   fn get_forms_use_a_query_string() {
      let html = r#"<form name="f" action="https://x.com/x/migrate" method="get">
         <input name="tok" value="t1"/><input name="data" value="d&amp;2"/></form>"#;
      let request = form_submission(html).unwrap();
      assert_eq!(
         request,
         Request::Get("https://x.com/x/migrate?tok=t1&data=d%262".to_owned())
      );
      assert_eq!(request.content_type(), None);
   }

   #[test]
   fn empty_or_missing_action_posts_to_default() {
      let empty = r#"<form name="f" action="" method=""><input name="tok" value="t"/></form>"#;
      let missing = r#"<form name="f"><input name="tok" value="t"/></form>"#;

      for html in [empty, missing] {
         let request = form_submission(html).unwrap();
         assert_eq!(request, Request::Post {
            url:  MIGRATE_ACTION.to_owned(),
            body: "tok=t".to_owned(),
         });
         assert_eq!(request.content_type(), Some(FORM_CONTENT_TYPE));
      }
   }

   #[test]
   fn migration_follows_redirect_then_form() {
      let redirect = r#"<meta http-equiv="refresh" content="0; url=https://x.com/x/migrate?tok=abc"/>"#;
      let form = r#"<form name="f" action="https://x.com/x/migrate"><input name="tok" value="abc"/></form>"#;
      let routes = [
         ("https://x.com", redirect),
         ("https://x.com/x/migrate?tok=abc", form),
         ("https://x.com/x/migrate", HOME),
      ];
      let mut log = Vec::new();

      let html = home_page(&Config::default(), &mut serve(&routes, &mut log)).unwrap();

      assert_eq!(html, HOME);
      assert_eq!(log, vec![
         Request::Get("https://x.com".to_owned()),
         Request::Get("https://x.com/x/migrate?tok=abc".to_owned()),
         Request::Post {
            url:  MIGRATE_ACTION.to_owned(),
            body: "tok=abc".to_owned(),
         },
      ]);
   }

   #[test]
   fn disabled_migration_returns_the_first_page() {
      let redirect = r#"<meta http-equiv="refresh" content="0; url=https://x.com/x/migrate?tok=abc"/>"#;
      let routes = [("https://x.com", redirect)];
      let mut log = Vec::new();

      let config = Config::default().with_follow_migration(false);
      let html = home_page(&config, &mut serve(&routes, &mut log)).unwrap();

      assert_eq!(html, redirect);
      assert_eq!(log, vec![Request::Get("https://x.com".to_owned())]);
   }

   #[test]
   fn plain_home_page_needs_one_request() {
      let routes = [("https://x.com", HOME)];
      let mut log = Vec::new();

      let html = home_page(&Config::default(), &mut serve(&routes, &mut log)).unwrap();

      assert_eq!(html, HOME);
      assert_eq!(log.len(), 1);
   }

   #[test]
   fn transport_errors_abort_migration() {
      let redirect = r#"<meta http-equiv="refresh" content="0; url=https://x.com/x/migrate?tok=abc"/>"#;
      let routes = [("https://x.com", redirect)];
      let mut log = Vec::new();

      let err = home_page(&Config::default(), &mut serve(&routes, &mut log)).unwrap_err();

      assert!(matches!(err, Error::Parse(_)));
      assert_eq!(log.len(), 2);
   }
}
