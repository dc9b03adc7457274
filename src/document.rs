//! Narrow, typed access to the home page markup.
//!
//! Key derivation only needs a handful of lookups, so it talks to the page
//! through [`Document`] instead of a particular HTML library. [`HtmlDocument`]
//! is the implementation backed by `scraper`.

use scraper::{
   ElementRef,
   Html,
   Selector,
};

/// The lookups key derivation performs on a parsed page.
pub trait Document {
   /// Handle to one element of the document.
   type Node<'doc>: Copy
   where
      Self: 'doc;

   /// `content` attribute of the first element whose `name` attribute equals
   /// `name`.
   fn meta_content(&self, name: &str) -> Option<&str>;

   /// Every element whose `id` starts with `prefix`, in document order.
   fn elements_by_id_prefix(&self, prefix: &str) -> Vec<Self::Node<'_>>;

   /// Element children of `node`, skipping text and comments.
   fn children<'doc>(&'doc self, node: Self::Node<'doc>) -> Vec<Self::Node<'doc>>;

   /// Value of attribute `name` on `node`.
   fn attribute<'doc>(&'doc self, node: Self::Node<'doc>, name: &str) -> Option<&'doc str>;
}

/// A home page parsed with `scraper`.
#[derive(Debug)]
pub struct HtmlDocument {
   html: Html,
}

impl HtmlDocument {
   pub fn parse(source: &str) -> Self {
      Self {
         html: Html::parse_document(source),
      }
   }

   fn select_all(&self, css: &str) -> Vec<ElementRef<'_>> {
      Selector::parse(css).map_or_else(
         |_| Vec::new(),
         |selector| self.html.select(&selector).collect(),
      )
   }

   /// Serialized `<meta http-equiv="refresh">` tag, if the page has one.
   #[cfg(feature = "fetch")]
   pub(crate) fn meta_refresh(&self) -> Option<String> {
      self
         .select_all(r#"meta[http-equiv="refresh"]"#)
         .first()
         .map(ElementRef::html)
   }

   /// The first form matching one of `selectors`, tried in order.
   #[cfg(feature = "fetch")]
   pub(crate) fn form(&self, selectors: &[&str]) -> Option<Form> {
      let form = selectors
         .iter()
         .find_map(|css| self.select_all(css).into_iter().next())?;

      let fields: Vec<(String, String)> = Selector::parse("input")
         .map(|input| {
            form
               .select(&input)
               .filter_map(|field| {
                  let name = field.value().attr("name")?;
                  let value = field.value().attr("value").unwrap_or_default();
                  Some((name.to_owned(), value.to_owned()))
               })
               .collect()
         })
         .unwrap_or_default();

      Some(Form {
         action: form.value().attr("action").map(ToOwned::to_owned),
         method: form.value().attr("method").map(ToOwned::to_owned),
         fields,
      })
   }
}

impl Document for HtmlDocument {
   type Node<'doc> = ElementRef<'doc>;

   fn meta_content(&self, name: &str) -> Option<&str> {
      let named = self
         .select_all("[name]")
         .into_iter()
         .find(|element| element.value().attr("name") == Some(name))?;
      named.value().attr("content")
   }

   fn elements_by_id_prefix(&self, prefix: &str) -> Vec<ElementRef<'_>> {
      self
         .select_all("[id]")
         .into_iter()
         .filter(|element| {
            element
               .value()
               .id()
               .is_some_and(|id| id.starts_with(prefix))
         })
         .collect()
   }

   fn children<'doc>(&'doc self, node: ElementRef<'doc>) -> Vec<ElementRef<'doc>> {
      node.children().filter_map(ElementRef::wrap).collect()
   }

   fn attribute<'doc>(&'doc self, node: ElementRef<'doc>, name: &str) -> Option<&'doc str> {
      node.value().attr(name)
   }
}

/// Name/value pairs of a form's inputs, ready to be resubmitted.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Form {
   pub action: Option<String>,
   pub method: Option<String>,
   pub fields: Vec<(String, String)>,
}
