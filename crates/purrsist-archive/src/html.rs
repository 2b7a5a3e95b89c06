//! Markup document assembly.
//!
//! Pages and feeds are both written through [`Document`], a thin layer over
//! `quick-xml`'s writer. Element text and attribute values are always
//! escaped; [`Document::raw`] is the one way to embed already-rendered
//! markup (converted markdown bodies).

use std::io::Cursor;

use quick_xml::{
  Writer,
  events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::error::{Error, Result};

pub struct Document {
  writer: Writer<Cursor<Vec<u8>>>,
}

impl Document {
  fn new() -> Self {
    Self { writer: Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2) }
  }

  /// An HTML5 document, starting with its doctype.
  pub fn html() -> Result<Self> {
    let mut doc = Self::new();
    doc.event(Event::DocType(BytesText::from_escaped("html")))?;
    Ok(doc)
  }

  /// An XML document, starting with its `<?xml?>` declaration.
  pub fn xml() -> Result<Self> {
    let mut doc = Self::new();
    doc.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    Ok(doc)
  }

  fn event(&mut self, event: Event<'_>) -> Result<()> {
    self
      .writer
      .write_event(event)
      .map_err(|e| Error::Markup(e.to_string()))
  }

  pub fn start(&mut self, tag: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut el = BytesStart::new(tag);
    for (k, v) in attrs {
      el.push_attribute((*k, *v));
    }
    self.event(Event::Start(el))
  }

  pub fn end(&mut self, tag: &str) -> Result<()> {
    self.event(Event::End(BytesEnd::new(tag)))
  }

  /// `<tag attrs...>` then `body`, then `</tag>`.
  pub fn elem<F>(&mut self, tag: &str, attrs: &[(&str, &str)], body: F) -> Result<()>
  where
    F: FnOnce(&mut Self) -> Result<()>,
  {
    self.start(tag, attrs)?;
    body(self)?;
    self.end(tag)
  }

  pub fn text_elem(&mut self, tag: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
    self.start(tag, attrs)?;
    self.text(text)?;
    self.end(tag)
  }

  /// A self-closing element such as `<meta/>` or `<img/>`.
  pub fn void(&mut self, tag: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut el = BytesStart::new(tag);
    for (k, v) in attrs {
      el.push_attribute((*k, *v));
    }
    self.event(Event::Empty(el))
  }

  pub fn text(&mut self, text: &str) -> Result<()> {
    self.event(Event::Text(BytesText::new(text)))
  }

  /// Embed pre-rendered markup verbatim.
  pub fn raw(&mut self, markup: &str) -> Result<()> {
    self.event(Event::Text(BytesText::from_escaped(markup)))
  }

  pub fn finish(self) -> String {
    let bytes = self.writer.into_inner().into_inner();
    // Every event written above came from `&str` input.
    String::from_utf8_lossy(&bytes).into_owned()
  }
}

/// Escape `text` for use as element content.
pub fn escape(text: &str) -> String { quick_xml::escape::escape(text).into_owned() }
