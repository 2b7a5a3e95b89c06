//! Page chrome shared by thread pages and indexes.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::{error::Result, html::Document};

pub const GENERATOR: &str = concat!("aether-purrsist ", env!("CARGO_PKG_VERSION"));
pub const AETHER_URL: &str = "https://getaether.net";

const DATE_FORMAT: &str = "%d-%m-%Y %I:%M %p";

pub fn format_date(at: DateTime<Utc>) -> String { at.format(DATE_FORMAT).to_string() }

pub fn author_label(name: Option<&str>) -> String {
  match name {
    Some(name) => format!("@{name}"),
    None => "Unknown user".to_string(),
  }
}

/// `<head>` with the given title. `root` is the relative path from the page
/// to the snapshot root (`""`, `"../"`, `"../../"`).
pub fn head(doc: &mut Document, title: &str, root: &str) -> Result<()> {
  let style = format!("{root}style.css");
  let aether = format!("{root}aether.css");
  doc.elem("head", &[], |doc| {
    doc.void("meta", &[("charset", "UTF-8")])?;
    doc.void("meta", &[
      ("name", "viewport"),
      ("content", "width=device-width, initial-scale=1"),
    ])?;
    doc.void("meta", &[("name", "generator"), ("content", GENERATOR)])?;
    doc.text_elem("title", &[], title)?;
    doc.void("link", &[("rel", "stylesheet"), ("href", style.as_str())])?;
    doc.void("link", &[("rel", "stylesheet"), ("href", aether.as_str())])
  })
}

/// Generation time and tool attribution.
pub fn footer(doc: &mut Document, generated: DateTime<Utc>) -> Result<()> {
  let stamp = generated.to_rfc3339_opts(SecondsFormat::Secs, true);
  doc.elem("footer", &[], |doc| {
    doc.elem("p", &[], |doc| {
      doc.text("Generated ")?;
      doc.text_elem("time", &[("datetime", stamp.as_str())], &stamp)?;
      doc.text(" by ")?;
      doc.text_elem("a", &[("href", AETHER_URL)], GENERATOR)
    })
  })
}
