//! Body classification: markdown or literal text.

use std::sync::LazyLock;

use pulldown_cmark::{Event, Options, Parser};
use regex::RegexSet;

use crate::html::escape;

static FORMATTING: LazyLock<RegexSet> = LazyLock::new(|| {
  RegexSet::new([
    // ATX heading
    r"(?m)^#{1,6} +\S",
    // setext heading: a line of words underlined with = or -
    r"(?m)^[\w \t]*\w[\w \t]*\r?\n(?:=+|-+)[ \t]*\r?$",
    // image
    r"!\[[^\[\]]+\]\([^)\s]+\)",
    // link
    r"\[[^\[\]]+\]\([^)\s]+\)",
    // strong emphasis
    r"\*\*[^*\n]+\*\*|__[^_\n]+__",
    // fenced code
    r"(?s)```.*?```",
    // inline code
    r"`[^`\n]+`",
  ])
  .expect("formatting patterns are valid")
});

/// Heuristic check for markdown formatting. Misclassification only changes
/// how a body is displayed.
pub fn is_formatted(text: &str) -> bool { FORMATTING.is_match(text) }

/// Convert markdown to HTML. Raw HTML in the source is escaped, never passed
/// through.
pub fn markdown_to_html(text: &str) -> String {
  let parser = Parser::new_ext(text, Options::ENABLE_HEADING_ATTRIBUTES).map(|event| {
    match event {
      Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
      other => other,
    }
  });
  let mut out = String::with_capacity(text.len() * 3 / 2);
  pulldown_cmark::html::push_html(&mut out, parser);
  out
}

/// Render a thread or post body as HTML.
pub fn render_body(text: &str) -> String {
  if is_formatted(text) {
    markdown_to_html(text)
  } else {
    format!("<pre>{}</pre>", escape(text))
  }
}
