//! Textual passes applied to the serialized HTML.
//!
//! These work on text rather than on the tree. Matching is done with regular
//! expressions and a small tag scanner, so constructs that are malformed or
//! nested in unusual ways can be matched where a tree-aware pass would not
//! match them.
use std::{fmt::Write, sync::LazyLock};

use log::{debug, error};
use regex::{Captures, Regex};

use crate::utils::never_matching_regex;

/// Opening tag of the table of contents container.
pub const TOC_OPEN_TAG: &str = r#"<div class="toc">"#;

/// Opening tag the table of contents container is relabeled to.
pub const SIDEBAR_OPEN_TAG: &str = r#"<div class="sidebar">"#;

/// Prefix of the identifiers assigned to decorated code blocks.
pub const CODE_BLOCK_ID_PREFIX: &str = "code-block-";

static HIGHLIGHTED_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r#"(?s)<pre class="highlight"><code class="language-([^"]*)"([^>]*)>(.*?)</code></pre>"#,
  )
  .unwrap_or_else(|e| {
    error!("Failed to compile HIGHLIGHTED_BLOCK_RE regex: {e}");
    never_matching_regex()
  })
});

static CODE_BLOCK_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"<code\s(?:[^>]*\s)?id="code-block-(\d+)""#).unwrap_or_else(|e| {
    error!("Failed to compile CODE_BLOCK_ID_RE regex: {e}");
    never_matching_regex()
  })
});

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"<[^>]*>").unwrap_or_else(|e| {
    error!("Failed to compile TAG_RE regex: {e}");
    never_matching_regex()
  })
});

static BARE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"https?://[^\s<>"]+"#).unwrap_or_else(|e| {
    error!("Failed to compile BARE_URL_RE regex: {e}");
    never_matching_regex()
  })
});

static EXTERNAL_HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"\shref="https?://"#).unwrap_or_else(|e| {
    error!("Failed to compile EXTERNAL_HREF_RE regex: {e}");
    never_matching_regex()
  })
});

static TARGET_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\starget\s*=").unwrap_or_else(|e| {
    error!("Failed to compile TARGET_ATTR_RE regex: {e}");
    never_matching_regex()
  })
});

/// Relabel the table of contents container as the sidebar.
///
/// Only the first `<div class="toc">` is replaced; the match is exact and
/// case-sensitive.
#[must_use]
pub fn relabel_sidebar(html: &str) -> String {
  html.replacen(TOC_OPEN_TAG, SIDEBAR_OPEN_TAG, 1)
}

/// Per-render counter for code block identifiers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CodeBlockRegistry {
  count: usize,
}

impl CodeBlockRegistry {
  #[must_use]
  pub const fn new() -> Self {
    Self { count: 0 }
  }

  /// Identifier for the next code block.
  pub fn next_id(&mut self) -> String {
    self.count += 1;
    format!("{CODE_BLOCK_ID_PREFIX}{}", self.count)
  }

  /// Number of identifiers handed out so far.
  #[must_use]
  pub const fn count(&self) -> usize {
    self.count
  }

  /// Skip past identifiers that are already present on `<code>` elements in
  /// `html`, so that numbering continues after the highest existing
  /// `code-block-<n>`.
  fn skip_existing(&mut self, html: &str) {
    let highest = CODE_BLOCK_ID_RE
      .captures_iter(html)
      .filter_map(|caps| caps[1].parse::<usize>().ok())
      .max()
      .unwrap_or(0);
    self.count = self.count.max(highest);
  }
}

/// Append a copy button to every highlighted code block.
///
/// The n-th undecorated block gets `id="code-block-<n>"` on its `<code>`
/// element and is followed by a button calling `copyCode` with that id. Blocks
/// that already carry an `id` are left alone. The code itself is copied
/// through untouched.
pub fn decorate_code_blocks(
  html: &str,
  registry: &mut CodeBlockRegistry,
  label: &str,
) -> String {
  registry.skip_existing(html);
  let label = html_escape::encode_text(label);

  let decorated = HIGHLIGHTED_BLOCK_RE.replace_all(html, |caps: &Captures| {
    let language = &caps[1];
    let attrs = &caps[2];
    let code = &caps[3];

    if attrs.contains("id=") {
      return caps[0].to_string();
    }

    let id = registry.next_id();
    format!(
      "<div class=\"code-container\"><pre class=\"highlight\"><code \
       class=\"language-{language}\" id=\"{id}\"{attrs}>{code}</code></pre><button \
       class=\"copy-button\" onclick=\"copyCode('{id}')\">{label}</button></div>"
    )
  });

  debug!("Decorated code blocks, {} ids assigned", registry.count());
  decorated.into_owned()
}

/// Trailing characters that end a sentence rather than a URL.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];

/// Rewrite external links to open in a new browsing context.
///
/// Bare `http://` and `https://` URLs in text become
/// `<a href="…" target="_blank">…</a>`, and existing links to such URLs gain
/// `target="_blank"`. Text inside `<code>` spans and inside existing anchors
/// is not rewritten; nesting is tracked by counting tags, so unbalanced markup
/// can defeat the exclusion.
#[must_use]
pub fn rewrite_external_links(html: &str) -> String {
  let mut out = String::with_capacity(html.len() + html.len() / 8);
  let mut code_depth = 0usize;
  let mut anchor_depth = 0usize;
  let mut last = 0;

  for tag in TAG_RE.find_iter(html) {
    let text = &html[last..tag.start()];
    if code_depth == 0 && anchor_depth == 0 {
      link_bare_urls(text, &mut out);
    } else {
      out.push_str(text);
    }

    let raw = tag.as_str();
    match tag_name(raw) {
      ("code", false) => {
        code_depth += 1;
        out.push_str(raw);
      },
      ("code", true) => {
        code_depth = code_depth.saturating_sub(1);
        out.push_str(raw);
      },
      ("a", false) => {
        anchor_depth += 1;
        out.push_str(&add_blank_target(raw));
      },
      ("a", true) => {
        anchor_depth = anchor_depth.saturating_sub(1);
        out.push_str(raw);
      },
      _ => out.push_str(raw),
    }
    last = tag.end();
  }

  let rest = &html[last..];
  if code_depth == 0 && anchor_depth == 0 {
    link_bare_urls(rest, &mut out);
  } else {
    out.push_str(rest);
  }

  out
}

/// Name of a tag and whether it is a closing tag. `code` and `a` are matched
/// case-insensitively.
fn tag_name(raw: &str) -> (&str, bool) {
  let inner = raw.trim_start_matches('<');
  let (closing, inner) = inner
    .strip_prefix('/')
    .map_or((false, inner), |rest| (true, rest));
  let end = inner
    .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
    .unwrap_or(inner.len());
  let name = &inner[..end];
  if name.eq_ignore_ascii_case("code") {
    ("code", closing)
  } else if name.eq_ignore_ascii_case("a") {
    ("a", closing)
  } else {
    (name, closing)
  }
}

/// Add `target="_blank"` to an opening `<a>` tag pointing at an external URL.
fn add_blank_target(raw: &str) -> String {
  if !EXTERNAL_HREF_RE.is_match(raw) || TARGET_ATTR_RE.is_match(raw) {
    return raw.to_string();
  }
  let body = raw.trim_end_matches('>');
  format!("{body} target=\"_blank\">")
}

fn link_bare_urls(text: &str, out: &mut String) {
  let mut last = 0;
  for found in BARE_URL_RE.find_iter(text) {
    let url = found.as_str().trim_end_matches(TRAILING_PUNCTUATION);
    if url.len() <= "https://".len() {
      continue;
    }
    out.push_str(&text[last..found.start()]);
    // Writing to String is infallible
    let _ = write!(out, r#"<a href="{url}" target="_blank">{url}</a>"#);
    last = found.start() + url.len();
  }
  out.push_str(&text[last..]);
}
