use std::collections::HashMap;
pub mod codeblock;

use regex::Regex;

use crate::processor::passes::CODE_BLOCK_ID_PREFIX;

/// Slugify heading text for use as an anchor ID.
/// Converts to lowercase, replaces non-alphanumeric characters with dashes,
/// collapses repeated dashes and trims leading/trailing dashes.
#[must_use]
pub fn slugify(text: &str) -> String {
  let replaced = text
    .to_lowercase()
    .replace(|c: char| !c.is_alphanumeric() && c != '-' && c != '_', "-");

  let mut slug = String::with_capacity(replaced.len());
  for c in replaced.chars() {
    if c == '-' && slug.ends_with('-') {
      continue;
    }
    slug.push(c);
  }
  slug.trim_matches('-').to_string()
}

/// Anchor for the line-oriented variant: lower-cased heading text with every
/// run of whitespace collapsed to a single dash.
#[must_use]
pub fn line_anchor(text: &str) -> String {
  text
    .split_whitespace()
    .collect::<Vec<_>>()
    .join("-")
    .to_lowercase()
}

/// Hands out anchor IDs that are unique within one document.
///
/// The first request for a slug returns it unchanged, later requests append
/// `-1`, `-2`, ... skipping any value that was already handed out. Slugs in
/// the `code-block-` namespace are prefixed with `section-`, since those ids
/// belong to decorated code blocks.
#[derive(Debug, Default)]
pub struct AnchorRegistry {
  seen: HashMap<String, usize>,
}

impl AnchorRegistry {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Reserve a unique anchor derived from `slug`.
  pub fn unique(&mut self, slug: &str) -> String {
    let base = if slug.is_empty() {
      "section".to_string()
    } else if slug.starts_with(CODE_BLOCK_ID_PREFIX) {
      format!("section-{slug}")
    } else {
      slug.to_string()
    };

    let Some(count) = self.seen.get(&base).copied() else {
      self.seen.insert(base.clone(), 0);
      return base;
    };

    let mut n = count + 1;
    loop {
      let candidate = format!("{base}-{n}");
      if !self.seen.contains_key(&candidate) {
        self.seen.insert(base, n);
        self.seen.insert(candidate.clone(), 0);
        return candidate;
      }
      n += 1;
    }
  }
}

/// Create a regex that never matches anything.
///
/// Used as a fallback when a static pattern fails to compile; the pass using
/// it then leaves its input unchanged.
///
/// # Panics
///
/// Panics if the fallback pattern itself fails to compile, which should never
/// happen.
#[must_use]
#[allow(clippy::expect_used, reason = "This pattern is guaranteed to be valid")]
pub fn never_matching_regex() -> Regex {
  Regex::new(r"[^\s\S]").expect("regex pattern [^\\s\\S] should always compile")
}
