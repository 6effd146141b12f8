//! Line-oriented variant of the renderer.
//!
//! Scans the raw source once, recognising only `#`/`##`/`###` headings,
//! backtick fences and blank-line separated paragraphs. Nothing is parsed as
//! a tree, so a heading marker or fence inside another construct (a
//! blockquote, a list item) is taken at face value.
//!
//! While a fence is open no other construct is recognised: a `# comment`
//! line inside a bash block stays code. A fence left open at the end of the
//! input is closed there.
use log::{debug, trace};

use super::{
  core::{apply_text_passes, code_block_node},
  toc::{CONTENT_CLASS, TOC_CLASS},
  types::RenderOptions,
};
use crate::{
  tree::{DocumentTree, NodeId},
  types::{RenderedDocument, TocEntry},
  utils::{
    AnchorRegistry,
    codeblock::{FenceLine, FenceTracker},
    line_anchor,
  },
};

/// Classify a line as a level 1-3 heading, returning the level and the text.
#[must_use]
pub fn parse_heading(line: &str) -> Option<(u8, &str)> {
  let hashes = line.chars().take_while(|&c| c == '#').count();
  if !(1..=3).contains(&hashes) {
    return None;
  }
  let text = line[hashes..].strip_prefix(' ')?.trim();
  #[allow(
    clippy::cast_possible_truncation,
    reason = "Bounded to 1..=3 above"
  )]
  let level = hashes as u8;
  Some((level, text))
}

/// Accumulates output blocks while the source is scanned.
struct LineRenderer<'o> {
  options:   &'o RenderOptions,
  tree:      DocumentTree,
  content:   NodeId,
  anchors:   AnchorRegistry,
  toc:       Vec<TocEntry>,
  title:     Option<String>,
  paragraph: Vec<String>,
  code:      Option<(String, String)>,
}

impl<'o> LineRenderer<'o> {
  fn new(options: &'o RenderOptions) -> Self {
    let mut tree = DocumentTree::new();
    let content = tree.create_element("div", &[("class", CONTENT_CLASS)]);
    Self {
      options,
      tree,
      content,
      anchors: AnchorRegistry::new(),
      toc: Vec::new(),
      title: None,
      paragraph: Vec::new(),
      code: None,
    }
  }

  fn flush_paragraph(&mut self) {
    if self.paragraph.is_empty() {
      return;
    }
    let text = self.paragraph.join("\n");
    self.paragraph.clear();

    let p = self.tree.create_element("p", &[]);
    let body = self.tree.create_text(text);
    self.tree.append(p, body);
    self.tree.append(self.content, p);
  }

  fn heading(&mut self, level: u8, text: &str) {
    self.flush_paragraph();

    let anchor = self.anchors.unique(&line_anchor(text));
    if level == 1 && self.title.is_none() {
      self.title = Some(text.to_string());
    }

    let tag = format!("h{level}");
    let heading = self.tree.create_element(&tag, &[("id", &anchor)]);
    let body = self.tree.create_text(text);
    self.tree.append(heading, body);
    if self.options.permalink {
      let href = format!("#{anchor}");
      let permalink = self.tree.create_element("a", &[
        ("class", "headerlink"),
        ("href", &href),
        ("title", "Permanent link"),
      ]);
      let pilcrow = self.tree.create_text("¶");
      self.tree.append(permalink, pilcrow);
      self.tree.append(heading, permalink);
    }
    self.tree.append(self.content, heading);

    if self.options.in_toc(level) {
      self.toc.push(TocEntry {
        text: text.to_string(),
        anchor,
        level,
      });
    }
  }

  fn close_fence(&mut self) {
    if let Some((language, literal)) = self.code.take() {
      let block = code_block_node(&mut self.tree, &language, &literal);
      self.tree.append(self.content, block);
    }
  }

  fn line(&mut self, tracker: &mut FenceTracker, line: &str) {
    match tracker.process_line(line) {
      FenceLine::Open(language) => {
        self.flush_paragraph();
        self.code = Some((language, String::new()));
      },
      FenceLine::Close => self.close_fence(),
      FenceLine::Code => {
        if let Some((_, literal)) = self.code.as_mut() {
          literal.push_str(line);
          literal.push('\n');
        }
      },
      FenceLine::Prose => {
        if let Some((level, text)) = parse_heading(line) {
          self.heading(level, text);
        } else if line.trim().is_empty() {
          self.flush_paragraph();
        } else {
          self.paragraph.push(line.trim_end().to_string());
        }
      },
    }
  }

  /// Flat table of contents, each item indented in proportion to its level.
  fn toc_node(&mut self) -> NodeId {
    let container = self.tree.create_element("div", &[("class", TOC_CLASS)]);

    if let Some(title) = self.options.toc_title.as_deref() {
      let span = self.tree.create_element("span", &[("class", "toctitle")]);
      let text = self.tree.create_text(title);
      self.tree.append(span, text);
      self.tree.append(container, span);
    }

    let list = self.tree.create_element("ul", &[]);
    self.tree.append(container, list);

    let base = self.toc.iter().map(|entry| entry.level).min().unwrap_or(1);
    for entry in &self.toc {
      let class = format!("toc-level-{}", entry.level);
      let style = format!("margin-left: {}em", u32::from(entry.level - base));
      let href = format!("#{}", entry.anchor);

      let item = self
        .tree
        .create_element("li", &[("class", &class), ("style", &style)]);
      let link = self.tree.create_element("a", &[("href", &href)]);
      let text = self.tree.create_text(entry.text.as_str());
      self.tree.append(link, text);
      self.tree.append(item, link);
      self.tree.append(list, item);
    }

    container
  }

  fn finish(mut self) -> RenderedDocument {
    self.flush_paragraph();
    if self.code.is_some() {
      trace!("Closing unterminated fence at end of input");
      self.close_fence();
    }

    let toc = self.toc_node();
    let root = self.tree.root();
    self.tree.append(root, toc);
    self.tree.append(root, self.content);

    let (html, code_blocks) =
      apply_text_passes(&self.tree.serialize(), self.options);

    debug!(
      "Rendered document line by line: {} toc entries, {} code blocks",
      self.toc.len(),
      code_blocks
    );

    RenderedDocument {
      html,
      toc: self.toc,
      title: self.title,
      code_blocks,
    }
  }
}

/// Render `markdown` without building a parse tree.
#[must_use]
pub fn render_lines(markdown: &str, options: &RenderOptions) -> RenderedDocument {
  let mut renderer = LineRenderer::new(options);
  let mut tracker = FenceTracker::new();

  for line in markdown.lines() {
    renderer.line(&mut tracker, line);
  }

  renderer.finish()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn options() -> RenderOptions {
    RenderOptions {
      permalink: false,
      ..Default::default()
    }
  }

  #[test]
  fn test_parse_heading_levels() {
    assert_eq!(parse_heading("# Title"), Some((1, "Title")));
    assert_eq!(parse_heading("## Setup Steps"), Some((2, "Setup Steps")));
    assert_eq!(parse_heading("### Deep"), Some((3, "Deep")));
    assert_eq!(parse_heading("#### Too deep"), None);
    assert_eq!(parse_heading("#NoSpace"), None);
    assert_eq!(parse_heading("Not # a heading"), None);
  }

  #[test]
  fn test_heading_anchors() {
    let result = render_lines(
      "# Getting Started Guide\n\n## Setup Steps\n",
      &options(),
    );
    assert_eq!(result.toc, vec![
      TocEntry {
        text:   "Getting Started Guide".to_string(),
        anchor: "getting-started-guide".to_string(),
        level:  1,
      },
      TocEntry {
        text:   "Setup Steps".to_string(),
        anchor: "setup-steps".to_string(),
        level:  2,
      },
    ]);
    assert_eq!(result.title.as_deref(), Some("Getting Started Guide"));
  }

  #[test]
  fn test_hash_lines_inside_fence_are_code() {
    let md = "# Title\n\n```bash\n# install deps\npip install django\n```\n";
    let result = render_lines(md, &options());

    assert_eq!(result.toc.len(), 1);
    assert_eq!(result.code_blocks, 1);
    assert!(
      result
        .html
        .contains("id=\"code-block-1\"># install deps\npip install django\n</code>")
    );
  }

  #[test]
  fn test_unterminated_fence_is_flushed() {
    let result = render_lines("```python\nprint(1)\n", &options());
    assert_eq!(result.code_blocks, 1);
    assert!(result.html.contains("print(1)\n</code>"));
  }

  #[test]
  fn test_paragraphs_are_escaped_and_split() {
    let result = render_lines("a < b\nsecond line\n\nnext", &options());
    assert!(result.html.contains("<p>a &lt; b\nsecond line</p><p>next</p>"));
  }

  #[test]
  fn test_toc_is_flat_and_indented() {
    let result = render_lines("# A\n## B\n### C\n", &options());
    assert!(result.html.starts_with(concat!(
      r#"<div class="sidebar"><ul>"#,
      r##"<li class="toc-level-1" style="margin-left: 0em"><a href="#a">A</a></li>"##,
      r##"<li class="toc-level-2" style="margin-left: 1em"><a href="#b">B</a></li>"##,
      r##"<li class="toc-level-3" style="margin-left: 2em"><a href="#c">C</a></li>"##,
      "</ul></div>"
    )));
  }

  #[test]
  fn test_links_in_paragraphs_open_in_new_tab() {
    let result = render_lines("Docs: https://docs.djangoproject.com\n", &options());
    assert!(result.html.contains(
      r#"<a href="https://docs.djangoproject.com" target="_blank">https://docs.djangoproject.com</a>"#
    ));
  }
}
