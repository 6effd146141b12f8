//! Core implementation of the document processor.
//!
//! Parses the source with comrak, builds the arena tree with anchored
//! headings and highlighted code blocks, inserts the table of contents and
//! splits off the content region before handing the serialized HTML to the
//! textual passes.
use comrak::{
  Arena,
  nodes::{AstNode, NodeHeading, NodeHtmlBlock, NodeValue},
  options::Options,
  parse_document,
};
use log::{debug, trace};

use super::{
  lines::render_lines,
  passes::{
    CodeBlockRegistry,
    decorate_code_blocks,
    relabel_sidebar,
    rewrite_external_links,
  },
  toc::{build_toc, wrap_content},
  types::{DocumentProcessor, RenderMode, RenderOptions},
};
use crate::{
  tree::{DocumentTree, NodeId},
  types::{RenderedDocument, TocEntry},
  utils::{AnchorRegistry, slugify},
};

impl DocumentProcessor {
  /// Create a new `DocumentProcessor` with the given options.
  #[must_use]
  pub const fn new(options: RenderOptions) -> Self {
    Self { options }
  }

  /// Access processor options.
  #[must_use]
  pub const fn options(&self) -> &RenderOptions {
    &self.options
  }

  /// Render Markdown to the page body: sidebar followed by content region.
  #[must_use]
  pub fn render(&self, markdown: &str) -> RenderedDocument {
    match self.options.mode {
      RenderMode::Tree => self.render_tree(markdown),
      RenderMode::Lines => render_lines(markdown, &self.options),
    }
  }

  fn render_tree(&self, markdown: &str) -> RenderedDocument {
    let (mut tree, toc) = self.build_tree(markdown);
    wrap_content(&mut tree);

    let title = toc_title(&toc);
    let (html, code_blocks) =
      apply_text_passes(&tree.serialize(), &self.options);

    debug!(
      "Rendered document: {} toc entries, {} code blocks",
      toc.len(),
      code_blocks
    );

    RenderedDocument {
      html,
      toc,
      title: title.or_else(|| self.first_h1(markdown)),
      code_blocks,
    }
  }

  /// Parse `markdown` and build the document tree.
  ///
  /// The returned tree has the table of contents container as its first
  /// child, followed by the document's top-level blocks in order. The content
  /// region is not split off yet; see [`wrap_content`].
  #[must_use]
  pub fn build_tree(&self, markdown: &str) -> (DocumentTree, Vec<TocEntry>) {
    let arena = Arena::new();
    let options = self.comrak_options();
    let root = parse_document(&arena, markdown, &options);
    highlight_nested_fences(root);

    let mut tree = DocumentTree::new();
    let mut anchors = AnchorRegistry::new();
    let mut toc = Vec::new();
    let mut blocks = Vec::new();

    for node in root.children() {
      let block = match &node.data.borrow().value {
        NodeValue::Heading(NodeHeading { level, .. }) => {
          let text = extract_inline_text(node);
          let anchor = anchors.unique(&slugify(&text));
          let inner = heading_inner_html(node, *level, &options, &text);
          if self.options.in_toc(*level) {
            toc.push(TocEntry {
              text,
              anchor: anchor.clone(),
              level: *level,
            });
          }
          self.heading_node(&mut tree, *level, &anchor, inner)
        },
        NodeValue::CodeBlock(block) if block.fenced => {
          code_block_node(&mut tree, &block.info, &block.literal)
        },
        _ => tree.create_html(format_node(node, &options)),
      };
      blocks.push(block);
    }

    let container =
      build_toc(&mut tree, &toc, self.options.toc_title.as_deref());
    let root_id = tree.root();
    tree.append(root_id, container);
    for block in blocks {
      tree.append(root_id, block);
    }

    trace!(
      "Built document tree with {} top-level blocks",
      tree.children(root_id).len()
    );
    (tree, toc)
  }

  /// Build an `<hN id="…">` element around already rendered inline HTML.
  fn heading_node(
    &self,
    tree: &mut DocumentTree,
    level: u8,
    anchor: &str,
    inner: String,
  ) -> NodeId {
    let tag = format!("h{level}");
    let href = format!("#{anchor}");
    let heading = tree.create_element(&tag, &[("id", anchor)]);
    let content = tree.create_html(inner);

    if self.options.anchorlink {
      let link =
        tree.create_element("a", &[("class", "toclink"), ("href", &href)]);
      tree.append(link, content);
      tree.append(heading, link);
    } else {
      tree.append(heading, content);
    }

    if self.options.permalink {
      let permalink = tree.create_element("a", &[
        ("class", "headerlink"),
        ("href", &href),
        ("title", "Permanent link"),
      ]);
      let pilcrow = tree.create_text("¶");
      tree.append(permalink, pilcrow);
      tree.append(heading, permalink);
    }

    heading
  }

  /// Title fallback for documents whose first H1 is outside the TOC depth.
  fn first_h1(&self, markdown: &str) -> Option<String> {
    let arena = Arena::new();
    let options = self.comrak_options();
    let root = parse_document(&arena, markdown, &options);

    root.children().find_map(|node| {
      match node.data.borrow().value {
        NodeValue::Heading(NodeHeading { level: 1, .. }) => {
          Some(extract_inline_text(node))
        },
        _ => None,
      }
    })
  }

  /// Build comrak options from `RenderOptions`.
  fn comrak_options(&self) -> Options<'_> {
    let mut options = Options::default();
    if self.options.gfm {
      options.extension.table = true;
      options.extension.strikethrough = true;
      options.extension.tasklist = true;
      options.extension.footnotes = true;
    }
    // Bare URLs are linked by the external link pass
    options.extension.autolink = false;
    options.extension.header_ids = None;
    options.render.r#unsafe = true;
    options
  }
}

/// Run the textual passes in their fixed order: sidebar relabel, code block
/// decoration, external links. Returns the final HTML and the number of
/// decorated code blocks.
pub(crate) fn apply_text_passes(
  html: &str,
  options: &RenderOptions,
) -> (String, usize) {
  let html = relabel_sidebar(html);

  let mut registry = CodeBlockRegistry::new();
  let html = decorate_code_blocks(&html, &mut registry, &options.copy_label);

  let html = if options.external_links_new_tab {
    rewrite_external_links(&html)
  } else {
    html
  };

  (html, registry.count())
}

/// First level-1 entry of the table of contents.
fn toc_title(toc: &[TocEntry]) -> Option<String> {
  toc
    .iter()
    .find(|entry| entry.level == 1)
    .map(|entry| entry.text.clone())
}

/// Build `<pre class="highlight"><code class="language-…">` for a fenced
/// block. Blocks without an info string are tagged `plaintext`.
pub(crate) fn code_block_node(
  tree: &mut DocumentTree,
  info: &str,
  literal: &str,
) -> NodeId {
  let language = info.split_whitespace().next().unwrap_or("plaintext");
  let class = format!("language-{language}");

  let pre = tree.create_element("pre", &[("class", "highlight")]);
  let code = tree.create_element("code", &[("class", &class)]);
  let text = tree.create_text(literal);
  tree.append(code, text);
  tree.append(pre, code);
  pre
}

/// Replace fenced code blocks below the top level (inside list items, block
/// quotes, footnotes) with highlighted HTML blocks, so that comrak renders
/// them in the same shape as top-level blocks.
fn highlight_nested_fences<'a>(root: &'a AstNode<'a>) {
  for node in root.descendants() {
    if node.parent().is_none_or(|parent| std::ptr::eq(parent, root)) {
      continue;
    }

    let html = match &node.data.borrow().value {
      NodeValue::CodeBlock(block) if block.fenced => {
        highlighted_block_html(&block.info, &block.literal)
      },
      _ => continue,
    };
    node.data.borrow_mut().value = NodeValue::HtmlBlock(NodeHtmlBlock {
      block_type: 0,
      literal:    html,
    });
  }
}

/// Markup of [`code_block_node`] as a string.
fn highlighted_block_html(info: &str, literal: &str) -> String {
  let mut tree = DocumentTree::new();
  let pre = code_block_node(&mut tree, info, literal);
  let mut html = String::new();
  tree.serialize_node(pre, &mut html);
  html.push('\n');
  html
}

/// Render a single comrak node to HTML.
fn format_node<'a>(node: &'a AstNode<'a>, options: &Options) -> String {
  let mut html = String::new();
  comrak::format_html(node, options, &mut html).unwrap_or_default();
  html
}

/// Inline HTML of a heading, i.e. comrak's `<hN>…</hN>` with the wrapping
/// tags removed. Falls back to the escaped plain text.
fn heading_inner_html<'a>(
  node: &'a AstNode<'a>,
  level: u8,
  options: &Options,
  text: &str,
) -> String {
  let rendered = format_node(node, options);
  let open = format!("<h{level}>");
  let close = format!("</h{level}>");

  rendered
    .trim_end()
    .strip_prefix(open.as_str())
    .and_then(|rest| rest.strip_suffix(close.as_str()))
    .map_or_else(
      || html_escape::encode_text(text).into_owned(),
      ToString::to_string,
    )
}

/// Extract all inline text from a heading node.
pub fn extract_inline_text<'a>(node: &'a AstNode<'a>) -> String {
  let mut text = String::new();
  for child in node.children() {
    match &child.data.borrow().value {
      NodeValue::Text(t) => text.push_str(t),
      NodeValue::Code(t) => text.push_str(&t.literal),
      NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
      NodeValue::HtmlInline(_) | NodeValue::Image(..) => {},
      _ => text.push_str(&extract_inline_text(child)),
    }
  }
  text
}
