//! Table of contents extraction and the sidebar/content split.
use log::trace;

use crate::{
  tree::{DocumentTree, NodeId},
  types::TocEntry,
};

/// Class of the container emitted for the table of contents.
pub const TOC_CLASS: &str = "toc";

/// Class of the container wrapping everything but the table of contents.
pub const CONTENT_CLASS: &str = "content";

/// Build the table of contents container for `entries`.
///
/// The container is `<div class="toc">` holding an optional
/// `<span class="toctitle">` and a `<ul>` nested by heading level. It is
/// returned detached; the caller decides where to insert it.
pub fn build_toc(
  tree: &mut DocumentTree,
  entries: &[TocEntry],
  title: Option<&str>,
) -> NodeId {
  let container = tree.create_element("div", &[("class", TOC_CLASS)]);

  if let Some(title) = title {
    let span = tree.create_element("span", &[("class", "toctitle")]);
    let text = tree.create_text(title);
    tree.append(span, text);
    tree.append(container, span);
  }

  let list = tree.create_element("ul", &[]);
  tree.append(container, list);

  // (level, list, last item appended to that list)
  let mut stack: Vec<(u8, NodeId, Option<NodeId>)> = Vec::new();

  for entry in entries {
    if stack.is_empty() {
      stack.push((entry.level, list, None));
    }

    while stack.len() > 1
      && stack.last().is_some_and(|(level, ..)| entry.level < *level)
    {
      stack.pop();
    }

    let (current_level, last_item) = stack
      .last()
      .map_or((entry.level, None), |(level, _, item)| (*level, *item));

    if entry.level > current_level {
      if let Some(parent_item) = last_item {
        let nested = tree.create_element("ul", &[]);
        tree.append(parent_item, nested);
        stack.push((entry.level, nested, None));
      }
    } else if entry.level < current_level
      && let Some(base) = stack.last_mut()
    {
      // Shallower than anything seen so far: becomes the new base level
      base.0 = entry.level;
    }

    let href = format!("#{}", entry.anchor);
    let item = tree.create_element("li", &[]);
    let link = tree.create_element("a", &[("href", &href)]);
    let text = tree.create_text(entry.text.as_str());
    tree.append(link, text);
    tree.append(item, link);

    if let Some((_, current_list, last_item)) = stack.last_mut() {
      tree.append(*current_list, item);
      *last_item = Some(item);
    }
  }

  trace!("Built table of contents with {} entries", entries.len());
  container
}

/// Whether `id` is the content region created by [`wrap_content`].
fn is_content_region(tree: &DocumentTree, id: NodeId) -> bool {
  tree.tag(id) == Some("div") && tree.has_class(id, CONTENT_CLASS)
}

/// Move every child of the root except the first (the table of contents)
/// into a new `<div class="content">`.
///
/// Afterwards the root has exactly two children: the untouched table of
/// contents and the content region, with the body keeping its original
/// order. A root that already has this shape is left untouched.
pub fn wrap_content(tree: &mut DocumentTree) {
  let root = tree.root();
  let children = tree.children(root).to_vec();

  if children.is_empty() {
    trace!("Empty document, nothing to wrap");
    return;
  }

  if children.len() == 2 && is_content_region(tree, children[1]) {
    trace!("Content region already present");
    return;
  }

  let content = tree.create_element("div", &[("class", CONTENT_CLASS)]);
  for child in &children[1..] {
    tree.append(content, *child);
  }
  tree.append(root, content);
}
