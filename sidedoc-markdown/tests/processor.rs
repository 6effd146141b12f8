#![allow(clippy::expect_used, reason = "Fine in tests")]
use kuchikikiki::{NodeRef, parse_html};
use sidedoc_markdown::{
  DocumentProcessor,
  RenderMode,
  RenderOptions,
  RenderOptionsBuilder,
  processor::{render_lines, wrap_content},
};
use tendril::TendrilSink;

const GUIDE: &str = r#"# Django Course

Intro text, see https://docs.djangoproject.com for the manual.

## Models

```python
class Author(models.Model):
    name = models.CharField(max_length=100)
```

## Views

Use `http://localhost:8000/api/` once the server runs.

```bash
# start the dev server
python manage.py runserver
```
"#;

fn parse(html: &str) -> NodeRef {
  parse_html().one(html)
}

fn attr(node: &NodeRef, name: &str) -> Option<String> {
  node.as_element().and_then(|element| {
    element.attributes.borrow().get(name).map(ToString::to_string)
  })
}

#[test]
fn test_end_to_end_structure() {
  let processor = DocumentProcessor::new(RenderOptions::default());
  let result = processor.render(GUIDE);
  let document = parse(&result.html);

  let toc_links: Vec<String> = document
    .select("div.sidebar a")
    .expect("valid selector")
    .map(|link| link.as_node().text_contents())
    .collect();
  assert_eq!(toc_links, ["Django Course", "Models", "Views"]);
  assert_eq!(result.toc.len(), 3);

  let blocks: Vec<String> = document
    .select("div.content div.code-container > pre.highlight > code")
    .expect("valid selector")
    .filter_map(|code| attr(code.as_node(), "id"))
    .collect();
  assert_eq!(blocks, ["code-block-1", "code-block-2"]);
  assert_eq!(result.code_blocks, 2);

  let buttons: Vec<String> = document
    .select("div.content button.copy-button")
    .expect("valid selector")
    .filter_map(|button| attr(button.as_node(), "onclick"))
    .collect();
  assert_eq!(buttons, [
    "copyCode('code-block-1')",
    "copyCode('code-block-2')"
  ]);
}

#[test]
fn test_body_has_exactly_sidebar_and_content() {
  let processor = DocumentProcessor::new(RenderOptions::default());
  let result = processor.render(GUIDE);

  assert!(result.html.starts_with(r#"<div class="sidebar">"#));
  assert_eq!(result.html.matches(r#"<div class="sidebar">"#).count(), 1);
  assert_eq!(result.html.matches(r#"<div class="content">"#).count(), 1);
  assert!(result.html.ends_with("</div>"));
  assert!(!result.html.contains(r#"<div class="toc">"#));
}

#[test]
fn test_toc_anchors_resolve_to_heading_ids() {
  let processor = DocumentProcessor::new(RenderOptions::default());
  let result = processor.render(GUIDE);
  let document = parse(&result.html);

  for entry in &result.toc {
    let selector = format!("div.content #{}", entry.anchor);
    let heading = document
      .select_first(&selector)
      .expect("heading for every toc entry");
    let tag = heading.name.local.to_string();
    assert_eq!(tag, format!("h{}", entry.level));
  }
}

#[test]
fn test_code_content_is_preserved() {
  let processor = DocumentProcessor::new(RenderOptions::default());
  let result = processor.render(GUIDE);
  let document = parse(&result.html);

  let code = document
    .select_first("#code-block-1")
    .expect("first code block");
  assert_eq!(
    code.as_node().text_contents(),
    "class Author(models.Model):\n    name = \
     models.CharField(max_length=100)\n"
  );

  let second = document
    .select_first("#code-block-2")
    .expect("second code block");
  assert_eq!(
    second.as_node().text_contents(),
    "# start the dev server\npython manage.py runserver\n"
  );
}

#[test]
fn test_links_rewritten_outside_code_only() {
  let processor = DocumentProcessor::new(RenderOptions::default());
  let result = processor.render(GUIDE);

  assert!(result.html.contains(
    r#"<a href="https://docs.djangoproject.com" target="_blank">https://docs.djangoproject.com</a>"#
  ));
  assert!(
    result
      .html
      .contains("<code>http://localhost:8000/api/</code>")
  );
}

#[test]
fn test_links_left_alone_when_disabled() {
  let options = RenderOptionsBuilder::new()
    .external_links_new_tab(false)
    .build();
  let result = DocumentProcessor::new(options).render(GUIDE);
  assert!(!result.html.contains("target=\"_blank\""));
}

#[test]
fn test_wrap_content_is_idempotent_on_rendered_tree() {
  let processor = DocumentProcessor::new(RenderOptions::default());
  let (mut tree, _) = processor.build_tree(GUIDE);

  wrap_content(&mut tree);
  let once = tree.clone();
  wrap_content(&mut tree);

  assert_eq!(tree, once);
  assert_eq!(tree.children(tree.root()).len(), 2);
}

#[test]
fn test_numbering_resets_between_renders() {
  let processor = DocumentProcessor::new(RenderOptions::default());
  let first = processor.render(GUIDE);
  let second = processor.render(GUIDE);

  assert_eq!(first, second);
  assert!(!second.html.contains("code-block-3"));
}

#[test]
fn test_toc_title_and_depth() {
  let options = RenderOptionsBuilder::new()
    .toc_title(Some("Оглавление"))
    .toc_levels(2, 3)
    .build();
  let result = DocumentProcessor::new(options).render(GUIDE);

  assert!(
    result
      .html
      .contains(r#"<span class="toctitle">Оглавление</span>"#)
  );
  assert_eq!(result.toc.len(), 2);
  assert_eq!(result.title.as_deref(), Some("Django Course"));
}

#[test]
fn test_variants_agree_on_toc_and_code_blocks() {
  let tree_result =
    DocumentProcessor::new(RenderOptions::default()).render(GUIDE);
  let lines_result = DocumentProcessor::new(RenderOptions {
    mode: RenderMode::Lines,
    ..Default::default()
  })
  .render(GUIDE);

  assert_eq!(tree_result.toc, lines_result.toc);
  assert_eq!(tree_result.code_blocks, lines_result.code_blocks);
  assert_eq!(tree_result.title, lines_result.title);

  let lines_document = parse(&lines_result.html);
  let ids: Vec<String> = lines_document
    .select("div.content code")
    .expect("valid selector")
    .filter_map(|code| attr(code.as_node(), "id"))
    .collect();
  assert_eq!(ids, ["code-block-1", "code-block-2"]);
}

#[test]
fn test_variants_agree_on_fence_inside_list_item() {
  let markdown = "# Install\n\n1. Run:\n\n   ```bash\n   pip install \
                  django\n   ```\n";
  for mode in [RenderMode::Tree, RenderMode::Lines] {
    let result = DocumentProcessor::new(RenderOptions {
      mode,
      ..Default::default()
    })
    .render(markdown);
    let document = parse(&result.html);

    assert_eq!(result.code_blocks, 1, "{mode}");
    let code = document
      .select_first("div.code-container > pre.highlight > code#code-block-1")
      .expect("decorated block");
    assert_eq!(code.as_node().text_contents().trim(), "pip install django");
    assert_eq!(
      document
        .select("button.copy-button")
        .expect("valid selector")
        .count(),
      1,
      "{mode}"
    );
  }
}

#[test]
fn test_heading_text_never_takes_a_code_block_id() {
  let markdown = "# Code Block 1\n\n```python\nprint(1)\n```\n";
  for mode in [RenderMode::Tree, RenderMode::Lines] {
    let result = DocumentProcessor::new(RenderOptions {
      mode,
      ..Default::default()
    })
    .render(markdown);
    let document = parse(&result.html);

    let ids: Vec<String> = document
      .select("[id^='code-block-']")
      .expect("valid selector")
      .filter_map(|node| attr(node.as_node(), "id"))
      .collect();
    assert_eq!(ids, ["code-block-1"], "{mode}");
    assert_eq!(result.toc[0].anchor, "section-code-block-1", "{mode}");
  }
}

#[test]
fn test_lines_variant_directly() {
  let result = render_lines("# Getting Started Guide\n", &RenderOptions::default());
  assert_eq!(result.toc[0].anchor, "getting-started-guide");
  assert_eq!(result.toc[0].level, 1);
}

#[test]
fn test_empty_document() {
  let result = DocumentProcessor::new(RenderOptions::default()).render("");
  assert!(result.toc.is_empty());
  assert_eq!(result.code_blocks, 0);
  assert_eq!(result.title, None);
  assert_eq!(
    result.html,
    r#"<div class="sidebar"><ul></ul></div><div class="content"></div>"#
  );
}

#[test]
fn test_tables_render_with_gfm() {
  let md = "| a | b |\n|---|---|\n| 1 | 2 |\n";
  let result = DocumentProcessor::new(RenderOptions::default()).render(md);
  assert!(result.html.contains("<table>"));
}

#[test]
fn test_rendered_document_serializes() {
  let result = DocumentProcessor::new(RenderOptions::default()).render(GUIDE);
  let value = serde_json::to_value(&result).expect("serializable result");

  assert_eq!(value["title"], "Django Course");
  assert_eq!(value["code_blocks"], 2);
  assert_eq!(value["toc"][1]["anchor"], "models");
  assert_eq!(value["toc"][1]["level"], 2);
}
